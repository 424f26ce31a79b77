//! Codecs for the generic container types.
//!
//! | type | layout |
//! |---|---|
//! | `mapping<K,V>` | u64 count, then count × (K, V) |
//! | `sequence<T>` | u64 count, then count × T |
//! | `set<T>` | u64 count, then count × T |
//! | `tuple<T1,...,Tn>` | T1 .. Tn, no count |
//!
//! Element types are decoded and encoded by recursing through the registry.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::primitives::{Reader, Writer};
use crate::codec::registry::{Decoder, Encoder};
use crate::codec::typename::TypeTree;
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_PREALLOC_ITEMS;
use crate::model::Value;

fn mismatch(codec: &'static str, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        codec,
        found: value.kind(),
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes `mapping<K,V>`. A repeated key keeps the last value.
pub(crate) fn decode_mapping(
    reader: &mut Reader<'_>,
    decoder: &Decoder<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    let [key_type, value_type] = subtypes else {
        return Err(DecodeError::Arity {
            codec: "mapping",
            expected: "2",
            actual: subtypes.len(),
        });
    };
    let count = reader.read_len("mapping")?;
    let mut mapping = BTreeMap::new();
    for _ in 0..count {
        let key = decoder.decode_tree(reader, key_type)?;
        let value = decoder.decode_tree(reader, value_type)?;
        mapping.insert(key, value);
    }
    Ok(Value::Mapping(mapping))
}

pub(crate) fn decode_sequence(
    reader: &mut Reader<'_>,
    decoder: &Decoder<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    let [element_type] = subtypes else {
        return Err(DecodeError::Arity {
            codec: "sequence",
            expected: "1",
            actual: subtypes.len(),
        });
    };
    let count = reader.read_len("sequence")?;
    let mut sequence = Vec::with_capacity(count.min(MAX_PREALLOC_ITEMS));
    for _ in 0..count {
        sequence.push(decoder.decode_tree(reader, element_type)?);
    }
    Ok(Value::Sequence(sequence))
}

/// Decodes `set<T>`. Duplicate elements collapse.
pub(crate) fn decode_set(
    reader: &mut Reader<'_>,
    decoder: &Decoder<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    let [element_type] = subtypes else {
        return Err(DecodeError::Arity {
            codec: "set",
            expected: "1",
            actual: subtypes.len(),
        });
    };
    let count = reader.read_len("set")?;
    let mut set = BTreeSet::new();
    for _ in 0..count {
        set.insert(decoder.decode_tree(reader, element_type)?);
    }
    Ok(Value::Set(set))
}

/// Decodes `tuple<...>`: one value per subtype, no count on the wire.
pub(crate) fn decode_tuple(
    reader: &mut Reader<'_>,
    decoder: &Decoder<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    if subtypes.is_empty() {
        return Err(DecodeError::Arity {
            codec: "tuple",
            expected: "at least 1",
            actual: 0,
        });
    }
    let items = subtypes
        .iter()
        .map(|subtype| decoder.decode_tree(reader, subtype))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Tuple(items))
}

// =============================================================================
// ENCODING
// =============================================================================

pub(crate) fn encode_mapping(
    writer: &mut Writer,
    value: &Value,
    encoder: &Encoder<'_>,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    let [key_type, value_type] = subtypes else {
        return Err(EncodeError::Arity {
            codec: "mapping",
            expected: "2",
            actual: subtypes.len(),
        });
    };
    let Value::Mapping(mapping) = value else {
        return Err(mismatch("mapping", value));
    };
    writer.write_len(mapping.len());
    for (key, value) in mapping {
        encoder.encode_tree(writer, key, key_type)?;
        encoder.encode_tree(writer, value, value_type)?;
    }
    Ok(())
}

pub(crate) fn encode_sequence(
    writer: &mut Writer,
    value: &Value,
    encoder: &Encoder<'_>,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    let [element_type] = subtypes else {
        return Err(EncodeError::Arity {
            codec: "sequence",
            expected: "1",
            actual: subtypes.len(),
        });
    };
    let Value::Sequence(items) = value else {
        return Err(mismatch("sequence", value));
    };
    writer.write_len(items.len());
    for item in items {
        encoder.encode_tree(writer, item, element_type)?;
    }
    Ok(())
}

pub(crate) fn encode_set(
    writer: &mut Writer,
    value: &Value,
    encoder: &Encoder<'_>,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    let [element_type] = subtypes else {
        return Err(EncodeError::Arity {
            codec: "set",
            expected: "1",
            actual: subtypes.len(),
        });
    };
    let Value::Set(items) = value else {
        return Err(mismatch("set", value));
    };
    writer.write_len(items.len());
    for item in items {
        encoder.encode_tree(writer, item, element_type)?;
    }
    Ok(())
}

pub(crate) fn encode_tuple(
    writer: &mut Writer,
    value: &Value,
    encoder: &Encoder<'_>,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    if subtypes.is_empty() {
        return Err(EncodeError::Arity {
            codec: "tuple",
            expected: "at least 1",
            actual: 0,
        });
    }
    let Value::Tuple(items) = value else {
        return Err(mismatch("tuple", value));
    };
    if items.len() != subtypes.len() {
        return Err(EncodeError::TupleLength {
            expected: subtypes.len(),
            actual: items.len(),
        });
    }
    for (item, subtype) in items.iter().zip(subtypes) {
        encoder.encode_tree(writer, item, subtype)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::registry::Registry;
    use crate::codec::typename::parse_type;
    use crate::model::{Id, NoNodes, Offset, UnknownData};

    fn roundtrip(value: &Value, descriptor: &str) -> (Vec<u8>, Value) {
        let registry = Registry::new();
        let tree = parse_type(descriptor).unwrap();

        let mut writer = Writer::new();
        Encoder::new(&registry).encode_tree(&mut writer, value, &tree).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = Reader::new(&bytes);
        let decoded = Decoder::new(&registry, &NoNodes)
            .decode_tree(&mut reader, &tree)
            .unwrap();
        assert!(reader.is_empty(), "trailing bytes for {}", descriptor);
        (bytes, decoded)
    }

    #[test]
    fn test_mapping_roundtrip() {
        let mut mapping = BTreeMap::new();
        mapping.insert(Value::from("main"), Value::Uint64(0x401000));
        mapping.insert(Value::from("_start"), Value::Uint64(0x400f00));
        let value = Value::Mapping(mapping);

        let (bytes, decoded) = roundtrip(&value, "mapping<string,Addr>");
        assert_eq!(&bytes[..8], &2u64.to_le_bytes());
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_mapping_last_write_wins() {
        let mut writer = Writer::new();
        writer.write_u64(2);
        writer.write_string("k");
        writer.write_i64(1);
        writer.write_string("k");
        writer.write_i64(2);

        let registry = Registry::new();
        let tree = parse_type("mapping<string,int64_t>").unwrap();
        let mut reader = Reader::new(writer.as_bytes());
        let decoded = Decoder::new(&registry, &NoNodes)
            .decode_tree(&mut reader, &tree)
            .unwrap();

        let mut expected = BTreeMap::new();
        expected.insert(Value::from("k"), Value::Int64(2));
        assert_eq!(decoded, Value::Mapping(expected));
    }

    #[test]
    fn test_sequence_preserves_order_and_duplicates() {
        let value = Value::Sequence(vec![
            Value::Int64(3),
            Value::Int64(-1),
            Value::Int64(3),
            Value::Int64(0),
        ]);
        let (bytes, decoded) = roundtrip(&value, "sequence<int64_t>");
        assert_eq!(bytes.len(), 8 + 4 * 8);
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let mut writer = Writer::new();
        writer.write_u64(3);
        writer.write_u64(7);
        writer.write_u64(9);
        writer.write_u64(7);

        let registry = Registry::new();
        let tree = parse_type("set<uint64_t>").unwrap();
        let mut reader = Reader::new(writer.as_bytes());
        let decoded = Decoder::new(&registry, &NoNodes)
            .decode_tree(&mut reader, &tree)
            .unwrap();

        let expected: BTreeSet<Value> = [Value::Uint64(7), Value::Uint64(9)].into_iter().collect();
        assert_eq!(decoded, Value::Set(expected));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_set_roundtrip_keeps_membership() {
        let set: BTreeSet<Value> = ["b", "a", "c"].into_iter().map(Value::from).collect();
        let value = Value::Set(set);
        let (bytes, decoded) = roundtrip(&value, "set<string>");
        assert_eq!(&bytes[..8], &3u64.to_le_bytes());
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_tuple_has_no_count() {
        let id = Id::from_bytes([5u8; 16]);
        let value = Value::Tuple(vec![
            Value::Uuid(id),
            Value::Int64(-4),
            Value::Offset(Offset::new(id, 12)),
        ]);
        let (bytes, decoded) = roundtrip(&value, "tuple<UUID,int64_t,Offset>");
        assert_eq!(bytes.len(), 16 + 8 + 24);
        assert_eq!(&bytes[..16], id.as_bytes());
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_tuple_length_mismatch() {
        let registry = Registry::new();
        let tree = parse_type("tuple<int64_t,int64_t>").unwrap();
        let value = Value::Tuple(vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]);

        let mut writer = Writer::new();
        let result = Encoder::new(&registry).encode_tree(&mut writer, &value, &tree);
        assert_eq!(result, Err(EncodeError::TupleLength { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_tuple_truncated_input() {
        let registry = Registry::new();
        let tree = parse_type("tuple<uint64_t,uint64_t>").unwrap();
        let bytes = 1u64.to_le_bytes();

        let mut reader = Reader::new(&bytes);
        let result = Decoder::new(&registry, &NoNodes).decode_tree(&mut reader, &tree);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_container_arity() {
        let registry = Registry::new();
        let decoder = Decoder::new(&registry, &NoNodes);
        let encoder = Encoder::new(&registry);
        let bytes = [0u8; 8];

        for (descriptor, codec) in [
            ("mapping<UUID>", "mapping"),
            ("mapping<UUID,UUID,UUID>", "mapping"),
            ("sequence<UUID,UUID>", "sequence"),
            ("set<UUID,UUID>", "set"),
        ] {
            let tree = parse_type(descriptor).unwrap();
            let mut reader = Reader::new(&bytes);
            match decoder.decode_tree(&mut reader, &tree) {
                Err(DecodeError::Arity { codec: c, .. }) => assert_eq!(c, codec),
                other => panic!("expected arity error for {}, got {:?}", descriptor, other),
            }
        }

        let tree = parse_type("tuple").unwrap();
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            decoder.decode_tree(&mut reader, &tree),
            Err(DecodeError::Arity {
                codec: "tuple",
                expected: "at least 1",
                actual: 0
            })
        );
        assert_eq!(reader.position(), 0);

        for descriptor in ["mapping", "sequence", "set", "tuple"] {
            let tree = parse_type(descriptor).unwrap();
            let mut writer = Writer::new();
            let result = encoder.encode_tree(&mut writer, &Value::Sequence(vec![]), &tree);
            assert!(
                matches!(result, Err(EncodeError::Arity { actual: 0, .. })),
                "expected arity error for {}, got {:?}",
                descriptor,
                result
            );
        }
    }

    #[test]
    fn test_container_type_mismatch() {
        let registry = Registry::new();
        let tree = parse_type("sequence<int64_t>").unwrap();
        let mut writer = Writer::new();
        let result = Encoder::new(&registry).encode_tree(
            &mut writer,
            &Value::Tuple(vec![Value::Int64(1)]),
            &tree,
        );
        assert_eq!(
            result,
            Err(EncodeError::TypeMismatch {
                codec: "sequence",
                found: "tuple"
            })
        );
    }

    #[test]
    fn test_nested_unknown_value_is_a_mismatch() {
        let registry = Registry::new();
        let value = Value::Sequence(vec![
            Value::Int64(1),
            Value::Unknown(UnknownData(vec![1, 2, 3])),
        ]);

        let mut writer = Writer::new();
        let result = registry.encode(&mut writer, &value, "sequence<int64_t>");
        assert_eq!(
            result,
            Err(EncodeError::TypeMismatch {
                codec: "int64_t",
                found: "unknown data"
            })
        );
        assert!(writer.is_empty());
    }

    #[test]
    fn test_forged_count_fails_on_eof() {
        let registry = Registry::new();
        let tree = parse_type("sequence<uint64_t>").unwrap();
        let bytes = u64::MAX.to_le_bytes();

        let mut reader = Reader::new(&bytes);
        let result = Decoder::new(&registry, &NoNodes).decode_tree(&mut reader, &tree);
        assert!(matches!(
            result,
            Err(DecodeError::UnexpectedEof { .. }) | Err(DecodeError::LengthOverflow { .. })
        ));
    }
}
