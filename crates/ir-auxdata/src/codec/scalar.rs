//! Codecs for the leaf types: `int64_t`, `uint64_t`/`Addr`, `string`,
//! `UUID` and `Offset`.
//!
//! None of them accept subtypes.

use crate::codec::primitives::{Reader, Writer};
use crate::codec::registry::Decoder;
use crate::codec::typename::TypeTree;
use crate::error::{DecodeError, EncodeError};
use crate::model::{Element, Offset, Value};

// =============================================================================
// ARITY
// =============================================================================

fn check_decode_leaf(codec: &'static str, subtypes: &[TypeTree]) -> Result<(), DecodeError> {
    if subtypes.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::Arity {
            codec,
            expected: "0",
            actual: subtypes.len(),
        })
    }
}

fn check_encode_leaf(codec: &'static str, subtypes: &[TypeTree]) -> Result<(), EncodeError> {
    if subtypes.is_empty() {
        Ok(())
    } else {
        Err(EncodeError::Arity {
            codec,
            expected: "0",
            actual: subtypes.len(),
        })
    }
}

fn mismatch(codec: &'static str, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        codec,
        found: value.kind(),
    }
}

// =============================================================================
// DECODING
// =============================================================================

pub(crate) fn decode_int64(
    reader: &mut Reader<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    check_decode_leaf("int64_t", subtypes)?;
    Ok(Value::Int64(reader.read_i64("int64_t")?))
}

pub(crate) fn decode_uint64(
    reader: &mut Reader<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    check_decode_leaf("uint64_t", subtypes)?;
    Ok(Value::Uint64(reader.read_u64("uint64_t")?))
}

pub(crate) fn decode_string(
    reader: &mut Reader<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    check_decode_leaf("string", subtypes)?;
    Ok(Value::String(reader.read_string("string")?))
}

/// Decodes a UUID, handing back the live node when the resolver knows it.
pub(crate) fn decode_uuid(
    reader: &mut Reader<'_>,
    decoder: &Decoder<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    check_decode_leaf("UUID", subtypes)?;
    let id = reader.read_id("UUID")?;
    Ok(match decoder.resolve(&id) {
        Some(node) => Value::Node(node),
        None => Value::Uuid(id),
    })
}

/// Decodes an Offset, resolving its element the same way as a `UUID`.
pub(crate) fn decode_offset(
    reader: &mut Reader<'_>,
    decoder: &Decoder<'_>,
    subtypes: &[TypeTree],
) -> Result<Value, DecodeError> {
    check_decode_leaf("Offset", subtypes)?;
    let id = reader.read_id("Offset.element")?;
    let displacement = reader.read_u64("Offset.displacement")?;
    let element = match decoder.resolve(&id) {
        Some(node) => Element::Node(node),
        None => Element::Id(id),
    };
    Ok(Value::Offset(Offset::new(element, displacement)))
}

// =============================================================================
// ENCODING
// =============================================================================

pub(crate) fn encode_int64(
    writer: &mut Writer,
    value: &Value,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    check_encode_leaf("int64_t", subtypes)?;
    match value {
        Value::Int64(v) => writer.write_i64(*v),
        other => return Err(mismatch("int64_t", other)),
    }
    Ok(())
}

pub(crate) fn encode_uint64(
    writer: &mut Writer,
    value: &Value,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    check_encode_leaf("uint64_t", subtypes)?;
    match value {
        Value::Uint64(v) => writer.write_u64(*v),
        other => return Err(mismatch("uint64_t", other)),
    }
    Ok(())
}

pub(crate) fn encode_string(
    writer: &mut Writer,
    value: &Value,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    check_encode_leaf("string", subtypes)?;
    match value {
        Value::String(s) => writer.write_string(s),
        other => return Err(mismatch("string", other)),
    }
    Ok(())
}

/// Encodes a raw UUID or the identity of a node.
pub(crate) fn encode_uuid(
    writer: &mut Writer,
    value: &Value,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    check_encode_leaf("UUID", subtypes)?;
    let id = value.as_id().ok_or_else(|| mismatch("UUID", value))?;
    writer.write_id(&id);
    Ok(())
}

pub(crate) fn encode_offset(
    writer: &mut Writer,
    value: &Value,
    subtypes: &[TypeTree],
) -> Result<(), EncodeError> {
    check_encode_leaf("Offset", subtypes)?;
    match value {
        Value::Offset(offset) => {
            writer.write_id(&offset.element_id());
            writer.write_u64(offset.displacement);
        }
        other => return Err(mismatch("Offset", other)),
    }
    Ok(())
}
