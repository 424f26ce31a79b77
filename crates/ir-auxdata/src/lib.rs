//! Type-descriptor driven binary codecs for IR auxiliary data.
//!
//! Auxiliary data lets tools attach open-ended, structured information to an
//! IR graph without touching the graph's fixed schema. Each entry is stored as
//! a type descriptor plus bytes; this crate turns those bytes into values and
//! back.
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use ir_auxdata::{decode, encode_to_vec, Id, NoNodes, Offset, Value};
//!
//! let function = Id::from_bytes([1u8; 16]);
//! let block = Id::from_bytes([2u8; 16]);
//!
//! let mut table = BTreeMap::new();
//! table.insert(
//!     Value::Uuid(function),
//!     Value::Sequence(vec![Value::Offset(Offset::new(block, 5))]),
//! );
//! let value = Value::Mapping(table);
//!
//! let bytes = encode_to_vec(&value, "mapping<UUID,sequence<Offset>>").unwrap();
//! assert_eq!(bytes.len(), 56);
//!
//! let decoded = decode(&bytes, "mapping<UUID,sequence<Offset>>", &NoNodes).unwrap();
//! assert_eq!(decoded, value);
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Type descriptor parsing, the codec registry, built-in codecs
//! - [`model`]: Values, identifiers, node resolution, auxiliary data entries
//! - [`error`]: Error types
//! - [`limits`]: Allocation limits for decoding
//!
//! # Wire Format
//!
//! | type | layout |
//! |---|---|
//! | `int64_t` / `uint64_t` / `Addr` | 8 bytes, little-endian |
//! | `string` | u64 length + UTF-8 bytes |
//! | `UUID` | 16 bytes |
//! | `Offset` | 16-byte UUID + u64 displacement |
//! | `mapping<K,V>` | u64 count + count × (K, V) |
//! | `sequence<T>` / `set<T>` | u64 count + count × T |
//! | `tuple<T1,...,Tn>` | T1 .. Tn, no count |
//!
//! Data whose descriptor names an unregistered type decodes to
//! [`Value::Unknown`] and is written back byte for byte.

use lazy_static::lazy_static;

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{parse_type, Builtin, Codec, Decoder, Encoder, Reader, Registry, TypeTree, Writer};
pub use error::{DecodeError, EncodeError, ErrorCode, TypeNameError};
pub use model::{
    format_id, new_id, parse_id, AuxData, AuxDataContainer, Element, Id, NoNodes, Node, NodeRef,
    NodeResolver, Offset, SerializedAuxData, UnknownData, UuidCache, Value, NIL_ID,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

lazy_static! {
    /// Registry holding only the built-in codecs.
    pub static ref DEFAULT_REGISTRY: Registry = Registry::new();
}

/// Decodes `data` as `type_name` using the built-in codecs.
///
/// See [`Registry::decode`].
pub fn decode(
    data: &[u8],
    type_name: &str,
    resolver: &dyn NodeResolver,
) -> Result<Value, DecodeError> {
    DEFAULT_REGISTRY.decode(data, type_name, resolver)
}

/// Encodes `value` as `type_name` using the built-in codecs.
///
/// See [`Registry::encode`].
pub fn encode(writer: &mut Writer, value: &Value, type_name: &str) -> Result<(), EncodeError> {
    DEFAULT_REGISTRY.encode(writer, value, type_name)
}

/// Encodes `value` into a fresh buffer using the built-in codecs.
pub fn encode_to_vec(value: &Value, type_name: &str) -> Result<Vec<u8>, EncodeError> {
    DEFAULT_REGISTRY.encode_to_vec(value, type_name)
}
