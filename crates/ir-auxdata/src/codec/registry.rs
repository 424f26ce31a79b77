//! Codec registry and top-level encode/decode.
//!
//! The registry maps type names to [`Codec`]s. Decoding and encoding walk a
//! parsed [`TypeTree`], looking up the codec for each node by name and
//! passing the dispatcher down so containers can recurse into their
//! subtypes.
//!
//! Decoding is forgiving about unknown names: if any name in the descriptor
//! is not registered, the whole input comes back as [`Value::Unknown`] so it
//! can be written back later without loss. Encoding is not: an unknown name
//! there is a caller error.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::codec::container;
use crate::codec::primitives::{Reader, Writer};
use crate::codec::scalar;
use crate::codec::typename::{parse_type, TypeTree};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Id, NodeRef, NodeResolver, UnknownData, Value};

/// Paired decode/encode behavior for one type name.
///
/// `decode` must consume exactly the bytes of one value and `encode` must
/// append exactly the bytes of one value, so that
/// `decode(encode(v)) == v`. Container codecs use the dispatcher to handle
/// their `subtypes`.
pub trait Codec: Send + Sync {
    fn decode(
        &self,
        reader: &mut Reader<'_>,
        decoder: &Decoder<'_>,
        subtypes: &[TypeTree],
    ) -> Result<Value, DecodeError>;

    fn encode(
        &self,
        writer: &mut Writer,
        value: &Value,
        encoder: &Encoder<'_>,
        subtypes: &[TypeTree],
    ) -> Result<(), EncodeError>;
}

/// The built-in codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Int64,
    Uint64,
    String,
    Uuid,
    Offset,
    Mapping,
    Sequence,
    Set,
    Tuple,
}

impl Builtin {
    /// Registered names of the built-in codecs. `Addr` is an alias of
    /// `uint64_t`.
    pub const NAMES: [(&'static str, Builtin); 10] = [
        ("int64_t", Builtin::Int64),
        ("uint64_t", Builtin::Uint64),
        ("Addr", Builtin::Uint64),
        ("string", Builtin::String),
        ("UUID", Builtin::Uuid),
        ("Offset", Builtin::Offset),
        ("mapping", Builtin::Mapping),
        ("sequence", Builtin::Sequence),
        ("set", Builtin::Set),
        ("tuple", Builtin::Tuple),
    ];
}

impl Codec for Builtin {
    fn decode(
        &self,
        reader: &mut Reader<'_>,
        decoder: &Decoder<'_>,
        subtypes: &[TypeTree],
    ) -> Result<Value, DecodeError> {
        match self {
            Builtin::Int64 => scalar::decode_int64(reader, subtypes),
            Builtin::Uint64 => scalar::decode_uint64(reader, subtypes),
            Builtin::String => scalar::decode_string(reader, subtypes),
            Builtin::Uuid => scalar::decode_uuid(reader, decoder, subtypes),
            Builtin::Offset => scalar::decode_offset(reader, decoder, subtypes),
            Builtin::Mapping => container::decode_mapping(reader, decoder, subtypes),
            Builtin::Sequence => container::decode_sequence(reader, decoder, subtypes),
            Builtin::Set => container::decode_set(reader, decoder, subtypes),
            Builtin::Tuple => container::decode_tuple(reader, decoder, subtypes),
        }
    }

    fn encode(
        &self,
        writer: &mut Writer,
        value: &Value,
        encoder: &Encoder<'_>,
        subtypes: &[TypeTree],
    ) -> Result<(), EncodeError> {
        match self {
            Builtin::Int64 => scalar::encode_int64(writer, value, subtypes),
            Builtin::Uint64 => scalar::encode_uint64(writer, value, subtypes),
            Builtin::String => scalar::encode_string(writer, value, subtypes),
            Builtin::Uuid => scalar::encode_uuid(writer, value, subtypes),
            Builtin::Offset => scalar::encode_offset(writer, value, subtypes),
            Builtin::Mapping => container::encode_mapping(writer, value, encoder, subtypes),
            Builtin::Sequence => container::encode_sequence(writer, value, encoder, subtypes),
            Builtin::Set => container::encode_set(writer, value, encoder, subtypes),
            Builtin::Tuple => container::encode_tuple(writer, value, encoder, subtypes),
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Decoding dispatcher handed to every codec.
pub struct Decoder<'a> {
    registry: &'a Registry,
    resolver: &'a dyn NodeResolver,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a Registry, resolver: &'a dyn NodeResolver) -> Self {
        Self { registry, resolver }
    }

    /// Decodes one value of type `tree`.
    pub fn decode_tree(
        &self,
        reader: &mut Reader<'_>,
        tree: &TypeTree,
    ) -> Result<Value, DecodeError> {
        let codec = self
            .registry
            .get(&tree.name)
            .ok_or_else(|| DecodeError::UnknownCodec {
                name: tree.name.clone(),
            })?;
        codec.decode(reader, self, &tree.subtypes)
    }

    /// Looks an identifier up in the caller's resolver.
    pub fn resolve(&self, id: &Id) -> Option<NodeRef> {
        self.resolver.resolve(id)
    }
}

/// Encoding dispatcher handed to every codec.
pub struct Encoder<'a> {
    registry: &'a Registry,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Encodes `value` as type `tree`.
    pub fn encode_tree(
        &self,
        writer: &mut Writer,
        value: &Value,
        tree: &TypeTree,
    ) -> Result<(), EncodeError> {
        let codec = self
            .registry
            .get(&tree.name)
            .ok_or_else(|| EncodeError::UnknownCodec {
                name: tree.name.clone(),
            })?;
        codec.encode(writer, value, self, &tree.subtypes)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Name → codec table.
///
/// Registration takes `&mut self`; once configured, a registry can be shared
/// by reference across any number of encode/decode calls.
#[derive(Clone, Default)]
pub struct Registry {
    codecs: FxHashMap<String, Arc<dyn Codec>>,
}

impl Registry {
    /// Creates a registry holding the built-in codecs.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, builtin) in Builtin::NAMES {
            registry.register_codec(name, builtin);
        }
        registry
    }

    /// Creates a registry with no codecs at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Binds `name` to `codec`, returning the codec it replaced.
    pub fn register_codec(
        &mut self,
        name: impl Into<String>,
        codec: impl Codec + 'static,
    ) -> Option<Arc<dyn Codec>> {
        let name = name.into();
        let previous = self.codecs.insert(name.clone(), Arc::new(codec));
        if previous.is_some() {
            trace!(name = %name, "overrode codec");
        } else {
            trace!(name = %name, "registered codec");
        }
        previous
    }

    /// Removes the codec bound to `name`.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Codec>> {
        self.codecs.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Codec>> {
        self.codecs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // -------------------------------------------------------------------------
    // Decoding
    // -------------------------------------------------------------------------

    /// Decodes `data` as a value of type `type_name`.
    ///
    /// A malformed descriptor is an error. An unregistered name anywhere in
    /// the descriptor yields the whole of `data` as [`Value::Unknown`].
    pub fn decode(
        &self,
        data: &[u8],
        type_name: &str,
        resolver: &dyn NodeResolver,
    ) -> Result<Value, DecodeError> {
        let tree = parse_type(type_name)?;
        self.decode_tree(data, &tree, resolver)
    }

    /// Like [`Registry::decode`], reading the input to its end first.
    pub fn decode_from<R: Read>(
        &self,
        mut input: R,
        type_name: &str,
        resolver: &dyn NodeResolver,
    ) -> Result<Value, DecodeError> {
        let tree = parse_type(type_name)?;
        let mut data = Vec::new();
        input
            .read_to_end(&mut data)
            .map_err(|e| DecodeError::Io(e.to_string()))?;
        self.decode_tree(&data, &tree, resolver)
    }

    /// Decodes `data` against an already parsed descriptor.
    ///
    /// The descriptor is checked against the registry before any byte is
    /// read, so an unregistered name yields a blob whatever the data holds.
    pub fn decode_tree(
        &self,
        data: &[u8],
        tree: &TypeTree,
        resolver: &dyn NodeResolver,
    ) -> Result<Value, DecodeError> {
        if let Some(name) = self.first_unregistered(tree) {
            debug!(
                type_name = %tree,
                unknown = %name,
                len = data.len(),
                "unknown codec, keeping data as an opaque blob"
            );
            return Ok(Value::Unknown(UnknownData(data.to_vec())));
        }

        let mut reader = Reader::new(data);
        match Decoder::new(self, resolver).decode_tree(&mut reader, tree) {
            Ok(value) => {
                if !reader.is_empty() {
                    debug!(
                        type_name = %tree,
                        trailing = reader.remaining_len(),
                        "ignoring trailing bytes after decoded value"
                    );
                }
                Ok(value)
            }
            // A custom codec can still dispatch to a name outside its subtypes.
            Err(DecodeError::UnknownCodec { name }) => {
                debug!(
                    type_name = %tree,
                    unknown = %name,
                    "codec dispatched to an unknown name, keeping data as a blob"
                );
                Ok(Value::Unknown(UnknownData(data.to_vec())))
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the first name in `tree`, depth first, with no registered codec.
    fn first_unregistered<'t>(&self, tree: &'t TypeTree) -> Option<&'t str> {
        if !self.contains(&tree.name) {
            return Some(&tree.name);
        }
        tree.subtypes
            .iter()
            .find_map(|subtype| self.first_unregistered(subtype))
    }

    // -------------------------------------------------------------------------
    // Encoding
    // -------------------------------------------------------------------------

    /// Encodes `value` as type `type_name`, appending to `writer`.
    ///
    /// [`Value::Unknown`] is written verbatim and `type_name` is not even
    /// parsed. On error nothing is appended.
    pub fn encode(
        &self,
        writer: &mut Writer,
        value: &Value,
        type_name: &str,
    ) -> Result<(), EncodeError> {
        if let Value::Unknown(blob) = value {
            writer.write_bytes(blob.as_bytes());
            return Ok(());
        }
        let tree = parse_type(type_name)?;
        self.encode_tree(writer, value, &tree)
    }

    /// Encodes `value` against an already parsed descriptor.
    pub fn encode_tree(
        &self,
        writer: &mut Writer,
        value: &Value,
        tree: &TypeTree,
    ) -> Result<(), EncodeError> {
        if let Value::Unknown(blob) = value {
            writer.write_bytes(blob.as_bytes());
            return Ok(());
        }
        let start = writer.len();
        let result = Encoder::new(self).encode_tree(writer, value, tree);
        if result.is_err() {
            writer.truncate(start);
        }
        result
    }

    /// Encodes `value` into a fresh buffer.
    pub fn encode_to_vec(&self, value: &Value, type_name: &str) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.encode(&mut writer, value, type_name)?;
        Ok(writer.into_bytes())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("codecs", &self.names()).finish()
    }
}
