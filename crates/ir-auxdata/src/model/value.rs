//! Dynamically-typed values carried by auxiliary data.
//!
//! A [`Value`] has no type of its own on the wire: the type descriptor
//! supplied at encode/decode time decides the layout.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Id, NodeRef};

/// The element an [`Offset`] points into: a live node when the resolver knew
/// it at decode time, otherwise the bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    Id(Id),
    Node(NodeRef),
}

impl Element {
    /// Identity written on the wire.
    pub fn id(&self) -> Id {
        match self {
            Element::Id(id) => *id,
            Element::Node(node) => node.uuid(),
        }
    }

    pub fn node(&self) -> Option<&NodeRef> {
        match self {
            Element::Node(node) => Some(node),
            Element::Id(_) => None,
        }
    }
}

impl From<Id> for Element {
    fn from(id: Id) -> Self {
        Element::Id(id)
    }
}

impl From<NodeRef> for Element {
    fn from(node: NodeRef) -> Self {
        Element::Node(node)
    }
}

/// A position relative to an IR element: the element plus a byte
/// displacement from its start.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset {
    pub element: Element,
    pub displacement: u64,
}

impl Offset {
    pub fn new(element: impl Into<Element>, displacement: u64) -> Self {
        Self {
            element: element.into(),
            displacement,
        }
    }

    pub fn element_id(&self) -> Id {
        self.element.id()
    }
}

/// Bytes of auxiliary data whose type could not be decoded.
///
/// Produced by top-level decoding when the descriptor names an unregistered
/// type. Encoding writes the bytes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownData(pub Vec<u8>);

impl UnknownData {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for UnknownData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// A decoded (or to-be-encoded) auxiliary data value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// `int64_t`
    Int64(i64),
    /// `uint64_t` or `Addr`
    Uint64(u64),
    /// `string`
    String(String),
    /// `UUID` that did not resolve to a live node.
    Uuid(Id),
    /// `UUID` that resolved to a live node.
    Node(NodeRef),
    /// `Offset`
    Offset(Offset),
    /// `mapping<K,V>`
    Mapping(BTreeMap<Value, Value>),
    /// `sequence<T>`
    Sequence(Vec<Value>),
    /// `set<T>`
    Set(BTreeSet<Value>),
    /// `tuple<T1,...,Tn>`
    Tuple(Vec<Value>),
    /// Top-level data of an unregistered type.
    Unknown(UnknownData),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int64(_) => "int64",
            Value::Uint64(_) => "uint64",
            Value::String(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::Node(_) => "node",
            Value::Offset(_) => "offset",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Unknown(_) => "unknown data",
        }
    }

    /// Returns the identity carried by a `Uuid` or `Node` value.
    pub fn as_id(&self) -> Option<Id> {
        match self {
            Value::Uuid(id) => Some(*id),
            Value::Node(node) => Some(node.uuid()),
            _ => None,
        }
    }

    /// Returns true for a blob produced by the unknown-type fallback.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Id> for Value {
    fn from(v: Id) -> Self {
        Value::Uuid(v)
    }
}

impl From<NodeRef> for Value {
    fn from(v: NodeRef) -> Self {
        Value::Node(v)
    }
}

impl From<Offset> for Value {
    fn from(v: Offset) -> Self {
        Value::Offset(v)
    }
}

impl From<UnknownData> for Value {
    fn from(v: UnknownData) -> Self {
        Value::Unknown(v)
    }
}
