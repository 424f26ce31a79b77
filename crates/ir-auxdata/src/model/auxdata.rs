//! Named auxiliary data entries.
//!
//! An entry pairs a value with the type descriptor it is serialized under.
//! On the wire (inside the IR graph's own schema) an entry is just that
//! descriptor plus an opaque byte string; [`SerializedAuxData`] is that form.

use std::collections::BTreeMap;

use crate::codec::{parse_type, Registry, TypeTree, Writer};
use crate::error::{DecodeError, EncodeError, TypeNameError};
use crate::model::{NodeResolver, Value};

/// A typed auxiliary data value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxData {
    tree: TypeTree,
    data: Value,
}

/// An entry as stored by the IR graph: descriptor plus encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedAuxData {
    pub type_name: String,
    pub data: Vec<u8>,
}

impl AuxData {
    /// Creates an entry, rejecting a malformed descriptor up front.
    pub fn new(type_name: &str, data: Value) -> Result<Self, TypeNameError> {
        Ok(Self {
            tree: parse_type(type_name)?,
            data,
        })
    }

    /// The entry's descriptor in canonical form.
    pub fn type_name(&self) -> String {
        self.tree.to_string()
    }

    pub fn type_tree(&self) -> &TypeTree {
        &self.tree
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Value {
        &mut self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Decodes serialized bytes. Unregistered types come back as
    /// [`Value::Unknown`] and still re-encode losslessly.
    pub fn decode(
        registry: &Registry,
        serialized: &SerializedAuxData,
        resolver: &dyn NodeResolver,
    ) -> Result<Self, DecodeError> {
        let tree = parse_type(&serialized.type_name)?;
        let data = registry.decode_tree(&serialized.data, &tree, resolver)?;
        Ok(Self { tree, data })
    }

    pub fn encode(&self, registry: &Registry) -> Result<SerializedAuxData, EncodeError> {
        let mut writer = Writer::new();
        registry.encode_tree(&mut writer, &self.data, &self.tree)?;
        Ok(SerializedAuxData {
            type_name: self.type_name(),
            data: writer.into_bytes(),
        })
    }
}

/// Auxiliary data entries keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxDataContainer {
    entries: BTreeMap<String, AuxData>,
}

impl AuxDataContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry called `name`.
    pub fn insert(&mut self, name: impl Into<String>, aux_data: AuxData) -> Option<AuxData> {
        self.entries.insert(name.into(), aux_data)
    }

    pub fn get(&self, name: &str) -> Option<&AuxData> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AuxData> {
        self.entries.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AuxData> {
        self.entries.remove(name)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuxData)> {
        self.entries.iter().map(|(name, aux)| (name.as_str(), aux))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes every entry.
    pub fn encode(
        &self,
        registry: &Registry,
    ) -> Result<BTreeMap<String, SerializedAuxData>, EncodeError> {
        self.entries
            .iter()
            .map(|(name, aux)| aux.encode(registry).map(|entry| (name.clone(), entry)))
            .collect()
    }

    /// Decodes every entry. Fails on the first malformed entry.
    pub fn decode<'a>(
        registry: &Registry,
        serialized: impl IntoIterator<Item = (&'a str, &'a SerializedAuxData)>,
        resolver: &dyn NodeResolver,
    ) -> Result<Self, DecodeError> {
        let mut container = Self::new();
        for (name, entry) in serialized {
            container.insert(name, AuxData::decode(registry, entry, resolver)?);
        }
        Ok(container)
    }
}
