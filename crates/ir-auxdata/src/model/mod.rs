//! Data model types for auxiliary data.
//!
//! This module contains the types that codecs produce and consume:
//! - Identifiers (UUIDs)
//! - Values (dynamically-typed, recursively-structured data)
//! - Nodes and resolvers (cross-references into the IR graph)
//! - Auxiliary data entries and their container

pub mod auxdata;
pub mod id;
pub mod node;
pub mod value;

pub use auxdata::{AuxData, AuxDataContainer, SerializedAuxData};
pub use id::{format_id, new_id, parse_id, Id, NIL_ID};
pub use node::{NoNodes, Node, NodeRef, NodeResolver, UuidCache};
pub use value::{Element, Offset, UnknownData, Value};
