//! Cross-reference resolution.
//!
//! A `UUID` field on the wire names an IR node. When the node has already
//! been materialized, decoding hands back a shared reference to it instead of
//! the bare identifier. The lookup is supplied by the caller as a
//! [`NodeResolver`]; this crate never owns the graph.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::model::Id;

/// An identity-bearing IR object (module, block, symbol, ...).
pub trait Node: fmt::Debug + Send + Sync {
    /// Returns the node's identity.
    fn uuid(&self) -> Id;
}

/// Shared handle to a live node.
///
/// Equality, ordering and hashing go through the node's identity only.
#[derive(Clone)]
pub struct NodeRef(Arc<dyn Node>);

impl NodeRef {
    pub fn new(node: Arc<dyn Node>) -> Self {
        Self(node)
    }

    /// Returns the node's identity.
    pub fn uuid(&self) -> Id {
        self.0.uuid()
    }

    /// Returns the underlying node.
    pub fn node(&self) -> &Arc<dyn Node> {
        &self.0
    }

    /// Returns true if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<N: Node + 'static> From<Arc<N>> for NodeRef {
    fn from(node: Arc<N>) -> Self {
        Self(node)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.uuid() == other.uuid()
    }
}

impl Eq for NodeRef {}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid().cmp(&other.uuid())
    }
}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid().hash(state);
    }
}

/// Lookup from identifier to live node, consulted during decode.
///
/// Implementations are read-only from the decoder's point of view. A missing
/// entry is not an error: the decoder falls back to the raw identifier.
pub trait NodeResolver {
    fn resolve(&self, id: &Id) -> Option<NodeRef>;
}

/// Resolver that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNodes;

impl NodeResolver for NoNodes {
    fn resolve(&self, _id: &Id) -> Option<NodeRef> {
        None
    }
}

/// Identity cache populated by graph construction code.
#[derive(Debug, Clone, Default)]
pub struct UuidCache {
    nodes: FxHashMap<Id, NodeRef>,
}

impl UuidCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node under its own identity, returning any node it replaced.
    pub fn insert(&mut self, node: impl Into<NodeRef>) -> Option<NodeRef> {
        let node = node.into();
        self.nodes.insert(node.uuid(), node)
    }

    /// Drops the node registered under `id`.
    pub fn remove(&mut self, id: &Id) -> Option<NodeRef> {
        self.nodes.remove(id)
    }

    pub fn get(&self, id: &Id) -> Option<&NodeRef> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeResolver for UuidCache {
    fn resolve(&self, id: &Id) -> Option<NodeRef> {
        self.nodes.get(id).cloned()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal node used by tests across the crate.
    #[derive(Debug)]
    pub(crate) struct TestBlock {
        pub(crate) id: Id,
        pub(crate) address: u64,
    }

    impl Node for TestBlock {
        fn uuid(&self) -> Id {
            self.id
        }
    }

    pub(crate) fn block(id: Id, address: u64) -> Arc<TestBlock> {
        Arc::new(TestBlock { id, address })
    }

    #[test]
    fn test_cache_resolves_inserted_nodes() {
        let id = Id::from_bytes([7u8; 16]);
        let node = block(id, 0x1000);

        let mut cache = UuidCache::new();
        assert!(cache.insert(node.clone()).is_none());
        assert!(cache.contains(&id));
        assert_eq!(cache.len(), 1);

        let resolved = cache.resolve(&id).unwrap();
        assert_eq!(resolved.uuid(), id);
        assert!(resolved.ptr_eq(&NodeRef::from(node)));
    }

    #[test]
    fn test_cache_miss() {
        let cache = UuidCache::new();
        assert!(cache.resolve(&Id::from_bytes([1u8; 16])).is_none());
        assert!(NoNodes.resolve(&Id::from_bytes([1u8; 16])).is_none());
    }

    #[test]
    fn test_node_ref_identity_equality() {
        let id = Id::from_bytes([3u8; 16]);
        let a = NodeRef::from(block(id, 1));
        let b = NodeRef::from(block(id, 2));
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }
}
