//! Slot arena backing the tree's nodes.
//!
//! Growth re-labels every live node, so anything that must keep pointing
//! at a particular node across growth cannot hold a heap index. The arena
//! hands out `NodeId`s that stay valid for the life of the tree: nodes
//! are allocated once, mutated in place, and never freed or moved.

use grimoire_core::Hash;

/// Stable handle to a node slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// A single tree node.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Current heap index; rewritten on every growth.
    pub index: u64,
    /// Digest at this node. `None` only for a placeholder ancestor that
    /// no hash recomputation has reached yet.
    pub hash: Option<Hash>,
    /// Raw record bytes for appended leaves; `None` for interior nodes
    /// and digest-only insertions.
    pub data: Option<Vec<u8>>,
}

impl Node {
    /// An ancestor created on demand, before any hash reaches it.
    pub fn placeholder(index: u64) -> Self {
        Self {
            index,
            hash: None,
            data: None,
        }
    }
}

/// Append-only arena of nodes.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a slot and return its stable id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Total allocated nodes, placeholders included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
