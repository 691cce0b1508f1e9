//! The sparse binary hash tree at the heart of the log.
//!
//! Nodes live at 1-based heap indices: the root at 1, children of `i` at
//! `2i` and `2i + 1`, parent at `i / 2`. Leaves occupy the bottom level
//! `[2^height, 2^(height+1))`. When that level fills up the tree grows a
//! level: a fresh root takes index 1 and every stored node is re-labeled
//! once, so re-labeling work stays O(n) across any number of appends.
//!
//! ```text
//! height 2:            1
//!                    /   \
//! height 1:        2       3
//!                 / \     /
//! height 0:      4   5   6          (leaves; 7 still absent)
//! ```
//!
//! Only nodes that carry information are stored. An absent node is not a
//! zero digest; aggregators fold absence in through their domain tags.

use std::collections::{HashMap, VecDeque};

use grimoire_core::{encoding, Aggregator, Error, Hash, MembershipProof, ProofNode, Result};

use crate::arena::{Node, NodeArena, NodeId};

/// Heap index of the root.
const ROOT_INDEX: u64 = 1;

/// An append-only tamper-evident log over a pluggable aggregator.
///
/// Single writer, many readers: every mutation takes `&mut self`, proof
/// generation only `&self`, so the borrow rules enforce the discipline
/// statically. Indices are `u64`; a tree would exhaust memory long before
/// reaching that ceiling, so arithmetic on in-range indices is unchecked.
#[derive(Clone)]
pub struct HashTree<A: Aggregator> {
    aggregator: A,
    arena: NodeArena,
    /// Sparse heap-index -> slot map. Replaced wholesale on growth.
    slots: HashMap<u64, NodeId>,
    /// Depth of the leaf level below the root.
    height: u32,
    /// Highest-indexed node, tracked by slot id so growth cannot
    /// invalidate the reference.
    latest_leaf: Option<NodeId>,
}

impl<A: Aggregator> HashTree<A> {
    /// Create an empty tree.
    pub fn new(aggregator: A) -> Self {
        Self {
            aggregator,
            arena: NodeArena::new(),
            slots: HashMap::new(),
            height: 0,
            latest_leaf: None,
        }
    }

    /// The hashing scheme this tree was built with.
    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    /// Depth of the leaf level below the root.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of leaf positions in use on the current leaf level.
    pub fn leaf_count(&self) -> u64 {
        self.latest_leaf_index() + 1 - (1u64 << self.height)
    }

    /// Total stored nodes, placeholders included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Digest at the root; `None` only for the empty tree.
    pub fn root_commitment(&self) -> Option<Hash> {
        let id = self.slots.get(&ROOT_INDEX)?;
        self.arena.node(*id).hash
    }

    fn latest_leaf_index(&self) -> u64 {
        self.latest_leaf.map_or(0, |id| self.arena.node(id).index)
    }

    /// Append a record, growing the tree first when the leaf level is
    /// full. Returns the record's 0-based index on the leaf level, which
    /// stays valid across all later growth.
    pub fn append(&mut self, data: &[u8]) -> u64 {
        if self.leaf_count() >= (1u64 << self.height) {
            self.grow();
        }
        let hash = self.aggregator.hash_leaf(data);
        let index = self.latest_leaf_index() + 1;
        let id = self.arena.alloc(Node {
            index,
            hash: Some(hash),
            data: Some(data.to_vec()),
        });
        self.insert_node(id, index);
        index - (1u64 << self.height)
    }

    /// Install a digest directly at `index`, without record bytes.
    ///
    /// Lets a tree incorporate an already-summarized subtree. The target
    /// must be vacant and must not already have a child on either side;
    /// all checks run before any state changes, so a rejected call leaves
    /// the tree untouched.
    pub fn put_hash(&mut self, index: u64, hash: Hash) -> Result<()> {
        if index == 0 {
            return Err(Error::InvalidIndex(index));
        }
        if self.slots.contains_key(&index) {
            return Err(Error::IndexOccupied(index));
        }
        // Children past u64 range cannot exist, hence the checked mul.
        if let Some(left) = index.checked_mul(2) {
            if self.slots.contains_key(&left) {
                return Err(Error::ChildOccupied {
                    index,
                    side: "left",
                });
            }
            if self.slots.contains_key(&(left + 1)) {
                return Err(Error::ChildOccupied {
                    index,
                    side: "right",
                });
            }
        }

        let id = self.arena.alloc(Node {
            index,
            hash: Some(hash),
            data: None,
        });
        self.insert_node(id, index);
        Ok(())
    }

    /// Build a membership proof for the leaf at `leaf_index`, the
    /// 0-based level position returned by [`append`](Self::append).
    ///
    /// The pruned path holds the member's own entry first, then every
    /// sibling that exists on the climb to the root.
    pub fn proof(&self, leaf_index: u64) -> Result<MembershipProof> {
        let member_index = (1u64 << self.height)
            .checked_add(leaf_index)
            .ok_or(Error::LeafNotFound(leaf_index))?;
        let member_id = self
            .slots
            .get(&member_index)
            .copied()
            .ok_or(Error::LeafNotFound(leaf_index))?;
        let member = self.arena.node(member_id);
        let member_hash = member
            .hash
            .ok_or_else(|| Error::Internal(format!("node {} has no digest", member_index)))?;
        let commitment = self
            .root_commitment()
            .ok_or_else(|| Error::Internal("root digest missing".into()))?;

        let mut pruned_tree = vec![ProofNode {
            index: member_index,
            hash: member_hash,
        }];
        let mut index = member_index;
        while index > ROOT_INDEX {
            let sibling_index = index ^ 1;
            if let Some(hash) = self.hash_at(sibling_index) {
                pruned_tree.push(ProofNode {
                    index: sibling_index,
                    hash,
                });
            }
            index /= 2;
        }

        Ok(MembershipProof {
            commitment,
            member_data: member.data.clone(),
            member_index,
            aggregator: self.aggregator.name().to_string(),
            encoding: encoding::NAME.to_string(),
            pruned_tree,
        })
    }

    /// Generate proofs for multiple leaf indices.
    ///
    /// Proof generation only reads the tree, so larger batches fan out
    /// across threads.
    pub fn proof_batch(&self, leaf_indices: &[u64]) -> Result<Vec<MembershipProof>>
    where
        A: Sync,
    {
        use rayon::prelude::*;

        // For small batches, sequential is faster (no thread overhead)
        if leaf_indices.len() < 16 {
            return leaf_indices.iter().map(|&i| self.proof(i)).collect();
        }

        leaf_indices.par_iter().map(|&i| self.proof(i)).collect()
    }

    fn hash_at(&self, index: u64) -> Option<Hash> {
        self.slots
            .get(&index)
            .and_then(|&id| self.arena.node(id).hash)
    }

    /// Double capacity: a fresh root takes index 1 with the old root as
    /// its left child, and every stored node is re-labeled once. Slot ids
    /// never change, so outside references survive.
    fn grow(&mut self) {
        let Some(&old_root) = self.slots.get(&ROOT_INDEX) else {
            return;
        };

        let old_root_hash = self.arena.node(old_root).hash;
        let new_root_hash = self.aggregator.combine(old_root_hash.as_ref(), None);
        let new_root = self.arena.alloc(Node {
            index: ROOT_INDEX,
            hash: new_root_hash,
            data: None,
        });

        let mut relabeled = HashMap::with_capacity(self.slots.len() + 1);
        relabeled.insert(ROOT_INDEX, new_root);

        // Breadth-first, so each node is re-labeled exactly once and a
        // child's new index derives from its parent's new index. Child
        // lookups go through the old map the whole time.
        let mut queue = VecDeque::new();
        queue.push_back((old_root, 2 * ROOT_INDEX));
        while let Some((id, new_index)) = queue.pop_front() {
            let old_index = self.arena.node(id).index;
            for (offset, old_child) in [(0, 2 * old_index), (1, 2 * old_index + 1)] {
                if let Some(&child_id) = self.slots.get(&old_child) {
                    queue.push_back((child_id, 2 * new_index + offset));
                }
            }
            self.arena.node_mut(id).index = new_index;
            relabeled.insert(new_index, id);
        }

        self.slots = relabeled;
    }

    /// Place a node and recompute every ancestor digest up to the root,
    /// creating placeholder ancestors on first touch.
    fn insert_node(&mut self, id: NodeId, index: u64) {
        if index > self.latest_leaf_index() {
            self.latest_leaf = Some(id);
        }
        self.slots.insert(index, id);

        let mut child_id = id;
        let mut child_index = index;
        while child_index > ROOT_INDEX {
            let parent_index = child_index / 2;
            let parent_id = match self.slots.get(&parent_index) {
                Some(&pid) => pid,
                None => {
                    let pid = self.arena.alloc(Node::placeholder(parent_index));
                    self.slots.insert(parent_index, pid);
                    pid
                }
            };

            let child_hash = self.arena.node(child_id).hash;
            let sibling_hash = self.hash_at(child_index ^ 1);
            let parent_hash = if child_index % 2 == 0 {
                self.aggregator
                    .combine(child_hash.as_ref(), sibling_hash.as_ref())
            } else {
                self.aggregator
                    .combine(sibling_hash.as_ref(), child_hash.as_ref())
            };
            self.arena.node_mut(parent_id).hash = parent_hash;

            child_id = parent_id;
            child_index = parent_index;
        }

        self.height = match self.latest_leaf_index() {
            0 => 0,
            n => n.ilog2(),
        };
    }
}
