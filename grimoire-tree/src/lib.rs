//! Sparse binary hash tree implementation.
//!
//! A [`HashTree`] is an append-only log that provides:
//! - O(log n) append with O(n) total re-labeling across all growth
//! - O(log n) membership proofs against the current root commitment
//! - Digest-only placement for incorporating summarized subtrees
//!
//! Nodes sit at 1-based heap indices and only the nodes that carry
//! information are stored; absent positions are folded in through the
//! aggregator's domain tags rather than as zero digests.
//!
//! # Example
//!
//! ```rust
//! use grimoire_tree::HashTree;
//! use grimoire_core::Sha256Aggregator;
//!
//! let mut tree = HashTree::new(Sha256Aggregator);
//!
//! // Append some records
//! let first = tree.append(b"event1");
//! tree.append(b"event2");
//! tree.append(b"event3");
//!
//! // Prove membership of the first record
//! let proof = tree.proof(first).unwrap();
//! assert!(proof.verify(tree.aggregator()).unwrap());
//!
//! // The root commitment pins the whole log
//! let root = tree.root_commitment().unwrap();
//! assert_eq!(proof.commitment, root);
//! ```

mod arena;
mod tree;

#[cfg(test)]
mod proptest;

pub use tree::HashTree;
