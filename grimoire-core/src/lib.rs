//! Grimoire Core - Fundamental types for the grimoire tamper-evident log.
//!
//! This crate provides the value types shared by the tree engine and its
//! consumers:
//!
//! - [`hash`] - The 32-byte digest type
//! - [`aggregator`] - Domain-separated hashing schemes (HMAC-SHA-256, keyed BLAKE3)
//! - [`encoding`] - The hex codec used at the system boundary
//! - [`proof`] - Membership proofs, their JSON wire form, and verification
//! - [`error`] - Error taxonomy shared across the workspace
//!
//! # Example
//!
//! ```rust
//! use grimoire_core::{Aggregator, MembershipProof, ProofNode, Sha256Aggregator};
//!
//! let agg = Sha256Aggregator;
//! let h_a = agg.hash_leaf(b"a");
//! let h_b = agg.hash_leaf(b"b");
//! let root = agg.combine(Some(&h_a), Some(&h_b)).unwrap();
//!
//! // A proof is self-contained: commitment, member, pruned path.
//! let proof = MembershipProof {
//!     commitment: root,
//!     member_data: Some(b"a".to_vec()),
//!     member_index: 2,
//!     aggregator: agg.name().to_string(),
//!     encoding: grimoire_core::encoding::NAME.to_string(),
//!     pruned_tree: vec![
//!         ProofNode { index: 2, hash: h_a },
//!         ProofNode { index: 3, hash: h_b },
//!     ],
//! };
//! assert!(proof.verify(&agg).unwrap());
//! ```

pub mod aggregator;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod proof;


// Re-exports for convenience
pub use aggregator::{Aggregator, Blake3Aggregator, Sha256Aggregator};
pub use error::{Error, Result};
pub use hash::Hash;
pub use proof::{verify_batch, MembershipProof, ProofNode};
