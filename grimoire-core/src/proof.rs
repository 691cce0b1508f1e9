//! Membership proofs and their verification.
//!
//! A proof is self-contained: it carries the root commitment it was
//! generated against, the member's absolute index, the member's raw bytes
//! when known, and the pruned path of sibling digests up to the root. A
//! relying party needs nothing but the proof and a trusted aggregator.

use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::encoding;
use crate::error::{Error, Result};
use crate::hash::Hash;

/// One pruned-path entry: a node's heap index and its digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// Heap index of the node.
    #[serde(rename = "Index")]
    pub index: u64,
    /// Digest stored at the node.
    #[serde(rename = "Hash", with = "crate::encoding::hex_digest")]
    pub hash: Hash,
}

/// Proof that one member belongs to a tree with a given commitment.
///
/// The wire form is JSON with the field names below. `PrunedTree` holds
/// the member's own entry first, then every sibling that existed on the
/// walk from the member to the root, in climb order. Levels whose sibling
/// was absent contribute no entry; the verifier reconstructs them from
/// index parity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProof {
    /// Root digest of the tree at proof generation time.
    #[serde(rename = "Commitment", with = "crate::encoding::hex_digest")]
    pub commitment: Hash,
    /// Raw member bytes; `None` when the member was installed by digest.
    #[serde(rename = "MemberData", with = "crate::encoding::hex_bytes_opt", default)]
    pub member_data: Option<Vec<u8>>,
    /// Absolute heap index of the member node.
    #[serde(rename = "MemberIndex")]
    pub member_index: u64,
    /// Name of the hashing scheme the tree was built with.
    #[serde(rename = "Aggregator")]
    pub aggregator: String,
    /// Name of the codec used for the hex fields.
    #[serde(rename = "Encoding")]
    pub encoding: String,
    /// Member entry followed by existing siblings, leaf to root.
    #[serde(rename = "PrunedTree")]
    pub pruned_tree: Vec<ProofNode>,
}

impl MembershipProof {
    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from the JSON wire form.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Verify this proof against its embedded commitment.
    ///
    /// The supplied aggregator must match the scheme named in the proof;
    /// a mismatch is a configuration error, not a failed proof, and is
    /// reported as `Err`. `Ok(false)` means the path does not reproduce
    /// the commitment: the member data, a pruned digest, or the
    /// commitment itself has been altered.
    pub fn verify<A: Aggregator>(&self, aggregator: &A) -> Result<bool> {
        if aggregator.name() != self.aggregator {
            return Err(Error::AggregatorMismatch {
                proof: self.aggregator.clone(),
                verifier: aggregator.name().to_string(),
            });
        }
        if self.encoding != encoding::NAME {
            return Err(Error::UnsupportedEncoding(self.encoding.clone()));
        }

        let Some(member) = self.pruned_tree.first() else {
            return Ok(false);
        };
        if member.index != self.member_index || self.member_index == 0 {
            return Ok(false);
        }

        // When raw data is present the member digest is recomputed from
        // it, so altered data fails even if the stored digest still
        // matches the path.
        let mut current = match &self.member_data {
            Some(data) => aggregator.hash_leaf(data),
            None => member.hash,
        };
        if self.member_data.is_some() && current != member.hash {
            return Ok(false);
        }

        let mut siblings = self.pruned_tree[1..].iter();
        let mut pending = siblings.next();
        let mut index = self.member_index;

        // Climb to the root, pairing with the pruned sibling for the
        // level when one was recorded and with an absent sibling
        // otherwise. Sibling indices differ from ours only in the low bit.
        while index > 1 {
            let sibling_hash = match pending {
                Some(node) if node.index == (index ^ 1) => {
                    let h = node.hash;
                    pending = siblings.next();
                    Some(h)
                }
                _ => None,
            };
            let combined = if index % 2 == 0 {
                aggregator.combine(Some(&current), sibling_hash.as_ref())
            } else {
                aggregator.combine(sibling_hash.as_ref(), Some(&current))
            };
            current = combined
                .ok_or_else(|| Error::Internal("combine with a present child returned none".into()))?;
            index /= 2;
        }

        // Path entries the climb never consumed make the proof malformed.
        if pending.is_some() {
            return Ok(false);
        }

        Ok(current == self.commitment)
    }
}

/// Verify multiple proofs against one aggregator.
///
/// Returns `Ok(true)` only when every proof verifies; the first
/// structural error aborts with `Err`. Sequential under 16 proofs,
/// parallel above.
pub fn verify_batch<A>(proofs: &[MembershipProof], aggregator: &A) -> Result<bool>
where
    A: Aggregator + Sync,
{
    use rayon::prelude::*;

    // For small batches, sequential is faster (no thread overhead)
    if proofs.len() < 16 {
        for proof in proofs {
            if !proof.verify(aggregator)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    let results: Result<Vec<bool>> = proofs
        .par_iter()
        .map(|proof| proof.verify(aggregator))
        .collect();

    results.map(|v| v.into_iter().all(|b| b))
}
