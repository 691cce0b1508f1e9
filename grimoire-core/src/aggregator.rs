//! Pluggable hashing schemes for the tree.
//!
//! An aggregator turns record bytes into leaf digests and folds child
//! digests into parent digests. Both operations are keyed with a distinct
//! single-byte domain tag, so a leaf hash can never collide with an
//! interior hash and a full pair can never collide with a half pair.
//!
//! Two schemes ship: HMAC-SHA-256 (the default, `"SHA256"`) and keyed
//! BLAKE3 (`"BLAKE3"`). The tree is generic over the trait, so swapping
//! schemes never touches tree logic.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::hash::Hash;

/// Tag for combining two present children.
const TAG_PAIR: u8 = 1;
/// Tag for a present left child with an absent right sibling.
const TAG_LEFT_ONLY: u8 = 2;
/// Tag for a present right child with an absent left sibling.
const TAG_RIGHT_ONLY: u8 = 3;
/// Tag for hashing raw record bytes into a leaf.
const TAG_LEAF: u8 = 4;

/// A domain-separated hashing scheme.
///
/// Implementations must be pure: the same inputs always produce the same
/// digest, and no state is carried between calls.
pub trait Aggregator {
    /// Hash raw record bytes into a leaf digest.
    fn hash_leaf(&self, data: &[u8]) -> Hash;

    /// Combine optional child digests into a parent digest.
    ///
    /// Absent children participate through the domain tag rather than a
    /// placeholder value. `None` is returned only when both children are
    /// absent.
    fn combine(&self, left: Option<&Hash>, right: Option<&Hash>) -> Option<Hash>;

    /// Name of the scheme, recorded in every proof it produces.
    fn name(&self) -> &'static str;
}

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-256 aggregator keyed with the domain tag. The default scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Aggregator;

fn sha256_mac(tag: u8) -> HmacSha256 {
    HmacSha256::new_from_slice(&[tag]).expect("HMAC accepts keys of any length")
}

fn sha256_finish(mac: HmacSha256) -> Hash {
    let bytes: [u8; 32] = mac.finalize().into_bytes().into();
    Hash::from_bytes(bytes)
}

impl Aggregator for Sha256Aggregator {
    fn hash_leaf(&self, data: &[u8]) -> Hash {
        let mut mac = sha256_mac(TAG_LEAF);
        mac.update(data);
        sha256_finish(mac)
    }

    fn combine(&self, left: Option<&Hash>, right: Option<&Hash>) -> Option<Hash> {
        match (left, right) {
            (Some(l), Some(r)) => {
                let mut mac = sha256_mac(TAG_PAIR);
                mac.update(l.as_bytes());
                mac.update(r.as_bytes());
                Some(sha256_finish(mac))
            }
            (Some(l), None) => {
                let mut mac = sha256_mac(TAG_LEFT_ONLY);
                mac.update(l.as_bytes());
                Some(sha256_finish(mac))
            }
            (None, Some(r)) => {
                let mut mac = sha256_mac(TAG_RIGHT_ONLY);
                mac.update(r.as_bytes());
                Some(sha256_finish(mac))
            }
            (None, None) => None,
        }
    }

    fn name(&self) -> &'static str {
        "SHA256"
    }
}

/// Keyed-BLAKE3 aggregator with the domain tag in the first key byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Aggregator;

fn blake3_key(tag: u8) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[0] = tag;
    key
}

impl Aggregator for Blake3Aggregator {
    fn hash_leaf(&self, data: &[u8]) -> Hash {
        Hash::from_bytes(blake3::keyed_hash(&blake3_key(TAG_LEAF), data).into())
    }

    fn combine(&self, left: Option<&Hash>, right: Option<&Hash>) -> Option<Hash> {
        match (left, right) {
            (Some(l), Some(r)) => {
                let mut hasher = blake3::Hasher::new_keyed(&blake3_key(TAG_PAIR));
                hasher.update(l.as_bytes());
                hasher.update(r.as_bytes());
                Some(Hash::from_bytes(hasher.finalize().into()))
            }
            (Some(l), None) => Some(Hash::from_bytes(
                blake3::keyed_hash(&blake3_key(TAG_LEFT_ONLY), l.as_bytes()).into(),
            )),
            (None, Some(r)) => Some(Hash::from_bytes(
                blake3::keyed_hash(&blake3_key(TAG_RIGHT_ONLY), r.as_bytes()).into(),
            )),
            (None, None) => None,
        }
    }

    fn name(&self) -> &'static str {
        "BLAKE3"
    }
}
