//! Error types for the tamper-evident log.

use thiserror::Error;

/// Result type for log operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building trees or handling proofs.
///
/// Every rejected tree operation checks its preconditions before touching
/// any state, so an `Err` always leaves the tree exactly as it was.
#[derive(Debug, Error)]
pub enum Error {
    /// Input at the hex boundary was not valid hexadecimal.
    #[error("malformed hex input: {0}")]
    MalformedHex(#[from] hex::FromHexError),

    /// A digest string decoded to the wrong number of bytes.
    #[error("invalid digest length: expected {expected} bytes, got {got}")]
    InvalidDigestLength {
        /// Required digest width.
        expected: usize,
        /// Width actually decoded.
        got: usize,
    },

    /// A tree index outside the addressable range (indices start at 1).
    #[error("invalid tree index {0}")]
    InvalidIndex(u64),

    /// Direct hash insertion targeted an index that already holds a node.
    #[error("index {0} already holds a node")]
    IndexOccupied(u64),

    /// Direct hash insertion targeted an index with an existing child.
    #[error("index {index} already has a {side} child")]
    ChildOccupied {
        /// The rejected target index.
        index: u64,
        /// Which child slot is occupied ("left" or "right").
        side: &'static str,
    },

    /// Membership proof requested for a leaf that was never inserted.
    #[error("no leaf at index {0}")]
    LeafNotFound(u64),

    /// A proof names a different aggregator than the verifier was given.
    #[error("aggregator mismatch: proof built with {proof}, verifier uses {verifier}")]
    AggregatorMismatch {
        /// Scheme name recorded in the proof.
        proof: String,
        /// Scheme name of the supplied aggregator.
        verifier: String,
    },

    /// A proof declares a textual encoding this library does not speak.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Proof serialization or deserialization failed.
    #[error("proof serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}
