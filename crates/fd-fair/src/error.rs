//! Error types for the fair generator.

use thiserror::Error;

use crate::mac::Digest;

/// Result type for fair generator operations.
pub type FairResult<T> = Result<T, FairError>;

/// Errors raised while committing to or revealing a number.
#[derive(Debug, Error)]
pub enum FairError {
    /// The secure randomness source failed. There is no weaker fallback.
    #[error("secure randomness source failed: {0}")]
    Entropy(String),

    /// A commitment was requested over an empty range.
    #[error("cannot commit to a number in an empty range")]
    EmptyRange,

    /// The MAC could not be keyed.
    #[error("invalid MAC key: {0}")]
    InvalidKey(String),

    /// A revealed key and number do not reproduce the published digest.
    #[error("digest mismatch: published {published}, revealed values give {recomputed}")]
    DigestMismatch {
        /// The digest published at commit time.
        published: Digest,
        /// The digest recomputed from the revealed key and number.
        recomputed: Digest,
    },

    /// A revealed number lies outside the committed range.
    #[error("revealed number {number} is outside the committed range 0..{range}")]
    OutOfRange {
        /// The revealed number.
        number: u32,
        /// The committed range (exclusive upper bound).
        range: u32,
    },
}

impl FairError {
    /// Whether this error means the fairness guarantee may have been broken,
    /// as opposed to an operational failure.
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::DigestMismatch { .. } | Self::OutOfRange { .. })
    }
}
