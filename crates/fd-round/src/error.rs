//! Error types for round orchestration.

use thiserror::Error;

use fd_fair::FairError;

/// Result type for round operations.
pub type RoundResult<T> = Result<T, RoundError>;

/// Errors that stop a round or fail transcript verification.
#[derive(Debug, Error)]
pub enum RoundError {
    /// The fair generator failed or detected a digest mismatch.
    #[error(transparent)]
    Fair(#[from] FairError),

    /// Reading input or writing narration failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A phase ran before the state it depends on existed.
    #[error("round state out of order: {0}")]
    OutOfOrder(&'static str),

    /// A recorded transcript does not hold together.
    #[error("inconsistent transcript at entry {index}: {reason}")]
    Transcript {
        /// Position of the offending entry.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl RoundError {
    /// Whether this error means the fairness guarantee may have been
    /// broken, which callers must report apart from ordinary failures.
    pub fn is_violation(&self) -> bool {
        match self {
            Self::Fair(e) => e.is_violation(),
            Self::Transcript { .. } => true,
            Self::Io(_) | Self::OutOfOrder(_) => false,
        }
    }
}
