//! Error types for dice validation.

use thiserror::Error;

/// Result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;

/// Ways a set of raw dice definitions can fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// Fewer than the minimum number of dice were supplied.
    #[error("at least {min} dice are required, got {found}", min = crate::MIN_DICE)]
    TooFewDice {
        /// How many definitions were supplied.
        found: usize,
    },

    /// A definition did not split into exactly six values.
    #[error("dice #{index} has {found} values, expected {faces}", faces = crate::FACES)]
    WrongFaceCount {
        /// Position of the offending definition.
        index: usize,
        /// Number of comma-separated tokens found.
        found: usize,
    },

    /// A face value is not an integer.
    #[error("dice #{index} has a non-integer value '{token}'")]
    NotAnInteger {
        /// Position of the offending definition.
        index: usize,
        /// The token that failed to parse.
        token: String,
    },

    /// A stored matrix is not square or holds impossible win counts.
    #[error("malformed {size}x{size} matrix with {found} entries")]
    MalformedMatrix {
        /// Declared number of dice per side.
        size: usize,
        /// Number of win counts supplied.
        found: usize,
    },
}
