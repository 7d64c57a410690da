//! Dice definitions and win probabilities for non-transitive dice.
//!
//! Raw dice definitions (comma-separated lists of six integers) are
//! validated into a [`DiceSet`], and a [`ProbabilityMatrix`] holds the
//! pairwise chance that one dice beats another on a single throw.

pub mod dice;
pub mod error;
pub mod probability;

pub use dice::{Dice, DiceSet, FACES, MIN_DICE};
pub use error::{DiceError, DiceResult};
pub use probability::{OUTCOMES, ProbabilityMatrix};
