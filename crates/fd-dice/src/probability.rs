//! Pairwise win probabilities.
//!
//! Entry `(i, j)` counts the face pairs where dice `i` rolls strictly higher
//! than dice `j`, out of all 36 ordered pairs. Ties count toward the
//! denominator only, so `(i, i)` is usually below one half and
//! `P(i, j) + P(j, i)` is usually below one.

use serde::{Deserialize, Serialize};

use crate::dice::{Dice, DiceSet, FACES};
use crate::error::DiceError;

/// Number of ordered face pairs between two dice.
pub const OUTCOMES: u32 = (FACES * FACES) as u32;

/// Win counts for every ordered pair of dice in a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct ProbabilityMatrix {
    size: usize,
    wins: Vec<u32>,
}

#[derive(Deserialize)]
struct RawMatrix {
    size: usize,
    wins: Vec<u32>,
}

impl TryFrom<RawMatrix> for ProbabilityMatrix {
    type Error = DiceError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        let shaped = raw.size.checked_mul(raw.size) == Some(raw.wins.len());
        if !shaped || raw.wins.iter().any(|&w| w > OUTCOMES) {
            return Err(DiceError::MalformedMatrix {
                size: raw.size,
                found: raw.wins.len(),
            });
        }
        Ok(Self {
            size: raw.size,
            wins: raw.wins,
        })
    }
}

impl ProbabilityMatrix {
    /// Compute the full matrix for `set`, including the diagonal.
    pub fn compute(set: &DiceSet) -> Self {
        let size = set.len();
        let mut wins = Vec::with_capacity(size * size);
        for a in set {
            for b in set {
                wins.push(count_wins(a, b));
            }
        }
        Self { size, wins }
    }

    /// Number of dice on each side of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Face pairs (out of [`OUTCOMES`]) where dice `i` beats dice `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn wins(&self, i: usize, j: usize) -> u32 {
        assert!(i < self.size && j < self.size, "index out of range");
        self.wins[i * self.size + j]
    }

    /// Probability that a throw of dice `i` beats a throw of dice `j`.
    pub fn probability(&self, i: usize, j: usize) -> f64 {
        f64::from(self.wins(i, j)) / f64::from(OUTCOMES)
    }
}

fn count_wins(a: &Dice, b: &Dice) -> u32 {
    let mut wins = 0;
    for x in a.faces() {
        wins += b.faces().iter().filter(|y| x > *y).count() as u32;
    }
    wins
}
