//! Dice and dice sets.
//!
//! A [`Dice`] always has exactly [`FACES`] integer faces. Faces need not be
//! distinct or positive. A [`DiceSet`] holds at least [`MIN_DICE`] dice and
//! keeps the order they were given in, since indices are how players refer
//! to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DiceError, DiceResult};

/// Number of faces on every dice.
pub const FACES: usize = 6;

/// Minimum number of dice a game needs.
pub const MIN_DICE: usize = 3;

/// A six-sided dice with arbitrary integer faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    faces: [i32; FACES],
}

impl Dice {
    /// Create a dice from its face values.
    pub fn new(faces: [i32; FACES]) -> Self {
        Self { faces }
    }

    /// All face values in definition order.
    pub fn faces(&self) -> &[i32; FACES] {
        &self.faces
    }

    /// The value on face `index`, or `None` if `index >= FACES`.
    pub fn face(&self, index: usize) -> Option<i32> {
        self.faces.get(index).copied()
    }

    fn parse_definition(index: usize, raw: &str) -> DiceResult<Self> {
        let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
        if tokens.len() != FACES {
            return Err(DiceError::WrongFaceCount {
                index,
                found: tokens.len(),
            });
        }

        let mut faces = [0; FACES];
        for (slot, token) in faces.iter_mut().zip(&tokens) {
            *slot = token.parse().map_err(|_| DiceError::NotAnInteger {
                index,
                token: (*token).to_string(),
            })?;
        }
        Ok(Self { faces })
    }
}

/// Parses a single definition such as `2,2,4,4,9,9`.
///
/// Errors report the definition as index 0.
impl FromStr for Dice {
    type Err = DiceError;

    fn from_str(s: &str) -> DiceResult<Self> {
        Self::parse_definition(0, s)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.faces.iter().map(i32::to_string).collect();
        write!(f, "[{}]", values.join(","))
    }
}

/// An ordered, validated collection of at least three dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Dice>", into = "Vec<Dice>")]
pub struct DiceSet {
    dice: Vec<Dice>,
}

impl DiceSet {
    /// Validate raw definitions into a dice set.
    ///
    /// The count is checked before any definition is parsed, so a short
    /// list is always reported as [`DiceError::TooFewDice`].
    pub fn parse<I, S>(definitions: I) -> DiceResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<S> = definitions.into_iter().collect();
        if raw.len() < MIN_DICE {
            return Err(DiceError::TooFewDice { found: raw.len() });
        }

        let dice = raw
            .iter()
            .enumerate()
            .map(|(index, def)| Dice::parse_definition(index, def.as_ref()))
            .collect::<DiceResult<Vec<_>>>()?;
        Ok(Self { dice })
    }

    /// Number of dice in the set.
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Always false for a validated set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// The dice at `index`.
    pub fn get(&self, index: usize) -> Option<&Dice> {
        self.dice.get(index)
    }

    /// Iterate over the dice in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dice> {
        self.dice.iter()
    }
}

impl TryFrom<Vec<Dice>> for DiceSet {
    type Error = DiceError;

    fn try_from(dice: Vec<Dice>) -> DiceResult<Self> {
        if dice.len() < MIN_DICE {
            return Err(DiceError::TooFewDice { found: dice.len() });
        }
        Ok(Self { dice })
    }
}

impl From<DiceSet> for Vec<Dice> {
    fn from(set: DiceSet) -> Self {
        set.dice
    }
}

impl<'a> IntoIterator for &'a DiceSet {
    type Item = &'a Dice;
    type IntoIter = std::slice::Iter<'a, Dice>;

    fn into_iter(self) -> Self::IntoIter {
        self.dice.iter()
    }
}
