//! Configuration for a round.

use std::cmp::Reverse;

use fd_dice::ProbabilityMatrix;

/// Index of the dice the house takes when it has no better information.
pub const DEFAULT_HOUSE_DICE: usize = 1;

/// How the house picks its dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HouseStrategy {
    /// Take the default dice, or the lowest free index if the player
    /// already holds it.
    #[default]
    Default,
    /// After the player has picked, take the free dice with the most wins
    /// against it. Falls back to the default dice when picking first.
    BestResponse,
}

impl HouseStrategy {
    /// Pick the house dice given the player's dice, if already chosen.
    pub fn pick(self, matrix: &ProbabilityMatrix, player: Option<usize>) -> usize {
        let Some(taken) = player else {
            return DEFAULT_HOUSE_DICE;
        };
        let free = (0..matrix.size()).filter(|&i| i != taken);
        match self {
            Self::Default if taken != DEFAULT_HOUSE_DICE => DEFAULT_HOUSE_DICE,
            Self::Default => free.min().unwrap_or(DEFAULT_HOUSE_DICE),
            // Reverse(i) breaks ties toward the lowest index.
            Self::BestResponse => free
                .max_by_key(|&i| (matrix.wins(i, taken), Reverse(i)))
                .unwrap_or(DEFAULT_HOUSE_DICE),
        }
    }
}

/// Settings that stay fixed for a round.
#[derive(Debug, Clone, Default)]
pub struct RoundConfig {
    /// How the house picks its dice.
    pub strategy: HouseStrategy,
}

impl RoundConfig {
    /// Set the house strategy.
    pub fn with_strategy(mut self, strategy: HouseStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
