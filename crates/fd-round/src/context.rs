//! The session context passed into every round transition.

use fd_dice::{DiceSet, ProbabilityMatrix};

use crate::config::RoundConfig;

/// Draws the probability matrix for a help request.
pub trait MatrixRenderer {
    /// Render `matrix` for `dice` as printable text.
    fn render(&self, dice: &DiceSet, matrix: &ProbabilityMatrix) -> String;
}

/// Everything a round reads but never changes.
///
/// The matrix is computed once per session and shared by every round.
#[derive(Clone, Copy)]
pub struct GameContext<'a> {
    /// The validated dice set.
    pub dice: &'a DiceSet,
    /// Pairwise win counts for `dice`.
    pub matrix: &'a ProbabilityMatrix,
    /// Draws `matrix` when the player asks for help.
    pub renderer: &'a dyn MatrixRenderer,
    /// Round settings.
    pub config: &'a RoundConfig,
}

impl<'a> GameContext<'a> {
    /// Bundle the session state for a round.
    pub fn new(
        dice: &'a DiceSet,
        matrix: &'a ProbabilityMatrix,
        renderer: &'a dyn MatrixRenderer,
        config: &'a RoundConfig,
    ) -> Self {
        Self {
            dice,
            matrix,
            renderer,
            config,
        }
    }

    /// The help text: a caption followed by the rendered table.
    pub fn help_text(&self) -> String {
        format!(
            "Probability that the row dice beats the column dice \
             (ties count as losses):\n{}",
            self.renderer.render(self.dice, self.matrix)
        )
    }
}
