//! Probability table rendering for help requests.

use comfy_table::{ContentArrangement, Table};

use fd_dice::{DiceSet, ProbabilityMatrix};
use fd_round::MatrixRenderer;

/// Draws the win-probability matrix as a terminal table.
pub struct TableRenderer;

impl MatrixRenderer for TableRenderer {
    fn render(&self, dice: &DiceSet, matrix: &ProbabilityMatrix) -> String {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec!["User dice v".to_string()];
        header.extend(dice.iter().map(ToString::to_string));
        table.set_header(header);

        for (i, row_dice) in dice.iter().enumerate() {
            let mut row = vec![row_dice.to_string()];
            row.extend((0..matrix.size()).map(|j| cell(matrix, i, j)));
            table.add_row(row);
        }

        table.to_string()
    }
}

/// A dice against itself is marked, since ties keep it below 0.5.
fn cell(matrix: &ProbabilityMatrix, i: usize, j: usize) -> String {
    let p = format!("{:.4}", matrix.probability(i, j));
    if i == j { format!("- ({p})") } else { p }
}
