//! Read-validate-retry prompting.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::context::GameContext;
use crate::error::RoundResult;
use crate::menu::{Choice, Menu};

/// A source of input lines.
pub trait LineSource {
    /// The next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<B: BufRead> LineSource for B {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Asks menu questions on `out` and reads answers from `input`.
pub struct Prompter<I, W> {
    input: I,
    out: W,
}

impl<I: LineSource, W: Write> Prompter<I, W> {
    /// Create a prompter over the given input and output.
    pub fn new(input: I, out: W) -> Self {
        Self { input, out }
    }

    /// Print one line of narration.
    pub fn say(&mut self, line: impl Display) -> RoundResult<()> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    /// Show `menu` until the player picks a listed value or exits.
    ///
    /// Help requests print the probability table and ask again; unknown
    /// input is rejected with the list of valid tokens. End of input counts
    /// as exit. Returns `None` when the player exits.
    pub fn ask(&mut self, menu: &Menu, ctx: &GameContext<'_>) -> RoundResult<Option<u32>> {
        loop {
            for line in menu.lines() {
                writeln!(self.out, "{line}")?;
            }
            write!(self.out, "Your selection: ")?;
            self.out.flush()?;

            let Some(line) = self.input.next_line()? else {
                debug!("input closed at prompt");
                writeln!(self.out)?;
                return Ok(None);
            };

            match menu.parse(&line) {
                Some(Choice::Pick(value)) => return Ok(Some(value)),
                Some(Choice::Exit) => return Ok(None),
                Some(Choice::Help) => {
                    writeln!(self.out, "{}", ctx.help_text())?;
                }
                None => {
                    let input = line.trim();
                    debug!(input, "rejected input");
                    writeln!(
                        self.out,
                        "Invalid selection '{input}'. Valid inputs: {}.",
                        menu.tokens().join(", ")
                    )?;
                }
            }
        }
    }

    /// Give back the input and output.
    pub fn into_parts(self) -> (I, W) {
        (self.input, self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoundConfig;
    use crate::context::MatrixRenderer;
    use fd_dice::{DiceSet, ProbabilityMatrix};
    use std::io::Cursor;

    struct Stub;

    impl MatrixRenderer for Stub {
        fn render(&self, _dice: &DiceSet, matrix: &ProbabilityMatrix) -> String {
            format!("<{} x {} table>", matrix.size(), matrix.size())
        }
    }

    fn ask(script: &str, menu: &Menu) -> (Option<u32>, String) {
        let dice = DiceSet::parse(["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap();
        let matrix = ProbabilityMatrix::compute(&dice);
        let config = RoundConfig::default();
        let ctx = GameContext::new(&dice, &matrix, &Stub, &config);

        let mut prompter = Prompter::new(Cursor::new(script.to_string()), Vec::new());
        let answer = prompter.ask(menu, &ctx).unwrap();
        let (_, out) = prompter.into_parts();
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn line_source_strips_terminators() {
        let mut input = Cursor::new("a\r\nb\n\nc");
        assert_eq!(input.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("c"));
        assert_eq!(input.next_line().unwrap(), None);
    }

    #[test]
    fn valid_pick() {
        let (answer, out) = ask("1\n", &Menu::numbers(2));
        assert_eq!(answer, Some(1));
        assert!(out.contains("0 - 0\n1 - 1\nX - exit\n? - help\nYour selection: "));
    }

    #[test]
    fn invalid_input_reprompts() {
        let (answer, out) = ask("7\nfoo\n0\n", &Menu::numbers(2));
        assert_eq!(answer, Some(0));
        assert!(out.contains("Invalid selection '7'. Valid inputs: 0, 1, X, ?."));
        assert!(out.contains("Invalid selection 'foo'."));
        assert_eq!(out.matches("Your selection: ").count(), 3);
    }

    #[test]
    fn help_renders_table_and_reprompts() {
        let (answer, out) = ask("?\n5\n", &Menu::numbers(6));
        assert_eq!(answer, Some(5));
        assert!(out.contains("<3 x 3 table>"));
        assert_eq!(out.matches("Your selection: ").count(), 2);
    }

    #[test]
    fn exit_returns_none() {
        assert_eq!(ask("X\n", &Menu::numbers(2)).0, None);
    }

    #[test]
    fn end_of_input_returns_none() {
        assert_eq!(ask("", &Menu::numbers(2)).0, None);
        assert_eq!(ask("9\n", &Menu::numbers(2)).0, None);
    }
}
