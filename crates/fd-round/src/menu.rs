//! Prompt menus and the choices they accept.

use fd_dice::DiceSet;

/// Token that ends the round.
pub const EXIT_TOKEN: &str = "X";

/// Token that shows the probability table.
pub const HELP_TOKEN: &str = "?";

/// What a line of input asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// One of the menu's values.
    Pick(u32),
    /// Show the probability table and ask again.
    Help,
    /// Abandon the round.
    Exit,
}

/// A single selectable value and how it is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// The value returned when this item is picked.
    pub value: u32,
    /// Text shown next to the value.
    pub label: String,
}

/// The valid inputs at one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Numbers `0..range`, each labelled with itself.
    pub fn numbers(range: u32) -> Self {
        let items = (0..range)
            .map(|value| MenuItem {
                value,
                label: value.to_string(),
            })
            .collect();
        Self { items }
    }

    /// Every dice in `set` except `exclude`, keyed by its index in the set.
    pub fn dice(set: &DiceSet, exclude: Option<usize>) -> Self {
        let items = set
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude)
            .map(|(index, dice)| MenuItem {
                value: index as u32,
                label: dice.to_string(),
            })
            .collect();
        Self { items }
    }

    /// The selectable values in display order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Whether `value` can be picked.
    pub fn contains(&self, value: u32) -> bool {
        self.items.iter().any(|item| item.value == value)
    }

    /// Interpret one line of input. Returns `None` for anything that is not
    /// a listed value or a control token.
    pub fn parse(&self, input: &str) -> Option<Choice> {
        let input = input.trim();
        if input.eq_ignore_ascii_case(EXIT_TOKEN) || input.eq_ignore_ascii_case("exit") {
            return Some(Choice::Exit);
        }
        if input == HELP_TOKEN || input.eq_ignore_ascii_case("help") {
            return Some(Choice::Help);
        }
        let value: u32 = input.parse().ok()?;
        self.contains(value).then_some(Choice::Pick(value))
    }

    /// The menu as printed before a prompt.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} - {}", item.value, item.label))
            .collect();
        lines.push(format!("{EXIT_TOKEN} - exit"));
        lines.push(format!("{HELP_TOKEN} - help"));
        lines
    }

    /// Every accepted token, for error messages.
    pub fn tokens(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.value.to_string())
            .chain([EXIT_TOKEN.to_string(), HELP_TOKEN.to_string()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_menu() {
        let menu = Menu::numbers(2);
        assert_eq!(menu.parse("0"), Some(Choice::Pick(0)));
        assert_eq!(menu.parse(" 1 \n"), Some(Choice::Pick(1)));
        assert_eq!(menu.parse("2"), None);
        assert_eq!(menu.parse("-1"), None);
        assert_eq!(menu.parse(""), None);
    }

    #[test]
    fn control_tokens() {
        let menu = Menu::numbers(6);
        assert_eq!(menu.parse("X"), Some(Choice::Exit));
        assert_eq!(menu.parse("x"), Some(Choice::Exit));
        assert_eq!(menu.parse("exit"), Some(Choice::Exit));
        assert_eq!(menu.parse("?"), Some(Choice::Help));
        assert_eq!(menu.parse("HELP"), Some(Choice::Help));
        assert_eq!(menu.parse("quit"), None);
    }

    #[test]
    fn dice_menu_skips_taken_index() {
        let set = DiceSet::parse(["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap();
        let menu = Menu::dice(&set, Some(1));
        let values: Vec<u32> = menu.items().iter().map(|i| i.value).collect();
        assert_eq!(values, vec![0, 2]);
        assert_eq!(menu.parse("1"), None);
        assert_eq!(menu.parse("2"), Some(Choice::Pick(2)));
        assert_eq!(menu.items()[1].label, "[7,5,3,7,5,3]");

        assert_eq!(Menu::dice(&set, None).items().len(), 3);
    }

    #[test]
    fn lines_and_tokens() {
        let menu = Menu::numbers(2);
        assert_eq!(menu.lines(), vec!["0 - 0", "1 - 1", "X - exit", "? - help"]);
        assert_eq!(menu.tokens(), vec!["0", "1", "X", "?"]);
    }
}
