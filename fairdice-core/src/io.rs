//! Input and output collaborators injected into the game.

use crate::{Die, DiceError, ProbabilityMatrix, Result};

pub const EXIT_TOKEN: &str = "X";
pub const HELP_TOKEN: &str = "?";

/// A numbered list of options shown before each prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub prompt: String,
    pub options: Vec<String>,
}

impl Menu {
    pub fn new(prompt: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    /// Options `0..count`, labelled by their own number.
    pub fn numbered(prompt: impl Into<String>, count: usize) -> Self {
        Self::new(prompt, (0..count).map(|i| i.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Display lines, including the exit and help entries.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| format!("{} - {}", i, label))
            .collect();
        lines.push(format!("{} - exit", EXIT_TOKEN));
        lines.push(format!("{} - help", HELP_TOKEN));
        lines
    }

    /// Interprets a raw reply. Out-of-range or non-numeric replies are
    /// `InputValidation` errors.
    pub fn parse_reply(&self, raw: &str) -> Result<MenuReply> {
        let reply = raw.trim();
        if reply.eq_ignore_ascii_case(EXIT_TOKEN) {
            return Ok(MenuReply::Exit);
        }
        if reply == HELP_TOKEN {
            return Ok(MenuReply::Help);
        }

        let index: usize = reply.parse().map_err(|_| {
            DiceError::input(format!(
                "'{}' is not an option; enter a number, {} or {}",
                reply, EXIT_TOKEN, HELP_TOKEN
            ))
        })?;
        if index >= self.options.len() {
            return Err(DiceError::input(format!(
                "{} is out of range; choose 0 to {}",
                index,
                self.options.len().saturating_sub(1)
            )));
        }
        Ok(MenuReply::Select(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuReply {
    Select(usize),
    Help,
    Exit,
}

/// Source of the user's replies.
pub trait InputSource {
    /// Returns the raw reply to `menu`. The game validates it.
    fn read_reply(&mut self, menu: &Menu) -> Result<String>;
}

/// Sink for everything the game shows the user.
pub trait OutputSink {
    fn message(&mut self, text: &str);

    fn menu(&mut self, menu: &Menu);

    fn probability_table(&mut self, dice: &[Die], matrix: &ProbabilityMatrix);
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn read_reply(&mut self, menu: &Menu) -> Result<String> {
        (**self).read_reply(menu)
    }
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn message(&mut self, text: &str) {
        (**self).message(text)
    }

    fn menu(&mut self, menu: &Menu) {
        (**self).menu(menu)
    }

    fn probability_table(&mut self, dice: &[Die], matrix: &ProbabilityMatrix) {
        (**self).probability_table(dice, matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply() {
        let menu = Menu::numbered("Try to guess my selection.", 2);
        assert_eq!(menu.parse_reply("0").unwrap(), MenuReply::Select(0));
        assert_eq!(menu.parse_reply(" 1\n").unwrap(), MenuReply::Select(1));
        assert_eq!(menu.parse_reply("x").unwrap(), MenuReply::Exit);
        assert_eq!(menu.parse_reply("X").unwrap(), MenuReply::Exit);
        assert_eq!(menu.parse_reply("?").unwrap(), MenuReply::Help);
    }

    #[test]
    fn test_parse_reply_rejects_bad_input() {
        let menu = Menu::numbered("Choose", 3);
        for raw in ["3", "-1", "one", "", "1.0"] {
            let err = menu.parse_reply(raw).unwrap_err();
            assert!(err.is_recoverable(), "{:?} should be recoverable", raw);
        }
    }

    #[test]
    fn test_menu_lines() {
        let menu = Menu::new("Choose your dice:", vec!["[1,2]".into(), "[3,4]".into()]);
        assert_eq!(
            menu.lines(),
            vec!["0 - [1,2]", "1 - [3,4]", "X - exit", "? - help"]
        );
        assert_eq!(menu.len(), 2);
        assert!(!menu.is_empty());
    }
}
