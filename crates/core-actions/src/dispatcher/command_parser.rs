//! Splits a raw command string into a name and its argument string.
//!
//! The name is the first run of non-space characters; the arguments are
//! whatever follows the next space, with leading spaces skipped. Only the
//! space character separates words, matching what the minibuffer accepts.
//! A name made only of ASCII digits is a goto-line request.
//!
//! No side effects here; pure classification.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Nothing but spaces.
    Empty,
    /// Bare line number, 1-based.
    GotoLine(usize),
    Named { name: String, args: String },
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let body = raw.trim_start_matches(' ');
        if body.is_empty() {
            return ParsedCommand::Empty;
        }
        let (name, args) = match body.split_once(' ') {
            Some((name, rest)) => (name, rest.trim_start_matches(' ')),
            None => (body, ""),
        };
        if name.bytes().all(|b| b.is_ascii_digit()) {
            // Overlong numbers land past the last line anyway.
            let line = name.parse::<usize>().unwrap_or(usize::MAX);
            return ParsedCommand::GotoLine(line);
        }
        ParsedCommand::Named {
            name: name.to_string(),
            args: args.to_string(),
        }
    }
}
