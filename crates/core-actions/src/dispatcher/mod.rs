//! Command dispatch for strings typed in the minibuffer or bound to keys.
//!
//! * `command_parser` - splits a raw string into name and arguments
//! * `command`        - one handler per command name
//!
//! Every command returns a `CommandStatus`; its message becomes the
//! minibuffer placeholder. Dispatch never panics and never returns `Err`:
//! failures travel as `CommandStatusCode::Error` with a readable message.

use crate::Editor;
use tracing::{debug, info};

mod command;
mod command_parser;

pub use command_parser::{CommandParser, ParsedCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatusCode {
    Success,
    Error,
    EmptyCommand,
    CommandNotFound,
    CommandNotImplemented,
}

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStatus {
    pub code: CommandStatusCode,
    pub message: String,
}

impl CommandStatus {
    pub fn success() -> Self {
        Self {
            code: CommandStatusCode::Success,
            message: String::new(),
        }
    }
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: CommandStatusCode::Error,
            message: message.into(),
        }
    }
    pub fn empty() -> Self {
        Self {
            code: CommandStatusCode::EmptyCommand,
            message: String::new(),
        }
    }
    pub fn not_found(name: &str) -> Self {
        Self {
            code: CommandStatusCode::CommandNotFound,
            message: format!("command not found: {name}"),
        }
    }
    pub fn not_implemented(name: &str) -> Self {
        Self {
            code: CommandStatusCode::CommandNotImplemented,
            message: format!("command not implemented: {name}"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CommandStatusCode::Success
    }
}

type Handler = fn(&mut Editor, &str) -> CommandStatus;

/// Exact-match command table, sorted by name.
const COMMANDS: &[(&str, Handler)] = &[
    ("bd", command::delete_buffer),
    ("bubble", command::bubble),
    ("choose", command::choose),
    ("close", command::close),
    ("e", command::edit),
    ("files", command::files),
    ("newcol", command::new_column),
    ("q", command::quit),
    ("shade", command::shade),
    ("split", command::split),
    ("w", command::write),
];

/// Names accepted by `execute`, sorted.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _)| *name)
}

fn lookup(name: &str) -> Option<Handler> {
    COMMANDS
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|idx| COMMANDS[idx].1)
}

/// Parse and run one command string.
pub fn execute(editor: &mut Editor, raw: &str) -> CommandStatus {
    let parsed = CommandParser::parse(raw);
    // Only `bubble` continues a walk; anything else starts over.
    if !matches!(&parsed, ParsedCommand::Named { name, .. } if name == "bubble") {
        editor.windows.reset_bubble_counter();
    }
    let status = match parsed {
        ParsedCommand::Empty => CommandStatus::empty(),
        ParsedCommand::GotoLine(line) => {
            editor.windows.goto_line(line);
            CommandStatus::success()
        }
        ParsedCommand::Named { name, args } => match lookup(&name) {
            Some(handler) => handler(editor, &args),
            None => {
                info!(target: "command", %name, "command_not_found");
                CommandStatus::not_found(&name)
            }
        },
    };
    debug!(target: "command", raw, code = ?status.code, message = %status.message, "command_executed");
    status
}
