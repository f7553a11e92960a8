//! Editor glue: the application context, command dispatch and the chooser.
//!
//! Command strings arrive from two places, the minibuffer and key bindings,
//! and go through the same `execute` path. Handlers report success or
//! failure as a `CommandStatus` whose message ends up in the minibuffer
//! placeholder.

mod chooser;
mod dispatcher;
mod editor;

pub use chooser::{
    ChooserDialog, ChooserOutcome, ChooserRow, DirectoryChooser, RowKind, matches_pattern,
};
pub use dispatcher::{
    CommandParser, CommandStatus, CommandStatusCode, ParsedCommand, command_names,
};
pub use editor::Editor;
