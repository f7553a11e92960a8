//! Command handlers.
//!
//! Each handler takes the argument string (already stripped of the command
//! name and leading spaces) and reports back through `CommandStatus`.
//! Window changes that should become visible end with
//! `set_front_edit_window`, which also updates the title.

use super::CommandStatus;
use crate::chooser::ChooserOutcome;
use crate::Editor;
use core_files::path::to_full_path;
use core_model::{ShadeOp, WindowId};
use std::path::PathBuf;
use tracing::{info, warn};

const CLOSE_LAST: &str = "cannot close the only window in the column";

pub(super) fn bubble(editor: &mut Editor, _args: &str) -> CommandStatus {
    editor.windows.bubble();
    CommandStatus::success()
}

/// Run the chooser and execute the command it returns.
pub(super) fn choose(editor: &mut Editor, args: &str) -> CommandStatus {
    let start = if args.is_empty() {
        current_dir(editor)
    } else {
        to_full_path(editor.files.base_dir(), args)
    };
    if !start.is_dir() {
        return CommandStatus::error(format!("{}: no such directory", start.display()));
    }
    let recents = editor.files.recent_files().to_vec();
    match editor.chooser.run(&start, &recents) {
        Ok(ChooserOutcome::Chosen(cmd)) => {
            info!(target: "command", dir = %start.display(), %cmd, "chooser_chosen");
            editor.execute(&cmd)
        }
        Ok(ChooserOutcome::Cancelled) => CommandStatus::success(),
        Err(e) => {
            warn!(target: "command", dir = %start.display(), error = %e, "chooser_failed");
            CommandStatus::error(e.to_string())
        }
    }
}

pub(super) fn close(editor: &mut Editor, _args: &str) -> CommandStatus {
    let w = editor.windows.current_focus();
    // A lone scratch window would only be replaced by another one.
    if editor.windows.is_sole_scratch(w) || !editor.windows.close_window(w) {
        return CommandStatus::error(CLOSE_LAST);
    }
    CommandStatus::success()
}

/// `bd [path]`: close every window showing a file and unregister it.
pub(super) fn delete_buffer(editor: &mut Editor, args: &str) -> CommandStatus {
    let file = if args.is_empty() {
        let w = editor.windows.current_focus();
        match editor.windows.window(w).and_then(|w| w.backing_file()) {
            Some(f) => f.clone(),
            None => return CommandStatus::error("file to delete not specified"),
        }
    } else {
        match editor.files.lookup(args) {
            Some(f) => f,
            None => return CommandStatus::error(format!("no such buffer: {args}")),
        }
    };
    let closed = editor.windows.close_windows_for_file(&file);
    editor.files.delete_file(&file);
    info!(target: "command", path = %file.borrow().tilde_path(), closed, "buffer_deleted");
    CommandStatus::success()
}

/// `e <path>`: show a file, or browse when the path is a directory.
pub(super) fn edit(editor: &mut Editor, args: &str) -> CommandStatus {
    let base = if args.starts_with('/') || args.starts_with('~') {
        editor.files.base_dir().to_path_buf()
    } else {
        current_dir(editor)
    };
    let full = to_full_path(&base, args);
    if full.is_dir() {
        return choose(editor, &full.to_string_lossy());
    }
    let Some(w) = editor
        .windows
        .get_file_window(&full, true, &mut editor.files)
    else {
        let msg = editor.files.take_message().unwrap_or_default();
        return CommandStatus::error(msg);
    };
    show(editor, w);
    CommandStatus::success()
}

/// List loaded files as `e <name>` lines in the scratch window.
pub(super) fn files(editor: &mut Editor, _args: &str) -> CommandStatus {
    let mut listing = String::from("\n");
    for name in editor.files.file_names() {
        listing.push_str("e ");
        listing.push_str(&name);
        listing.push('\n');
    }
    editor.windows.append_scratch(&listing);
    if let Some(w) = editor.windows.get_scratch_window(true) {
        show(editor, w);
    }
    CommandStatus::success()
}

pub(super) fn new_column(editor: &mut Editor, _args: &str) -> CommandStatus {
    let w = editor.windows.new_column(None);
    show(editor, w);
    CommandStatus::success()
}

pub(super) fn quit(editor: &mut Editor, _args: &str) -> CommandStatus {
    editor.request_quit();
    match editor.files.save_recents() {
        Ok(()) => CommandStatus::success(),
        Err(e) => {
            warn!(target: "command", error = %e, "recents_save_failed");
            CommandStatus::error(e.to_string())
        }
    }
}

pub(super) fn shade(editor: &mut Editor, _args: &str) -> CommandStatus {
    let w = editor.windows.current_focus();
    if let Some(win) = editor.windows.window_mut(w) {
        win.shade_mode(ShadeOp::Toggle);
    }
    CommandStatus::success()
}

pub(super) fn split(editor: &mut Editor, _args: &str) -> CommandStatus {
    let w = editor.windows.current_focus();
    editor.windows.split_window(w);
    CommandStatus::success()
}

/// `w [path]`: save the focused file, or write its text to `path`.
pub(super) fn write(editor: &mut Editor, args: &str) -> CommandStatus {
    let w = editor.windows.current_focus();
    let Some(file) = editor
        .windows
        .window(w)
        .and_then(|w| w.backing_file())
        .cloned()
    else {
        return CommandStatus::error("scratch buffer has no file");
    };
    let text = file.borrow().text();
    let result = if args.is_empty() {
        file.borrow_mut().save(&text)
    } else {
        let base = file
            .borrow()
            .path()
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| editor.files.base_dir().to_path_buf());
        file.borrow().save_as(&to_full_path(&base, args), &text)
    };
    match result {
        Ok(()) => {
            info!(target: "command", path = %file.borrow().tilde_path(), alt = args, "file_written");
            CommandStatus::success()
        }
        Err(e) => {
            warn!(target: "command", error = %e, "file_write_failed");
            CommandStatus::error(e.to_string())
        }
    }
}

/// Directory of the focused file window, else the working directory.
fn current_dir(editor: &Editor) -> PathBuf {
    let w = editor.windows.current_focus();
    editor
        .windows
        .window(w)
        .and_then(|w| w.backing_file())
        .and_then(|f| f.borrow().path().parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| editor.files.base_dir().to_path_buf())
}

fn show(editor: &mut Editor, w: WindowId) {
    if let Some(win) = editor.windows.window_mut(w) {
        win.grab_focus();
        win.shade_mode(ShadeOp::Unshade);
    }
    editor.windows.set_front_edit_window(w);
}
