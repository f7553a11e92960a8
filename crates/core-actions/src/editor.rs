//! Application context: layout, file registry, chooser and keymap.
//!
//! Key chords are translated against the focused window's `LastOp`; the
//! resulting command strings share the dispatcher with minibuffer input.

use crate::chooser::ChooserDialog;
use crate::dispatcher::{self, CommandStatus};
use core_config::Config;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_files::FileMgr;
use core_keymap::{KeyOutcome, Keymap};
use core_model::{CursorMotion, ViewMetrics, WindowMgr};
use tracing::{debug, trace, warn};

pub struct Editor {
    pub windows: WindowMgr,
    pub files: FileMgr,
    pub(crate) chooser: Box<dyn ChooserDialog>,
    keymap: Keymap,
    quit_requested: bool,
}

impl Editor {
    pub fn new(windows: WindowMgr, files: FileMgr, chooser: Box<dyn ChooserDialog>) -> Self {
        Self {
            windows,
            files,
            chooser,
            keymap: Keymap::emacs(),
            quit_requested: false,
        }
    }

    /// Build the window manager and file registry from `config`. Recents
    /// are loaded when a recents file is configured.
    pub fn from_config(config: &Config, chooser: Box<dyn ChooserDialog>) -> Self {
        let metrics = ViewMetrics {
            text_height: config.text_height(),
            margin: config.effective_vertical_margin as usize,
        };
        let windows = WindowMgr::new(&config.file.scratch.greeting).with_metrics(metrics);
        let mut files = FileMgr::new(
            config.file.files.recent_capacity,
            config.file.files.recents_file(),
        );
        if let Err(e) = files.load_recents() {
            warn!(target: "files", error = %e, "recents_load_failed");
        }
        Self::new(windows, files, chooser)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Parse and run `raw`. Never fails; see `CommandStatus`.
    pub fn execute(&mut self, raw: &str) -> CommandStatus {
        dispatcher::execute(self, raw)
    }

    /// Run the minibuffer text: the status message becomes the placeholder
    /// and the focused window is brought back to the front.
    pub fn submit_minibuffer(&mut self) -> CommandStatus {
        let text = self.windows.minibuffer_mut().submit();
        let status = self.execute(&text);
        self.windows.set_entry_placeholder_text(status.message.clone());
        let front = self.windows.current_focus();
        self.windows.set_front_edit_window(front);
        status
    }

    /// Type `line` into the minibuffer and submit it.
    pub fn submit_line(&mut self, line: &str) -> CommandStatus {
        self.windows.minibuffer_mut().set_text(line);
        self.submit_minibuffer()
    }

    /// Register `paths` without reporting read errors, then show the first.
    pub fn preload(&mut self, paths: &[String]) -> Option<CommandStatus> {
        for p in paths {
            if let Err(e) = self.files.get_file(p, true) {
                debug!(target: "files", path = %p, error = %e, "preload_failed");
            }
        }
        let first = paths.first()?;
        let status = self.execute(&format!("e {first}"));
        if !status.is_success() {
            self.windows.set_entry_placeholder_text(status.message.clone());
        }
        Some(status)
    }

    /// Route one chord to the minibuffer (when focused) or the front window.
    /// Returns the status of any command the chord ran.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<CommandStatus> {
        if self.windows.minibuffer().is_focused() {
            return self.minibuffer_key(key);
        }
        let front = self.windows.current_focus();
        let mut last_op = self.windows.window(front)?.last_op;
        let outcome = self.keymap.translate(&mut last_op, key);
        if let Some(w) = self.windows.window_mut(front) {
            w.last_op = last_op;
        }
        trace!(target: "input", key = %key, ?outcome, "key_translated");
        match outcome {
            KeyOutcome::Command(cmd) => {
                let status = self.execute(cmd);
                if !status.message.is_empty() {
                    self.windows.set_entry_placeholder_text(status.message.clone());
                }
                return Some(status);
            }
            KeyOutcome::FocusMinibuffer => self.windows.focus_minibuffer(),
            KeyOutcome::Recenter(target) => self.windows.recenter(target),
            KeyOutcome::ScrollPage { forward } => self.windows.scroll_page(forward),
            KeyOutcome::Pending => {}
            KeyOutcome::Invalid => {
                debug!(target: "input", key = %key, "invalid_keybind");
                self.windows.set_entry_placeholder_text("invalid keybind");
            }
            KeyOutcome::Unhandled => self.edit_key(key),
        }
        None
    }

    fn edit_key(&mut self, key: &KeyEvent) {
        if key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return;
        }
        match key.code {
            KeyCode::Char(c) => {
                let mut buf = [0u8; 4];
                self.windows.insert_text(c.encode_utf8(&mut buf));
            }
            KeyCode::Enter => {
                self.windows.insert_text("\n");
            }
            KeyCode::Tab => {
                self.windows.insert_text("\t");
            }
            KeyCode::Backspace => {
                self.windows.delete_backward();
            }
            KeyCode::Up => self.windows.move_cursor(CursorMotion::Up),
            KeyCode::Down => self.windows.move_cursor(CursorMotion::Down),
            KeyCode::Left => self.windows.move_cursor(CursorMotion::Left),
            KeyCode::Right => self.windows.move_cursor(CursorMotion::Right),
            KeyCode::Esc => {}
        }
    }

    fn minibuffer_key(&mut self, key: &KeyEvent) -> Option<CommandStatus> {
        let ctrl = key.mods == KeyModifiers::CTRL;
        let mb = self.windows.minibuffer_mut();
        match key.code {
            KeyCode::Char('g') if ctrl => mb.cancel(),
            KeyCode::Esc => mb.cancel(),
            KeyCode::Enter => return Some(self.submit_minibuffer()),
            KeyCode::Backspace => {
                let mut text = mb.text().to_string();
                text.pop();
                mb.set_text(text);
            }
            KeyCode::Char(c) if !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                let mut text = mb.text().to_string();
                text.push(c);
                mb.set_text(text);
            }
            _ => {}
        }
        None
    }
}
