#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use core_actions::{ChooserDialog, ChooserOutcome, CommandStatus, Editor};
use core_files::{FileError, FileHandle, FileMgr};
use core_keymap::parse_sequence;
use core_model::{WindowId, WindowMgr};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Chooser that records where it was opened and replays canned outcomes.
/// Runs past the script cancel.
pub struct ScriptedChooser {
    calls: Rc<RefCell<Vec<(PathBuf, Vec<String>)>>>,
    outcomes: VecDeque<ChooserOutcome>,
}

impl ChooserDialog for ScriptedChooser {
    fn run(
        &mut self,
        start_dir: &Path,
        recent_files: &[String],
    ) -> Result<ChooserOutcome, FileError> {
        self.calls
            .borrow_mut()
            .push((start_dir.to_path_buf(), recent_files.to_vec()));
        Ok(self.outcomes.pop_front().unwrap_or(ChooserOutcome::Cancelled))
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub editor: Editor,
    pub chooser_calls: Rc<RefCell<Vec<(PathBuf, Vec<String>)>>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    pub fn with_outcomes(outcomes: Vec<ChooserOutcome>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let chooser = ScriptedChooser {
            calls: calls.clone(),
            outcomes: outcomes.into(),
        };
        let files = FileMgr::new(4, Some(dir.path().join("state").join("recents")))
            .with_base_dir(dir.path());
        let windows = WindowMgr::new("scratch\n");
        let editor = Editor::new(windows, files, Box::new(chooser));
        Self {
            dir,
            editor,
            chooser_calls: calls,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn run(&mut self, cmd: &str) -> CommandStatus {
        self.editor.execute(cmd)
    }

    /// Run `cmd` and insist it succeeds.
    pub fn ok(&mut self, cmd: &str) {
        let status = self.run(cmd);
        assert!(status.is_success(), "{cmd}: {status:?}");
    }

    /// Feed a chord sequence such as `"C-x C-f"`; returns the statuses of
    /// commands that ran.
    pub fn keys(&mut self, seq: &str) -> Vec<CommandStatus> {
        parse_sequence(seq)
            .unwrap()
            .iter()
            .filter_map(|k| self.editor.handle_key(k))
            .collect()
    }

    /// Type literal text into the focused window.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let key = core_events::KeyEvent::plain(c);
            self.editor.handle_key(&key);
        }
    }

    pub fn focus(&self) -> WindowId {
        self.editor.windows.current_focus()
    }

    pub fn front_text(&self) -> String {
        self.editor.windows.window_text(self.focus()).unwrap()
    }

    pub fn file(&self, name: &str) -> Option<FileHandle> {
        self.editor
            .files
            .lookup(self.path(name).to_str().unwrap())
    }

    pub fn screen(&self) -> Vec<Vec<WindowId>> {
        self.editor
            .windows
            .columns()
            .iter()
            .map(|c| c.windows().to_vec())
            .collect()
    }

    pub fn placeholder(&self) -> String {
        self.editor.windows.minibuffer().placeholder().to_string()
    }
}
