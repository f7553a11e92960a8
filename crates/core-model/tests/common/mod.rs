#![allow(dead_code)]

use core_files::{FileHandle, FileMgr};
use core_model::{WindowId, WindowMgr};
use std::collections::HashSet;
use std::path::PathBuf;

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub files: FileMgr,
    pub wm: WindowMgr,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = FileMgr::new(4, None).with_base_dir(dir.path());
        Self {
            dir,
            files,
            wm: WindowMgr::new("scratch\n"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `content` to `name` inside the fixture directory.
    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path(name), content).expect("write fixture file");
    }

    /// Open `name` the way the `e` command does: in place of the focus.
    pub fn open(&mut self, name: &str) -> WindowId {
        let path = self.path(name);
        let id = self
            .wm
            .get_file_window(&path, true, &mut self.files)
            .expect("file window");
        self.wm.set_front_edit_window(id);
        id
    }

    /// Add a column and focus its scratch window.
    pub fn newcol(&mut self) -> WindowId {
        let id = self.wm.new_column(None);
        self.wm.set_front_edit_window(id);
        id
    }

    pub fn file(&self, name: &str) -> FileHandle {
        self.files
            .lookup(self.path(name).to_str().unwrap())
            .expect("file loaded")
    }

    /// Window ids column by column.
    pub fn screen(&self) -> Vec<Vec<WindowId>> {
        self.wm
            .columns()
            .iter()
            .map(|c| c.windows().to_vec())
            .collect()
    }

    pub fn history(&self) -> Vec<WindowId> {
        self.wm.history().iter().copied().collect()
    }
}

/// Structural invariants of the window manager.
pub fn check_invariants(wm: &WindowMgr) {
    assert!(wm.num_columns() >= 1, "no columns");
    let mut seen = HashSet::new();
    for (i, c) in wm.columns().iter().enumerate() {
        assert!(!c.is_empty(), "column {i} is empty");
        for id in c.windows() {
            assert!(wm.window(*id).is_some(), "column {i} shows dead {id:?}");
            assert!(seen.insert(*id), "{id:?} on screen twice");
        }
    }
    assert!(!wm.history().is_empty(), "empty history");
    let mut hist = HashSet::new();
    for id in wm.history() {
        assert!(wm.window(*id).is_some(), "history names dead {id:?}");
        assert!(hist.insert(*id), "{id:?} twice in history");
    }
    for w in wm.windows().iter() {
        let id = w.id();
        assert!(
            seen.contains(&id) || hist.contains(&id),
            "{id:?} leaked: neither on screen nor in history"
        );
    }
    assert_eq!(Some(&wm.current_focus()), wm.history().front());
}
