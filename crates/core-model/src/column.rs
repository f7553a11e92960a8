//! A vertical stack of edit windows.
//!
//! Operations that would move focus return the window that should become
//! front; the `WindowMgr` applies it to the focus history.

use crate::window::{WindowArena, WindowId};
use core_files::FileHandle;
use std::path::Path;
use tracing::debug;

/// Outcome of removing one window from a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed {
    pub window: WindowId,
    pub row: usize,
    pub focus: WindowId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    windows: Vec<WindowId>,
}

impl Column {
    pub fn new(first: WindowId) -> Self {
        Self {
            windows: vec![first],
        }
    }

    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Insert `w` right after `sibling`; no-op when `sibling` is absent.
    pub fn add_window(&mut self, w: WindowId, sibling: WindowId) -> bool {
        let Some(row) = self.get_row(sibling) else {
            return false;
        };
        self.windows.insert(row + 1, w);
        debug!(target: "layout.column", window = w.0, after = sibling.0, "window_added");
        true
    }

    /// Append `w`. Returns the window that must receive focus.
    pub fn append_window(&mut self, w: WindowId) -> WindowId {
        self.windows.push(w);
        w
    }

    /// Remove `w`. The window now at the vacated row (or the last one) gets
    /// focus; an emptied column receives a fresh scratch window from `arena`.
    /// The closed window stays in `arena`.
    pub fn close_window(&mut self, w: WindowId, arena: &mut WindowArena) -> Option<Closed> {
        let row = self.get_row(w)?;
        self.windows.remove(row);
        let focus = if self.windows.is_empty() {
            let scratch = arena.alloc_scratch();
            self.windows.push(scratch);
            debug!(target: "layout.column", window = scratch.0, "scratch_synthesized");
            scratch
        } else {
            self.windows
                .get(row)
                .or_else(|| self.windows.last())
                .copied()
                .unwrap_or(w)
        };
        Some(Closed {
            window: w,
            row,
            focus,
        })
    }

    /// Close every window backed by `file`.
    pub fn close_windows_for_file(
        &mut self,
        file: &FileHandle,
        arena: &mut WindowArena,
    ) -> Vec<Closed> {
        let mut closed = Vec::new();
        let mut idx = 0;
        while idx < self.windows.len() {
            let id = self.windows[idx];
            let backed = arena.get(id).is_some_and(|w| w.shows_file(file));
            if !backed {
                idx += 1;
                continue;
            }
            // Rows shift up; look at the same index again.
            if let Some(c) = self.close_window(id, arena) {
                closed.push(c);
            }
        }
        closed
    }

    pub fn get_edit_window(&self, row: usize) -> Option<WindowId> {
        self.windows.get(row).copied()
    }

    pub fn get_file_window(&self, path: &Path, arena: &WindowArena) -> Option<WindowId> {
        self.windows.iter().copied().find(|id| {
            arena
                .get(*id)
                .and_then(|w| w.backing_file())
                .is_some_and(|f| f.borrow().path() == path)
        })
    }

    pub fn get_row(&self, w: WindowId) -> Option<usize> {
        self.windows.iter().position(|id| *id == w)
    }

    pub fn get_scratch_window(&self, arena: &WindowArena) -> Option<WindowId> {
        self.windows.iter().copied().find(|id| arena.is_scratch(*id))
    }

    /// `new` takes `old`'s row and receives focus; no-op when `old` is absent.
    pub fn replace_window(&mut self, old: WindowId, new: WindowId) -> bool {
        match self.get_row(old) {
            Some(row) => {
                self.windows[row] = new;
                true
            }
            None => false,
        }
    }
}
