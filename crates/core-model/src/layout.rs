//! The window manager: columns of edit windows plus the focus history.
//!
//! Invariants (hold after every public call):
//! * `columns` is never empty and no column is empty.
//! * The front of `history` is the focused window and is always live.
//! * `history` only names windows in the arena.
//! * Every arena window is on screen or in `history`; anything else is
//!   dropped by `collect_orphans`.
//!
//! Windows that are replaced out of their slot stay in `history`, which is
//! what lets `bubble` bring them back.

use crate::column::{Closed, Column};
use crate::minibuffer::Minibuffer;
use crate::scroll::{compute_scroll_intent, page_target, recenter_first_line};
use crate::window::{EditWindow, WindowArena, WindowId, WindowKind};
use core_files::{FileHandle, FileMgr};
use core_keymap::{LastOp, RecenterTarget};
use core_text::{Buffer, Position};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info};

pub const TITLE_SUFFIX: &str = " - pillar";
pub const DEFAULT_TEXT_HEIGHT: usize = 40;

/// `(column, row)`, both 0-based. Only valid until the next layout change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPos {
    pub column: usize,
    pub row: usize,
}

impl WindowPos {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Rows available to a window, used by goto-line, recenter and paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMetrics {
    pub text_height: usize,
    pub margin: usize,
}

impl Default for ViewMetrics {
    fn default() -> Self {
        Self {
            text_height: DEFAULT_TEXT_HEIGHT,
            margin: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug)]
pub struct WindowMgr {
    windows: WindowArena,
    scratch: Buffer,
    columns: Vec<Column>,
    history: VecDeque<WindowId>,
    bubble_pos: WindowPos,
    minibuffer: Minibuffer,
    title: String,
    metrics: ViewMetrics,
}

impl WindowMgr {
    /// One column holding one focused scratch window.
    pub fn new(scratch_greeting: &str) -> Self {
        let mut windows = WindowArena::default();
        let first = windows.alloc_scratch();
        let mut mgr = Self {
            windows,
            scratch: Buffer::from_text("*scratch*", scratch_greeting),
            columns: vec![Column::new(first)],
            history: VecDeque::new(),
            bubble_pos: WindowPos::default(),
            minibuffer: Minibuffer::default(),
            title: String::new(),
            metrics: ViewMetrics::default(),
        };
        mgr.set_front_edit_window(first);
        mgr
    }

    pub fn with_metrics(mut self, metrics: ViewMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn windows(&self) -> &WindowArena {
        &self.windows
    }

    pub fn window(&self, id: WindowId) -> Option<&EditWindow> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut EditWindow> {
        self.windows.get_mut(id)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Most recent first.
    pub fn history(&self) -> &VecDeque<WindowId> {
        &self.history
    }

    pub fn bubble_pos(&self) -> WindowPos {
        self.bubble_pos
    }

    pub fn minibuffer(&self) -> &Minibuffer {
        &self.minibuffer
    }

    pub fn minibuffer_mut(&mut self) -> &mut Minibuffer {
        &mut self.minibuffer
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn metrics(&self) -> ViewMetrics {
        self.metrics
    }

    pub fn scratch_text(&self) -> String {
        self.scratch.text()
    }

    pub fn append_scratch(&mut self, text: &str) {
        self.scratch.append(text);
    }

    pub fn set_entry_placeholder_text(&mut self, msg: impl Into<String>) {
        self.minibuffer.set_placeholder(msg);
    }

    pub fn focus_minibuffer(&mut self) {
        self.minibuffer.focus();
    }

    pub fn is_on_screen(&self, id: WindowId) -> bool {
        self.get_edit_window_position(id).is_some()
    }

    /// A scratch window that is alone in its column.
    pub fn is_sole_scratch(&self, id: WindowId) -> bool {
        self.windows.is_scratch(id)
            && self
                .get_edit_window_position(id)
                .and_then(|p| self.columns.get(p.column))
                .is_some_and(|c| c.len() == 1)
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub fn current_focus(&self) -> WindowId {
        debug_assert!(!self.history.is_empty(), "focus history must not be empty");
        match self.history.front() {
            Some(id) => *id,
            None => self.columns[0].windows()[0],
        }
    }

    fn current_column_index(&self) -> usize {
        self.get_edit_window_position(self.current_focus())
            .map_or(0, |p| p.column)
    }

    /// Column holding the focused window; column 0 if it is off screen.
    pub fn current_column(&self) -> &Column {
        &self.columns[self.current_column_index()]
    }

    pub fn get_edit_window(&self, pos: WindowPos) -> Option<WindowId> {
        self.columns.get(pos.column)?.get_edit_window(pos.row)
    }

    pub fn get_edit_window_position(&self, id: WindowId) -> Option<WindowPos> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(col, c)| c.get_row(id).map(|row| WindowPos::new(col, row)))
    }

    /// On-screen window showing the file at `path`. With `create`, load the
    /// file and put a new window in place of the focused one. `None` when the
    /// file cannot be read.
    pub fn get_file_window(
        &mut self,
        path: &Path,
        create: bool,
        files: &mut FileMgr,
    ) -> Option<WindowId> {
        if let Some(id) = self
            .columns
            .iter()
            .find_map(|c| c.get_file_window(path, &self.windows))
        {
            return Some(id);
        }
        if !create {
            return None;
        }
        let file = files.get_file(&path.to_string_lossy(), false).ok()?;
        let id = self.windows.alloc_file(file);
        let current = self.current_focus();
        if !self.replace_window(current, id) {
            self.add_window(id);
        }
        Some(id)
    }

    /// An on-screen scratch window; with `create`, a new one appended to the
    /// current column.
    pub fn get_scratch_window(&mut self, create: bool) -> Option<WindowId> {
        if let Some(id) = self
            .columns
            .iter()
            .find_map(|c| c.get_scratch_window(&self.windows))
        {
            return Some(id);
        }
        if !create {
            return None;
        }
        let id = self.windows.alloc_scratch();
        self.add_window(id);
        Some(id)
    }

    // ---------------------------------------------------------------------
    // Layout changes
    // ---------------------------------------------------------------------

    /// Append `w` to the current column and focus it.
    pub fn add_window(&mut self, w: WindowId) {
        let col = self.current_column_index();
        let focus = self.columns[col].append_window(w);
        debug!(target: "layout.column", window = w.0, column = col, "window_appended");
        self.focus_window(focus);
    }

    /// Bring the next window in focus-history order to the front.
    ///
    /// Successive calls walk deeper into the history, showing each window at
    /// the position where the walk started; after `history.len()` calls the
    /// original order and screen are restored.
    pub fn bubble(&mut self) {
        self.minibuffer.set_placeholder("");
        if self.history.len() < 2 {
            return;
        }
        let Some(current) = self.history.pop_front() else {
            return;
        };
        let mut times = self
            .windows
            .get(current)
            .map_or(0, |w| w.last_op.bubble_number())
            + 1;
        if times == 1 {
            if let Some(pos) = self.get_edit_window_position(current) {
                self.bubble_pos = pos;
            }
        }

        let depth = times as usize;
        let next = if depth <= self.history.len() {
            self.history.insert(depth - 1, current);
            let next = self.history[depth];
            self.history.remove(depth);
            self.history.push_front(next);
            next
        } else {
            info!(target: "layout.bubble", "bubbling: starting over");
            self.minibuffer.set_placeholder("bubbling: starting over");
            times = 0;
            self.history.push_back(current);
            self.history[0]
        };

        if self.is_on_screen(next) {
            if self.get_edit_window_position(current) == Some(self.bubble_pos) {
                // Put back the window the walk started from.
                if let Some(&original) = self.history.get(1) {
                    self.replace_window(current, original);
                }
            }
        } else {
            let slot = self
                .get_edit_window(self.bubble_pos)
                .or_else(|| self.is_on_screen(current).then_some(current));
            match slot {
                Some(old) => {
                    self.replace_window(old, next);
                }
                None => self.add_window(next),
            }
        }

        if let Some(w) = self.windows.get_mut(next) {
            w.grab_focus();
        }
        self.set_front_edit_window(next);
        if let Some(w) = self.windows.get_mut(current) {
            w.last_op.set_bubble_number(0);
        }
        if let Some(w) = self.windows.get_mut(next) {
            w.last_op.set_bubble_number(times);
        }
        debug!(
            target: "layout.bubble",
            current = current.0,
            next = next.0,
            times,
            pos = ?self.bubble_pos,
            "bubbled"
        );
    }

    /// Clear the focused window's bubble counter; called for every
    /// non-bubble command.
    pub fn reset_bubble_counter(&mut self) {
        let front = self.current_focus();
        if let Some(w) = self.windows.get_mut(front) {
            if matches!(w.last_op, LastOp::Bubble(_)) {
                w.last_op.reset();
            }
        }
    }

    /// Remove `w` from its column and the history without dropping it.
    /// No-op when `w` is not on screen.
    fn detach_window(&mut self, w: WindowId) -> Option<(usize, Closed)> {
        let windows = &mut self.windows;
        let (col, closed) = self
            .columns
            .iter_mut()
            .enumerate()
            .find_map(|(col, c)| c.close_window(w, windows).map(|closed| (col, closed)))?;
        self.history.retain(|id| *id != w);
        if self.bubble_pos.column == col && self.bubble_pos.row > closed.row {
            self.bubble_pos.row -= 1;
        }
        Some((col, closed))
    }

    /// Close an on-screen window. Returns false when `w` is not on screen.
    pub fn close_window(&mut self, w: WindowId) -> bool {
        let Some((col, closed)) = self.detach_window(w) else {
            return false;
        };
        self.windows.remove(w);
        info!(target: "layout.column", window = w.0, column = col, row = closed.row, "window_closed");
        self.focus_window(closed.focus);
        true
    }

    /// Close every window showing `file`. Off-screen windows of that file are
    /// forgotten as well. Returns the number of on-screen windows closed.
    pub fn close_windows_for_file(&mut self, file: &FileHandle) -> usize {
        let mut count = 0;
        let mut focus = None;
        for col in 0..self.columns.len() {
            let closed = self.columns[col].close_windows_for_file(file, &mut self.windows);
            for c in closed {
                self.history.retain(|id| *id != c.window);
                if self.bubble_pos.column == col && self.bubble_pos.row > c.row {
                    self.bubble_pos.row -= 1;
                }
                self.windows.remove(c.window);
                focus = Some(c.focus);
                count += 1;
            }
        }
        let hidden: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|w| w.shows_file(file))
            .map(EditWindow::id)
            .collect();
        for id in hidden {
            self.history.retain(|h| *h != id);
            self.windows.remove(id);
        }
        info!(target: "layout.column", closed = count, "file_windows_closed");
        match focus.filter(|f| self.windows.contains(*f)) {
            Some(f) => self.focus_window(f),
            None => self.ensure_focus(),
        }
        count
    }

    pub fn delete_from_history(&mut self, w: WindowId) {
        self.history.retain(|id| *id != w);
        self.ensure_focus();
        self.collect_orphans();
    }

    /// Move `w` just below `sibling`, in `sibling`'s column.
    pub fn move_window(&mut self, w: WindowId, sibling: WindowId) -> bool {
        if w == sibling || !self.windows.contains(w) {
            return false;
        }
        if self.get_edit_window_position(sibling).is_none() {
            return false;
        }
        self.detach_window(w);
        // Detaching may shift rows but never removes a column.
        let Some(dest) = self.get_edit_window_position(sibling) else {
            return false;
        };
        self.columns[dest.column].add_window(w, sibling);
        self.focus_window(w);
        true
    }

    /// Add a column holding `w` (or a new scratch window) and return the
    /// window placed in it. Focus is left to the caller.
    pub fn new_column(&mut self, w: Option<WindowId>) -> WindowId {
        let w = match w.filter(|id| self.windows.contains(*id)) {
            Some(id) => {
                if self.is_on_screen(id) {
                    self.detach_window(id);
                }
                id
            }
            None => self.windows.alloc_scratch(),
        };
        self.columns.push(Column::new(w));
        info!(target: "layout.column", window = w.0, columns = self.columns.len(), "column_added");
        w
    }

    /// Put `new` in `old`'s slot. Refused when `new` is already on screen.
    pub fn replace_window(&mut self, old: WindowId, new: WindowId) -> bool {
        if old == new || self.is_on_screen(new) {
            return false;
        }
        let Some(pos) = self.get_edit_window_position(old) else {
            return false;
        };
        self.columns[pos.column].replace_window(old, new);
        if let Some(w) = self.windows.get_mut(new) {
            w.grab_focus();
        }
        debug!(target: "layout.column", old = old.0, new = new.0, ?pos, "window_replaced");
        self.collect_orphans();
        true
    }

    /// Make `w` the most recent window and update the title. Scratch windows
    /// are dropped from the history so at most one logical scratch slot is
    /// ever tracked.
    pub fn set_front_edit_window(&mut self, w: WindowId) {
        let Some(desc) = self.windows.get(w).map(EditWindow::short_desc) else {
            return;
        };
        let windows = &self.windows;
        self.history.retain(|id| *id != w && !windows.is_scratch(*id));
        self.history.push_front(w);
        self.title = format!("{desc}{TITLE_SUFFIX}");
        self.collect_orphans();
    }

    /// Open a second view of a file window's file right below it. The
    /// original window keeps focus. Scratch windows do not split.
    pub fn split_window(&mut self, w: WindowId) -> Option<WindowId> {
        let pos = self.get_edit_window_position(w)?;
        let file = self.windows.get(w)?.backing_file()?.clone();
        let new = self.windows.alloc_file(file);
        self.columns[pos.column].add_window(new, w);
        if let Some(ew) = self.windows.get_mut(w) {
            ew.grab_focus();
        }
        self.set_front_edit_window(new);
        self.set_front_edit_window(w);
        info!(target: "layout.column", window = w.0, new = new.0, "window_split");
        Some(new)
    }

    fn focus_window(&mut self, w: WindowId) {
        if let Some(ew) = self.windows.get_mut(w) {
            ew.grab_focus();
        }
        self.set_front_edit_window(w);
    }

    fn ensure_focus(&mut self) {
        let front_ok = self
            .history
            .front()
            .is_some_and(|id| self.windows.contains(*id));
        if !front_ok {
            let first = self.columns[0].windows()[0];
            self.focus_window(first);
        }
    }

    fn collect_orphans(&mut self) {
        let orphans: Vec<WindowId> = self
            .windows
            .ids()
            .filter(|id| !self.history.contains(id) && !self.is_on_screen(*id))
            .collect();
        for id in orphans {
            self.windows.remove(id);
            debug!(target: "layout.column", window = id.0, "window_dropped");
        }
    }

    // ---------------------------------------------------------------------
    // Focused-window text and viewport
    // ---------------------------------------------------------------------

    fn with_buffer<R>(&self, id: WindowId, f: impl FnOnce(&Buffer) -> R) -> Option<R> {
        match self.windows.get(id)?.kind() {
            WindowKind::Scratch => Some(f(&self.scratch)),
            WindowKind::File(fv) => {
                let file = fv.file().borrow();
                file.buffer(fv.buffer_id()).map(f)
            }
        }
    }

    /// Text shown by `id`.
    pub fn window_text(&self, id: WindowId) -> Option<String> {
        self.with_buffer(id, Buffer::text)
    }

    fn line_count(&self, id: WindowId) -> usize {
        self.with_buffer(id, Buffer::line_count).unwrap_or(1)
    }

    fn cursor_offset(&self, id: WindowId) -> Option<usize> {
        let cursor = self.windows.get(id)?.cursor;
        self.with_buffer(id, |b| b.char_offset(cursor))
    }

    fn place_cursor(&mut self, id: WindowId, offset: usize) {
        let Some(pos) = self.with_buffer(id, |b| b.position_of(offset)) else {
            return;
        };
        self.set_cursor(id, pos);
    }

    fn set_cursor(&mut self, id: WindowId, pos: Position) {
        let metrics = self.metrics;
        if let Some(w) = self.windows.get_mut(id) {
            w.cursor = pos;
            if let Some(first) = compute_scroll_intent(
                w.viewport_first_line,
                pos.line,
                metrics.text_height,
                metrics.margin,
            ) {
                w.viewport_first_line = first;
            }
        }
    }

    /// Insert at the focused window's cursor. File edits reach every view.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let id = self.current_focus();
        let Some(offset) = self.cursor_offset(id) else {
            return false;
        };
        let inserted = match self.windows.get(id).map(EditWindow::kind) {
            Some(WindowKind::Scratch) => {
                self.scratch.insert(offset, text);
                true
            }
            Some(WindowKind::File(fv)) => {
                fv.file()
                    .borrow_mut()
                    .insert(fv.buffer_id(), offset, text)
            }
            None => false,
        };
        if inserted {
            self.place_cursor(id, offset + text.chars().count());
        }
        inserted
    }

    /// Erase the char before the focused window's cursor.
    pub fn delete_backward(&mut self) -> bool {
        let id = self.current_focus();
        let Some(offset) = self.cursor_offset(id).filter(|o| *o > 0) else {
            return false;
        };
        let range = offset - 1..offset;
        let erased = match self.windows.get(id).map(EditWindow::kind) {
            Some(WindowKind::Scratch) => {
                self.scratch.erase(range);
                true
            }
            Some(WindowKind::File(fv)) => fv.file().borrow_mut().erase(fv.buffer_id(), range),
            None => false,
        };
        if erased {
            self.place_cursor(id, offset - 1);
        }
        erased
    }

    pub fn move_cursor(&mut self, motion: CursorMotion) {
        let id = self.current_focus();
        let (Some(cursor), Some(offset)) = (
            self.windows.get(id).map(|w| w.cursor),
            self.cursor_offset(id),
        ) else {
            return;
        };
        let target = match motion {
            CursorMotion::Left => offset.saturating_sub(1),
            CursorMotion::Right => offset + 1,
            CursorMotion::Up | CursorMotion::Down => {
                let line = match motion {
                    CursorMotion::Up => cursor.line.saturating_sub(1),
                    _ => cursor.line + 1,
                };
                let Some(off) =
                    self.with_buffer(id, |b| b.char_offset(Position::new(line, cursor.col)))
                else {
                    return;
                };
                off
            }
        };
        self.place_cursor(id, target);
    }

    /// Jump to 1-based `line_num` (clamped) in the focused window.
    pub fn goto_line(&mut self, line_num: usize) {
        let id = self.current_focus();
        let last = self.line_count(id).saturating_sub(1);
        let line = line_num.saturating_sub(1).min(last);
        self.set_cursor(id, Position::new(line, 0));
        debug!(target: "layout.window", window = id.0, line, "goto_line");
    }

    /// Scroll so the cursor line sits at `target`.
    pub fn recenter(&mut self, target: RecenterTarget) {
        let id = self.current_focus();
        let h = self.metrics.text_height;
        if let Some(w) = self.windows.get_mut(id) {
            w.viewport_first_line = recenter_first_line(w.cursor.line, h, target);
        }
    }

    /// Page forward or back, remembering where the cursor came from.
    pub fn scroll_page(&mut self, forward: bool) {
        let id = self.current_focus();
        let origin = self.cursor_offset(id).unwrap_or(0);
        let lines = self.line_count(id);
        let h = self.metrics.text_height;
        if let Some(w) = self.windows.get_mut(id) {
            w.last_op = LastOp::LongMovement { origin };
            let (line, first) = page_target(w.viewport_first_line, h, lines, forward);
            w.cursor = Position::new(line, 0);
            w.viewport_first_line = first;
        }
    }
}
