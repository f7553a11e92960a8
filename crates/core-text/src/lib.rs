//! Rope-based text buffer abstraction.
//!
//! Every view of a file owns one `Buffer`; sibling buffers are kept identical
//! by the mirroring logic in `core-files`, which replays edits using absolute
//! char offsets. All mutators here therefore speak char offsets and clamp out
//! of range input instead of panicking.

use ropey::Rope;
use std::ops::Range;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

/// A position inside a buffer expressed as (line index, char offset within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("len_chars", &self.rope.len_chars())
            .field("lines", &self.rope.len_lines())
            .finish()
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_text(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Whole buffer contents.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Absolute char offset of a position (line clamped to the last line, column
    /// clamped to the line length excluding its newline).
    pub fn char_offset(&self, pos: Position) -> usize {
        let last = self.rope.len_lines().saturating_sub(1);
        let line = pos.line.min(last);
        let start = self.rope.line_to_char(line);
        let line_slice = self.rope.line(line);
        let mut len = line_slice.len_chars();
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len -= 1;
        }
        start + pos.col.min(len)
    }

    /// Inverse of `char_offset` (offset clamped to the buffer length).
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Insert `text` at char `offset` (clamped). Returns the offset actually used.
    pub fn insert(&mut self, offset: usize, text: &str) -> usize {
        let at = offset.min(self.rope.len_chars());
        self.rope.insert(at, text);
        at
    }

    /// Remove the chars in `range` (clamped). Returns the removed text.
    pub fn erase(&mut self, range: Range<usize>) -> String {
        let total = self.rope.len_chars();
        let start = range.start.min(total);
        let end = range.end.min(total);
        if start >= end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        removed
    }

    /// Append to the end of the buffer.
    pub fn append(&mut self, text: &str) {
        let end = self.rope.len_chars();
        self.rope.insert(end, text);
    }

    /// Replace the entire contents.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_text("test", "hello\nworld");
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
        assert!(b.line(2).is_none());
    }

    #[test]
    fn insert_and_erase_clamp() {
        let mut b = Buffer::from_text("t", "abc");
        assert_eq!(b.insert(99, "!"), 3);
        assert_eq!(b.text(), "abc!");
        assert_eq!(b.erase(1..2), "b");
        assert_eq!(b.erase(2..50), "!");
        assert_eq!(b.text(), "ac");
        assert_eq!(b.erase(5..9), "");
    }

    #[test]
    fn char_offset_and_back() {
        let b = Buffer::from_text("t", "héllo\nwörld\n");
        let p = Position::new(1, 2);
        let off = b.char_offset(p);
        assert_eq!(off, 8);
        assert_eq!(b.position_of(off), p);
        // column past the end of line clamps before the newline
        assert_eq!(b.char_offset(Position::new(0, 40)), 5);
        // line past the end clamps to the last (empty) line
        assert_eq!(b.char_offset(Position::new(9, 0)), 12);
    }

    #[test]
    fn append_and_set_text() {
        let mut b = Buffer::from_text("s", "");
        assert!(b.is_empty());
        b.append("one\n");
        b.append("two\n");
        assert_eq!(b.line_count(), 3);
        b.set_text("x");
        assert_eq!(b.text(), "x");
        assert_eq!(b.len_chars(), 1);
    }
}
