//! A loaded file shared by every window that shows it.
//!
//! Each window owns one buffer registered here. An edit made through one
//! buffer is replayed, by absolute char offset, into every sibling buffer.
//! Replaying goes back through [`File::edit`], so the `modifying` latch is what
//! stops a sibling's replay from being mirrored a second time.

use crate::FileError;
use core_text::Buffer;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// Shared ownership of a [`File`]; identity is `Rc::ptr_eq`.
pub type FileHandle = Rc<RefCell<File>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// One text change, expressed in char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { offset: usize, text: String },
    Erase { range: Range<usize> },
}

#[derive(Debug)]
struct Slot {
    id: BufferId,
    buffer: Buffer,
    // A detached slot keeps the text alive while no window shows the file.
    attached: bool,
}

#[derive(Debug)]
pub struct File {
    path: PathBuf,
    tilde_path: String,
    slots: Vec<Slot>,
    next_id: usize,
    modifying: bool,
    dirty: bool,
}

impl File {
    /// Read `path`. A missing file is a new, empty file; any other read error
    /// is returned and nothing is constructed.
    pub fn open(path: PathBuf, tilde_path: String) -> Result<Self, FileError> {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "files", path = %tilde_path, "new_file");
                String::new()
            }
            Err(source) => {
                return Err(FileError::Read {
                    path: tilde_path,
                    source,
                });
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| tilde_path.clone());
        Ok(Self {
            slots: vec![Slot {
                id: BufferId(0),
                buffer: Buffer::from_text(name, &content),
                attached: false,
            }],
            next_id: 1,
            path,
            tilde_path,
            modifying: false,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registry key, with the home directory collapsed to `~`.
    pub fn tilde_path(&self) -> &str {
        &self.tilde_path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True while an edit is being replayed into sibling buffers.
    pub fn is_modifying(&self) -> bool {
        self.modifying
    }

    /// Number of windows currently holding a buffer of this file.
    pub fn view_count(&self) -> usize {
        self.slots.iter().filter(|s| s.attached).count()
    }

    /// Register a buffer for a new view. The first view takes over the
    /// detached buffer; later views get a copy of the current text.
    pub fn new_buffer(&mut self) -> BufferId {
        if let Some(slot) = self.slots.iter_mut().find(|s| !s.attached) {
            slot.attached = true;
            return slot.id;
        }
        let id = BufferId(self.next_id);
        self.next_id += 1;
        let buffer = match self.slots.first() {
            Some(s) => s.buffer.clone(),
            None => Buffer::from_text(self.tilde_path.clone(), ""),
        };
        self.slots.push(Slot {
            id,
            buffer,
            attached: true,
        });
        debug!(target: "files", path = %self.tilde_path, buffer = id.0, "buffer_registered");
        id
    }

    /// Unregister a view's buffer. The last buffer is kept, detached, so
    /// unsaved edits survive until the file is deleted from the registry.
    pub fn release_buffer(&mut self, id: BufferId) {
        let Some(idx) = self.slots.iter().position(|s| s.id == id) else {
            return;
        };
        if self.slots.len() == 1 {
            self.slots[idx].attached = false;
        } else {
            self.slots.remove(idx);
        }
        debug!(target: "files", path = %self.tilde_path, buffer = id.0, "buffer_released");
    }

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.buffer)
    }

    pub fn buffer_ids(&self) -> Vec<BufferId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Text of the first buffer; every buffer holds the same text.
    pub fn text(&self) -> String {
        self.slots
            .first()
            .map(|s| s.buffer.text())
            .unwrap_or_default()
    }

    pub fn insert(&mut self, origin: BufferId, offset: usize, text: &str) -> bool {
        self.edit(
            origin,
            Edit::Insert {
                offset,
                text: text.to_string(),
            },
        )
    }

    pub fn erase(&mut self, origin: BufferId, range: Range<usize>) -> bool {
        self.edit(origin, Edit::Erase { range })
    }

    /// Apply `edit` to the `origin` buffer, then mirror it to the siblings.
    /// Returns false when `origin` is not registered.
    pub fn edit(&mut self, origin: BufferId, edit: Edit) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == origin) else {
            return false;
        };
        match &edit {
            Edit::Insert { offset, text } => {
                slot.buffer.insert(*offset, text);
            }
            Edit::Erase { range } => {
                slot.buffer.erase(range.clone());
            }
        }
        self.dirty = true;
        self.mirror(origin, &edit);
        true
    }

    fn mirror(&mut self, origin: BufferId, edit: &Edit) {
        if self.modifying {
            return;
        }
        self.modifying = true;
        let siblings: Vec<BufferId> = self
            .slots
            .iter()
            .map(|s| s.id)
            .filter(|id| *id != origin)
            .collect();
        for id in siblings {
            self.edit(id, edit.clone());
        }
        self.modifying = false;
    }

    /// Overwrite the file on disk with `text`.
    pub fn save(&mut self, text: &str) -> Result<(), FileError> {
        write_text(&self.path, &self.tilde_path, text)?;
        self.dirty = false;
        info!(target: "files", path = %self.tilde_path, "file_saved");
        Ok(())
    }

    /// Write `text` to another path; the file keeps its own identity.
    pub fn save_as(&self, path: &Path, text: &str) -> Result<(), FileError> {
        write_text(path, &path.display().to_string(), text)?;
        info!(target: "files", from = %self.tilde_path, to = %path.display(), "file_saved_as");
        Ok(())
    }
}

fn write_text(path: &Path, shown: &str, text: &str) -> Result<(), FileError> {
    fs::write(path, text.as_bytes()).map_err(|source| FileError::Write {
        path: shown.to_string(),
        source,
    })
}
