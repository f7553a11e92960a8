//! Edit windows and the arena that owns them.

use core_files::{BufferId, FileHandle, path::entilde};
use core_keymap::LastOp;
use core_text::Position;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Stable identifier for an `EditWindow`; never reused within a session.
pub struct WindowId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    #[default]
    Unshaded,
    Shaded,
}

/// Request passed to [`EditWindow::shade_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeOp {
    Query,
    Shade,
    Unshade,
    Toggle,
}

/// A window's registration with a shared file. Dropping it releases the buffer.
#[derive(Debug)]
pub struct FileView {
    file: FileHandle,
    buffer: BufferId,
}

impl FileView {
    pub fn open(file: FileHandle) -> Self {
        let buffer = file.borrow_mut().new_buffer();
        Self { file, buffer }
    }

    pub fn file(&self) -> &FileHandle {
        &self.file
    }

    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }
}

impl Drop for FileView {
    fn drop(&mut self) {
        match self.file.try_borrow_mut() {
            Ok(mut f) => f.release_buffer(self.buffer),
            Err(_) => {
                warn!(target: "layout.window", buffer = self.buffer.0, "buffer_release_while_borrowed")
            }
        }
    }
}

#[derive(Debug)]
pub enum WindowKind {
    /// Shows the process-wide scratch text owned by the window manager.
    Scratch,
    File(FileView),
}

#[derive(Debug)]
pub struct EditWindow {
    id: WindowId,
    kind: WindowKind,
    pub last_op: LastOp,
    shade: ShadeMode,
    pub cursor: Position,
    pub viewport_first_line: usize,
}

impl EditWindow {
    fn new(id: WindowId, kind: WindowKind) -> Self {
        Self {
            id,
            kind,
            last_op: LastOp::Plain,
            shade: ShadeMode::Unshaded,
            cursor: Position::origin(),
            viewport_first_line: 0,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn kind(&self) -> &WindowKind {
        &self.kind
    }

    pub fn is_scratch(&self) -> bool {
        matches!(self.kind, WindowKind::Scratch)
    }

    pub fn file_view(&self) -> Option<&FileView> {
        match &self.kind {
            WindowKind::File(fv) => Some(fv),
            WindowKind::Scratch => None,
        }
    }

    pub fn backing_file(&self) -> Option<&FileHandle> {
        self.file_view().map(FileView::file)
    }

    pub fn shows_file(&self, file: &FileHandle) -> bool {
        self.backing_file().is_some_and(|f| Rc::ptr_eq(f, file))
    }

    /// `name (dir)` for file windows, `*scratch*` otherwise.
    pub fn short_desc(&self) -> String {
        match &self.kind {
            WindowKind::Scratch => "*scratch*".to_string(),
            WindowKind::File(fv) => {
                let f = fv.file.borrow();
                let name = f
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let dir = f.path().parent().map(entilde).unwrap_or_default();
                format!("{name} ({dir})")
            }
        }
    }

    pub fn shade(&self) -> ShadeMode {
        self.shade
    }

    /// Apply `op` and return the resulting mode.
    pub fn shade_mode(&mut self, op: ShadeOp) -> ShadeMode {
        self.shade = match (op, self.shade) {
            (ShadeOp::Query, s) => s,
            (ShadeOp::Shade, _) => ShadeMode::Shaded,
            (ShadeOp::Unshade, _) => ShadeMode::Unshaded,
            (ShadeOp::Toggle, ShadeMode::Shaded) => ShadeMode::Unshaded,
            (ShadeOp::Toggle, ShadeMode::Unshaded) => ShadeMode::Shaded,
        };
        self.shade
    }

    /// Focus implies visible text.
    pub fn grab_focus(&mut self) {
        self.shade = ShadeMode::Unshaded;
    }
}

/// Owner of every live `EditWindow`.
#[derive(Debug, Default)]
pub struct WindowArena {
    windows: BTreeMap<WindowId, EditWindow>,
    next_id: usize,
}

impl WindowArena {
    fn alloc(&mut self, kind: WindowKind) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(id, EditWindow::new(id, kind));
        id
    }

    pub fn alloc_scratch(&mut self) -> WindowId {
        self.alloc(WindowKind::Scratch)
    }

    pub fn alloc_file(&mut self, file: FileHandle) -> WindowId {
        self.alloc(WindowKind::File(FileView::open(file)))
    }

    pub fn get(&self, id: WindowId) -> Option<&EditWindow> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut EditWindow> {
        self.windows.get_mut(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn remove(&mut self, id: WindowId) -> Option<EditWindow> {
        self.windows.remove(&id)
    }

    pub fn is_scratch(&self, id: WindowId) -> bool {
        self.get(id).is_some_and(EditWindow::is_scratch)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditWindow> {
        self.windows.values()
    }
}
