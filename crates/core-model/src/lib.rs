//! Window layout model: edit windows, columns and the window manager.
//!
//! The screen is a row of columns, each a vertical stack of edit windows. A
//! window shows either the shared scratch text or one file; several windows
//! may show the same file, each through its own buffer (see `core-files`).
//!
//! All windows live in a `WindowArena` owned by the `WindowMgr` and are
//! referred to by `WindowId` everywhere else: columns, the focus history and
//! `WindowPos` lookups. Positions are advisory and go stale on the next
//! layout change; ids stay valid until the window is dropped.
//!
//! The focus history drives `bubble`, the recency walk that swaps windows
//! in and out of one screen slot. See `layout.rs` for its invariants.

mod column;
mod layout;
mod minibuffer;
pub mod scroll;
mod window;

pub use column::{Closed, Column};
pub use layout::{
    CursorMotion, DEFAULT_TEXT_HEIGHT, TITLE_SUFFIX, ViewMetrics, WindowMgr, WindowPos,
};
pub use minibuffer::Minibuffer;
pub use window::{EditWindow, FileView, ShadeMode, ShadeOp, WindowArena, WindowId, WindowKind};
