//! Files shared between windows, the file registry and path helpers.

use std::io;
use thiserror::Error;

mod file;
mod manager;
pub mod path;

pub use file::{BufferId, Edit, File, FileHandle};
pub use manager::{DEFAULT_RECENT_CAPACITY, FileMgr};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}
