//! The registry of loaded files and the most-recently-used list.

use crate::path::{entilde, to_full_path};
use crate::{File, FileError, FileHandle};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

pub const DEFAULT_RECENT_CAPACITY: usize = 4;

#[derive(Debug)]
pub struct FileMgr {
    files: BTreeMap<String, FileHandle>,
    /// Oldest first; tilde paths.
    recents: Vec<String>,
    recent_capacity: usize,
    recents_path: Option<PathBuf>,
    base_dir: PathBuf,
    message: Option<String>,
}

impl Default for FileMgr {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY, None)
    }
}

impl FileMgr {
    pub fn new(recent_capacity: usize, recents_path: Option<PathBuf>) -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            files: BTreeMap::new(),
            recents: Vec::new(),
            recent_capacity: recent_capacity.max(1),
            recents_path,
            base_dir,
            message: None,
        }
    }

    /// Directory relative paths resolve against (the working directory by default).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Return the file for `path`, loading and registering it if needed.
    ///
    /// Every request moves `path` to the newest end of the recents list. A
    /// read failure leaves the file unregistered; unless `suppress_error_msg`
    /// is set its message is queued for the minibuffer.
    pub fn get_file(
        &mut self,
        path: &str,
        suppress_error_msg: bool,
    ) -> Result<FileHandle, FileError> {
        let full = to_full_path(&self.base_dir, path);
        let tilde = entilde(&full);

        self.recents.retain(|p| *p != tilde);
        while self.recents.len() >= self.recent_capacity {
            self.recents.remove(0);
        }

        if let Some(existing) = self.files.get(&tilde) {
            self.recents.push(tilde);
            return Ok(existing.clone());
        }

        match File::open(full, tilde.clone()) {
            Ok(file) => {
                let handle = Rc::new(RefCell::new(file));
                self.files.insert(tilde.clone(), handle.clone());
                info!(target: "files", path = %tilde, "file_loaded");
                self.recents.push(tilde);
                Ok(handle)
            }
            Err(e) => {
                warn!(target: "files", path = %tilde, error = %e, suppressed = suppress_error_msg, "file_load_failed");
                if !suppress_error_msg {
                    self.message = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Registered file for `path`, without loading anything.
    pub fn lookup(&self, path: &str) -> Option<FileHandle> {
        let tilde = entilde(&to_full_path(&self.base_dir, path));
        self.files.get(&tilde).cloned()
    }

    pub fn delete_file(&mut self, file: &FileHandle) -> bool {
        let key = self
            .files
            .iter()
            .find(|(_, f)| Rc::ptr_eq(f, file))
            .map(|(k, _)| k.clone());
        match key {
            Some(k) => {
                self.files.remove(&k);
                info!(target: "files", path = %k, "file_deleted");
                true
            }
            None => false,
        }
    }

    /// Sorted tilde paths of every loaded file.
    pub fn file_names(&self) -> Vec<String> {
        // BTreeMap keys iterate in order.
        self.files.keys().cloned().collect()
    }

    /// Oldest first.
    pub fn recent_files(&self) -> &[String] {
        &self.recents
    }

    /// Pending error text for the minibuffer, if any.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    /// Read the newline separated recents list. A missing file is not an error.
    pub fn load_recents(&mut self) -> Result<(), FileError> {
        let Some(path) = self.recents_path.clone() else {
            return Ok(());
        };
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(FileError::Read {
                    path: entilde(&path),
                    source,
                });
            }
        };
        self.recents = content.split_whitespace().map(str::to_string).collect();
        if self.recents.len() > self.recent_capacity {
            let excess = self.recents.len() - self.recent_capacity;
            self.recents.drain(..excess);
        }
        debug!(target: "files", count = self.recents.len(), "recents_loaded");
        Ok(())
    }

    pub fn save_recents(&self) -> Result<(), FileError> {
        let Some(path) = self.recents_path.as_ref() else {
            return Ok(());
        };
        let write_err = |source| FileError::Write {
            path: entilde(path),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut out = String::new();
        for p in &self.recents {
            out.push_str(p);
            out.push('\n');
        }
        fs::write(path, out).map_err(write_err)?;
        debug!(target: "files", count = self.recents.len(), "recents_saved");
        Ok(())
    }
}
