//! Directory chooser used by `choose` and `e <dir>`.
//!
//! `DirectoryChooser` is the headless model: it lists one directory, filters
//! the listing by an in-order subsequence pattern and tracks the selected
//! row. Front ends drive it through `handle_key`/`set_pattern` and present
//! it however they like; the dispatcher only sees the `ChooserDialog` seam,
//! a synchronous call that returns the command to run.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_files::FileError;
use core_files::path::{entilde, to_full_path};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
    /// A command string such as `e /home/me/notes.txt`.
    Chosen(String),
    Cancelled,
}

/// A modal file picker. Blocks until the user picks or cancels.
pub trait ChooserDialog {
    fn run(&mut self, start_dir: &Path, recent_files: &[String])
    -> Result<ChooserOutcome, FileError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Recent,
    Dot,
    File,
    Directory,
}

impl RowKind {
    pub fn label(self) -> &'static str {
        match self {
            RowKind::Recent => "recent",
            RowKind::Dot => "dot",
            RowKind::File => "file",
            RowKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserRow {
    pub kind: RowKind,
    pub name: String,
}

/// True when the chars of `pattern` appear in `name` in order.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let mut rest = name.chars();
    pattern.chars().all(|needle| rest.any(|c| c == needle))
}

#[derive(Debug, Default)]
struct Listing {
    dotfiles: Vec<String>,
    regulars: Vec<String>,
    directories: Vec<String>,
}

impl Listing {
    /// Directories get a trailing `/`; each group is sorted.
    fn read(dir: &Path) -> Result<Self, FileError> {
        let read_err = |source| FileError::Read {
            path: entilde(dir),
            source,
        };
        let mut listing = Listing::default();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let mut name = entry.file_name().to_string_lossy().into_owned();
            // Follow symlinks so a link to a directory browses like one.
            let is_dir = entry.path().is_dir();
            if is_dir {
                name.push('/');
            }
            if name.starts_with('.') {
                listing.dotfiles.push(name);
            } else if is_dir {
                listing.directories.push(name);
            } else {
                listing.regulars.push(name);
            }
        }
        listing.dotfiles.sort();
        listing.regulars.sort();
        listing.directories.sort();
        Ok(listing)
    }
}

pub struct DirectoryChooser {
    curdir: PathBuf,
    pattern: String,
    recent: Vec<String>,
    listing: Listing,
    rows: Vec<ChooserRow>,
    selected: Option<usize>,
}

impl DirectoryChooser {
    pub fn open(start_dir: &Path, recent_files: &[String]) -> Result<Self, FileError> {
        let listing = Listing::read(start_dir)?;
        let mut chooser = Self {
            curdir: start_dir.to_path_buf(),
            pattern: String::new(),
            recent: recent_files.to_vec(),
            listing,
            rows: Vec::new(),
            selected: None,
        };
        chooser.build_rows(false);
        Ok(chooser)
    }

    pub fn curdir(&self) -> &Path {
        &self.curdir
    }

    /// Window title: the current directory with `~` for home.
    pub fn title(&self) -> String {
        entilde(&self.curdir)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn rows(&self) -> &[ChooserRow] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&ChooserRow> {
        self.rows.get(self.selected?)
    }

    /// Replace the pattern and rebuild the rows. A pattern naming a
    /// directory (`~/`, `../`, `/`, or one that ends in `/` and matches
    /// exactly one directory) moves there and clears itself.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), FileError> {
        self.pattern = pattern.to_string();
        match self.dir_change(pattern) {
            Some(dir) if dir.is_dir() => {
                self.change_dir(dir)?;
                self.build_rows(true);
            }
            Some(_) => {}
            None => self.build_rows(false),
        }
        Ok(())
    }

    fn dir_change(&self, pattern: &str) -> Option<PathBuf> {
        match pattern {
            "~/" => dirs::home_dir(),
            "../" => Some(self.curdir.parent().unwrap_or(&self.curdir).to_path_buf()),
            "/" => Some(PathBuf::from("/")),
            p if p.ends_with('/') => {
                let dots = self
                    .listing
                    .dotfiles
                    .iter()
                    .filter(|_| p.starts_with('.'))
                    .filter(|d| d.ends_with('/'));
                let mut matches = dots
                    .chain(self.listing.directories.iter())
                    .filter(|d| matches_pattern(d, p));
                match (matches.next(), matches.next()) {
                    (Some(only), None) => Some(to_full_path(&self.curdir, only)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn change_dir(&mut self, dir: PathBuf) -> Result<(), FileError> {
        self.listing = Listing::read(&dir)?;
        debug!(target: "chooser", dir = %dir.display(), "chooser_chdir");
        self.curdir = dir;
        self.recent.clear();
        self.pattern.clear();
        Ok(())
    }

    /// Rows are recents, dot entries (only for patterns starting with `.`),
    /// files, then directories. Right after a directory change everything
    /// is listed.
    fn build_rows(&mut self, unfiltered: bool) {
        let pattern = self.pattern.as_str();
        let pick = |kind: RowKind, names: &[String]| -> Vec<ChooserRow> {
            names
                .iter()
                .filter(|n| unfiltered || matches_pattern(n, pattern))
                .map(|n| ChooserRow {
                    kind,
                    name: n.clone(),
                })
                .collect()
        };
        let mut rows = pick(RowKind::Recent, &self.recent);
        let num_recent = rows.len();
        if !unfiltered && pattern.starts_with('.') {
            rows.extend(pick(RowKind::Dot, &self.listing.dotfiles));
        }
        rows.extend(pick(RowKind::File, &self.listing.regulars));
        rows.extend(pick(RowKind::Directory, &self.listing.directories));
        // First row past the recents, or the last recent if that is all.
        self.selected = match rows.len() {
            0 => None,
            n if n == num_recent => Some(n - 1),
            _ => Some(num_recent),
        };
        self.rows = rows;
    }

    pub fn select_next(&mut self) {
        if let Some(sel) = self.selected {
            if sel + 1 < self.rows.len() {
                self.selected = Some(sel + 1);
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(sel) = self.selected {
            self.selected = Some(sel.saturating_sub(1));
        }
    }

    /// Enter. `None` means the chooser stays open (it descended into a
    /// directory).
    pub fn activate(&mut self) -> Result<Option<ChooserOutcome>, FileError> {
        if let Some(name) = self.pattern.strip_prefix("e ") {
            if !name.is_empty() {
                let full = to_full_path(&self.curdir, name);
                return Ok(Some(ChooserOutcome::Chosen(format!("e {}", full.display()))));
            }
        }
        let Some(row) = self.selected_row() else {
            return Ok(Some(ChooserOutcome::Cancelled));
        };
        let full = to_full_path(&self.curdir, &row.name);
        if row.name.ends_with('/') {
            self.change_dir(full)?;
            self.build_rows(false);
            return Ok(None);
        }
        Ok(Some(ChooserOutcome::Chosen(format!("e {}", full.display()))))
    }

    /// Feed one key. Returns the outcome once the dialog closes.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<Option<ChooserOutcome>, FileError> {
        let ctrl = key.mods == KeyModifiers::CTRL;
        match key.code {
            KeyCode::Char('g') if ctrl => return Ok(Some(ChooserOutcome::Cancelled)),
            KeyCode::Char('n') if ctrl => self.select_next(),
            KeyCode::Char('p') if ctrl => self.select_prev(),
            KeyCode::Down if key.mods.is_empty() => self.select_next(),
            KeyCode::Up if key.mods.is_empty() => self.select_prev(),
            KeyCode::Esc => return Ok(Some(ChooserOutcome::Cancelled)),
            KeyCode::Enter => return self.activate(),
            KeyCode::Backspace => {
                let mut pattern = self.pattern.clone();
                if pattern.pop().is_some() {
                    self.set_pattern(&pattern)?;
                }
            }
            KeyCode::Char(c) if !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                let mut pattern = self.pattern.clone();
                pattern.push(c);
                self.set_pattern(&pattern)?;
            }
            _ => {}
        }
        Ok(None)
    }
}
