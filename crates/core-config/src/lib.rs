//! Configuration loading and parsing.
//!
//! Parses `pillar.toml` (or an override path provided by the binary). Every
//! table is optional and unknown fields are ignored so older config files keep
//! loading. A missing or malformed file falls back to defaults; the editor
//! must always be able to start.
//!
//! ```toml
//! [files]
//! recent_capacity = 4
//! recents_path = "~/.pillar/recents"
//!
//! [view]
//! text_height = 40
//!
//! [scroll.margin]
//! vertical = 2
//!
//! [scratch]
//! greeting = "This is a scratch buffer.\n"
//! ```
//!
//! The vertical scroll margin is clamped at `(h - 2) / 2` where `h` is the
//! configured text height; see `Config::apply_text_height`.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_RECENT_CAPACITY: usize = 4;
pub const DEFAULT_TEXT_HEIGHT: u16 = 40;
pub const DEFAULT_SCRATCH_GREETING: &str = "This is a scratch buffer.\n";

#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    #[serde(default = "FilesConfig::default_recent_capacity")]
    pub recent_capacity: usize,
    /// Where the recent-files list is persisted. `~` expands to the home dir.
    #[serde(default)]
    pub recents_path: Option<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            recent_capacity: Self::default_recent_capacity(),
            recents_path: None,
        }
    }
}

impl FilesConfig {
    const fn default_recent_capacity() -> usize {
        DEFAULT_RECENT_CAPACITY
    }

    /// Resolved recents location; defaults to `~/.pillar/recents`.
    pub fn recents_file(&self) -> Option<PathBuf> {
        let home = dirs::home_dir();
        match self.recents_path.as_deref() {
            Some(p) => match (p.strip_prefix("~/"), home) {
                (Some(rest), Some(h)) => Some(h.join(rest)),
                (Some(_), None) => None,
                (None, _) => Some(PathBuf::from(p)),
            },
            None => home.map(|h| h.join(".pillar").join("recents")),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_text_height")]
    pub text_height: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            text_height: Self::default_text_height(),
        }
    }
}

impl ViewConfig {
    const fn default_text_height() -> u16 {
        DEFAULT_TEXT_HEIGHT
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MarginConfig {
    #[serde(default)]
    pub vertical: u16,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScrollConfig {
    #[serde(default)]
    pub margin: MarginConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScratchConfig {
    #[serde(default = "ScratchConfig::default_greeting")]
    pub greeting: String,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            greeting: Self::default_greeting(),
        }
    }
}

impl ScratchConfig {
    fn default_greeting() -> String {
        DEFAULT_SCRATCH_GREETING.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,            // original file string (optional)
    pub file: ConfigFile,               // parsed (or default) data
    pub effective_vertical_margin: u16, // clamped to text height
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("pillar.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("pillar").join("pillar.toml");
    }
    PathBuf::from("pillar.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::with_defaults());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
                effective_vertical_margin: 0,
            };
            cfg.apply_text_height();
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::with_defaults())
        }
    }
}

impl Config {
    /// Defaults with the derived fields computed.
    pub fn with_defaults() -> Self {
        let mut cfg = Config::default();
        cfg.apply_text_height();
        cfg
    }

    pub fn text_height(&self) -> usize {
        self.file.view.text_height as usize
    }

    /// Clamp the vertical margin against the configured text height.
    /// Returns the effective (possibly clamped) value.
    pub fn apply_text_height(&mut self) -> u16 {
        let raw = self.file.scroll.margin.vertical;
        let text_rows = self.file.view.text_height;
        let (clamped, max) = if text_rows <= 3 {
            (0, 0)
        } else {
            let max = (text_rows.saturating_sub(2)) / 2;
            (raw.min(max), max)
        };
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                text_rows,
                "scroll_margin_vertical_clamped"
            );
        }
        self.effective_vertical_margin = clamped;
        clamped
    }
}
