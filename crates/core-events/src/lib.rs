//! Core event types and channel helpers for Pillar.
//!
//! The editor is single threaded: one consumer (the event loop) owns all
//! layout state, and the only producer is the input thread, which forwards raw
//! console lines without interpreting them. The bounded channel gives natural
//! backpressure; the producer blocks rather than dropping input.

use std::fmt;
use std::sync::atomic::AtomicU64;
use thiserror::Error;

pub const EVENT_CHANNEL_CAP: usize = 1024;

// Relaxed counters; inspected by tests and logged at shutdown.
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static LINES_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A single key chord aimed at the focused edit window (or the chooser
    /// while it is open).
    Key(KeyEvent),
    /// A full line of minibuffer text, submitted as if Enter was pressed.
    Line(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// KeyCode enumerates normalized logical key representations consumed by higher layers.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub const fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    /// Parse Emacs-style chord notation: `C-x`, `M-x` (or `A-x`), `C-M-x`,
    /// named keys (`Down`, `Up`, `Left`, `Right`, `RET`, `ESC`, `TAB`, `DEL`)
    /// and bare characters. Upper-case letters imply SHIFT.
    pub fn parse(chord: &str) -> Result<Self, KeyParseError> {
        let mut mods = KeyModifiers::empty();
        let mut rest = chord;
        loop {
            if let Some(r) = rest.strip_prefix("C-") {
                mods |= KeyModifiers::CTRL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("M-").or_else(|| rest.strip_prefix("A-")) {
                mods |= KeyModifiers::ALT;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("S-") {
                mods |= KeyModifiers::SHIFT;
                rest = r;
            } else {
                break;
            }
        }
        let code = match rest {
            "" => return Err(KeyParseError::Empty(chord.to_string())),
            "Down" => KeyCode::Down,
            "Up" => KeyCode::Up,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "RET" | "Enter" => KeyCode::Enter,
            "ESC" | "Esc" => KeyCode::Esc,
            "TAB" | "Tab" => KeyCode::Tab,
            "DEL" | "Backspace" => KeyCode::Backspace,
            "SPC" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        if c.is_ascii_uppercase() {
                            mods |= KeyModifiers::SHIFT;
                        }
                        KeyCode::Char(c)
                    }
                    _ => return Err(KeyParseError::UnknownKey(other.to_string())),
                }
            }
        };
        Ok(Self { code, mods })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key chord: {0:?}")]
    Empty(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("M-")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}
