//! core-keymap: Emacs-style chord tables for edit windows.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the chord and the
//!   window's `LastOp`. The caller owns the `LastOp` (one per edit window) and
//!   passes it in mutably so multi-keystroke sequences (`C-x C-f`, repeated
//!   `C-l`, repeated `C-6`) survive between key presses.
//! - No side effects beyond `LastOp`: the translator emits a `KeyOutcome`
//!   which the dispatcher layer turns into a command string or a view change.
//! - Logging only at DEBUG/TRACE.
//!
//! Table selection mirrors the modifier state of the chord:
//! * exactly CTRL: the Ctrl table, or the Ctrl-X Ctrl table after a `C-x` prefix;
//! * exactly ALT: the Meta table;
//! * anything else: the Ctrl-X table after a `C-x` prefix, otherwise the key
//!   falls through to default handling (self insert, cursor keys).

use core_events::{KeyCode, KeyEvent, KeyModifiers, KeyParseError};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, trace};

// -------------------------------------------------------------------------------------------------
// LastOp: per-window memory of the previous keystroke operation
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastOp {
    #[default]
    Plain,
    /// Consecutive bubble invocations so far (never 0; 0 is `Plain`).
    Bubble(u32),
    CtrlX,
    /// Page scroll; `origin` is the cursor char offset before the jump.
    LongMovement { origin: usize },
    Recenter(RecenterTarget),
}

impl LastOp {
    pub fn bubble_number(&self) -> u32 {
        match self {
            LastOp::Bubble(n) => *n,
            _ => 0,
        }
    }

    pub fn set_bubble_number(&mut self, n: u32) {
        *self = if n == 0 {
            LastOp::Plain
        } else {
            LastOp::Bubble(n)
        };
    }

    pub fn reset(&mut self) {
        *self = LastOp::Plain;
    }
}

/// Where `C-l` puts the cursor line. Successive presses cycle middle → top → bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecenterTarget {
    Middle,
    Top,
    Bottom,
}

// -------------------------------------------------------------------------------------------------
// Bindings and outcomes
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Execute a minibuffer command string.
    Command(&'static str),
    /// Bubble is a command too, but must not reset the bubble counter.
    Bubble,
    CtrlXPrefix,
    FocusMinibuffer,
    Recenter,
    ScrollPageDown,
    ScrollPageUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Command(&'static str),
    FocusMinibuffer,
    Recenter(RecenterTarget),
    ScrollPage { forward: bool },
    /// Prefix consumed; waiting for the next chord.
    Pending,
    /// Not a binding: default handling (self insert, cursor movement).
    Unhandled,
    /// A chord inside a keymap that has no binding.
    Invalid,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    ctrl: HashMap<char, Binding>,
    ctrl_x: HashMap<char, Binding>,
    ctrl_x_ctrl: HashMap<char, Binding>,
    meta: HashMap<char, Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::emacs()
    }
}

impl Keymap {
    /// Baseline bindings.
    pub fn emacs() -> Self {
        let ctrl = HashMap::from([
            ('0', Binding::Command("close")),
            ('2', Binding::Command("split")),
            ('6', Binding::Bubble),
            ('l', Binding::Recenter),
            ('v', Binding::ScrollPageDown),
            ('x', Binding::CtrlXPrefix),
            ('z', Binding::ScrollPageUp),
        ]);
        let ctrl_x = HashMap::from([
            ('b', Binding::Command("files")),
            ('k', Binding::Command("bd")),
        ]);
        let ctrl_x_ctrl = HashMap::from([
            ('c', Binding::Command("q")),
            ('f', Binding::Command("choose")),
        ]);
        let meta = HashMap::from([('x', Binding::FocusMinibuffer)]);
        Self {
            ctrl,
            ctrl_x,
            ctrl_x_ctrl,
            meta,
        }
    }

    /// Translate one chord, updating `last_op` for multi-keystroke sequences.
    pub fn translate(&self, last_op: &mut LastOp, key: &KeyEvent) -> KeyOutcome {
        let after_prefix = *last_op == LastOp::CtrlX;
        let table = if key.mods == KeyModifiers::CTRL {
            if after_prefix {
                &self.ctrl_x_ctrl
            } else {
                &self.ctrl
            }
        } else if key.mods == KeyModifiers::ALT {
            &self.meta
        } else if after_prefix {
            &self.ctrl_x
        } else {
            trace!(target: "input.keymap", key = %key, "self_insert");
            last_op.reset();
            return KeyOutcome::Unhandled;
        };

        let binding = match key.code {
            KeyCode::Char(c) => table.get(&c.to_ascii_lowercase()).copied(),
            _ => None,
        };
        let Some(binding) = binding else {
            debug!(target: "input.keymap", key = %key, after_prefix, "invalid_keybind");
            last_op.reset();
            return KeyOutcome::Invalid;
        };
        debug!(target: "input.keymap", key = %key, ?binding, "binding_resolved");
        self.apply(binding, last_op)
    }

    fn apply(&self, binding: Binding, last_op: &mut LastOp) -> KeyOutcome {
        match binding {
            Binding::Command(cmd) => {
                last_op.reset();
                KeyOutcome::Command(cmd)
            }
            // The window manager owns the bubble counter.
            Binding::Bubble => KeyOutcome::Command("bubble"),
            Binding::CtrlXPrefix => {
                *last_op = LastOp::CtrlX;
                KeyOutcome::Pending
            }
            Binding::FocusMinibuffer => {
                last_op.reset();
                KeyOutcome::FocusMinibuffer
            }
            Binding::Recenter => {
                let target = match *last_op {
                    LastOp::Recenter(RecenterTarget::Middle) => RecenterTarget::Top,
                    LastOp::Recenter(RecenterTarget::Top) => RecenterTarget::Bottom,
                    _ => RecenterTarget::Middle,
                };
                // The third press goes to the bottom and ends the cycle.
                *last_op = match target {
                    RecenterTarget::Bottom => LastOp::Plain,
                    t => LastOp::Recenter(t),
                };
                KeyOutcome::Recenter(target)
            }
            // Caller records LongMovement with the cursor origin.
            Binding::ScrollPageDown => KeyOutcome::ScrollPage { forward: true },
            Binding::ScrollPageUp => KeyOutcome::ScrollPage { forward: false },
        }
    }
}

/// Parse a whitespace separated chord sequence such as `"C-x C-f"`.
pub fn parse_sequence(seq: &str) -> Result<SmallVec<[KeyEvent; 4]>, KeyParseError> {
    seq.split_whitespace().map(KeyEvent::parse).collect()
}
