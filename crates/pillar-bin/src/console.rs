//! Plain-text presentation of the layout and the console chooser.

use core_actions::{ChooserDialog, ChooserOutcome, DirectoryChooser, Editor};
use core_events::{Event, InputEvent};
use core_files::FileError;
use core_model::ShadeMode;
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Title, one line per column (focused window starred), cursor and the
/// minibuffer.
pub fn render<W: Write>(editor: &Editor, out: &mut W) -> io::Result<()> {
    let wm = &editor.windows;
    let focus = wm.current_focus();
    writeln!(out, "== {} ==", wm.title())?;
    for (idx, col) in wm.columns().iter().enumerate() {
        let cells: Vec<String> = col
            .windows()
            .iter()
            .filter_map(|id| wm.window(*id))
            .map(|w| {
                let mark = if w.id() == focus { "*" } else { "" };
                let shade = match w.shade() {
                    ShadeMode::Shaded => " (shaded)",
                    ShadeMode::Unshaded => "",
                };
                format!("{mark}{}{shade}", w.short_desc())
            })
            .collect();
        writeln!(out, "[{idx}] {}", cells.join(" | "))?;
    }
    if let Some(w) = wm.window(focus) {
        writeln!(out, "line {}, col {}", w.cursor.line + 1, w.cursor.col)?;
    }
    let mb = wm.minibuffer();
    if mb.is_focused() {
        writeln!(out, "M-x {}", mb.text())?;
    } else if !mb.placeholder().is_empty() {
        writeln!(out, "-- {}", mb.placeholder())?;
    }
    out.flush()
}

fn render_chooser<W: Write>(chooser: &DirectoryChooser, out: &mut W) -> io::Result<()> {
    writeln!(out, "== choose: {} ==", chooser.title())?;
    writeln!(out, "pattern: {}", chooser.pattern())?;
    for (idx, row) in chooser.rows().iter().enumerate() {
        let mark = if chooser.selected() == Some(idx) { ">" } else { " " };
        writeln!(out, "{mark} {:<9} {}", row.kind.label(), row.name)?;
    }
    out.flush()
}

/// Chooser driven by the same event channel as the editor. A line sets the
/// pattern, an empty line activates the selection, key chords go straight to
/// the model.
pub struct ConsoleChooser<W: Write> {
    rx: Receiver<Event>,
    out: W,
}

impl<W: Write> ConsoleChooser<W> {
    pub fn new(rx: Receiver<Event>, out: W) -> Self {
        Self { rx, out }
    }

    fn show(&mut self, chooser: &DirectoryChooser) {
        if let Err(e) = render_chooser(chooser, &mut self.out) {
            warn!(target: "runtime", error = %e, "chooser_render_failed");
        }
    }
}

impl<W: Write> ChooserDialog for ConsoleChooser<W> {
    fn run(
        &mut self,
        start_dir: &Path,
        recent_files: &[String],
    ) -> Result<ChooserOutcome, FileError> {
        let mut chooser = DirectoryChooser::open(start_dir, recent_files)?;
        self.show(&chooser);
        while let Ok(event) = self.rx.recv() {
            let step = match event {
                Event::Input(InputEvent::Key(key)) => chooser.handle_key(&key)?,
                Event::Input(InputEvent::Line(line)) if line.is_empty() => chooser.activate()?,
                Event::Input(InputEvent::Line(line)) => {
                    chooser.set_pattern(&line)?;
                    None
                }
                Event::Shutdown => Some(ChooserOutcome::Cancelled),
            };
            if let Some(outcome) = step {
                debug!(target: "runtime", ?outcome, "chooser_closed");
                return Ok(outcome);
            }
            self.show(&chooser);
        }
        Ok(ChooserOutcome::Cancelled)
    }
}
