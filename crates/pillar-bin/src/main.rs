//! Pillar entrypoint.
//!
//! A line-oriented console front end: stdin lines are minibuffer commands
//! (or `key <chords>`), and the layout is printed after every event.
use anyhow::Result;
use clap::Parser;
use core_actions::Editor;
use core_events::{
    CHANNEL_SEND_FAILURES, EVENT_CHANNEL_CAP, Event, InputEvent, KEYPRESS_TOTAL, LINES_TOTAL,
};
use crossbeam_channel::Receiver;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use tracing::{info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod console;
mod input;

use console::{ConsoleChooser, render};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "pillar", version, about = "Pillar column-tiling editor")]
struct Args {
    /// Files to load at startup; the first one is shown.
    pub paths: Vec<String>,
    /// Optional configuration file path (overrides discovery of `pillar.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn run(&mut self, args: &Args, rx: Receiver<Event>) -> Result<Editor> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let config = core_config::load_from(args.config.clone())?;
        let chooser = ConsoleChooser::new(rx, io::stdout());
        let mut editor = Editor::from_config(&config, Box::new(chooser));
        let opened = editor.preload(&args.paths);
        info!(
            target: "runtime.startup",
            paths = args.paths.len(),
            open_failed = opened.as_ref().is_some_and(|s| !s.is_success()),
            config_override = args.config.is_some(),
            effective_margin = config.effective_vertical_margin,
            text_height = config.text_height(),
            "bootstrap_complete"
        );
        Ok(editor)
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("pillar.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "pillar.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CommandQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

struct EditorRuntime<W: Write> {
    editor: Editor,
    rx: Receiver<Event>,
    out: W,
}

impl<W: Write> EditorRuntime<W> {
    fn new(editor: Editor, rx: Receiver<Event>, out: W) -> Self {
        Self { editor, rx, out }
    }

    fn run(&mut self) -> ShutdownReason {
        self.draw();
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Ok(event) = self.rx.recv() {
            match self.handle_event(&event) {
                LoopControl::Continue => self.draw(),
                LoopControl::Break { reason: r } => {
                    reason = r;
                    break;
                }
            }
        }
        self.finalize_shutdown(reason);
        reason
    }

    fn handle_event(&mut self, event: &Event) -> LoopControl {
        trace!(target: "runtime", ?event, "event");
        match event {
            Event::Input(InputEvent::Key(key)) => {
                self.editor.handle_key(key);
            }
            Event::Input(InputEvent::Line(line)) => {
                self.editor.submit_line(line);
            }
            Event::Shutdown => {
                return LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                };
            }
        }
        if self.editor.quit_requested() {
            return LoopControl::Break {
                reason: ShutdownReason::CommandQuit,
            };
        }
        LoopControl::Continue
    }

    fn draw(&mut self) {
        if let Err(e) = render(&self.editor, &mut self.out) {
            warn!(target: "runtime", error = %e, "render_failed");
        }
    }

    fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        // `q` already saved the recents list.
        if reason != ShutdownReason::CommandQuit {
            if let Err(e) = self.editor.files.save_recents() {
                warn!(target: "runtime.shutdown", error = %e, "recents_save_failed");
            }
        }
        info!(
            target: "runtime.shutdown",
            keypresses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
            lines = LINES_TOTAL.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            "input_totals"
        );
        log_shutdown_stage(reason, "complete");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (tx, rx) = crossbeam_channel::bounded::<Event>(EVENT_CHANNEL_CAP);
    let mut startup = AppStartup::new();
    let editor = startup.run(&args, rx.clone())?;
    let _input = input::spawn_stdin_reader(tx)?;

    let mut runtime = EditorRuntime::new(editor, rx, io::stdout());
    let reason = runtime.run();
    info!(target: "runtime", %reason, "exit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_actions::{ChooserDialog, ChooserOutcome};
    use core_files::{FileError, FileMgr};
    use core_model::WindowMgr;

    struct NoChooser;

    impl ChooserDialog for NoChooser {
        fn run(&mut self, _: &Path, _: &[String]) -> Result<ChooserOutcome, FileError> {
            Ok(ChooserOutcome::Cancelled)
        }
    }

    fn runtime(dir: &Path, rx: Receiver<Event>) -> EditorRuntime<Vec<u8>> {
        let files = FileMgr::new(4, Some(dir.join("recents"))).with_base_dir(dir);
        let editor = Editor::new(WindowMgr::new(""), files, Box::new(NoChooser));
        EditorRuntime::new(editor, rx, Vec::new())
    }

    fn line(s: &str) -> Event {
        Event::Input(InputEvent::Line(s.to_string()))
    }

    #[test]
    fn shutdown_reason_labels_are_stable() {
        assert_eq!(ShutdownReason::CommandQuit.as_str(), "command_quit");
        assert_eq!(ShutdownReason::ShutdownEvent.as_str(), "shutdown_event");
        assert_eq!(ShutdownReason::ChannelClosed.as_str(), "channel_closed");
    }

    #[test]
    fn quit_command_ends_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::bounded(8);
        tx.send(line("e a.txt")).unwrap();
        tx.send(line("q")).unwrap();
        tx.send(line("newcol")).unwrap();
        let mut rt = runtime(dir.path(), rx);
        assert_eq!(rt.run(), ShutdownReason::CommandQuit);
        assert_eq!(rt.editor.windows.num_columns(), 1);
        assert!(dir.path().join("recents").exists());
    }

    #[test]
    fn end_of_input_saves_recents() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::bounded(8);
        tx.send(line("e a.txt")).unwrap();
        tx.send(Event::Shutdown).unwrap();
        let mut rt = runtime(dir.path(), rx);
        assert_eq!(rt.run(), ShutdownReason::ShutdownEvent);
        let saved = std::fs::read_to_string(dir.path().join("recents")).unwrap();
        assert!(saved.trim_end().ends_with("a.txt"));
    }

    #[test]
    fn hangup_is_channel_closed() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::bounded(8);
        tx.send(Event::Input(InputEvent::Key(core_events::KeyEvent::ctrl('q'))))
            .unwrap();
        drop(tx);
        let mut rt = runtime(dir.path(), rx);
        assert_eq!(rt.run(), ShutdownReason::ChannelClosed);
        let shown = String::from_utf8(rt.out.clone()).unwrap();
        assert!(shown.contains("-- invalid keybind"));
    }
}
