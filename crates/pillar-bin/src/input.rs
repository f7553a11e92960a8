//! Blocking stdin reader feeding the event channel.
//!
//! Each console line becomes either one minibuffer submission or, when it
//! starts with `key `, a sequence of key chords (`key C-x C-f`). The reader
//! never touches editor state. End of input sends `Event::Shutdown`.

use core_events::{
    CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL, KeyParseError, LINES_TOTAL,
};
use core_keymap::parse_sequence;
use crossbeam_channel::Sender;
use std::io::{self, BufRead};
use std::sync::atomic::Ordering;
use std::thread;
use tracing::{debug, trace, warn};

const KEY_PREFIX: &str = "key ";

/// Turn one console line into input events.
pub fn classify_line(line: &str) -> Result<Vec<InputEvent>, KeyParseError> {
    match line.strip_prefix(KEY_PREFIX) {
        Some(seq) => Ok(parse_sequence(seq)?.into_iter().map(InputEvent::Key).collect()),
        None => Ok(vec![InputEvent::Line(line.to_string())]),
    }
}

/// Forward every line of `reader`. Returns false once the receiver is gone.
pub fn pump<R: BufRead>(reader: R, tx: &Sender<Event>) -> bool {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(target: "input", error = %e, "stdin_read_failed");
                break;
            }
        };
        let events = match classify_line(&line) {
            Ok(events) => events,
            Err(e) => {
                warn!(target: "input", error = %e, "key_sequence_invalid");
                continue;
            }
        };
        for ev in events {
            match &ev {
                InputEvent::Key(_) => KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed),
                InputEvent::Line(_) => LINES_TOTAL.fetch_add(1, Ordering::Relaxed),
            };
            trace!(target: "input", event = ?ev, "input_event");
            if tx.send(Event::Input(ev)).is_err() {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        }
    }
    if tx.send(Event::Shutdown).is_err() {
        CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
        return false;
    }
    true
}

pub fn spawn_stdin_reader(tx: Sender<Event>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("pillar-input".into())
        .spawn(move || {
            let stdin = io::stdin();
            let delivered = pump(stdin.lock(), &tx);
            debug!(target: "input", delivered, "stdin_reader_exit");
        })
}
