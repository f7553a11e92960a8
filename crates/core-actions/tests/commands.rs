mod common;

use common::Fixture;
use core_actions::{ChooserOutcome, CommandStatusCode};
use core_model::{ShadeMode, TITLE_SUFFIX};
use pretty_assertions::assert_eq;

fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("{i}\n")).collect()
}

#[test]
fn bare_number_with_spaces_goes_to_line() {
    let mut fx = Fixture::new();
    fx.write("a.txt", &numbered_lines(50));
    fx.ok("e a.txt");
    let status = fx.run("  42   ");
    assert_eq!(status.code, CommandStatusCode::Success);
    let cursor = fx.editor.windows.window(fx.focus()).unwrap().cursor;
    assert_eq!(cursor.line, 41);
    assert_eq!(cursor.col, 0);
}

#[test]
fn goto_past_the_end_clamps() {
    let mut fx = Fixture::new();
    fx.write("a.txt", "one\ntwo");
    fx.ok("e a.txt");
    fx.ok("999");
    let cursor = fx.editor.windows.window(fx.focus()).unwrap().cursor;
    assert_eq!(cursor.line, 1);
}

#[test]
fn empty_and_unknown_commands() {
    let mut fx = Fixture::new();
    let status = fx.run("   ");
    assert_eq!(status.code, CommandStatusCode::EmptyCommand);
    assert_eq!(status.message, "");

    let status = fx.run("frob the thing");
    assert_eq!(status.code, CommandStatusCode::CommandNotFound);
    assert_eq!(status.message, "command not found: frob");
}

#[test]
fn newcol_adds_a_focused_scratch_column() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.ok("newcol");
    assert_eq!(fx.editor.windows.num_columns(), 2);
    let s = fx.focus();
    assert!(fx.editor.windows.windows().is_scratch(s));
    assert_eq!(fx.screen()[1], vec![s]);
    assert_eq!(fx.editor.windows.title(), format!("*scratch*{TITLE_SUFFIX}"));
}

#[test]
fn edit_resolves_against_the_focused_file() {
    let mut fx = Fixture::new();
    fx.write("sub/x.txt", "x\n");
    fx.write("sub/y.txt", "y\n");
    fx.ok("e sub/x.txt");
    fx.ok("e y.txt");
    assert!(fx.editor.windows.title().starts_with("y.txt ("));
    assert_eq!(fx.front_text(), "y\n");
    assert!(fx.file("sub/y.txt").is_some());
    assert!(fx.file("y.txt").is_none());
}

#[test]
fn edit_creates_missing_files_empty() {
    let mut fx = Fixture::new();
    fx.ok("e new.txt");
    assert_eq!(fx.front_text(), "");
    assert!(!fx.path("new.txt").exists());
}

#[test]
fn edit_reports_unreadable_files() {
    let mut fx = Fixture::new();
    fx.write("a.txt", "plain file\n");
    let before = fx.screen();
    let status = fx.run("e a.txt/b");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert!(status.message.contains("a.txt/b"), "{}", status.message);
    assert_eq!(fx.screen(), before);
    assert!(fx.file("a.txt/b").is_none());
}

#[test]
fn edit_on_a_directory_runs_the_chooser_there() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("z.txt");
    std::fs::write(&target, "zed\n").unwrap();
    let mut fx = Fixture::with_outcomes(vec![ChooserOutcome::Chosen(format!(
        "e {}",
        target.display()
    ))]);
    fx.ok(&format!("e {}", dir.path().display()));
    let calls = fx.chooser_calls.borrow().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, dir.path());
    assert_eq!(fx.front_text(), "zed\n");
}

#[test]
fn choose_starts_in_the_working_directory() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    let status = fx.run("choose");
    assert_eq!(status.code, CommandStatusCode::Success);
    let calls = fx.chooser_calls.borrow().clone();
    assert_eq!(calls[0].0, fx.dir.path());
    // recents are handed to the dialog
    assert_eq!(calls[0].1.len(), 1);
    assert!(calls[0].1[0].ends_with("a.txt"));
}

#[test]
fn choose_rejects_missing_directories() {
    let mut fx = Fixture::new();
    let status = fx.run("choose nowhere");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert!(status.message.ends_with("nowhere: no such directory"));
    assert!(fx.chooser_calls.borrow().is_empty());
}

#[test]
fn close_sole_scratch_is_an_error() {
    let mut fx = Fixture::new();
    let status = fx.run("close");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert_eq!(status.message, "cannot close the only window in the column");
    assert_eq!(fx.screen().len(), 1);
}

#[test]
fn close_last_file_window_leaves_scratch() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.ok("close");
    let screen = fx.screen();
    assert_eq!(screen[0].len(), 1);
    assert!(fx.editor.windows.windows().is_scratch(screen[0][0]));
}

#[test]
fn bd_needs_a_file() {
    let mut fx = Fixture::new();
    let status = fx.run("bd");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert_eq!(status.message, "file to delete not specified");
}

#[test]
fn bd_closes_every_view_and_unregisters() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.ok("split");
    assert_eq!(fx.screen()[0].len(), 2);
    let file = fx.file("a.txt").unwrap();
    fx.ok("bd");
    assert!(fx.file("a.txt").is_none());
    assert!(fx.editor.files.file_names().is_empty());
    assert!(fx.editor.windows.windows().iter().all(|w| !w.shows_file(&file)));
    assert_eq!(fx.screen()[0].len(), 1);
}

#[test]
fn bd_by_name() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.ok("e b.txt");
    fx.ok("bd a.txt");
    assert!(fx.file("a.txt").is_none());
    assert!(fx.file("b.txt").is_some());
    assert_eq!(fx.editor.windows.history().len(), 1);

    let status = fx.run("bd nope.txt");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert_eq!(status.message, "no such buffer: nope.txt");
}

#[test]
fn files_lists_loaded_files_in_scratch() {
    let mut fx = Fixture::new();
    fx.ok("e b.txt");
    fx.ok("e a.txt");
    fx.ok("files");
    let a = fx.path("a.txt");
    let b = fx.path("b.txt");
    assert_eq!(
        fx.editor.windows.scratch_text(),
        format!("scratch\n\ne {}\ne {}\n", a.display(), b.display())
    );
    let s = fx.focus();
    assert!(fx.editor.windows.windows().is_scratch(s));
    assert_eq!(fx.screen()[0].len(), 2);
}

#[test]
fn write_saves_the_focused_file() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.type_text("hello");
    fx.ok("w");
    assert_eq!(std::fs::read_to_string(fx.path("a.txt")).unwrap(), "hello");
    assert!(!fx.file("a.txt").unwrap().borrow().is_dirty());
}

#[test]
fn write_with_a_path_saves_a_copy() {
    let mut fx = Fixture::new();
    fx.write("sub/a.txt", "one\n");
    fx.ok("e sub/a.txt");
    fx.ok("w copy.txt");
    assert_eq!(
        std::fs::read_to_string(fx.path("sub/copy.txt")).unwrap(),
        "one\n"
    );
    // the window still shows the original file
    assert!(fx.editor.windows.title().starts_with("a.txt ("));
}

#[test]
fn write_on_scratch_is_an_error() {
    let mut fx = Fixture::new();
    let status = fx.run("w");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert_eq!(status.message, "scratch buffer has no file");
}

#[test]
fn write_failure_is_reported() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    let status = fx.run("w missing/dir/out.txt");
    assert_eq!(status.code, CommandStatusCode::Error);
    assert!(status.message.starts_with("cannot write"));
}

#[test]
fn quit_persists_recents() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.ok("e b.txt");
    assert!(!fx.editor.quit_requested());
    fx.ok("q");
    assert!(fx.editor.quit_requested());
    let saved = std::fs::read_to_string(fx.path("state/recents")).unwrap();
    let lines: Vec<_> = saved.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("a.txt"));
    assert!(lines[1].ends_with("b.txt"));
}

#[test]
fn shade_toggles_the_focused_window() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    let w = fx.focus();
    fx.ok("shade");
    assert_eq!(fx.editor.windows.window(w).unwrap().shade(), ShadeMode::Shaded);
    fx.ok("shade");
    assert_eq!(
        fx.editor.windows.window(w).unwrap().shade(),
        ShadeMode::Unshaded
    );
}

#[test]
fn split_shows_the_file_twice() {
    let mut fx = Fixture::new();
    fx.write("a.txt", "shared\n");
    fx.ok("e a.txt");
    fx.ok("split");
    let col = fx.screen()[0].clone();
    assert_eq!(col.len(), 2);
    let file = fx.file("a.txt").unwrap();
    for id in col {
        assert!(fx.editor.windows.window(id).unwrap().shows_file(&file));
    }
}

#[test]
fn other_commands_reset_the_bubble_walk() {
    let mut fx = Fixture::new();
    fx.ok("e a.txt");
    fx.ok("e b.txt");
    let history: Vec<_> = fx.editor.windows.history().iter().copied().collect();
    fx.ok("bubble");
    assert_eq!(fx.focus(), history[1]);
    let last_op = |fx: &Fixture| fx.editor.windows.window(history[1]).unwrap().last_op;
    assert_eq!(last_op(&fx).bubble_number(), 1);
    fx.ok("1");
    assert_eq!(last_op(&fx).bubble_number(), 0);
}

#[test]
fn submitted_lines_report_through_the_placeholder() {
    let mut fx = Fixture::new();
    let status = fx.editor.submit_line("frob");
    assert_eq!(status.code, CommandStatusCode::CommandNotFound);
    assert_eq!(fx.placeholder(), "command not found: frob");
    assert_eq!(fx.editor.windows.minibuffer().text(), "");

    fx.editor.submit_line("e a.txt");
    assert_eq!(fx.placeholder(), "");
    assert!(fx.editor.windows.title().starts_with("a.txt ("));
}

#[test]
fn preload_registers_all_and_opens_the_first() {
    let mut fx = Fixture::new();
    fx.write("b.txt", "bee\n");
    let paths = vec![
        fx.path("a.txt").display().to_string(),
        fx.path("b.txt").display().to_string(),
    ];
    let status = fx.editor.preload(&paths).unwrap();
    assert!(status.is_success());
    assert!(fx.editor.windows.title().starts_with("a.txt ("));
    assert_eq!(fx.editor.files.file_names().len(), 2);
    assert!(fx.editor.preload(&[]).is_none());
}
