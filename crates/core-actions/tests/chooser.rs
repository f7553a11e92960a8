use core_actions::{ChooserOutcome, ChooserRow, DirectoryChooser, RowKind};
use core_events::KeyEvent;
use core_keymap::parse_sequence;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// a.rs b.txt .hidden src/{lib.rs,main.rs} .git/ docs/
fn tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.rs"), "").unwrap();
    fs::write(root.join("b.txt"), "").unwrap();
    fs::write(root.join(".hidden"), "").unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/lib.rs"), "").unwrap();
    fs::write(root.join("src/main.rs"), "").unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    dir
}

fn row(kind: RowKind, name: &str) -> ChooserRow {
    ChooserRow {
        kind,
        name: name.to_string(),
    }
}

fn names(ch: &DirectoryChooser) -> Vec<&str> {
    ch.rows().iter().map(|r| r.name.as_str()).collect()
}

fn press(ch: &mut DirectoryChooser, seq: &str) -> Option<ChooserOutcome> {
    let mut last = None;
    for key in parse_sequence(seq).unwrap() {
        last = ch.handle_key(&key).unwrap();
    }
    last
}

fn type_pattern(ch: &mut DirectoryChooser, text: &str) {
    for c in text.chars() {
        ch.handle_key(&KeyEvent::plain(c)).unwrap();
    }
}

#[test]
fn lists_files_then_directories() {
    let dir = tree();
    let ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    assert_eq!(
        ch.rows(),
        &[
            row(RowKind::File, "a.rs"),
            row(RowKind::File, "b.txt"),
            row(RowKind::Directory, "docs/"),
            row(RowKind::Directory, "src/"),
        ]
    );
    assert_eq!(ch.selected(), Some(0));
}

#[test]
fn recents_come_first_and_selection_skips_them() {
    let dir = tree();
    let recents = vec!["~/notes.txt".to_string(), "/etc/hosts".to_string()];
    let ch = DirectoryChooser::open(dir.path(), &recents).unwrap();
    assert_eq!(ch.rows()[0], row(RowKind::Recent, "~/notes.txt"));
    assert_eq!(ch.rows()[1], row(RowKind::Recent, "/etc/hosts"));
    assert_eq!(ch.selected(), Some(2));
    assert_eq!(ch.selected_row().unwrap().name, "a.rs");
}

#[test]
fn only_recents_selects_the_last_one() {
    let dir = tempfile::tempdir().unwrap();
    let recents = vec!["/x".to_string(), "/y".to_string()];
    let ch = DirectoryChooser::open(dir.path(), &recents).unwrap();
    assert_eq!(ch.selected(), Some(1));
}

#[test]
fn pattern_filters_by_subsequence() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    type_pattern(&mut ch, "rs");
    assert_eq!(names(&ch), vec!["a.rs"]);
    ch.set_pattern("t").unwrap();
    assert_eq!(names(&ch), vec!["b.txt"]);
    ch.set_pattern("zzz").unwrap();
    assert!(ch.rows().is_empty());
    assert_eq!(ch.selected(), None);
}

#[test]
fn dot_entries_need_a_leading_dot() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    assert!(!names(&ch).contains(&".hidden"));
    ch.set_pattern(".").unwrap();
    assert_eq!(names(&ch), vec![".git/", ".hidden", "a.rs", "b.txt"]);
    assert_eq!(ch.rows()[0].kind, RowKind::Dot);
}

#[test]
fn unique_directory_match_changes_directory() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &["/r".to_string()]).unwrap();
    type_pattern(&mut ch, "sr/");
    assert_eq!(ch.curdir(), dir.path().join("src"));
    assert_eq!(ch.pattern(), "");
    // recents are dropped once the directory changes
    assert_eq!(names(&ch), vec!["lib.rs", "main.rs"]);

    ch.set_pattern("../").unwrap();
    assert_eq!(ch.curdir(), dir.path());
}

#[test]
fn ambiguous_slash_pattern_just_filters() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    // both docs/ and src/ contain an 's' before the slash
    ch.set_pattern("s/").unwrap();
    assert_eq!(ch.curdir(), dir.path());
    assert_eq!(names(&ch), vec!["docs/", "src/"]);
}

#[test]
fn root_pattern_goes_to_root() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    ch.set_pattern("/").unwrap();
    assert_eq!(ch.curdir(), Path::new("/"));
    assert_eq!(ch.title(), "/");
}

#[test]
fn activating_a_file_returns_an_edit_command() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    let out = press(&mut ch, "Down RET");
    assert_eq!(
        out,
        Some(ChooserOutcome::Chosen(format!(
            "e {}",
            dir.path().join("b.txt").display()
        )))
    );
}

#[test]
fn activating_a_directory_descends() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    ch.set_pattern("src").unwrap();
    assert_eq!(ch.selected_row().unwrap().name, "src/");
    assert_eq!(ch.activate().unwrap(), None);
    assert_eq!(ch.curdir(), dir.path().join("src"));
    assert_eq!(ch.pattern(), "");
    assert_eq!(names(&ch), vec!["lib.rs", "main.rs"]);
}

#[test]
fn typed_edit_command_names_a_new_file() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    ch.set_pattern("e fresh.txt").unwrap();
    assert_eq!(
        ch.activate().unwrap(),
        Some(ChooserOutcome::Chosen(format!(
            "e {}",
            dir.path().join("fresh.txt").display()
        )))
    );
}

#[test]
fn nothing_selected_cancels() {
    let dir = tempfile::tempdir().unwrap();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    assert_eq!(ch.activate().unwrap(), Some(ChooserOutcome::Cancelled));
}

#[test]
fn selection_keys_clamp_at_both_ends() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    press(&mut ch, "Up C-p");
    assert_eq!(ch.selected(), Some(0));
    press(&mut ch, "C-n Down Down Down Down");
    assert_eq!(ch.selected(), Some(3));
    assert_eq!(press(&mut ch, "C-g"), Some(ChooserOutcome::Cancelled));
}

#[test]
fn backspace_widens_the_filter() {
    let dir = tree();
    let mut ch = DirectoryChooser::open(dir.path(), &[]).unwrap();
    type_pattern(&mut ch, "rs");
    press(&mut ch, "DEL");
    assert_eq!(ch.pattern(), "r");
    assert_eq!(names(&ch), vec!["a.rs", "src/"]);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DirectoryChooser::open(&dir.path().join("gone"), &[])
        .err()
        .unwrap();
    assert!(err.to_string().contains("gone"));
}
