//! Unit tests for the history store and its file
//!
//! Exercises persistence through real files in a temporary directory.

use mysh::commands::Command;
use mysh::history::{codec, HistoryStore, ReplayTarget};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_listing_is_idempotent_in_content() {
    let mut store = HistoryStore::with_path("unused.txt");
    store.push(Command::parse("whereami"));
    store.push(Command::parse("start ls -l"));

    let first = store.list();
    let second = store.list();
    assert_eq!(first, second);
    assert_eq!(first, vec!["0: start ls -l", "1: whereami"]);
}

#[test]
fn test_push_shifts_indices_by_one() {
    let mut store = HistoryStore::with_path("unused.txt");
    store.push(Command::parse("whereami"));
    store.push(Command::parse("history"));
    let before = store.list();

    store.push(Command::parse("dalekall"));
    let after = store.list();

    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after[1], "1: history");
    assert_eq!(after[2], "2: whereami");
}

#[test]
fn test_replay_before_any_listing_finds_nothing() {
    let mut store = HistoryStore::with_path("unused.txt");
    store.push(Command::parse("whereami"));
    assert_eq!(store.resolve_replay(0), ReplayTarget::NotFound);
}

#[test]
fn test_file_round_trip_preserves_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mysh_history.txt");

    let mut store = HistoryStore::with_path(&path);
    for raw in ["whereami", "movetodir /tmp", "history"] {
        store.push(Command::parse(raw));
    }
    store.save().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "history,movetodir /tmp,whereami\n");
    assert_eq!(content.lines().count(), 1);

    let mut loaded = HistoryStore::load(&path).unwrap();
    assert_eq!(
        loaded.list(),
        vec!["0: history", "1: movetodir /tmp", "2: whereami"]
    );
}

#[test]
fn test_load_accepts_multi_line_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mysh_history.txt");
    fs::write(&path, "history,whereami\ndalekall\n").unwrap();

    let store = HistoryStore::load(&path).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(2).unwrap().raw_text, "dalekall");
}

#[test]
fn test_save_overwrites_instead_of_appending() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mysh_history.txt");
    fs::write(&path, "whereami\n").unwrap();

    let mut store = HistoryStore::load(&path).unwrap();
    store.push(Command::parse("history"));
    store.save().unwrap();
    store.save().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "history,whereami\n");
}

#[test]
fn test_commas_in_arguments_split_on_reload() {
    // The file format has no escaping
    let encoded = codec::encode(["start echo a,b"]);
    assert_eq!(codec::decode(&encoded), vec!["start echo a", "b"]);
}
