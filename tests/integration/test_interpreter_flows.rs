//! Integration Tests for Interpreter Flows
//!
//! These tests drive a session line by line and check console output,
//! history contents and the history file.

use mysh::{HistoryStore, ProcessSupervisor, Session, WorkingDirectory};
use tempfile::TempDir;

fn session_in(dir: &TempDir) -> Session<Vec<u8>> {
    Session::new(
        WorkingDirectory::new(dir.path().to_string_lossy().into_owned()),
        HistoryStore::with_path(dir.path().join("mysh_history.txt")),
        ProcessSupervisor::new(),
        Vec::new(),
    )
}

async fn run(session: &mut Session<Vec<u8>>, lines: &[&str]) {
    for line in lines {
        session.handle_line(line).await.unwrap();
    }
}

/// Output produced by `line` alone
async fn output_of(session: &mut Session<Vec<u8>>, line: &str) -> String {
    let start = session.output().len();
    session.handle_line(line).await.unwrap();
    String::from_utf8_lossy(&session.output()[start..]).into_owned()
}

fn raw_history(session: &Session<Vec<u8>>) -> Vec<String> {
    session
        .history()
        .entries()
        .map(|c| c.raw_text.clone())
        .collect()
}

#[tokio::test]
async fn test_history_on_fresh_session_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    assert_eq!(output_of(&mut session, "history").await, "");
}

#[tokio::test]
async fn test_history_after_one_command() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    run(&mut session, &["whereami"]).await;
    assert_eq!(output_of(&mut session, "history").await, "0: whereami\n");
}

#[tokio::test]
async fn test_bare_history_is_recorded() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    run(&mut session, &["whereami", "history"]).await;
    assert_eq!(raw_history(&session), vec!["history", "whereami"]);
    assert_eq!(
        output_of(&mut session, "history").await,
        "0: history\n1: whereami\n"
    );
}

#[tokio::test]
async fn test_movetodir_and_whereami() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("work")).unwrap();
    let mut session = session_in(&dir);
    let base = session.workdir().as_str().to_string();

    assert_eq!(output_of(&mut session, "movetodir work").await, "");
    assert_eq!(
        output_of(&mut session, "whereami").await,
        format!("{}work/\n", base)
    );
    assert_eq!(raw_history(&session), vec!["whereami", "movetodir work"]);
}

#[tokio::test]
async fn test_movetodir_missing_directory() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);
    let base = session.workdir().clone();

    assert_eq!(
        output_of(&mut session, "movetodir ghost").await,
        "Directory ghost: not found\n"
    );
    assert_eq!(session.workdir(), &base);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_movetodir_absolute() {
    let dir = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    let target = other.path().to_string_lossy().into_owned();
    run(&mut session, &[&format!("movetodir {}", target)]).await;
    assert_eq!(session.workdir().as_str(), format!("{}/", target));
}

#[tokio::test]
async fn test_replay_runs_listed_entry() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);
    let base = session.workdir().as_str().to_string();

    run(&mut session, &["whereami", "history"]).await;
    // The listing above stamped "whereami" as 0; "history" itself is unlisted
    assert_eq!(
        output_of(&mut session, "replay 0").await,
        format!("{}\n", base)
    );
    assert_eq!(
        raw_history(&session),
        vec!["replay 0", "whereami", "history", "whereami"]
    );
}

#[tokio::test]
async fn test_replay_past_end_is_silent_noop() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    run(&mut session, &["whereami", "history"]).await;
    assert_eq!(output_of(&mut session, "replay 99").await, "");
    assert_eq!(raw_history(&session)[0], "replay 99");
}

#[tokio::test]
async fn test_replay_of_replay_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    run(&mut session, &["whereami", "history", "replay 0"]).await;
    assert_eq!(
        output_of(&mut session, "history").await,
        "0: replay 0\n1: whereami\n2: history\n3: whereami\n"
    );

    let before = raw_history(&session);
    assert_eq!(
        output_of(&mut session, "replay 0").await,
        "Invalid command: replay of replay (replay 0)\n"
    );
    assert_eq!(raw_history(&session), before);
}

#[tokio::test]
async fn test_history_clear_removes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mysh_history.txt");
    let mut session = session_in(&dir);

    run(&mut session, &["whereami", "history"]).await;
    session.history().save().unwrap();
    assert!(path.exists());

    assert_eq!(output_of(&mut session, "history -c").await, "History cleared\n");
    assert!(session.history().is_empty());
    assert!(!path.exists());

    session.save_history();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_history_unknown_flag_is_invalid() {
    let dir = TempDir::new().unwrap();
    let mut session = session_in(&dir);

    run(&mut session, &["whereami"]).await;
    assert_eq!(
        output_of(&mut session, "history --all").await,
        "Invalid command: history --all\n"
    );
    assert_eq!(raw_history(&session), vec!["whereami"]);
}

#[tokio::test]
async fn test_history_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mysh_history.txt");

    let mut first = session_in(&dir);
    run(&mut first, &["whereami", "history", "byebye"]).await;
    first.save_history();

    let mut second = Session::new(
        WorkingDirectory::new("/"),
        HistoryStore::load(&path).unwrap(),
        ProcessSupervisor::new(),
        Vec::new(),
    );
    assert_eq!(
        output_of(&mut second, "history").await,
        "0: history\n1: whereami\n"
    );
}
