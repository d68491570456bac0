//! Integration Tests for Error Handling
//!
//! These tests verify that failing commands are reported and never stop
//! the read loop.

use mysh::config::ShellConfig;
use mysh::{HistoryStore, Interpreter, ProcessSupervisor, Session, WorkingDirectory};
use tempfile::TempDir;

fn interpreter_in(dir: &TempDir) -> Interpreter<Vec<u8>> {
    let session = Session::new(
        WorkingDirectory::new(dir.path().to_string_lossy().into_owned()),
        HistoryStore::with_path(dir.path().join("mysh_history.txt")),
        ProcessSupervisor::new(),
        Vec::new(),
    );
    let config = ShellConfig {
        prompt: "# ".to_string(),
        show_banner: false,
    };
    Interpreter::new(session, config)
}

#[tokio::test]
async fn test_loop_survives_failures() {
    let dir = TempDir::new().unwrap();
    let mut interpreter = interpreter_in(&dir);

    let input: &[u8] = b"nonsense\nmovetodir ghost\nstart /nonexistent/a b\nreplay 5\nwhereami\n";
    interpreter.run(input).await.unwrap();

    let session = interpreter.session();
    let text = String::from_utf8_lossy(session.output()).into_owned();
    assert!(text.contains("Invalid command: nonsense"));
    assert!(text.contains("Directory ghost: not found"));
    assert!(text.contains("Could not open: /nonexistent/a"));
    assert!(text.contains(session.workdir().as_str()));

    let recorded: Vec<_> = session.history().entries().map(|c| c.raw_text.as_str()).collect();
    assert_eq!(recorded, vec!["whereami", "replay 5"]);
}

#[tokio::test]
async fn test_wrong_arity_for_every_verb_has_no_effect() {
    let dir = TempDir::new().unwrap();
    let mut interpreter = interpreter_in(&dir);

    let lines = [
        "movetodir",
        "movetodir a b",
        "whereami x",
        "history a b",
        "byebye now",
        "replay",
        "replay 1 2",
        "start",
        "background",
        "dalek",
        "dalek 1 2",
        "repeat 3",
        "dalekall x",
    ];
    let input = lines.join("\n");
    interpreter.run(input.as_bytes()).await.unwrap();

    let session = interpreter.session();
    let text = String::from_utf8_lossy(session.output()).into_owned();
    assert_eq!(text.matches("Invalid command: ").count(), lines.len());
    assert!(session.history().is_empty());
    assert!(session.supervisor().tracked_pids().is_empty());
    // "byebye now" was invalid, so the loop only ended at end of input
    assert!(!session.is_running());
}

#[tokio::test]
async fn test_unwritable_history_is_skipped() {
    let dir = TempDir::new().unwrap();
    let session_dir = dir.path().join("gone");
    std::fs::create_dir(&session_dir).unwrap();

    let mut session = Session::new(
        WorkingDirectory::new("/"),
        HistoryStore::with_path(session_dir.join("mysh_history.txt")),
        ProcessSupervisor::new(),
        Vec::new(),
    );
    session.handle_line("whereami").await.unwrap();
    std::fs::remove_dir(&session_dir).unwrap();

    assert!(session.history().save().is_err());
    // Must not panic
    session.save_history();
}

#[tokio::test]
async fn test_oversized_repeat_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(
        WorkingDirectory::new(dir.path().to_string_lossy().into_owned()),
        HistoryStore::with_path(dir.path().join("mysh_history.txt")),
        ProcessSupervisor::new(),
        Vec::new(),
    );

    session
        .handle_line("repeat 18446744073709551615 /nonexistent/zz a")
        .await
        .unwrap();
    session.handle_line("whereami").await.unwrap();

    let text = String::from_utf8_lossy(session.output()).into_owned();
    assert!(text.starts_with("Invalid command: repeat 18446744073709551615 /nonexistent/zz a\n"));
    assert!(session.is_running());
    assert!(session.supervisor().tracked_pids().is_empty());

    let recorded: Vec<_> = session.history().entries().map(|c| c.raw_text.as_str()).collect();
    assert_eq!(recorded, vec!["whereami"]);
}

#[tokio::test]
async fn test_non_utf8_line_does_not_end_session() {
    let dir = TempDir::new().unwrap();
    let mut interpreter = interpreter_in(&dir);

    let input: &[u8] = b"\xff\xfe\nwhereami\nbyebye\n";
    interpreter.run(input).await.unwrap();

    let session = interpreter.session();
    let recorded: Vec<_> = session.history().entries().map(|c| c.raw_text.as_str()).collect();
    assert_eq!(recorded, vec!["whereami"]);
}
