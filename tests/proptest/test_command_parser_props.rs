//! Property-based tests for command parsing

use mysh::commands::{Command, Verb};
use mysh::{HistoryStore, ProcessSupervisor, Session, WorkingDirectory};
use proptest::prelude::*;

fn verb_strategy() -> impl Strategy<Value = Verb> {
    prop::sample::select(Verb::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_parse_doesnt_panic(s in "\\PC*") {
        let cmd = Command::parse(&s);
        let _ = cmd.validate();
        prop_assert_eq!(cmd.raw_text, s);
    }

    #[test]
    fn test_keyword_round_trip(
        verb in verb_strategy(),
        args in prop::collection::vec("[a-z0-9]{1,8}", 0..4),
    ) {
        let line = format!("{} {}", verb.keyword().unwrap(), args.join(" "));
        let cmd = Command::parse(&line);
        prop_assert_eq!(cmd.verb, verb);
        prop_assert_eq!(cmd.arguments, args);
    }

    #[test]
    fn test_unknown_first_token(
        word in "[a-z]{1,12}",
        args in prop::collection::vec("[a-z]{1,5}", 0..3),
    ) {
        prop_assume!(Verb::from_keyword(&word) == Verb::Unknown);
        let cmd = Command::parse(&format!("{} {}", word, args.join(" ")));
        prop_assert_eq!(cmd.verb, Verb::Unknown);
        prop_assert!(!cmd.is_valid());
        prop_assert!(!cmd.is_recordable());
    }

    #[test]
    fn test_arity_violation_is_invalid(
        verb in verb_strategy(),
        count in 0usize..6,
    ) {
        let args: Vec<String> = (1..=count).map(|n| n.to_string()).collect();
        let cmd = Command::parse(&format!("{} {}", verb.keyword().unwrap(), args.join(" ")));
        if !verb.arity().accepts(count) {
            prop_assert!(cmd.validate().is_err());
        }
    }

    #[test]
    fn test_invalid_lines_never_reach_history(line in "[a-z]{1,10}( [a-z]{1,5}){0,3}") {
        prop_assume!(!Command::parse(&line).is_valid());

        let dir = tempfile::TempDir::new().unwrap();
        let mut session = Session::new(
            WorkingDirectory::new(dir.path().to_string_lossy().into_owned()),
            HistoryStore::with_path(dir.path().join("h.txt")),
            ProcessSupervisor::new(),
            Vec::new(),
        );

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(session.handle_line(&line)).unwrap();

        prop_assert!(session.history().is_empty());
        prop_assert!(session.supervisor().tracked_pids().is_empty());
    }

    #[test]
    fn test_replay_beyond_history_is_noop(extra in 0usize..50) {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = Session::new(
            WorkingDirectory::new(dir.path().to_string_lossy().into_owned()),
            HistoryStore::with_path(dir.path().join("h.txt")),
            ProcessSupervisor::new(),
            Vec::new(),
        );

        tokio_test::block_on(async {
            session.handle_line("whereami").await.unwrap();
            session.handle_line("history").await.unwrap();
        });
        let before = session.output().len();
        let index = session.history().len() + extra;
        tokio_test::block_on(session.handle_line(&format!("replay {}", index))).unwrap();

        prop_assert_eq!(session.output().len(), before);
    }
}
