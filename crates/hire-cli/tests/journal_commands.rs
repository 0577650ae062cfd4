//! # Journal subcommands against a journaled demo run

use hire_cli::demo::{run_demo, DemoArgs};
use hire_cli::journal::{replay_report, run_journal, JournalArgs, JournalCommand};

#[test]
fn demo_journal_verifies_and_replays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.jsonl");
    assert_eq!(run_demo(&DemoArgs { journal: Some(path.clone()) }).unwrap(), 0);

    let verify = JournalArgs {
        command: JournalCommand::Verify { path: path.clone() },
    };
    assert_eq!(run_journal(&verify).unwrap(), 0);

    let report = replay_report(&path).unwrap();
    assert_eq!(report.transactions, 12);
    assert_eq!(report.records, 13);
    assert_eq!(report.jobs.total_jobs, 1);
    assert_eq!(report.certificates_issued, 3);
    assert_eq!(report.by_op.get("mark_verified"), Some(&1));
}

#[test]
fn demo_refuses_existing_journal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.jsonl");
    std::fs::write(&path, "").unwrap();
    assert!(run_demo(&DemoArgs { journal: Some(path) }).is_err());
}

#[test]
fn tampered_journal_fails_checks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.jsonl");
    run_demo(&DemoArgs { journal: Some(path.clone()) }).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, content.replacen("Backend Engineer", "Frontend Engineer", 1)).unwrap();

    let verify = JournalArgs {
        command: JournalCommand::Verify { path: path.clone() },
    };
    assert_eq!(run_journal(&verify).unwrap(), 1);
    let replay = JournalArgs {
        command: JournalCommand::Replay { path, json: true },
    };
    assert_eq!(run_journal(&replay).unwrap(), 1);
}

#[test]
fn missing_journal_is_an_operational_error() {
    let dir = tempfile::tempdir().unwrap();
    let verify = JournalArgs {
        command: JournalCommand::Verify {
            path: dir.path().join("absent.jsonl"),
        },
    };
    assert!(run_journal(&verify).is_err());
}
