use std::fs;
use std::time::Duration;

use brain_core::error::BrainError;
use brain_core::persist::lock::DirLock;
use brain_core::refile::{Refiled, refile_on};
use brain_core::{Brain, ItemKind, LockOptions, parse_dump};
use time::macros::date;

fn brain_with_dump(dump: &str) -> (tempfile::TempDir, Brain) {
    let dir = tempfile::tempdir().unwrap();
    let brain = Brain::new(dir.path());
    brain.init().unwrap();
    fs::write(brain.dump_path(), dump).unwrap();
    brain.create_project("api").unwrap();
    (dir, brain)
}

#[test]
fn task_moves_verbatim_and_leaves_dump() {
    let (_dir, brain) = brain_with_dump("# Dump\n- [ ] Fix bug #captured:2024-01-01\n- [ ] Other\n");
    let items = brain.dump().unwrap();
    assert_eq!(items.len(), 2);

    let out = refile_on(&brain, &items[0], "api", date!(2030 - 01 - 01)).unwrap();
    assert!(matches!(out, Refiled::Task { .. }));

    let todo = fs::read_to_string(brain.todo_path("api").unwrap()).unwrap();
    assert!(todo.lines().any(|l| l == "- [ ] Fix bug #captured:2024-01-01"));
    assert_eq!(brain.dump().unwrap().len(), 1);
    assert_eq!(
        fs::read_to_string(brain.dump_path()).unwrap(),
        "# Dump\n- [ ] Other\n"
    );
}

#[test]
fn task_file_is_created_from_template() {
    let (dir, brain) = brain_with_dump("- [ ] Seed #captured:2024-01-01\n");
    fs::create_dir_all(dir.path().join("fresh")).unwrap();
    let item = brain.dump().unwrap().remove(0);

    refile_on(&brain, &item, "fresh", date!(2030 - 01 - 01)).unwrap();
    assert_eq!(
        fs::read_to_string(brain.todo_path("fresh").unwrap()).unwrap(),
        "# fresh\n\n- [ ] Seed #captured:2024-01-01\n"
    );
}

#[test]
fn note_becomes_a_file() {
    let (_dir, brain) = brain_with_dump(
        "[Note] Meeting notes #captured:2024-03-05\n    Line one\n\n    Line two\n- [ ] Next task\n",
    );
    let items = brain.dump().unwrap();
    assert_eq!(items[0].kind, ItemKind::Note);

    let out = refile_on(&brain, &items[0], "api", date!(2030 - 01 - 01)).unwrap();
    let Refiled::Note { path } = out else {
        panic!("expected a note");
    };
    assert_eq!(path.file_name().unwrap(), "2024-03-05-meeting-notes.md");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# Meeting notes\n\nCreated: 2024-03-05\n\nLine one\n\nLine two\n"
    );
    assert_eq!(fs::read_to_string(brain.dump_path()).unwrap(), "- [ ] Next task\n");

    let notes = brain.notes("api").unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Meeting notes");
    assert_eq!(notes[0].created.as_deref(), Some("2024-03-05"));
}

#[test]
fn unstamped_note_uses_today_and_avoids_collisions() {
    let (_dir, brain) = brain_with_dump("[Note] Plan\n[Note] Plan\n");
    let today = date!(2025 - 06 - 01);

    let first = brain.dump().unwrap().remove(0);
    let a = refile_on(&brain, &first, "api", today).unwrap();
    let second = brain.dump().unwrap().remove(0);
    let b = refile_on(&brain, &second, "api", today).unwrap();

    let name = |r: &Refiled| match r {
        Refiled::Note { path } => path.file_name().unwrap().to_string_lossy().into_owned(),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(name(&a), "2025-06-01-plan.md");
    assert_eq!(name(&b), "2025-06-01-plan-1.md");
    assert!(brain.dump().unwrap().is_empty());
}

#[test]
fn stale_item_is_not_refiled() {
    let (_dir, brain) = brain_with_dump("- [ ] one\n- [ ] two\n");
    let items = brain.dump().unwrap();
    fs::write(brain.dump_path(), "- [ ] two\n").unwrap();

    let err = refile_on(&brain, &items[1], "api", date!(2030 - 01 - 01)).unwrap_err();
    assert!(matches!(err, BrainError::NotFound(_)));
    let todo = fs::read_to_string(brain.todo_path("api").unwrap()).unwrap();
    assert!(!todo.contains("two"));
}

#[test]
fn unknown_project_is_not_created() {
    let (dir, brain) = brain_with_dump("- [ ] one\n");
    let item = brain.dump().unwrap().remove(0);
    let err = refile_on(&brain, &item, "nope", date!(2030 - 01 - 01)).unwrap_err();
    assert!(matches!(err, BrainError::NotFound(_)));
    assert!(!dir.path().join("nope").exists());
    assert_eq!(brain.dump().unwrap().len(), 1);
}

#[test]
fn capture_then_parse() {
    let dir = tempfile::tempdir().unwrap();
    let brain = Brain::new(dir.path());
    brain.init().unwrap();
    let today = date!(2024 - 01 - 01);
    let dump = brain.dump_path();
    let lock = brain.lock;

    brain_core::dump::capture_task(&dump, "Fix bug", today, lock).unwrap();
    brain_core::dump::capture_note(&dump, "Idea", &["first\nsecond".into()], today, lock).unwrap();
    assert!(brain_core::dump::capture_task(&dump, "   ", today, lock).is_err());

    assert_eq!(
        fs::read_to_string(&dump).unwrap(),
        "- [ ] Fix bug #captured:2024-01-01\n[Note] Idea #captured:2024-01-01\n    first\n    second\n"
    );
    let items = parse_dump(&dump).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!((items[1].start_line, items[1].end_line), (2, 4));
}

#[test]
fn held_dump_lock_keeps_copy_and_item() {
    let (_dir, brain) = brain_with_dump("- [ ] Fix bug #captured:2024-01-01\n");
    let brain = brain.with_lock(LockOptions {
        attempts: 2,
        delay: Duration::from_millis(5),
    });
    let item = brain.dump().unwrap().remove(0);
    let held = DirLock::acquire(&brain.dump_path(), brain.lock).unwrap();

    let err = refile_on(&brain, &item, "api", date!(2030 - 01 - 01)).unwrap_err();
    assert!(matches!(err, BrainError::LockContention { attempts: 2, .. }));
    let todo = fs::read_to_string(brain.todo_path("api").unwrap()).unwrap();
    assert!(todo.lines().any(|l| l == "- [ ] Fix bug #captured:2024-01-01"));
    assert_eq!(
        fs::read_to_string(brain.dump_path()).unwrap(),
        "- [ ] Fix bug #captured:2024-01-01\n"
    );

    held.release().unwrap();
}

#[test]
fn captured_note_refiles_whole() {
    let dir = tempfile::tempdir().unwrap();
    let brain = Brain::new(dir.path());
    brain.init().unwrap();
    brain.create_project("home").unwrap();
    let today = date!(2024 - 01 - 01);
    let dump = brain.dump_path();

    let checkbox = vec!["- [ ] buy milk".to_string(), "and bread".to_string()];
    let err = brain_core::dump::capture_note(&dump, "Groceries", &checkbox, today, brain.lock)
        .unwrap_err();
    assert!(matches!(err, BrainError::InvalidInput(_)));

    let body = vec!["buy milk".to_string(), "- [x] and bread".to_string()];
    brain_core::dump::capture_note(&dump, "Groceries", &body, today, brain.lock).unwrap();
    let items = parse_dump(&dump).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!((items[0].kind, items[0].end_line), (ItemKind::Note, 3));

    let Refiled::Note { path } = refile_on(&brain, &items[0], "home", today).unwrap() else {
        panic!("expected a note");
    };
    assert!(fs::read_to_string(&path).unwrap().ends_with("buy milk\n- [x] and bread\n"));
    assert_eq!(fs::read_to_string(&dump).unwrap(), "");
}
