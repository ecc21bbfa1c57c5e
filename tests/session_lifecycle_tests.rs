// session_lifecycle_tests.rs - ファイルのライフサイクルとレジストリ整合性のテスト

use minidb::error::MinidbError;
use minidb::file::{LineCounter, LineEditor};
use minidb::{EditMode, EditStep, FileStore, ReadOutcome, Session};
use std::fs;
use tempfile::{tempdir, TempDir};

fn new_session() -> (TempDir, Session) {
    let temp_dir = tempdir().unwrap();
    let session = Session::new(FileStore::new(temp_dir.path()));
    (temp_dir, session)
}

fn append_all(session: &Session, name: &str, lines: &[&str]) {
    let mut edit = session.begin_update(name, EditMode::Append).expect("append mode");
    for line in lines {
        assert!(matches!(edit.submit(line), EditStep::Continue(_)));
    }
    assert_eq!(edit.submit("-1"), EditStep::Finished(None));
}

#[test]
fn test_create_twice_keeps_single_entry() {
    let (_dir, mut session) = new_session();

    session.create("dup.txt").unwrap();
    let second = session.create("dup.txt");

    assert_eq!(
        second,
        Err(MinidbError::DuplicateFile {
            name: "dup.txt".to_string()
        })
    );
    assert_eq!(
        session
            .registry()
            .names()
            .iter()
            .filter(|name| name.as_str() == "dup.txt")
            .count(),
        1
    );
}

#[test]
fn test_append_count_read_round() {
    let (dir, mut session) = new_session();
    session.create("f.txt").unwrap();

    append_all(&session, "f.txt", &["a", "b", "c"]);

    let path = dir.path().join("f.txt");
    assert_eq!(LineCounter::count(&path).unwrap(), 3);
    assert_eq!(
        session.read("f.txt").unwrap().into_lines().unwrap(),
        ["a", "b", "c"]
    );
}

#[test]
fn test_replace_keeps_line_count() {
    let (dir, mut session) = new_session();
    session.create("f.txt").unwrap();
    append_all(&session, "f.txt", &["a", "b", "c"]);

    let path = dir.path().join("f.txt");
    let outcome = LineEditor::new().replace_line(&path, 2, "X").unwrap();

    assert_eq!(outcome.lines_changed, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nX\nc\n");
    assert_eq!(LineCounter::count(&path).unwrap(), 3);
}

#[test]
fn test_remove_decrements_line_count() {
    let (dir, mut session) = new_session();
    session.create("f.txt").unwrap();
    append_all(&session, "f.txt", &["a", "b", "c"]);

    let path = dir.path().join("f.txt");
    LineEditor::new().remove_line(&path, 2).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nc\n");
    assert_eq!(LineCounter::count(&path).unwrap(), 2);
}

#[test]
fn test_out_of_range_remove_is_byte_identical() {
    let (dir, mut session) = new_session();
    session.create("f.txt").unwrap();
    append_all(&session, "f.txt", &["a", "b", "c"]);

    let path = dir.path().join("f.txt");
    let before = fs::read(&path).unwrap();
    let count = LineCounter::count(&path).unwrap();

    let editor = LineEditor::new();
    assert_eq!(editor.remove_line(&path, 0).unwrap().lines_changed, 0);
    assert_eq!(editor.remove_line(&path, count + 1).unwrap().lines_changed, 0);

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_delete_clears_disk_and_registry() {
    let (dir, mut session) = new_session();
    session.create("gone.txt").unwrap();
    append_all(&session, "gone.txt", &["data"]);

    session.delete("gone.txt").unwrap();

    assert!(!dir.path().join("gone.txt").exists());
    assert!(!session.registry().contains("gone.txt"));
    assert!(matches!(
        session.read("gone.txt"),
        Err(MinidbError::UnknownFile { .. })
    ));

    session.create("gone.txt").unwrap();
    assert!(matches!(session.read("gone.txt").unwrap(), ReadOutcome::Empty));
}

#[test]
fn test_removing_every_line_reads_as_empty() {
    let (_dir, mut session) = new_session();
    session.create("f.txt").unwrap();
    append_all(&session, "f.txt", &["only"]);

    session.remove_line("f.txt", 1).unwrap();

    assert_eq!(session.line_count("f.txt").unwrap(), 0);
    assert!(matches!(session.read("f.txt").unwrap(), ReadOutcome::Empty));
}

#[test]
fn test_unknown_file_for_every_operation() {
    let (_dir, mut session) = new_session();

    assert!(matches!(session.read("x"), Err(MinidbError::UnknownFile { .. })));
    assert!(matches!(session.delete("x"), Err(MinidbError::UnknownFile { .. })));
    assert!(matches!(
        session.begin_update("x", EditMode::ChangeByLine),
        Err(MinidbError::UnknownFile { .. })
    ));
    assert!(matches!(
        session.replace_line("x", 1, "y"),
        Err(MinidbError::UnknownFile { .. })
    ));
}

#[test]
fn test_view_follows_creation_order() {
    let (_dir, mut session) = new_session();
    for name in ["b.txt", "a.txt", "c.txt"] {
        session.create(name).unwrap();
    }
    session.delete("a.txt").unwrap();

    let names: Vec<String> = session.view().into_iter().map(|entry| entry.name).collect();
    assert_eq!(names, ["b.txt", "c.txt"]);
}

#[test]
fn test_temp_named_file_cannot_be_tracked() {
    let (dir, mut session) = new_session();
    session.create("a.txt").unwrap();
    append_all(&session, "a.txt", &["one", "two"]);

    assert!(matches!(
        session.create(".a.txt.minidb-tmp"),
        Err(MinidbError::Input(_))
    ));

    session.remove_line("a.txt", 1).unwrap();

    // レジストリにある名前はすべてディスク上に存在する
    for name in session.registry().names() {
        assert!(dir.path().join(name).is_file(), "{} missing on disk", name);
    }
    assert_eq!(session.registry().names(), ["a.txt"]);
}
