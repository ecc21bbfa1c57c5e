// repl_integration_tests.rs - 入力スクリプトによる対話ループのテスト

use minidb::{FileStore, Repl, Session};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

fn run_script(root: &Path, script: &str, uniform_retry: bool) -> String {
    let session = Session::new(FileStore::new(root)).with_uniform_retry(uniform_retry);
    let mut repl = Repl::new(session, Cursor::new(script.to_string()), Vec::new());
    repl.run().expect("repl run");
    String::from_utf8(repl.into_output()).unwrap()
}

#[test]
fn test_full_session_script() {
    let temp_dir = tempdir().unwrap();
    let script = "\
CREATE notes.txt
CREATE notes.txt
READ notes.txt
UPDATE notes.txt
2
first
second
third
-1
READ notes.txt
UPDATE notes.txt
1
2
SECOND
-1
UPDATE notes.txt
3
1
-1
READ notes.txt
DELETE notes.txt
READ notes.txt
EXIT
READ never-reached.txt
";

    let output = run_script(temp_dir.path(), script, false);

    assert!(output.contains("FILE CREATED : notes.txt"));
    assert!(output.contains("ERROR : FILE ALREADY EXIST."));
    assert!(output.contains("FILE IS EMPTY"));
    assert!(output.contains("CHOOSE AN OPTION : "));
    assert!(output.contains("first\nsecond\nthird\n"));
    assert!(output.contains("THE LINE CHANGED SUCCESSFULLY."));
    assert!(output.contains("THE LINE REMOVED SUCCESSFULLY"));
    assert!(output.contains("SECOND\nthird\n"));
    assert!(output.contains("FILE IS DELETED PERMANENTLY"));
    assert!(output.trim_end().ends_with("ERROR : FILE DOES NOT EXIST."));
    assert!(!temp_dir.path().join("notes.txt").exists());
}

#[test]
fn test_change_mode_reprompts_but_delete_mode_stops() {
    let temp_dir = tempdir().unwrap();
    let script = "\
CREATE a.txt
UPDATE a.txt
2
x
y
-1
UPDATE a.txt
1
7
1
X
-1
UPDATE a.txt
3
9
1
READ a.txt
";

    let output = run_script(temp_dir.path(), script, false);

    // 置換モード：範囲外の 7 の後も続行して 1 行目を置換
    assert!(output.contains("THE LINE CHANGED SUCCESSFULLY."));
    // 削除モード：範囲外の 9 でループ終了、続く "1" はコマンドとして扱われる
    assert!(output.contains("ERROR : KEYWORD IS MISSING"));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("a.txt")).unwrap(),
        "X\ny\n"
    );
}

#[test]
fn test_uniform_retry_keeps_delete_mode_open() {
    let temp_dir = tempdir().unwrap();
    let script = "\
CREATE a.txt
UPDATE a.txt
2
x
y
-1
UPDATE a.txt
3
9
1
-1
";

    let output = run_script(temp_dir.path(), script, true);

    assert!(output.contains("ERROR : INVALID INPUT."));
    assert!(output.contains("THE LINE REMOVED SUCCESSFULLY"));
    assert!(!output.contains("KEYWORD IS MISSING"));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("a.txt")).unwrap(),
        "y\n"
    );
}

#[test]
fn test_parser_errors_and_listing() {
    let temp_dir = tempdir().unwrap();
    let script = "\
VIEW
OPEN a.txt
READ a.txt b.txt
CREATE a.txt
HELP
VIEW
UPDATE a.txt
7
";

    let output = run_script(temp_dir.path(), script, false);

    assert!(output.contains("NO FILES YET."));
    assert!(output.contains("ERROR : KEYWORD IS MISSING"));
    assert!(output.contains("ERROR : KEYWORD MUST ACCOMPANY BY THE FILE NAME ONLY"));
    assert!(output.contains("--- HELP ---"));
    assert!(output.contains("THE LIST OF EXISTING FILES : "));
    assert!(output.contains(" - a.txt (last modified: "));
    assert!(output.contains("size: 0 bytes)"));
    // 不正なメニュー番号
    assert!(output.trim_end().ends_with("ERROR : INVALID INPUT."));
}

#[test]
fn test_eof_inside_edit_loop_ends_session() {
    let temp_dir = tempdir().unwrap();
    let output = run_script(temp_dir.path(), "CREATE a.txt\nUPDATE a.txt\n2\nhalf", false);

    assert!(output.contains("ENTER NEW DATA TO ADD TO THE FILE (-1 TO QUIT) : "));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("a.txt")).unwrap(),
        "half\n"
    );
}
