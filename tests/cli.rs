//! End-to-end tests for the `wardrobe` script runner.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn wardrobe() -> Command {
    let mut cmd = Command::cargo_bin("wardrobe").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn script(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let file = dir.child("script.wd");
    file.write_str(text).unwrap();
    file.path().to_path_buf()
}

#[test]
fn nested_layers_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "\
# clothes for the day
update top=bodysuit,bottom=underpants
commit
set friend Lois
commit
update top=shirt,bottom=jeans
get top
reset
dump
reset
dump
");

    wardrobe()
        .arg(&path)
        .arg("--print-changes")
        .assert()
        .success()
        .stdout(predicate::str::contains("top = shirt"))
        .stdout(predicate::str::contains("reset: {bottom=jeans, top=shirt}"))
        .stdout(predicate::str::contains("{bottom=underpants, friend=Lois, top=bodysuit}"))
        .stdout(predicate::str::contains("reset: {friend=Lois}"))
        .stdout(predicate::str::ends_with("{bottom=underpants, top=bodysuit}\n"));
}

#[test]
fn print_state_shows_final_entries() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "set b 2\nset a 1\ncommit\nclear\nreset\ndelete b\n");

    wardrobe()
        .arg(&path)
        .arg("--print-state")
        .assert()
        .success()
        .stdout("{a=1}\n");
}

#[test]
fn reset_without_layer_fails() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "set a 1\nreset\nget a\n");

    wardrobe()
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("reset called without an open layer!"))
        .stderr(predicate::str::contains("script failed due to 1 error"));
}

#[test]
fn keep_going_counts_every_failure() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "get missing\nupdate a=1 b=2\nset a 1\nget a\ndelete nope\n");

    wardrobe()
        .arg(&path)
        .arg("--keep-going")
        .assert()
        .failure()
        .stdout("a = 1\n")
        .stderr(predicate::str::contains("key not found: \"missing\""))
        .stderr(predicate::str::contains("update expected at most 1 source, got 2"))
        .stderr(predicate::str::contains("script failed due to 3 errors"));
}

#[test]
fn parse_errors_point_at_line() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "set a 1\nfrobnicate a\n");

    wardrobe()
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown command: 'frobnicate'"))
        .stderr(predicate::str::contains(":2:1"));
}

#[test]
fn open_layers_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "commit\ncommit\ndepth\n");

    wardrobe()
        .arg(&path)
        .assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains("script ended with 2 layers still open"));
}

#[test]
fn missing_script_is_rejected() {
    let dir = TempDir::new().unwrap();

    wardrobe()
        .arg(dir.child("nope.wd").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid script file"));
}
