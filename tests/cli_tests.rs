//! Smoke tests for the veridiff CLI binary.

mod common;

use assert_cmd::Command;
use common::Fixtures;
use predicates::prelude::*;

fn veridiff() -> Command {
    Command::cargo_bin("veridiff").expect("binary under test")
}

#[test]
fn diff_of_identical_files_passes() {
    let fx = Fixtures::new();
    let a = fx.write("a.txt", b"A\nB\nC");
    let b = fx.write("b.txt", b"A\nB\nC");

    veridiff()
        .arg("diff")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"));
}

#[test]
fn diff_of_differing_files_fails_with_diagnostic() {
    let fx = Fixtures::new();
    let a = fx.write("a.txt", b"A\nB\nC");
    let b = fx.write("b.txt", b"A\nX\nC");

    veridiff()
        .arg("diff")
        .arg(&a)
        .arg(&b)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("Comparison failed"));
}

#[test]
fn lines_diff_option_is_honored() {
    let fx = Fixtures::new();
    let a = fx.write("a.txt", b"A\nB\nC");
    let b = fx.write("b.txt", b"A\nX\nC");

    veridiff()
        .arg("diff")
        .arg(&a)
        .arg(&b)
        .arg("--lines-diff")
        .arg("1")
        .assert()
        .success();
}

#[test]
fn delta_bounds_are_wired_through() {
    let fx = Fixtures::new();
    let a = fx.write("a.txt", b"12345");
    let b = fx.write("b.txt", b"1234567890");

    veridiff()
        .arg("delta")
        .arg(&a)
        .arg(&b)
        .arg("--delta")
        .arg("5")
        .assert()
        .success();

    veridiff()
        .arg("delta")
        .arg(&a)
        .arg(&b)
        .arg("--delta")
        .arg("4")
        .assert()
        .failure();
}

#[test]
fn re_match_multiline_spans_newlines() {
    let fx = Fixtures::new();
    let pattern = fx.write("pattern.txt", b".*");
    let data = fx.write("data.txt", b"A\nB\nC");

    veridiff()
        .arg("re-match-multiline")
        .arg(&pattern)
        .arg(&data)
        .assert()
        .success();
}

#[test]
fn image_diff_rejects_unknown_metric() {
    let fx = Fixtures::new();
    let a = fx.write("a.txt", b"irrelevant");

    veridiff()
        .arg("image-diff")
        .arg(&a)
        .arg(&a)
        .arg("--metric")
        .arg("manhattan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown metric"));
}

#[test]
fn missing_file_reports_read_failure() {
    veridiff()
        .arg("diff")
        .arg("/no/such/left")
        .arg("/no/such/right")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
