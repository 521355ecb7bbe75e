use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use tempfile::tempdir;

fn quizr() -> Command {
    let mut cmd = Command::cargo_bin("quizr").unwrap();
    // keep the user's stored settings and log out of the picture
    let home = tempdir().unwrap().into_path();
    cmd.env("HOME", &home).env("XDG_CONFIG_HOME", home.join("config"));
    cmd
}

fn write_bank(count: usize) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let records = (0..count)
        .map(|i| {
            serde_json::json!({
                "question": format!("Q{i}?"),
                "answers": ["a", "b", "c", "d"],
                "correct": 0,
                "category": if i % 2 == 0 { "Even" } else { "Odd" },
            })
        })
        .collect::<Vec<_>>();
    let path = dir.path().join("Questions.json");
    fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();
    (dir, path)
}

#[test]
fn rejects_bank_with_four_questions() {
    let (_dir, path) = write_bank(4);

    let output = quizr().arg("-q").arg(&path).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not enough questions"), "stderr: {stderr}");
}

#[test]
fn rejects_missing_bank_file() {
    let dir = tempdir().unwrap();

    let output = quizr()
        .arg("--questions")
        .arg(dir.path().join("missing.json"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not read question file"));
}

#[test]
fn lists_categories_of_a_valid_bank() {
    let (_dir, path) = write_bank(6);

    let output = quizr()
        .arg("-q")
        .arg(&path)
        .arg("--list-categories")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Even\nOdd\n");
}

#[test]
fn valid_bank_without_tty_is_refused() {
    let (_dir, path) = write_bank(5);

    let output = quizr().arg("-q").arg(&path).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("stdin must be a tty"));
}

#[test]
fn zero_questions_per_game_is_refused() {
    let (_dir, path) = write_bank(5);

    let output = quizr().arg("-q").arg(&path).args(["-n", "0"]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a session needs at least one question"), "stderr: {stderr}");
}

#[test]
fn zero_seconds_per_question_is_refused() {
    let (_dir, path) = write_bank(5);

    let output = quizr().arg("-q").arg(&path).args(["-s", "0"]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seconds per question must be at least 1"), "stderr: {stderr}");
}
