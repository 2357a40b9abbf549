//! CLI behavior tests: exit codes, output formats, init, analyze.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const STRONG: &str = "test-data/cohort/strong.json";
const WEAK: &str = "test-data/cohort/weak.json";
const COHORT: &str = "test-data/cohort";
const INVALID: &str = "test-data/invalid-assignment.json";
const STRONG_ANSWER: &str = "test-data/answer-strong.txt";

fn rubric_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rubric"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = rubric_cmd();
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("PATH"));
}

#[test]
fn strong_submission_grades_a() {
    let mut cmd = rubric_cmd();
    cmd.arg(STRONG);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Grade: SUB_TIMING_STRONG"))
        .stdout(predicate::str::contains("27 / 30 points"))
        .stdout(predicate::str::contains("90%"));
}

#[test]
fn below_threshold_exit_1() {
    let mut cmd = rubric_cmd();
    cmd.arg(WEAK).arg("--threshold").arg("60");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("below threshold 60%"));
}

#[test]
fn above_threshold_exit_0() {
    let mut cmd = rubric_cmd();
    cmd.arg(STRONG).arg("--threshold").arg("90");
    cmd.assert().success();
}

#[test]
fn quiet_output_one_line_per_submission() {
    let mut cmd = rubric_cmd();
    cmd.arg(WEAK).arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::eq("SUB_TIMING_WEAK: 13% (F)\n"));
}

#[test]
fn json_output_valid() {
    let mut cmd = rubric_cmd();
    cmd.arg(STRONG).arg("--json").arg("--grader").arg("ta-maria");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let s = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");
    assert_eq!(parsed["submissionId"], "SUB_TIMING_STRONG");
    assert_eq!(parsed["assignmentId"], "PD_TIMING_1");
    assert_eq!(parsed["questionScores"], serde_json::json!([9, 9, 9]));
    assert_eq!(parsed["totalScore"], 27);
    assert_eq!(parsed["percentage"], 90);
    assert_eq!(parsed["letterGrade"], "A");
    assert_eq!(parsed["gradedBy"], "ta-maria");
}

#[test]
fn directory_reports_summary_and_skips_graded() {
    let mut cmd = rubric_cmd();
    cmd.arg(COHORT).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let s = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");

    let results = parsed["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    // Files are visited in sorted path order
    assert_eq!(results[0]["submissionId"], "SUB_TIMING_STRONG");
    assert_eq!(results[1]["submissionId"], "SUB_TIMING_WEAK");
    assert_eq!(parsed["summary"]["submissionsGraded"], 2);
    assert_eq!(parsed["summary"]["averagePercentage"], 51);
    assert_eq!(parsed["skipped"][0]["submissionId"], "SUB_TIMING_DONE");
}

#[test]
fn directory_average_is_checked_against_threshold() {
    let mut cmd = rubric_cmd();
    cmd.arg(COHORT).arg("--threshold").arg("52").arg("--quiet");
    cmd.assert().failure().code(1);

    let mut cmd = rubric_cmd();
    cmd.arg(COHORT).arg("--threshold").arg("51").arg("--quiet");
    cmd.assert().success();
}

#[test]
fn parallel_output_matches_sequential() {
    let sequential = rubric_cmd().arg(COHORT).arg("--quiet").output().unwrap();
    let parallel = rubric_cmd()
        .arg(COHORT)
        .arg("--quiet")
        .arg("--parallel")
        .arg("--jobs")
        .arg("2")
        .output()
        .unwrap();
    assert_eq!(sequential.stdout, parallel.stdout);
}

#[test]
fn invalid_assignment_exit_2() {
    let mut cmd = rubric_cmd();
    cmd.arg(INVALID);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid assignment"));
}

#[test]
fn file_not_found_exit_2() {
    let mut cmd = rubric_cmd();
    cmd.arg("test-data/does-not-exist.json");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn malformed_submission_is_reported_and_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(STRONG, dir.path().join("a.json")).unwrap();
    fs::write(dir.path().join("b.json"), "{ not json").unwrap();

    let mut cmd = rubric_cmd();
    cmd.arg(dir.path()).arg("--quiet");
    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("SUB_TIMING_STRONG: 90% (A)"))
        .stderr(predicate::str::contains("Invalid submission JSON"));
}

#[test]
fn load_error_outranks_threshold() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(WEAK, dir.path().join("a.json")).unwrap();
    fs::write(dir.path().join("b.json"), "{ not json").unwrap();

    // Weak misses the threshold, but the broken file decides the exit code
    let mut cmd = rubric_cmd();
    cmd.arg(dir.path()).arg("--threshold").arg("60").arg("--quiet");
    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("SUB_TIMING_WEAK: 13% (F)"))
        .stderr(predicate::str::contains("Invalid submission JSON"));
}

#[test]
fn extended_config_is_not_graded() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(STRONG, dir.path().join("strong.json")).unwrap();
    fs::write(dir.path().join("base.json"), r#"{ "threshold": 50 }"#).unwrap();
    fs::write(dir.path().join(".rubricrc.json"), r#"{ "extends": "./base" }"#).unwrap();

    let mut cmd = rubric_cmd();
    cmd.arg(dir.path()).arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::eq("SUB_TIMING_STRONG: 90% (A)\n"))
        .stderr(predicate::str::contains("base.json").not());
}

#[test]
fn config_threshold_and_ignore_apply() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(WEAK, dir.path().join("weak.json")).unwrap();
    fs::create_dir(dir.path().join("drafts")).unwrap();
    fs::copy(STRONG, dir.path().join("drafts").join("strong.json")).unwrap();
    fs::write(
        dir.path().join(".rubricrc.json"),
        r#"{ "threshold": 10, "ignore": ["**/drafts/**"], "grader": "ta-bot" }"#,
    )
    .unwrap();

    let mut cmd = rubric_cmd();
    cmd.arg(dir.path()).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["submissionId"], "SUB_TIMING_WEAK");
    assert_eq!(parsed["gradedBy"], "ta-bot");

    // CLI threshold wins over the config file
    let mut cmd = rubric_cmd();
    cmd.arg(dir.path()).arg("--threshold").arg("50").arg("--quiet");
    cmd.assert().failure().code(1);
}

#[test]
fn config_keywords_change_scores() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(STRONG, dir.path().join("strong.json")).unwrap();
    fs::write(
        dir.path().join(".rubricrc.json"),
        r#"{ "keywords": { "examples": ["e.g."] } }"#,
    )
    .unwrap();

    // Without "for example" recognised each answer drops to 75 -> 8 of 10
    let mut cmd = rubric_cmd();
    cmd.arg(dir.path()).arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::eq("SUB_TIMING_STRONG: 80% (B)\n"));
}

#[test]
fn analyze_from_file() {
    let mut cmd = rubric_cmd();
    cmd.args(["analyze", "--topic", "timing", "--file", STRONG_ANSWER]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer analysis (timing)"))
        .stdout(predicate::str::contains("90%"))
        .stdout(predicate::str::contains("Good length and detail"));
}

#[test]
fn analyze_from_stdin_json() {
    let mut cmd = rubric_cmd();
    cmd.args(["analyze", "--topic", "power", "--json"])
        .write_stdin("A brief answer. With two sentences.");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["score"], 20);
    assert_eq!(parsed["wordCount"], 6);
    assert_eq!(parsed["hasExamples"], false);
    assert_eq!(parsed["feedback"].as_array().unwrap().len(), 5);
}

#[test]
fn analyze_blank_answer() {
    let mut cmd = rubric_cmd();
    cmd.args(["analyze", "--topic", "power", "--json"]).write_stdin("   \n");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["score"], 0);
    assert_eq!(parsed["feedback"], serde_json::json!(["No answer provided."]));
}

#[test]
fn init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = rubric_cmd();
    cmd.args(["init", "--threshold", "75", "--dir"]).arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("threshold=75"));

    let content = fs::read_to_string(dir.path().join(".rubricrc.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["threshold"], 75);
    assert_eq!(parsed["grader"], "auto-grader");
}

#[test]
fn init_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".rubricrc.json");
    fs::write(&path, r#"{ "threshold": 40 }"#).unwrap();

    let mut cmd = rubric_cmd();
    cmd.args(["init", "--dir"]).arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{ "threshold": 40 }"#);
}
