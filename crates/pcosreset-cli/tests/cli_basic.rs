//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

const SECRETS: [&str; 4] = [
    "STRIPE_SECRET_KEY",
    "OPENAI_API_KEY",
    "GOOGLE_AI_API_KEY",
    "SUPABASE_SERVICE_ROLE_KEY",
];

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pcosreset-cli"));
    cmd.args(args).env("PCOSRESET_DATA_DIR", data_dir);
    for var in SECRETS {
        cmd.env_remove(var);
    }
    let output = cmd.output().expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

/// All JSON documents printed on stdout, in order.
fn json_docs(stdout: &str) -> Vec<Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .expect("stdout is a JSON stream")
}

fn last_doc(stdout: &str) -> Value {
    json_docs(stdout).pop().expect("at least one JSON document")
}

#[test]
fn test_quiz_start_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let docs = json_docs(&run_ok(dir.path(), &["quiz", "start"]));
    assert_eq!(docs[0]["type"], "StateSnapshot");
    assert_eq!(docs[1]["step"], 1);
    assert_eq!(docs[1]["question"]["id"], "age-range");

    let page = last_doc(&run_ok(dir.path(), &["quiz", "show"]));
    assert_eq!(page["sessionId"], docs[1]["sessionId"]);
}

#[test]
fn test_quiz_answer_advances_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let docs = json_docs(&run_ok(dir.path(), &["quiz", "answer", "27-40"]));
    let kinds: Vec<_> = docs.iter().filter_map(|d| d["type"].as_str()).collect();
    assert_eq!(kinds, ["AnswerRecorded", "StepAdvanced"]);
    assert_eq!(docs.last().unwrap()["step"], 2);

    let page = last_doc(&run_ok(dir.path(), &["quiz", "answer", "acne", "fatigue"]));
    assert_eq!(page["answer"], serde_json::json!(["acne", "fatigue"]));
    assert_eq!(page["canContinue"], true);

    let state = last_doc(&run_ok(dir.path(), &["quiz", "status"]));
    assert_eq!(state["currentStep"], 2);
    assert_eq!(state["responses"]["age-range"], "27-40");
}

#[test]
fn test_quiz_rejects_unknown_option() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["quiz", "answer", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_quiz_goto_out_of_range_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let docs = json_docs(&run_ok(dir.path(), &["quiz", "goto", "99"]));
    assert_eq!(docs[0]["type"], "Redirected");
    assert_eq!(docs[1]["step"], 1);

    let docs = json_docs(&run_ok(dir.path(), &["quiz", "goto", "-1"]));
    assert_eq!(docs[0]["type"], "Redirected");
}

#[test]
fn test_quiz_complete_lists_missing() {
    let dir = tempfile::tempdir().unwrap();
    let report = last_doc(&run_ok(dir.path(), &["quiz", "complete"]));
    assert_eq!(report["complete"], false);
    assert_eq!(report["missing"].as_array().unwrap().len(), 15);

    let (_, stderr, code) = run_cli(dir.path(), &["quiz", "profile"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("current weight"));
}

#[test]
fn test_metrics_bmi() {
    let dir = tempfile::tempdir().unwrap();
    let out = last_doc(&run_ok(
        dir.path(),
        &["metrics", "bmi", "--weight", "70", "--height", "175"],
    ));
    assert_eq!(out["bmi"], 22.9);
    assert_eq!(out["category"], "Normal");
    assert!(out["healthRisks"].as_array().unwrap().is_empty());

    let (_, _, code) = run_cli(dir.path(), &["metrics", "bmi", "--weight", "70", "--height", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_metrics_convert() {
    let dir = tempfile::tempdir().unwrap();
    let out = last_doc(&run_ok(dir.path(), &["metrics", "convert", "150", "lbs"]));
    assert_eq!(out["kg"], 68.0);
    let out = last_doc(&run_ok(dir.path(), &["metrics", "convert", "170", "cm"]));
    assert_eq!(out["feet"], 5);
    assert_eq!(out["inches"], 7);
}

#[test]
fn test_checkout_plans_and_unconfigured_create() {
    let dir = tempfile::tempdir().unwrap();
    let plans = last_doc(&run_ok(dir.path(), &["checkout", "plans"]));
    assert_eq!(plans.as_array().unwrap().len(), 9);
    assert_eq!(plans[1]["price"], "$15.19");

    let (_, stderr, code) = run_cli(dir.path(), &["checkout", "create", "1month"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not configured"), "stderr: {stderr}");
}

#[test]
fn test_config_set_get_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "funnel.auto_advance", "false"]);
    let value = run_ok(dir.path(), &["config", "get", "funnel.auto_advance"]);
    assert_eq!(value.trim(), "false");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "funnel.auto_advance", "maybe"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "funnel.nope"]);
    assert_eq!(code, 1);

    // auto_advance off: a single choice no longer moves the pointer.
    let page = last_doc(&run_ok(dir.path(), &["quiz", "answer", "18-27"]));
    assert_eq!(page["step"], 1);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let script = run_ok(dir.path(), &["completions", "bash"]);
    assert!(script.contains("pcosreset-cli"));
}
