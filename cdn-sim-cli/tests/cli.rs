use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;

fn sample_request() -> &'static str {
    r#"{
        "coordinates": [50.0, 50.0],
        "nodeCoordinates": [[10.0, 10.0], [90.0, 90.0]],
        "userCoordinates": [[0.0, 0.0]],
        "cachePolicy": 0,
        "cacheSize": 8,
        "maxConcurrentRequests": 100,
        "rerouteRequests": false
    }"#
}

#[test]
fn runs_end_to_end_from_stdin_and_emits_json_output() {
    let mut cmd = Command::cargo_bin("cdn-sim").unwrap();
    cmd.arg("--seed").arg("1");
    cmd.write_stdin(sample_request());
    let assert = cmd.assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON output");
    assert!(parsed.get("total_requests").is_some());
    assert!(parsed["total_requests"].as_u64().unwrap() > 0);
}

#[test]
fn same_seed_is_deterministic() {
    let run = || {
        let mut cmd = Command::cargo_bin("cdn-sim").unwrap();
        cmd.arg("--seed").arg("99");
        cmd.write_stdin(sample_request());
        let assert = cmd.assert().success();
        String::from_utf8_lossy(&assert.get_output().stdout).to_string()
    };
    assert_eq!(run(), run());
}

#[test]
fn reads_from_file_and_writes_to_file() {
    let mut input_file = tempfile::NamedTempFile::new().unwrap();
    input_file.write_all(sample_request().as_bytes()).unwrap();
    let output_file = tempfile::NamedTempFile::new().unwrap();

    let mut cmd = Command::cargo_bin("cdn-sim").unwrap();
    cmd.arg("--input")
        .arg(input_file.path())
        .arg("--output")
        .arg(output_file.path())
        .arg("--seed")
        .arg("3");
    cmd.assert().success();

    let contents = std::fs::read_to_string(output_file.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert!(parsed.get("cache_hit_percentage").is_some());
}

#[test]
fn unknown_cache_policy_fails_with_a_clear_message() {
    let bad = r#"{
        "coordinates": [0.0, 0.0],
        "nodeCoordinates": [[0.0, 0.0]],
        "userCoordinates": [],
        "cachePolicy": 9,
        "cacheSize": 8,
        "maxConcurrentRequests": 100,
        "rerouteRequests": false
    }"#;
    let mut cmd = Command::cargo_bin("cdn-sim").unwrap();
    cmd.write_stdin(bad);
    cmd.assert().failure().stderr(contains("cachePolicy"));
}
