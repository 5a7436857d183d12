use assert_cmd::cargo::cargo_bin_cmd;
use runstream_testing::{TestWorld, fixtures};
use serde_json::Value;

fn validation_json(world: &TestWorld, fixture: &std::path::Path) -> Value {
    let mut cmd = cargo_bin_cmd!("runstream");
    world
        .configure_command(&mut cmd)
        .arg("validation")
        .arg(fixture);
    let output = cmd.output().expect("Failed to run validation");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("validation prints JSON")
}

#[test]
fn test_recorded_failure_is_error() {
    let world = TestWorld::new();
    let fixture =
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/validation_run.jsonl");
    let json = validation_json(&world, &fixture);

    assert_eq!(json["status"], "error");
    assert_eq!(json["digest"], "sha256:9f2c");
    assert_eq!(json["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["messages"][0]["code"], "required");
    assert!(json["last_run_at"].is_string());
}

#[test]
fn test_successful_run_is_success() {
    let world = TestWorld::new();
    let fixture = world
        .write_fixture("ok.jsonl", &fixtures::successful_validation_run())
        .unwrap();
    let json = validation_json(&world, &fixture);

    assert_eq!(json["status"], "success");
    assert_eq!(json["error"], Value::Null);
}

#[test]
fn test_empty_recording_is_idle() {
    let world = TestWorld::new();
    let fixture = world.write_raw_fixture("empty.jsonl", "").unwrap();
    let json = validation_json(&world, &fixture);

    assert_eq!(json["status"], "idle");
    assert_eq!(json["messages"], serde_json::json!([]));
}
