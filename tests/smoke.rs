use assert_cmd::Command;

const SAMPLE_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_model.json");

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("epi-diagnose").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn diagnose_reads_stdin_and_prints_json() {
    let output = Command::cargo_bin("epi-diagnose")
        .expect("binary exists")
        .env_remove("RUST_LOG")
        .args(["diagnose", "--model", SAMPLE_MODEL])
        .write_stdin("Doctors confirmed TB and a fever.")
        .output()
        .expect("command runs");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(value["diseases"][0]["name"], "Tuberculosis");
    assert_eq!(value["keywordsFound"][0]["name"], "TB");
}

#[test]
fn batch_emits_one_line_per_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.txt"), "hepatitis A in the village").unwrap();
    std::fs::write(dir.path().join("b.txt"), "flu and cough").unwrap();
    std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

    let output = Command::cargo_bin("epi-diagnose")
        .expect("binary exists")
        .args(["batch", "--model", SAMPLE_MODEL, "--concurrency", "2", "--dir"])
        .arg(dir.path())
        .output()
        .expect("command runs");
    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0]["document"].as_str().unwrap().ends_with("a.txt"));
    assert!(lines[1]["result"]["diseases"].is_array());
}

#[test]
fn missing_model_fails() {
    Command::cargo_bin("epi-diagnose")
        .expect("binary exists")
        .env_remove("DIAGNOSE_MODEL_PATH")
        .arg("diagnose")
        .write_stdin("flu")
        .assert()
        .failure();
}
