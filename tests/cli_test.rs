// End-to-end tests for the methodscope binary

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/catalog")
        .join(name)
}

/// The binary, run in an empty directory so no config file is discovered.
fn methodscope(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("methodscope").expect("bin");
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("METHODSCOPE_DATA")
        .arg("--plain");
    cmd
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8")
}

#[test]
fn test_validate_exit_codes() {
    let dir = TempDir::new().unwrap();
    methodscope(&dir)
        .arg("--data")
        .arg(fixture("methods.json"))
        .arg("validate")
        .assert()
        .success();

    methodscope(&dir)
        .arg("--data")
        .arg(fixture("invalid_methods.json"))
        .arg("validate")
        .assert()
        .code(1);
}

#[test]
fn test_validate_json_lists_warnings() {
    let dir = TempDir::new().unwrap();
    let output = methodscope(&dir)
        .arg("--data")
        .arg(fixture("invalid_methods.json"))
        .args(["validate", "--format", "json"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["passed"], false);
    assert!(report["warnings"].as_array().is_some_and(|w| !w.is_empty()));
}

#[test]
fn test_missing_dataset_fails() {
    let dir = TempDir::new().unwrap();
    methodscope(&dir)
        .args(["--data", "nope.json", "list"])
        .assert()
        .failure();
}

#[test]
fn test_list_json_respects_filters() {
    let dir = TempDir::new().unwrap();
    let output = methodscope(&dir)
        .arg("--data")
        .arg(fixture("methods.json"))
        .args(["list", "--stage", "collect", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "speech-to-text");
}

#[test]
fn test_show_unknown_method_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let output = methodscope(&dir)
        .arg("--data")
        .arg(fixture("methods.json"))
        .args(["show", "ghost"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Method not found"));
}

#[test]
fn test_render_radar_to_stdout() {
    let dir = TempDir::new().unwrap();
    let output = methodscope(&dir)
        .arg("--data")
        .arg(fixture("methods.json"))
        .args([
            "render",
            "radar",
            "--output",
            "-",
            "--methods",
            "ocr-forms,inductive-miner",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("<svg"));
}

#[test]
fn test_compare_link() {
    let dir = TempDir::new().unwrap();
    let output = methodscope(&dir)
        .arg("--data")
        .arg(fixture("methods.json"))
        .args([
            "compare",
            "--link",
            "https://example.org/compare?methods=ocr-forms,inductive-miner",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Inductive Miner"));
    assert!(text.contains("/compare?methods=ocr-forms,inductive-miner"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    methodscope(&dir).arg("init").assert().success();
    assert!(dir.path().join(".methodscope.toml").exists());
    methodscope(&dir).arg("init").assert().failure();
    methodscope(&dir).args(["init", "--force"]).assert().success();
}
