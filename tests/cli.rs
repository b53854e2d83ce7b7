// ABOUTME: Integration tests for the skopeo-tasks binary.
// ABOUTME: Covers --help, task subcommands, and Ansible module mode via subcommand and argv[0].

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ECHO_ARGS: &str = "#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\"; done\n";

fn skopeo_tasks_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("skopeo-tasks"));
    cmd.env_remove("SKOPEO_TASKS_EXECUTABLE")
        .env_remove("SKOPEO_TASKS_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn fake_skopeo(dir: &TempDir, script: &str) -> PathBuf {
    let path = dir.path().join("skopeo");
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn write_args(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("args.json");
    fs::write(&path, json).unwrap();
    path
}

fn parse_response(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).unwrap()
}

#[test]
fn help_shows_commands() {
    skopeo_tasks_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("module"));
}

#[test]
fn login_prints_skopeo_output() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, ECHO_ARGS);

    skopeo_tasks_cmd()
        .current_dir(dir.path())
        .arg("--executable")
        .arg(&skopeo)
        .args(["login", "registry.example", "--username", "U", "--password", "P"])
        .args(["--tls-verify", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tls-verify=false\n"))
        .stdout(predicate::str::contains("registry.example\n"))
        .stderr(predicate::str::contains("--password=********"));
}

#[test]
fn json_flag_prints_response() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, ECHO_ARGS);

    let output = skopeo_tasks_cmd()
        .current_dir(dir.path())
        .env("SKOPEO_TASKS_EXECUTABLE", &skopeo)
        .args(["--json", "copy", "docker://a/i:1", "docker://b/i:1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let response = parse_response(&output.stdout);
    assert_eq!(response["changed"], true);
    assert_eq!(response["return_code"], 0);
    assert_eq!(response["stdout_lines"][0], "copy");
}

#[test]
fn failing_task_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, "#!/bin/sh\necho 'manifest unknown' >&2\nexit 1\n");

    skopeo_tasks_cmd()
        .current_dir(dir.path())
        .arg("--executable")
        .arg(&skopeo)
        .args(["inspect", "docker://quay.dev/x:1", "--username", "u", "--password", "p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: manifest unknown"));
}

#[test]
fn missing_executable_exits_nonzero() {
    let dir = TempDir::new().unwrap();

    skopeo_tasks_cmd()
        .current_dir(dir.path())
        .args(["--executable", "/nonexistent/skopeo"])
        .args(["login", "quay.io", "--username", "u", "--password", "p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("executable not found"));
}

#[test]
fn zero_timeout_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let skopeo = fake_skopeo(&dir, &format!("#!/bin/sh\ntouch '{}'\n", marker.display()));

    skopeo_tasks_cmd()
        .current_dir(dir.path())
        .arg("--executable")
        .arg(&skopeo)
        .args(["--timeout", "0"])
        .args(["login", "quay.io", "--username", "u", "--password", "p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout must be greater than zero"));

    assert!(!marker.exists());
}

#[test]
fn config_file_selects_executable() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, "#!/bin/sh\necho from-config\n");
    fs::write(
        dir.path().join("skopeo-tasks.yml"),
        format!("executable: {}\ntimeout: 30s\n", skopeo.display()),
    )
    .unwrap();

    skopeo_tasks_cmd()
        .current_dir(dir.path())
        .args(["login", "quay.io", "--username", "u", "--password", "p"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-config"));
}

#[test]
fn module_subcommand_reads_wrapped_args() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, ECHO_ARGS);
    let args = write_args(
        dir.path(),
        r#"{"ANSIBLE_MODULE_ARGS": {
            "registry": "registry.example",
            "username": "U",
            "password": "P",
            "tls_verify": false,
            "_ansible_verbosity": 0
        }}"#,
    );

    let output = skopeo_tasks_cmd()
        .current_dir(dir.path())
        .env("SKOPEO_TASKS_EXECUTABLE", &skopeo)
        .arg("module")
        .arg("login")
        .arg(&args)
        .output()
        .unwrap();

    assert!(output.status.success());
    let response = parse_response(&output.stdout);
    assert_eq!(response["changed"], false);
    assert_eq!(
        response["stdout_lines"],
        serde_json::json!([
            "login",
            "--username=U",
            "--password=P",
            "--tls-verify=false",
            "--verbose=false",
            "registry.example"
        ])
    );
    assert_eq!(
        response["invocation"]["module_args"]["password"],
        "VALUE_SPECIFIED_IN_NO_LOG_PARAMETER"
    );
    assert_eq!(response["cmd"][3], "--password=********");
}

#[test]
fn module_mode_reports_unsupported_parameters() {
    let dir = TempDir::new().unwrap();
    let args = write_args(dir.path(), r#"{"image_name": "docker://x", "force": true}"#);

    let output = skopeo_tasks_cmd()
        .current_dir(dir.path())
        .arg("module")
        .arg("skopeo_inspect")
        .arg(&args)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let response = parse_response(&output.stdout);
    assert_eq!(response["failed"], true);
    assert!(
        response["msg"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported parameters for (skopeo_inspect) module: force.")
    );
}

#[test]
fn module_mode_with_malformed_args_file() {
    let dir = TempDir::new().unwrap();
    let args = write_args(dir.path(), "not json");

    let output = skopeo_tasks_cmd()
        .current_dir(dir.path())
        .arg("module")
        .arg("copy")
        .arg(&args)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let response = parse_response(&output.stdout);
    assert_eq!(response["failed"], true);
    assert!(response["msg"].as_str().unwrap().contains("JSON"));
}

#[test]
fn module_mode_copy_in_check_mode() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, ECHO_ARGS);
    let args = write_args(
        dir.path(),
        r#"{"src_image": "docker://a/i:1", "dest_image": "docker://b/i:1",
            "_ansible_check_mode": true}"#,
    );

    let output = skopeo_tasks_cmd()
        .current_dir(dir.path())
        .env("SKOPEO_TASKS_EXECUTABLE", &skopeo)
        .arg("module")
        .arg("copy")
        .arg(&args)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let response = parse_response(&output.stdout);
    assert_eq!(response["changed"], false);
    assert!(response.get("return_code").is_none());
}

#[test]
fn invoked_as_module_name() {
    let dir = TempDir::new().unwrap();
    let skopeo = fake_skopeo(&dir, ECHO_ARGS);
    let module = dir.path().join("skopeo_login");
    std::os::unix::fs::symlink(assert_cmd::cargo::cargo_bin!("skopeo-tasks"), &module).unwrap();
    let args = write_args(
        dir.path(),
        r#"{"registry": "quay.io", "username": "u", "password": "p"}"#,
    );

    let output = std::process::Command::new(&module)
        .current_dir(dir.path())
        .env("SKOPEO_TASKS_EXECUTABLE", &skopeo)
        .env_remove("SKOPEO_TASKS_TIMEOUT")
        .arg(&args)
        .output()
        .unwrap();

    assert!(output.status.success());
    let response = parse_response(&output.stdout);
    assert_eq!(response["stdout_lines"][0], "login");
    assert_eq!(response["stdout_lines"][5], "quay.io");
}
