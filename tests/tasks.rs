// ABOUTME: Integration tests running the tasks against a fake skopeo script.
// ABOUTME: Checks the argument vector the process sees and how its exit code is reported.

use skopeo_tasks::command::{ProcessExecutor, RunError};
use skopeo_tasks::config::Config;
use skopeo_tasks::tasks::{
    self, CopyParams, InspectParams, LoginParams, TaskErrorKind, TaskKind,
};
use skopeo_tasks::types::Secret;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Prints every argument on its own line.
const ECHO_ARGS: &str = "#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\"; done\n";

fn create_script(dir: &TempDir, name: &str, script: &str, mode: u32) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(mode);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn fake_skopeo(dir: &TempDir, script: &str) -> Config {
    let path = create_script(dir, "skopeo", script, 0o755);
    Config::default().with_executable(path.to_string_lossy())
}

fn login_params() -> LoginParams {
    LoginParams {
        registry: Some("registry.example".to_string()),
        username: Some("U".to_string()),
        password: Some(Secret::new("P")),
        tls_verify: Some(false),
        verbose: None,
    }
}

#[tokio::test]
async fn copy_passes_arguments_in_order() {
    let dir = TempDir::new().unwrap();
    let config = fake_skopeo(&dir, ECHO_ARGS);
    let params = CopyParams {
        src_image: Some("docker://a/i:1".to_string()),
        dest_image: Some("docker://b/i:1".to_string()),
        dest_username: Some("bob".to_string()),
        dest_password: Some(Secret::new("s3cret")),
        ..Default::default()
    };

    let response = tasks::run(params, false, &config, &ProcessExecutor).await;

    assert!(response.is_success());
    assert!(response.changed);
    assert_eq!(response.return_code, Some(0));
    assert_eq!(
        response.stdout_lines.unwrap(),
        [
            "copy",
            "--src-tls-verify=true",
            "--dest-tls-verify=true",
            "--dest-creds=bob:s3cret",
            "docker://a/i:1",
            "docker://b/i:1",
        ]
    );
    assert!(response.cmd.unwrap().contains(&"--dest-creds=bob:********".to_string()));
}

#[tokio::test]
async fn login_passes_arguments_in_order() {
    let dir = TempDir::new().unwrap();
    let config = fake_skopeo(&dir, ECHO_ARGS);

    let response = tasks::run(login_params(), false, &config, &ProcessExecutor).await;

    assert!(response.is_success());
    assert!(!response.changed);
    assert_eq!(
        response.stdout_lines.unwrap(),
        [
            "login",
            "--username=U",
            "--password=P",
            "--tls-verify=false",
            "--verbose=false",
            "registry.example",
        ]
    );
}

#[tokio::test]
async fn inspect_returns_skopeo_stdout() {
    let dir = TempDir::new().unwrap();
    let config = fake_skopeo(
        &dir,
        "#!/bin/sh\necho '{\"Name\": \"quay.dev/my/image\"}'\n",
    );
    let params = InspectParams {
        image_name: Some("docker://quay.dev/my/image:tag".to_string()),
        username: Some("me".to_string()),
        password: Some(Secret::new("pw")),
        tls_verify: None,
    };

    let response = tasks::run(params, false, &config, &ProcessExecutor).await;

    assert!(response.is_success());
    assert!(!response.changed);
    let metadata: serde_json::Value =
        serde_json::from_str(response.stdout.as_deref().unwrap()).unwrap();
    assert_eq!(metadata["Name"], "quay.dev/my/image");
}

#[tokio::test]
async fn nonzero_exit_is_a_failed_response() {
    let dir = TempDir::new().unwrap();
    let config = fake_skopeo(
        &dir,
        "#!/bin/sh\necho 'error: unauthorized' >&2\nexit 1\n",
    );

    let response = tasks::run(login_params(), false, &config, &ProcessExecutor).await;

    assert!(!response.is_success());
    assert!(!response.changed);
    assert_eq!(response.return_code, Some(1));
    assert_eq!(response.msg.as_deref(), Some("error: unauthorized\n"));
    assert_eq!(response.stderr_lines.unwrap(), ["error: unauthorized"]);
}

#[tokio::test]
async fn failed_copy_is_not_changed() {
    let dir = TempDir::new().unwrap();
    let config = fake_skopeo(&dir, "#!/bin/sh\nexit 2\n");
    let params = CopyParams {
        src_image: Some("docker://a/i:1".to_string()),
        dest_image: Some("docker://b/i:1".to_string()),
        ..Default::default()
    };

    let response = tasks::run(params, false, &config, &ProcessExecutor).await;

    assert!(!response.is_success());
    assert!(!response.changed);
    assert_eq!(response.return_code, Some(2));
    assert_eq!(response.msg.as_deref(), Some("skopeo copy exited with code 2"));
}

#[tokio::test]
async fn copy_in_check_mode_never_runs() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let script = format!("#!/bin/sh\ntouch '{}'\n", marker.display());
    let config = fake_skopeo(&dir, &script);
    let params = CopyParams {
        src_image: Some("docker://a/i:1".to_string()),
        dest_image: Some("docker://b/i:1".to_string()),
        ..Default::default()
    };

    let response = tasks::run(params, true, &config, &ProcessExecutor).await;

    assert!(!marker.exists());
    assert!(!response.is_success());
    assert!(response.msg.unwrap().contains("check mode"));
}

#[tokio::test]
async fn missing_executable_is_an_operational_fault() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_executable(dir.path().join("nope").to_string_lossy());
    let (task, _) = tasks::prepare(login_params()).unwrap();

    let err = tasks::execute(&task, &config, &ProcessExecutor, false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), TaskErrorKind::ExecutableNotFound);
}

#[tokio::test]
async fn non_executable_file_is_permission_denied() {
    let dir = TempDir::new().unwrap();
    let path = create_script(&dir, "skopeo", ECHO_ARGS, 0o644);
    let config = Config::default().with_executable(path.to_string_lossy());

    let response = tasks::run(login_params(), false, &config, &ProcessExecutor).await;

    assert!(!response.is_success());
    assert_eq!(response.return_code, None);
    assert!(response.msg.unwrap().contains("permission denied"));
}

#[tokio::test]
async fn slow_skopeo_times_out() {
    let dir = TempDir::new().unwrap();
    let config = fake_skopeo(&dir, "#!/bin/sh\nsleep 10\n")
        .with_timeout(std::time::Duration::from_millis(200));
    let invocation = config.invocation().with_arg(TaskKind::Login.operation());

    let err = invocation.run().await.unwrap_err();

    assert!(matches!(err, RunError::Timeout { .. }));
}
