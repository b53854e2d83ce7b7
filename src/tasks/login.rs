// ABOUTME: skopeo login task: authenticates against a registry.
// ABOUTME: Username and password are passed as separate flags; the password is redacted in logs.

use serde::{Deserialize, Serialize};

use super::params::{ansible_bool, check_required};
use super::{ParamsError, Task, TaskKind, TaskParams};
use crate::command::{Invocation, REDACTED};
use crate::diagnostics::Diagnostics;
use crate::types::{Credentials, Registry, Secret};

/// Options accepted by the login task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginParams {
    pub registry: Option<String>,
    pub username: Option<String>,
    pub password: Option<Secret>,
    #[serde(default, deserialize_with = "ansible_bool::deserialize")]
    pub tls_verify: Option<bool>,
    #[serde(default, deserialize_with = "ansible_bool::deserialize")]
    pub verbose: Option<bool>,
}

impl TaskParams for LoginParams {
    type Task = LoginTask;

    const KIND: TaskKind = TaskKind::Login;

    const OPTIONS: &'static [&'static str] =
        &["password", "registry", "tls_verify", "username", "verbose"];

    fn into_task(self, _diag: &mut Diagnostics) -> Result<LoginTask, ParamsError> {
        check_required(&[
            ("registry", self.registry.is_some()),
            ("username", self.username.is_some()),
            ("password", self.password.is_some()),
        ])?;

        let registry = Registry::new(self.registry.as_deref().unwrap_or_default())?;
        let creds = Credentials::new(
            self.username.unwrap_or_default(),
            self.password.unwrap_or_else(|| Secret::new("")),
        );

        Ok(LoginTask::new(registry, creds)
            .with_tls_verify(self.tls_verify.unwrap_or(true))
            .with_verbose(self.verbose.unwrap_or(false)))
    }
}

/// A validated `skopeo login`.
#[derive(Debug, Clone)]
pub struct LoginTask {
    registry: Registry,
    creds: Credentials,
    tls_verify: bool,
    verbose: bool,
}

impl LoginTask {
    pub fn new(registry: Registry, creds: Credentials) -> Self {
        Self {
            registry,
            creds,
            tls_verify: true,
            verbose: false,
        }
    }

    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Task for LoginTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Login
    }

    fn invocation(&self, base: Invocation) -> Invocation {
        base.with_arg(TaskKind::Login.operation())
            .with_arg(format!("--username={}", self.creds.username))
            .with_sensitive_arg(
                format!("--password={}", self.creds.password.expose()),
                format!("--password={}", REDACTED),
            )
            .with_arg(format!("--tls-verify={}", self.tls_verify))
            .with_arg(format!("--verbose={}", self.verbose))
            .with_arg(self.registry.as_str())
    }
}
