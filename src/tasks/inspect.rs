// ABOUTME: skopeo inspect task: prints an image's metadata as JSON on stdout.
// ABOUTME: Read-only; credentials are required and passed through --creds.

use serde::{Deserialize, Serialize};

use super::params::{ansible_bool, check_required, image_option};
use super::{ParamsError, Task, TaskKind, TaskParams};
use crate::command::Invocation;
use crate::diagnostics::Diagnostics;
use crate::types::{Credentials, ImageRef, Secret};

/// Options accepted by the inspect task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectParams {
    pub image_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<Secret>,
    #[serde(default, deserialize_with = "ansible_bool::deserialize")]
    pub tls_verify: Option<bool>,
}

impl TaskParams for InspectParams {
    type Task = InspectTask;

    const KIND: TaskKind = TaskKind::Inspect;

    const OPTIONS: &'static [&'static str] = &["image_name", "password", "tls_verify", "username"];

    fn into_task(self, diag: &mut Diagnostics) -> Result<InspectTask, ParamsError> {
        check_required(&[
            ("image_name", self.image_name.is_some()),
            ("username", self.username.is_some()),
            ("password", self.password.is_some()),
        ])?;

        let image = image_option(
            "image_name",
            self.image_name.as_deref().unwrap_or_default(),
            diag,
        )?;
        let creds = Credentials::new(
            self.username.unwrap_or_default(),
            self.password.unwrap_or_else(|| Secret::new("")),
        );

        Ok(InspectTask::new(image, creds).with_tls_verify(self.tls_verify.unwrap_or(true)))
    }
}

/// A validated `skopeo inspect`.
#[derive(Debug, Clone)]
pub struct InspectTask {
    image: ImageRef,
    creds: Credentials,
    tls_verify: bool,
}

impl InspectTask {
    pub fn new(image: ImageRef, creds: Credentials) -> Self {
        Self {
            image,
            creds,
            tls_verify: true,
        }
    }

    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }
}

impl Task for InspectTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Inspect
    }

    fn invocation(&self, base: Invocation) -> Invocation {
        base.with_arg(TaskKind::Inspect.operation())
            .with_sensitive_arg(
                format!("--creds={}", self.creds.expose_pair()),
                format!("--creds={}", self.creds.redacted_pair()),
            )
            .with_arg(format!("--tls-verify={}", self.tls_verify))
            .with_arg(self.image.as_str())
    }
}
