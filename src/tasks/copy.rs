// ABOUTME: skopeo copy task: copies an image between registries or transports.
// ABOUTME: Credential flags are only emitted when both halves of a pair are given.

use serde::{Deserialize, Serialize};

use super::params::{ansible_bool, check_required, credential_pair, image_option};
use super::{ParamsError, Task, TaskKind, TaskParams};
use crate::command::Invocation;
use crate::diagnostics::Diagnostics;
use crate::types::{Credentials, ImageRef, Secret};

/// Options accepted by the copy task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyParams {
    pub src_image: Option<String>,
    pub dest_image: Option<String>,
    #[serde(default, deserialize_with = "ansible_bool::deserialize")]
    pub src_tls_verify: Option<bool>,
    #[serde(default, deserialize_with = "ansible_bool::deserialize")]
    pub dest_tls_verify: Option<bool>,
    pub src_username: Option<String>,
    pub src_password: Option<Secret>,
    pub dest_username: Option<String>,
    pub dest_password: Option<Secret>,
}

impl TaskParams for CopyParams {
    type Task = CopyTask;

    const KIND: TaskKind = TaskKind::Copy;

    const OPTIONS: &'static [&'static str] = &[
        "dest_image",
        "dest_password",
        "dest_tls_verify",
        "dest_username",
        "src_image",
        "src_password",
        "src_tls_verify",
        "src_username",
    ];

    fn into_task(self, diag: &mut Diagnostics) -> Result<CopyTask, ParamsError> {
        check_required(&[
            ("src_image", self.src_image.is_some()),
            ("dest_image", self.dest_image.is_some()),
        ])?;

        let src = image_option("src_image", self.src_image.as_deref().unwrap_or_default(), diag)?;
        let dest = image_option(
            "dest_image",
            self.dest_image.as_deref().unwrap_or_default(),
            diag,
        )?;

        let mut task = CopyTask::new(src, dest)
            .with_src_tls_verify(self.src_tls_verify.unwrap_or(true))
            .with_dest_tls_verify(self.dest_tls_verify.unwrap_or(true));

        if let Some(creds) = credential_pair("src", self.src_username, self.src_password, diag) {
            task = task.with_src_credentials(creds);
        }
        if let Some(creds) = credential_pair("dest", self.dest_username, self.dest_password, diag)
        {
            task = task.with_dest_credentials(creds);
        }

        Ok(task)
    }
}

/// A validated `skopeo copy`.
#[derive(Debug, Clone)]
pub struct CopyTask {
    src: ImageRef,
    dest: ImageRef,
    src_tls_verify: bool,
    dest_tls_verify: bool,
    src_creds: Option<Credentials>,
    dest_creds: Option<Credentials>,
}

impl CopyTask {
    /// Copy without credentials, verifying TLS on both sides.
    pub fn new(src: ImageRef, dest: ImageRef) -> Self {
        Self {
            src,
            dest,
            src_tls_verify: true,
            dest_tls_verify: true,
            src_creds: None,
            dest_creds: None,
        }
    }

    pub fn with_src_tls_verify(mut self, verify: bool) -> Self {
        self.src_tls_verify = verify;
        self
    }

    pub fn with_dest_tls_verify(mut self, verify: bool) -> Self {
        self.dest_tls_verify = verify;
        self
    }

    pub fn with_src_credentials(mut self, creds: Credentials) -> Self {
        self.src_creds = Some(creds);
        self
    }

    pub fn with_dest_credentials(mut self, creds: Credentials) -> Self {
        self.dest_creds = Some(creds);
        self
    }

    pub fn src(&self) -> &ImageRef {
        &self.src
    }

    pub fn dest(&self) -> &ImageRef {
        &self.dest
    }
}

impl Task for CopyTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Copy
    }

    fn mutating(&self) -> bool {
        true
    }

    fn invocation(&self, base: Invocation) -> Invocation {
        let mut inv = base
            .with_arg(TaskKind::Copy.operation())
            .with_arg(format!("--src-tls-verify={}", self.src_tls_verify))
            .with_arg(format!("--dest-tls-verify={}", self.dest_tls_verify));

        if let Some(ref creds) = self.src_creds {
            inv = inv.with_sensitive_arg(
                format!("--src-creds={}", creds.expose_pair()),
                format!("--src-creds={}", creds.redacted_pair()),
            );
        }
        if let Some(ref creds) = self.dest_creds {
            inv = inv.with_sensitive_arg(
                format!("--dest-creds={}", creds.expose_pair()),
                format!("--dest-creds={}", creds.redacted_pair()),
            );
        }

        inv.with_arg(self.src.as_str()).with_arg(self.dest.as_str())
    }
}
