// ABOUTME: Transport-qualified container image references as skopeo expects them.
// ABOUTME: Handles docker://, oci:, dir:, containers-storage: and friends; renders verbatim.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0:?}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

/// Image transports understood by skopeo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `docker://` registry reference.
    Docker,
    /// `docker-archive:` tarball created by `docker save`.
    DockerArchive,
    /// `docker-daemon:` image stored in the local Docker daemon.
    DockerDaemon,
    /// `oci:` OCI layout directory.
    Oci,
    /// `oci-archive:` tarball of an OCI layout.
    OciArchive,
    /// `dir:` plain directory of manifest, config and layers.
    Dir,
    /// `containers-storage:` local c/storage (Podman, Buildah, CRI-O).
    ContainersStorage,
    /// `sif:` Singularity image file.
    Sif,
}

impl Transport {
    const ALL: [Transport; 8] = [
        Transport::Docker,
        Transport::DockerArchive,
        Transport::DockerDaemon,
        Transport::Oci,
        Transport::OciArchive,
        Transport::Dir,
        Transport::ContainersStorage,
        Transport::Sif,
    ];

    /// Prefix including the separator, e.g. `docker://` or `oci:`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Transport::Docker => "docker://",
            Transport::DockerArchive => "docker-archive:",
            Transport::DockerDaemon => "docker-daemon:",
            Transport::Oci => "oci:",
            Transport::OciArchive => "oci-archive:",
            Transport::Dir => "dir:",
            Transport::ContainersStorage => "containers-storage:",
            Transport::Sif => "sif:",
        }
    }

    pub fn name(&self) -> &'static str {
        self.prefix().trim_end_matches("//").trim_end_matches(':')
    }

    fn detect(input: &str) -> Option<Transport> {
        Self::ALL.into_iter().find(|t| input.starts_with(t.prefix()))
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An image reference passed through to skopeo unchanged.
///
/// The transport is recognised so callers can warn about references
/// skopeo will reject, but the original text is what gets rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    raw: String,
    transport: Option<Transport>,
}

impl ImageRef {
    /// Paths after `dir:`, `oci:` and the archive transports may contain spaces,
    /// so only blank input and control characters are rejected.
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        if input.trim().is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input.chars().find(|c| c.is_control()) {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        // `docker:foo` is a common typo for `docker://foo`
        if input.starts_with("docker:") && !input.starts_with("docker://") {
            return Err(ParseImageRefError::InvalidFormat(format!(
                "{input} (the docker transport is written docker://)"
            )));
        }

        let transport = Transport::detect(input);
        if let Some(t) = transport
            && input.len() == t.prefix().len()
        {
            return Err(ParseImageRefError::InvalidFormat(format!(
                "{input} (nothing after the {t} transport)"
            )));
        }

        Ok(Self {
            raw: input.to_string(),
            transport,
        })
    }

    pub fn transport(&self) -> Option<Transport> {
        self.transport
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
