// ABOUTME: Configuration for skopeo-tasks: which skopeo to run and how long to wait.
// ABOUTME: Layered as defaults, then skopeo-tasks.yml, then environment, then CLI flags.

use crate::command::{DEFAULT_EXECUTABLE, DEFAULT_TIMEOUT, Invocation};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "skopeo-tasks.yml";
pub const CONFIG_FILENAME_ALT: &str = "skopeo-tasks.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".skopeo-tasks/config.yml";

/// Overrides the configured executable.
pub const ENV_EXECUTABLE: &str = "SKOPEO_TASKS_EXECUTABLE";
/// Overrides the configured timeout, in whole seconds.
pub const ENV_TIMEOUT: &str = "SKOPEO_TASKS_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Program name or path of the skopeo binary.
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Upper bound on a single skopeo run.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            timeout: default_timeout(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading config from {}", path.display());
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Apply `SKOPEO_TASKS_EXECUTABLE` and `SKOPEO_TASKS_TIMEOUT`.
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(executable) = std::env::var(ENV_EXECUTABLE) {
            self.executable = executable;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!(
                    "{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            self.timeout = Duration::from_secs(secs);
        }

        self.validate()
    }

    /// Discover a config file in `dir` and layer the environment on top.
    pub fn resolve(dir: &Path) -> Result<Self> {
        Self::discover(dir)?.apply_env()
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The base invocation every task extends.
    pub fn invocation(&self) -> Invocation {
        Invocation::new(&self.executable).with_timeout(self.timeout)
    }

    /// Reject an empty executable or a zero timeout, whichever layer set them.
    pub fn validate(self) -> Result<Self> {
        if self.executable.trim().is_empty() {
            return Err(Error::InvalidConfig("executable cannot be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.executable, "skopeo");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn humantime_timeout() {
        let config = Config::from_yaml("timeout: 1m 30s\n").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.executable, "skopeo");
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::from_yaml("\n").unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_yaml("exe: /bin/skopeo\n"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            Config::from_yaml("timeout: 0s\n"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn overrides_are_validated() {
        let err = Config::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("timeout must be greater than zero"));
        assert!(Config::default().with_executable(" ").validate().is_err());
    }

    #[test]
    fn base_invocation() {
        let config = Config::default()
            .with_executable("/opt/skopeo")
            .with_timeout(Duration::from_secs(5));
        let inv = config.invocation();
        assert_eq!(inv.executable(), "/opt/skopeo");
        assert_eq!(inv.timeout(), Duration::from_secs(5));
        assert!(inv.args().is_empty());
    }
}
