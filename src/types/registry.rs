// ABOUTME: Registry argument for skopeo login.
// ABOUTME: Passed through verbatim; skopeo itself reduces URLs to host[:port].

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry cannot be empty")]
    Empty,

    #[error("invalid character in registry: {0:?}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Registry(String);

impl Registry {
    pub fn new(value: &str) -> Result<Self, RegistryError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RegistryError::Empty);
        }

        if let Some(c) = value.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(RegistryError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
