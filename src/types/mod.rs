// ABOUTME: Validated domain types for task options.
// ABOUTME: Image references, registry hosts, and credentials with redacted secrets.

mod credentials;
mod image_ref;
mod registry;

pub use credentials::{Credentials, NO_LOG_PLACEHOLDER, Secret};
pub use image_ref::{ImageRef, ParseImageRefError, Transport};
pub use registry::{Registry, RegistryError};
