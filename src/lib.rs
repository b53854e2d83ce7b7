// ABOUTME: Library root for skopeo-tasks: copy, inspect and login as Ansible-style tasks.
// ABOUTME: The binary in main.rs exposes them as a CLI and as Ansible binary modules.

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod module;
pub mod output;
pub mod tasks;
pub mod types;
