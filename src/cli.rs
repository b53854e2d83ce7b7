// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One subcommand per task, plus `module` for running as an Ansible binary module.

use clap::{ArgAction, Parser, Subcommand};
use skopeo_tasks::tasks::{CopyParams, InspectParams, LoginParams, TaskKind};
use skopeo_tasks::types::Secret;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skopeo-tasks")]
#[command(about = "Run skopeo copy, inspect and login as Ansible-style tasks")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print skopeo's output and errors
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print the task response as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path or name of the skopeo binary
    #[arg(long, global = true, value_name = "PATH")]
    pub executable: Option<String>,

    /// Timeout for a single skopeo run, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file (default: skopeo-tasks.yml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would happen without changing anything
    #[arg(long, global = true)]
    pub check: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy an image between registries or transports
    Copy {
        /// Source image, e.g. docker://quay.io/org/app:1.0
        src_image: String,

        /// Destination image
        dest_image: String,

        #[arg(long)]
        src_username: Option<String>,

        #[arg(long)]
        src_password: Option<String>,

        #[arg(long)]
        dest_username: Option<String>,

        #[arg(long)]
        dest_password: Option<String>,

        /// Verify TLS when talking to the source registry
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        src_tls_verify: bool,

        /// Verify TLS when talking to the destination registry
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        dest_tls_verify: bool,
    },

    /// Print an image's metadata
    Inspect {
        /// Image to inspect, e.g. docker://quay.io/org/app:1.0
        image_name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        tls_verify: bool,
    },

    /// Log in to a container registry
    Login {
        /// Registry host, e.g. quay.io
        registry: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        tls_verify: bool,

        /// Pass --verbose=true to skopeo login
        #[arg(long)]
        skopeo_verbose: bool,
    },

    /// Run a task as an Ansible binary module, reading options from a JSON file
    Module {
        /// copy, inspect or login (module names like skopeo_copy also work)
        task: TaskKind,

        /// JSON file holding the module arguments
        args_file: PathBuf,
    },
}

/// A task request built from CLI arguments.
pub enum TaskRequest {
    Copy(CopyParams),
    Inspect(InspectParams),
    Login(LoginParams),
}

impl Commands {
    /// The task options for a task subcommand, `None` for `module`.
    pub fn into_request(self) -> Option<TaskRequest> {
        match self {
            Commands::Copy {
                src_image,
                dest_image,
                src_username,
                src_password,
                dest_username,
                dest_password,
                src_tls_verify,
                dest_tls_verify,
            } => Some(TaskRequest::Copy(CopyParams {
                src_image: Some(src_image),
                dest_image: Some(dest_image),
                src_tls_verify: Some(src_tls_verify),
                dest_tls_verify: Some(dest_tls_verify),
                src_username,
                src_password: src_password.map(Secret::from),
                dest_username,
                dest_password: dest_password.map(Secret::from),
            })),
            Commands::Inspect {
                image_name,
                username,
                password,
                tls_verify,
            } => Some(TaskRequest::Inspect(InspectParams {
                image_name: Some(image_name),
                username: Some(username),
                password: Some(Secret::from(password)),
                tls_verify: Some(tls_verify),
            })),
            Commands::Login {
                registry,
                username,
                password,
                tls_verify,
                skopeo_verbose,
            } => Some(TaskRequest::Login(LoginParams {
                registry: Some(registry),
                username: Some(username),
                password: Some(Secret::from(password)),
                tls_verify: Some(tls_verify),
                verbose: Some(skopeo_verbose),
            })),
            Commands::Module { .. } => None,
        }
    }
}
