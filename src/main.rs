// ABOUTME: Entry point for the skopeo-tasks CLI application.
// ABOUTME: Runs as an Ansible module when invoked as skopeo_copy/skopeo_inspect/skopeo_login.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, TaskRequest};
use skopeo_tasks::command::ProcessExecutor;
use skopeo_tasks::config::Config;
use skopeo_tasks::error::{Error, Result};
use skopeo_tasks::module::run_module;
use skopeo_tasks::output::{Output, OutputMode, print_json};
use skopeo_tasks::tasks::{self, TaskKind, TaskResponse};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, process};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args: Vec<OsString> = env::args_os().collect();

    // Ansible copies the binary under the module's name and calls it with the args file.
    if let Some(kind) = args.first().and_then(|argv0| module_kind(argv0)) {
        init_tracing(false);
        let response = module_mode(kind, args.get(1).map(PathBuf::from)).await;
        print_json(&response);
        process::exit(exit_code(&response));
    }

    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose);

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    match run(cli, output).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            Output::new(mode).error(&e.to_string());
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    // Stdout is reserved for task output and module responses.
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn module_kind(argv0: &OsString) -> Option<TaskKind> {
    let stem = Path::new(argv0).file_stem()?.to_str()?;
    TaskKind::from_module_name(stem)
}

fn exit_code(response: &TaskResponse) -> i32 {
    if response.is_success() { 0 } else { 1 }
}

async fn module_mode(kind: TaskKind, args_file: Option<PathBuf>) -> TaskResponse {
    let Some(args_file) = args_file else {
        return TaskResponse::failure(format!(
            "{} expects the path of a module arguments file",
            kind.module_name()
        ));
    };

    let config = match env::current_dir()
        .map_err(Error::from)
        .and_then(|cwd| Config::resolve(&cwd))
    {
        Ok(config) => config,
        Err(e) => return TaskResponse::failure(e.to_string()),
    };

    run_module(kind, &args_file, &config, &ProcessExecutor).await
}

/// Resolve configuration: file (explicit or discovered), then environment, then flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref path) => Config::load(path)?.apply_env()?,
        None => Config::resolve(&env::current_dir()?)?,
    };

    let config = match cli.executable {
        Some(ref executable) => config.with_executable(executable),
        None => config,
    };

    let config = match cli.timeout {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    };

    config.validate()
}

/// Run the requested command; `Ok(false)` means the task reported failure.
async fn run(cli: Cli, mut output: Output) -> Result<bool> {
    let config = load_config(&cli)?;
    tracing::debug!(
        "using executable '{}' with timeout {:?}",
        config.executable,
        config.timeout
    );

    let check_mode = cli.check;
    let executor = ProcessExecutor;

    let request = match cli.command {
        Commands::Module { task, args_file } => {
            let response = run_module(task, &args_file, &config, &executor).await;
            print_json(&response);
            return Ok(response.is_success());
        }
        command => command.into_request(),
    };

    output.start_timer();
    let response = match request {
        Some(TaskRequest::Copy(params)) => {
            output.progress("Copying image...");
            tasks::run(params, check_mode, &config, &executor).await
        }
        Some(TaskRequest::Inspect(params)) => {
            tasks::run(params, check_mode, &config, &executor).await
        }
        Some(TaskRequest::Login(params)) => {
            output.progress("Logging in...");
            tasks::run(params, check_mode, &config, &executor).await
        }
        None => return Ok(false),
    };

    output.response(&response);
    Ok(response.is_success())
}
