// ABOUTME: External command execution with a bounded wall-clock timeout.
// ABOUTME: Builds invocations, runs them, and exposes the captured execution record.

mod error;
mod invocation;
mod result;
mod runner;

pub use error::RunError;
pub use invocation::{DEFAULT_EXECUTABLE, DEFAULT_TIMEOUT, Invocation, REDACTED};
pub use result::ExecutionResult;
pub use runner::{Executor, ProcessExecutor};
