//! # Python Execution Tool
//!
//! Runs untrusted Python snippets in an isolated worker process with
//! stdout/stderr capture and wall-clock timeout enforcement. Each call
//! spawns one fresh worker, waits for its structured result record, and
//! guarantees the worker is gone before returning. The caller's working
//! directory and standard streams are never touched by the snippet.
//!
//! This is not a security sandbox: the snippet runs with the full OS
//! permissions of the invoking user. The isolation boundary is crash and
//! working-directory containment only.

mod error;
mod executor;
mod syntax;
mod types;
mod worker;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use executor::PythonExecutor;
pub use types::{ExecutionRequest, ExecutionResult, DEFAULT_TIMEOUT, GRACE_PERIOD};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
