use thiserror::Error;

/// Environment-level failures of the executor itself.
///
/// Expected outcomes of running a snippet (syntax errors, runtime
/// exceptions, bad working directories, timeouts) are never surfaced
/// here; they come back inside [`crate::ExecutionResult`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Python interpreter not found: {0}")]
    InterpreterNotFound(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
