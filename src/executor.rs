use std::path::PathBuf;

use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    error::Error,
    syntax,
    types::{ExecutionRequest, ExecutionResult, GRACE_PERIOD},
    worker::{Worker, WorkerOutcome},
};

/// Executes Python snippets, one fresh worker process per call.
///
/// Every expected failure mode (syntax error, bad working directory,
/// runtime exception, timeout) is encoded in the returned
/// [`ExecutionResult`]; `Err` is reserved for environment problems such
/// as a missing interpreter or a failed spawn.
pub struct PythonExecutor {
    interpreter: PathBuf,
}

impl PythonExecutor {
    /// Create an executor using the `python3` found on PATH.
    pub fn new() -> Result<Self, Error> {
        let interpreter = which::which("python3")
            .map_err(|_| Error::InterpreterNotFound("python3".to_string()))?;
        debug!("Using interpreter at {}", interpreter.display());
        Ok(Self { interpreter })
    }

    /// Create an executor bound to a specific interpreter binary.
    pub fn with_interpreter(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, Error> {
        let id = Uuid::new_v4();
        debug!(
            "Execution {} - {} bytes of code, timeout {}s, working_directory {:?}",
            id,
            request.code.len(),
            request.timeout.as_secs(),
            request.working_directory,
        );

        // Reject unparseable code before paying for a process spawn.
        if let Err(diagnostic) = syntax::check(&request.code) {
            error!("Execution {} rejected: {}", id, diagnostic);
            return Ok(ExecutionResult::failed(String::new(), diagnostic));
        }

        let worker = Worker::new(self.interpreter.clone(), GRACE_PERIOD);
        let outcome = worker
            .run(
                &request.code,
                request.working_directory.as_deref(),
                request.timeout,
            )
            .await?;

        let result = match outcome {
            WorkerOutcome::Completed(record) => {
                if record.success {
                    ExecutionResult::completed(record.stdout, record.stderr)
                } else {
                    ExecutionResult::failed(record.stdout, record.stderr)
                }
            }
            WorkerOutcome::TimedOut => {
                // Partial output is discarded on timeout; the message is
                // the entire diagnostic.
                let mut message =
                    format!("Execution timeout after {} seconds", request.timeout.as_secs());
                if let Some(dir) = &request.working_directory {
                    message.push_str(&format!(" (in working_directory: '{}')", dir.display()));
                }
                error!("Execution {} timed out", id);
                ExecutionResult::failed(String::new(), message)
            }
        };

        debug!(
            "Execution {} finished: success={} exit_code={}",
            id, result.success, result.exit_code
        );
        Ok(result)
    }
}
