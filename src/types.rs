use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Timeout applied when a request does not carry one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the parent waits after SIGTERM before escalating to SIGKILL.
pub const GRACE_PERIOD: Duration = Duration::from_secs(1);

/// One snippet to run in a fresh worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Python source to execute (untrusted)
    pub code: String,
    /// Wall-clock bound for the worker
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,
    /// Directory the snippet runs in; must exist at invocation time.
    /// Only the worker's own cwd is changed, never the caller's.
    #[serde(default)]
    pub working_directory: Option<PathBuf>,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            timeout: DEFAULT_TIMEOUT,
            working_directory: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Outcome of one execution, the only durable artifact of a call.
///
/// Built through [`ExecutionResult::completed`] and
/// [`ExecutionResult::failed`] so that `success == (exit_code == 0)` and
/// `observation` mirrors `stdout` on success and `stderr` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Everything the snippet wrote to stdout
    pub stdout: String,
    /// Everything written to stderr, plus failure diagnostics on error
    pub stderr: String,
    /// 0 on success, 1 on any failure
    pub exit_code: i32,
    pub success: bool,
    /// Human-facing summary: stdout on success, stderr on failure
    pub observation: String,
}

impl ExecutionResult {
    /// Result for a snippet that ran to completion. `stderr` may still be
    /// non-empty (warnings and the like).
    pub(crate) fn completed(stdout: String, stderr: String) -> Self {
        Self {
            observation: stdout.clone(),
            stdout,
            stderr,
            exit_code: 0,
            success: true,
        }
    }

    /// Result for any failure class: syntax rejection, bad working
    /// directory, runtime exception, or timeout.
    pub(crate) fn failed(stdout: String, stderr: String) -> Self {
        Self {
            observation: stderr.clone(),
            stdout,
            stderr,
            exit_code: 1,
            success: false,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
