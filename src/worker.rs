use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use serde::Deserialize;
use tokio::{io::AsyncWriteExt, process::Command, time};
use tracing::{debug, warn};

use crate::error::Error;

/// Harness the worker interpreter runs via `-c`. It reads the snippet
/// from stdin, executes it against a fresh builtins-only namespace with
/// stdout/stderr swapped for private buffers, and emits exactly one JSON
/// record on its real stdout once the original stream bindings are back.
/// The working directory, when given as `argv[1]`, is changed only inside
/// this process image; a missing directory raises through the same path
/// as a snippet exception.
const HARNESS: &str = r#"
import io
import json
import os
import sys
import traceback

code = sys.stdin.read()
workdir = sys.argv[1] if len(sys.argv) > 1 else None
record = {"stdout": "", "stderr": "", "exit_code": 1, "success": False}
out_buf = io.StringIO()
err_buf = io.StringIO()
real_out, real_err = sys.stdout, sys.stderr
home = os.getcwd()
moved = False
sys.stdout, sys.stderr = out_buf, err_buf
try:
    if workdir is not None:
        if os.path.isdir(workdir):
            os.chdir(workdir)
            moved = True
        else:
            raise FileNotFoundError(
                "working directory '%s' does not exist or is not a directory"
                % workdir)
    scope = {"__builtins__": __builtins__}
    exec(compile(code, "<snippet>", "exec"), scope, scope)
    record["stdout"] = out_buf.getvalue()
    record["stderr"] = err_buf.getvalue()
    record["exit_code"] = 0
    record["success"] = True
except BaseException as exc:
    record["stdout"] = out_buf.getvalue()
    record["stderr"] = "\n".join(
        [err_buf.getvalue(), str(exc), traceback.format_exc()]).strip()
finally:
    sys.stdout, sys.stderr = real_out, real_err
    if moved:
        os.chdir(home)
json.dump(record, sys.stdout)
"#;

/// Result record the harness sends back across the process boundary.
#[derive(Debug, Deserialize)]
pub struct WorkerRecord {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

pub enum WorkerOutcome {
    Completed(WorkerRecord),
    TimedOut,
}

/// One isolated worker process running one snippet.
pub struct Worker {
    interpreter: PathBuf,
    grace: Duration,
}

impl Worker {
    pub fn new(interpreter: PathBuf, grace: Duration) -> Self {
        Self { interpreter, grace }
    }

    /// Spawn the worker, feed it the snippet, and wait up to `timeout`
    /// for its record. On expiry the worker is terminated (SIGTERM, then
    /// SIGKILL after the grace period) and `TimedOut` is returned.
    pub async fn run(
        &self,
        code: &str,
        working_directory: Option<&Path>,
        timeout: Duration,
    ) -> Result<WorkerOutcome, Error> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg("-c")
            .arg(HARNESS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_directory {
            command.arg(dir);
        }

        debug!("Spawning worker: {}", self.interpreter.display());

        let mut child = command
            .spawn()
            .map_err(|e| Error::Worker(format!("Failed to spawn worker: {}", e)))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Worker("Worker stdin was not captured".to_string()))?;
        let id = child.id();

        // Feeding stdin and collecting output both count against the
        // timeout; wait_with_output drains stdout/stderr while waiting.
        let wait = async move {
            stdin.write_all(code.as_bytes()).await?;
            drop(stdin);
            child.wait_with_output().await
        };

        match time::timeout(timeout, wait).await {
            Ok(Ok(output)) => Ok(WorkerOutcome::Completed(decode(output))),
            Ok(Err(e)) => Err(Error::Worker(format!("Worker process error: {}", e))),
            Err(_) => {
                if let Some(id) = id {
                    self.kill(id).await;
                }
                Ok(WorkerOutcome::TimedOut)
            }
        }
    }

    async fn kill(&self, id: u32) {
        let pid = Pid::from_raw(id as i32);
        debug!("Terminating worker {} after timeout", id);
        if signal::kill(pid, Signal::SIGTERM).is_err() {
            // Already gone
            return;
        }
        time::sleep(self.grace).await;
        if signal::kill(pid, None).is_ok() {
            warn!("Worker {} survived SIGTERM, sending SIGKILL", id);
            let _ = signal::kill(pid, Signal::SIGKILL);
        }
    }
}

/// Decode the record from the worker's real stdout. A worker that died
/// without emitting one (os._exit, a segfaulting extension module) is
/// reported as a failure record carrying its exit status and raw stderr;
/// the crash stays contained behind the process boundary.
fn decode(output: std::process::Output) -> WorkerRecord {
    let stdout = String::from_utf8_lossy(&output.stdout);
    match serde_json::from_str(stdout.trim()) {
        Ok(record) => record,
        Err(e) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "Worker exited without a result record ({}): {}",
                output.status, e
            );
            WorkerRecord {
                stdout: String::new(),
                stderr: format!(
                    "Worker terminated without a result ({}): {}",
                    output.status,
                    stderr.trim()
                ),
                exit_code: 1,
                success: false,
            }
        }
    }
}
