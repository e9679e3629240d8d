use crate::PythonExecutor;

/// Build an executor against the host's `python3`, or `None` when no
/// interpreter is installed so callers can skip instead of failing.
pub fn host_executor() -> Option<PythonExecutor> {
    match PythonExecutor::new() {
        Ok(executor) => Some(executor),
        Err(_) => {
            eprintln!("python3 not found on PATH, skipping");
            None
        }
    }
}
