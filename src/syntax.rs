use rustpython_parser::{parse, Mode};

/// Parse `code` as a Python module without running anything.
///
/// Returns the diagnostic the caller should surface when the code cannot
/// be parsed. Rejecting here avoids the process-spawn cost for code that
/// can never run.
pub fn check(code: &str) -> Result<(), String> {
    match parse(code, Mode::Module, "<snippet>") {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("SyntaxError: {}", e)),
    }
}
