use crate::exit_codes;
use std::io::Write;
use std::path::Path;

/// Write text to stdout, or to a file when a path is given.
pub fn write_output(text: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(Path::new(path), format!("{}\n", text))
            .map_err(|e| format!("Failed to write output file '{}': {}", path, e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| format!("JSON serialization failed: {}", e))
}

/// Serialize and write in one step, reporting failures on stderr.
///
/// Returns the exit code to use when the write failed.
pub fn emit_json<T: serde::Serialize>(
    value: &T,
    compact: bool,
    output_path: Option<&str>,
) -> Result<(), i32> {
    to_json(value, compact)
        .and_then(|json| write_output(&json, output_path))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            exit_codes::EXECUTION_ERROR
        })
}
