use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;
use serde::Serialize;
use std::path::Path;
use tsfile::{load_file_with_options, ParseOptions};

#[derive(Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    problem_name: Option<String>,
    instances: Option<usize>,
    channels: Option<usize>,
    line: Option<usize>,
    error: Option<String>,
}

pub fn execute(args: ValidateArgs, options: &ParseOptions) -> i32 {
    let files = match resolve_files(&args) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if files.is_empty() {
        eprintln!("Error: No matching files found");
        return exit_codes::INPUT_ERROR;
    }

    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0usize;

    for file in &files {
        let report = validate_file(file, options);

        if !args.json {
            match (&report.error, report.instances, report.channels) {
                (None, Some(n), Some(c)) => {
                    println!("OK    {} ({} instances, {} channels)", file, n, c)
                }
                (Some(err), _, _) => eprintln!("FAIL  {}: {}", file, err),
                _ => {}
            }
        }

        let valid = report.valid;
        reports.push(report);
        if !valid {
            failed += 1;
            if !args.continue_on_error {
                break;
            }
        }
    }

    if args.json {
        if let Err(code) = output::emit_json(&reports, false, None) {
            return code;
        }
    }

    if failed == 0 {
        exit_codes::SUCCESS
    } else if failed < reports.len() {
        exit_codes::PARTIAL_FAILURE
    } else {
        exit_codes::INPUT_ERROR
    }
}

fn validate_file(file: &str, options: &ParseOptions) -> FileReport {
    match load_file_with_options(Path::new(file), options) {
        Ok(ds) => FileReport {
            file: file.to_string(),
            valid: true,
            problem_name: ds.metadata().problem_name.clone(),
            instances: Some(ds.len()),
            channels: Some(ds.n_channels()),
            line: None,
            error: None,
        },
        Err(e) => FileReport {
            file: file.to_string(),
            valid: false,
            problem_name: None,
            instances: None,
            channels: None,
            line: e.line(),
            error: Some(e.to_string()),
        },
    }
}

fn resolve_files(args: &ValidateArgs) -> Result<Vec<String>, String> {
    if let Some(ref pattern) = args.glob {
        resolve_glob(pattern)
    } else if let Some(ref file) = args.file {
        Ok(vec![file.clone()])
    } else {
        Err("One of --file or --glob must be specified".to_string())
    }
}

fn resolve_glob(pattern: &str) -> Result<Vec<String>, String> {
    let paths = glob::glob(pattern)
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

    let mut files: Vec<String> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => {
                if let Some(s) = path.to_str() {
                    files.push(s.to_string());
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("glob error: {}", e),
        }
    }
    files.sort();
    Ok(files)
}
