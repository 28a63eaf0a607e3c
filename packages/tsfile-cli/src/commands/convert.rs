use crate::cli::ConvertArgs;
use crate::exit_codes;
use crate::output;
use std::path::Path;
use tsfile::{load_file_with_options, ParseOptions};

pub fn execute(args: ConvertArgs, options: &ParseOptions) -> i32 {
    let ds = match load_file_with_options(Path::new(&args.file), options) {
        Ok(ds) => ds,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    if let Err(code) = output::emit_json(&ds, args.compact, args.output.as_deref()) {
        return code;
    }

    if let Some(ref path) = args.output {
        log::info!("Wrote {} instances to {}", ds.len(), path);
    }

    exit_codes::SUCCESS
}
