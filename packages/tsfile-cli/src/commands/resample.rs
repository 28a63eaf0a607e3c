use crate::cli::ResampleArgs;
use crate::exit_codes;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tsfile::{load_train_test_with_options, resample_split, write_ts, Dataset, ParseOptions, Split};

pub fn execute(args: ResampleArgs, options: &ParseOptions) -> i32 {
    let root = Path::new(&args.root);
    let (train, test) = match load_train_test_with_options(root, &args.problem, options) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let (new_train, new_test) =
        match resample_split(&train, &test, args.resample_id, args.stratify) {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::INPUT_ERROR;
            }
        };

    if let Err(e) = std::fs::create_dir_all(&args.output_dir) {
        eprintln!(
            "Error: Failed to create output directory '{}': {}",
            args.output_dir, e
        );
        return exit_codes::EXECUTION_ERROR;
    }

    for (split, ds) in [(Split::Train, &new_train), (Split::Test, &new_test)] {
        let out_path = Path::new(&args.output_dir).join(output_file_name(&args.problem, split));
        if let Err(msg) = write_split(ds, &out_path) {
            eprintln!("Error: {}", msg);
            return exit_codes::EXECUTION_ERROR;
        }
        if !args.quiet {
            eprintln!("Wrote {} ({} instances)", out_path.display(), ds.len());
        }
    }

    exit_codes::SUCCESS
}

fn output_file_name(problem: &str, split: Split) -> String {
    format!("{}_{}.ts", problem, split.suffix())
}

fn write_split(ds: &Dataset, path: &Path) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
    write_ts(ds, BufWriter::new(file))
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("Demo", Split::Train), "Demo_TRAIN.ts");
        assert_eq!(output_file_name("Demo", Split::Test), "Demo_TEST.ts");
    }
}
