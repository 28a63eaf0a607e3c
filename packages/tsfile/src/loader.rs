use crate::error::{Result, TsError};
use crate::mmap_utils::mmap_file;
use crate::parser::{parse_with_options, ParseOptions};
use crate::types::Dataset;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of the text format
pub const TS_EXTENSION: &str = "ts";

/// Which half of an archive problem to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn suffix(self) -> &'static str {
        match self {
            Split::Train => "TRAIN",
            Split::Test => "TEST",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Load and validate a single `.ts` file
pub fn load_file(path: &Path) -> Result<Dataset> {
    load_file_with_options(path, &ParseOptions::default())
}

pub fn load_file_with_options(path: &Path, options: &ParseOptions) -> Result<Dataset> {
    if !path.is_file() {
        return Err(TsError::FileNotFound(path.display().to_string()));
    }

    let mapped = mmap_file(path)?;
    let bytes: &[u8] = mapped.as_deref().unwrap_or(&[]);
    log::info!("Reading {} ({} bytes)", path.display(), bytes.len());

    let text = std::str::from_utf8(bytes)
        .map_err(|_| TsError::Encoding(path.display().to_string()))?;

    parse_with_options(text.lines(), options)
}

/// Archive layout: `<root>/<problem>/<problem>_<SPLIT>.ts`
pub fn split_path(root: &Path, problem: &str, split: Split) -> PathBuf {
    root.join(problem)
        .join(format!("{}_{}.{}", problem, split.suffix(), TS_EXTENSION))
}

pub fn load_split(root: &Path, problem: &str, split: Split) -> Result<Dataset> {
    load_split_with_options(root, problem, split, &ParseOptions::default())
}

pub fn load_split_with_options(
    root: &Path,
    problem: &str,
    split: Split,
    options: &ParseOptions,
) -> Result<Dataset> {
    let path = split_path(root, problem, split);
    let dataset = load_file_with_options(&path, options)?;

    if let Some(ref name) = dataset.metadata().problem_name {
        if name != problem {
            log::warn!(
                "{} declares @problemName {} but was loaded as {}",
                path.display(),
                name,
                problem
            );
        }
    }

    Ok(dataset)
}

/// Load the TRAIN and TEST splits of an archive problem
pub fn load_train_test(root: &Path, problem: &str) -> Result<(Dataset, Dataset)> {
    load_train_test_with_options(root, problem, &ParseOptions::default())
}

pub fn load_train_test_with_options(
    root: &Path,
    problem: &str,
    options: &ParseOptions,
) -> Result<(Dataset, Dataset)> {
    let train = load_split_with_options(root, problem, Split::Train, options)?;
    let test = load_split_with_options(root, problem, Split::Test, options)?;
    Ok((train, test))
}
