pub mod types;
pub mod parser;
pub mod writer;
pub mod loader;
pub mod resample;
pub mod error;
pub mod mmap_utils;

pub use types::*;
pub use parser::{
    parse_lines, parse_reader, parse_str, parse_with_options, ParseOptions,
    DEFAULT_PARALLEL_THRESHOLD,
};
pub use writer::write_ts;
pub use loader::{
    load_file, load_file_with_options, load_split, load_split_with_options, load_train_test,
    load_train_test_with_options, split_path, Split,
};
pub use resample::{resample, resample_split, stratified_resample};
pub use error::{Field, Result, TsError};
