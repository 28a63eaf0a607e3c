use std::fmt;

use thiserror::Error;

/// Position inside a data row that a token was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// 0-based channel index
    Channel(usize),
    /// Trailing label segment
    Label,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Channel(idx) => write!(f, "channel {}", idx),
            Field::Label => write!(f, "label"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TsError {
    #[error("Format error at line {line}, {field}: '{token}' is not a valid number")]
    Format {
        line: usize,
        field: Field,
        token: String,
    },

    #[error("Structural error at line {line}: {message}")]
    Structural { line: usize, message: String },

    #[error("Consistency error at line {line}: {message}")]
    Consistency { line: usize, message: String },

    #[error("Header error at line {line}: {message}")]
    Header { line: usize, message: String },

    #[error("Incompatible datasets: {0}")]
    Incompatible(String),

    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("File is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TsError {
    /// 1-based line number the error was raised at, for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            TsError::Format { line, .. }
            | TsError::Structural { line, .. }
            | TsError::Consistency { line, .. }
            | TsError::Header { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TsError>;
