use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Index {index} is out of range (size {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("File operation failed on {path:?}: {source}")]
    FileOperation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CsvError {
    /// Short name of the error kind, stable across messages
    pub fn kind(&self) -> &'static str {
        match self {
            CsvError::Parse(_) => "ParseError",
            CsvError::Conversion(_) => "ConversionError",
            CsvError::IndexOutOfRange { .. } => "IndexOutOfRangeError",
            CsvError::FileOperation { .. } => "FileOperationError",
            CsvError::Io(_) => "IoError",
            CsvError::Config(_) => "ConfigError",
        }
    }

    pub(crate) fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CsvError::FileOperation {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CsvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(CsvError::Parse("x".into()).kind(), "ParseError");
        assert_eq!(CsvError::Conversion("x".into()).kind(), "ConversionError");
        assert_eq!(
            CsvError::IndexOutOfRange { index: 3, len: 1 }.kind(),
            "IndexOutOfRangeError"
        );
    }

    #[test]
    fn test_index_message() {
        let err = CsvError::IndexOutOfRange { index: 7, len: 2 };
        assert_eq!(err.to_string(), "Index 7 is out of range (size 2)");
    }
}
