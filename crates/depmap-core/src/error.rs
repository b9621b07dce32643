//! Error types for depmap.

use thiserror::Error;

/// Per-file extraction failure. Never aborts a run: the builder turns it into
/// an entry of the graph's error log.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid UTF-8 at byte {offset}")]
    Decode { offset: usize },

    #[error("parser produced no tree")]
    Parse,

    #[error("invalid syntax at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

/// Invalid run configuration, checked before traversal starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("file does not exist: {path}")]
    EntryNotFound { path: String },

    #[error("entry is not a regular file: {path}")]
    EntryNotAFile { path: String },

    #[error("project root is not a directory: {path}")]
    RootNotADirectory { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_message() {
        let err = ExtractError::Syntax { line: 3, column: 7 };
        assert_eq!(err.to_string(), "invalid syntax at line 3, column 7");
    }

    #[test]
    fn read_error_wraps_io() {
        let err: ExtractError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(matches!(err, ExtractError::Read(_)));
        assert!(err.to_string().starts_with("cannot read file"));
    }
}
