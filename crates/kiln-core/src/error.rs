//! Error types for kiln operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kiln operations
#[derive(Debug, Error)]
pub enum KilnError {
    /// The file could not be parsed; nothing else runs on it
    #[error("Parse error in '{path}' at {line}:{column}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Break markers or dispatch state out of balance
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Io,
    Internal,
}

impl KilnError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KilnError::ParseError { .. } => ErrorKind::Parse,
            KilnError::ConfigError { .. } => ErrorKind::Config,
            KilnError::IoError { .. } => ErrorKind::Io,
            KilnError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Whether processing can continue with the next file
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Io | ErrorKind::Internal
        )
    }

    pub fn parse_error(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::ParseError {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for KilnError {
    fn from(source: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl From<toml::de::Error> for KilnError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_error(format!("invalid TOML: {err}"))
    }
}

impl From<serde_json::Error> for KilnError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_error(format!("invalid JSON: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = KilnError::config_error("bad value");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Configuration error: bad value");

        let err = KilnError::parse_error("a.swift", 3, 7, "expected '}'");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Parse error in 'a.swift' at 3:7: expected '}'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: KilnError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_only_config_errors_abort_the_run() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(KilnError::io_error("a.swift", io).is_recoverable());
        assert!(KilnError::internal_error("unbalanced breaks").is_recoverable());
        assert!(KilnError::parse_error("a.swift", 1, 1, "expected '}'").is_recoverable());
        assert!(!KilnError::config_error("lineLength must be positive").is_recoverable());
    }
}
