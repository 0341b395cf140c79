//! Error types for watsim.
//!
//! The session core has a single recoverable failure: asking it to start
//! without any words. Everything else here belongs to the outer shell
//! (config file, terminal setup).

use thiserror::Error;

/// Rejected `start` requests. The session stays where it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The text contained no usable words.
    #[error("Please enter at least one word!")]
    EmptyWordList,

    /// A session is already counting down, running, or waiting for reset.
    #[error("a session is already in progress")]
    SessionActive,
}

/// Errors from reading or writing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that end the application.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read word file {path}: {source}")]
    WordFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("event channel closed")]
    EventChannelClosed,
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn validation_error_display() {
        assert_eq!(
            ValidationError::EmptyWordList.to_string(),
            "Please enter at least one word!"
        );
        assert_eq!(
            ValidationError::SessionActive.to_string(),
            "a session is already in progress"
        );
    }

    #[test]
    fn config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("config JSON error"));
    }

    #[test]
    fn app_error_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = ConfigError::Io(io_err).into();
        assert_eq!(err.to_string(), "config I/O error: gone");
    }

    #[test]
    fn word_file_error_keeps_source() {
        let err = AppError::WordFile {
            path: "words.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read word file words.txt: missing"
        );
        assert!(err.source().is_some());
    }
}
