// ============================================================================
// ffhls-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for ffhls-core
//
// This module defines the error types used throughout the ffhls-core library.
// It provides a central CoreError enum that represents all possible errors
// that can occur during format setup, command building, and ffmpeg/ffprobe
// execution.
//
// KEY COMPONENTS:
// - CoreError: Enum of all error types with descriptive messages
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper functions for creating common process errors

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error type for the ffhls-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- File System Errors ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---- Configuration Errors ----
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid trim window: {0}")]
    InvalidTrimWindow(String),

    #[error("Invalid timecode '{0}'")]
    InvalidTimeCode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // ---- External Process Errors ----
    #[error("Required external command '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{command} exited with {exit}: {message}", exit = describe_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        message: String,
    },

    /// Raised by an export after its partial output has been cleaned up.
    #[error("Encoding failed ({exit}): {message}", exit = describe_code(.code))]
    EncodingFailed {
        code: Option<i32>,
        message: String,
        #[source]
        source: Option<Box<CoreError>>,
    },

    // ---- Probe Errors ----
    #[error("ffprobe error: {0}")]
    Probe(String),
}

/// Result type for ffhls-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Exit code of the failed process, if this error carries one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CoreError::CommandFailed { code, .. } | CoreError::EncodingFailed { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

/// Creates a `CommandStart` error for a process that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Creates a `CommandWait` error for a process whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

/// Creates a `CommandFailed` error from a non-successful exit status.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    message: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        code: status.code(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display_includes_code() {
        let err = CoreError::CommandFailed {
            command: "ffmpeg".to_string(),
            code: Some(1),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "ffmpeg exited with exit code 1: boom");
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_encoding_failed_without_code() {
        let err = CoreError::EncodingFailed {
            code: None,
            message: "killed".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "Encoding failed (no exit code): killed");
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_io_error_converts() {
        let err: CoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
