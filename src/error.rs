//! Central error types for PointerPad.
//!
//! Backend failures are classified here even though the sync loop swallows
//! them; the classification feeds `SyncStats` and the debug log.
//! All errors implement `Serialize` for IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for PointerPad operations.
#[derive(Error, Debug)]
pub enum PointerPadError {
    /// The call could not reach the backend (e.g. not initialized yet)
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered with an error response
    #[error("Backend error: {0}")]
    BackendError(String),

    /// The backend answered, but not with `[x, y, ...]`
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// Configuration is invalid or inconsistent
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Config file I/O failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The subsystem was started outside a Tokio runtime
    #[error("No async runtime available: {0}")]
    RuntimeUnavailable(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Serialize as the error message string so errors can cross an IPC boundary.
impl Serialize for PointerPadError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for PointerPadError {
    fn from(msg: String) -> Self {
        PointerPadError::Other(msg)
    }
}

impl From<&str> for PointerPadError {
    fn from(msg: &str) -> Self {
        PointerPadError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, PointerPadResult};
///
/// fn read_config(path: &Path) -> PointerPadResult<String> {
///     std::fs::read_to_string(path).context("failed to read config file")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to PointerPadError::Other.
    fn context(self, msg: &str) -> PointerPadResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> PointerPadResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> PointerPadResult<T> {
        self.map_err(|e| PointerPadError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> PointerPadResult<T> {
        self.map_err(|e| PointerPadError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to PointerPadError::Other with the given message.
    fn context(self, msg: &str) -> PointerPadResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> PointerPadResult<T> {
        self.ok_or_else(|| PointerPadError::Other(msg.to_string()))
    }
}

/// Type alias for Results using PointerPadError.
pub type PointerPadResult<T> = Result<T, PointerPadError>;
