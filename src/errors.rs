//! Error types for thread creation, platform calls and completion promises.
//!
//! The layering follows the operations: spawning can fail with a
//! [`SpawnError`], naming and scheduling calls with a [`PlatformError`], and
//! waiting on a [`Promise`](crate::sync::Promise) with a [`PromiseError`].

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type for thread operations.
pub type ThreadResult<T> = Result<T, ThreadError>;

/// Top-level error for operations on a [`Thread`](crate::Thread).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThreadError {
    /// Native thread creation failed
    #[error("thread spawn error: {0}")]
    Spawn(#[from] SpawnError),
    /// The operation needs a native thread and none was created yet
    #[error("thread has not been started")]
    NotStarted,
    /// The native thread was already reaped by a join
    #[error("thread has already been joined")]
    AlreadyJoined,
    /// The platform rejected or does not support the request
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors that can occur while creating the native thread.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The OS refused to create the thread (resource exhaustion, permission).
    #[error("native thread creation failed ({kind:?}): {message}")]
    Os {
        kind: io::ErrorKind,
        message: String,
    },
}

impl From<&io::Error> for SpawnError {
    fn from(error: &io::Error) -> Self {
        SpawnError::Os {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<io::Error> for SpawnError {
    fn from(error: io::Error) -> Self {
        SpawnError::from(&error)
    }
}

/// Errors from naming and scheduling calls against a native thread.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The current target has no way to perform the operation
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),
    /// The name cannot be passed to the OS (interior NUL byte)
    #[error("invalid thread name: {0:?}")]
    InvalidName(String),
    /// The OS call returned an error code
    #[error("os error {0}: {msg}", msg = os_message(.0))]
    Os(i32),
}

fn os_message(code: &i32) -> String {
    io::Error::from_raw_os_error(*code).to_string()
}

/// A promise that was failed instead of fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("execution failed: {message}")]
pub struct ExecutionError {
    message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors from a timed wait on a promise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError {
    /// The deadline elapsed while the promise was still pending.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// The promise resolved to a failure.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl PromiseError {
    /// Returns `true` if the wait ran out of time rather than observing a result.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PromiseError::Timeout(_))
    }
}
