//! Captured output of a delegated execution

use serde::{Deserialize, Serialize};

/// Standard output and standard error of a finished process
///
/// Both streams are buffered in full until the process exits and decoded
/// lossily as UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

impl ExecutionOutput {
    /// Create from already decoded streams
    #[must_use]
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Decode raw captured bytes
    #[must_use]
    pub fn from_bytes(stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    /// True if neither stream produced anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}
