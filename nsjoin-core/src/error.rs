//! Error types for nsjoin

use thiserror::Error;

use crate::output::ExecutionOutput;

/// A configuration that cannot be compiled into a command line
///
/// Raised before any process is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// No target PID was given (zero is the unset value)
    #[error("target must be specified")]
    MissingTarget,
}

/// The delegated program could not be started or did not exit cleanly
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RunError {
    /// Process could not be launched (not found, not executable, ...)
    #[error("failed to launch {program}: {source}")]
    Spawn {
        /// Program that was launched
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a non-zero status
    #[error("{program} exited with status {code}")]
    Exit {
        /// Program that was launched
        program: String,
        /// Exit code
        code: i32,
    },

    /// Process was terminated by a signal
    #[error("{program} terminated by signal {name}")]
    Signaled {
        /// Program that was launched
        program: String,
        /// Raw signal number
        signal: i32,
        /// Signal name, e.g. `SIGKILL`
        name: String,
    },
}

impl RunError {
    /// Exit code of the process, if it ran to completion
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit { code, .. } => Some(*code),
            Self::Spawn { .. } | Self::Signaled { .. } => None,
        }
    }

    /// Signal that terminated the process, if any
    #[must_use]
    pub const fn signal(&self) -> Option<i32> {
        match self {
            Self::Signaled { signal, .. } => Some(*signal),
            Self::Spawn { .. } | Self::Exit { .. } => None,
        }
    }

    /// Shell-style status: the exit code, or `128 + signal` when killed
    #[must_use]
    pub const fn shell_status(&self) -> Option<i32> {
        match self {
            Self::Exit { code, .. } => Some(*code),
            Self::Signaled { signal, .. } => Some(128 + *signal),
            Self::Spawn { .. } => None,
        }
    }
}

/// nsjoin error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Configuration rejected while preparing an execution
    #[error("Error while building command: {0}")]
    Setup(#[source] ConfigError),

    /// The delegated program failed; carries whatever it wrote before failing
    #[error("Error while executing command: {error}")]
    Run {
        /// Failure reason
        #[source]
        error: RunError,
        /// Output captured up to the failure
        output: ExecutionOutput,
    },
}

impl Error {
    /// Output captured before the failure, if a process was started
    #[must_use]
    pub const fn output(&self) -> Option<&ExecutionOutput> {
        match self {
            Self::Run { output, .. } => Some(output),
            Self::Config(_) | Self::Setup(_) => None,
        }
    }

    /// Captured standard output (empty when no process ran)
    #[must_use]
    pub fn stdout(&self) -> &str {
        self.output().map_or("", |o| o.stdout.as_str())
    }

    /// Captured standard error (empty when no process ran)
    #[must_use]
    pub fn stderr(&self) -> &str {
        self.output().map_or("", |o| o.stderr.as_str())
    }

    /// Exit code of the delegated program, when it exited on its own
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Run { error, .. } => error.exit_code(),
            Self::Config(_) | Self::Setup(_) => None,
        }
    }

    /// Shell-style status of the delegated program, see [`RunError::shell_status`]
    #[must_use]
    pub const fn shell_status(&self) -> Option<i32> {
        match self {
            Self::Run { error, .. } => error.shell_status(),
            Self::Config(_) | Self::Setup(_) => None,
        }
    }

    /// Whether the failure happened before any process was spawned
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Setup(_))
    }
}

/// Result type alias for nsjoin operations
pub type Result<T> = std::result::Result<T, Error>;
