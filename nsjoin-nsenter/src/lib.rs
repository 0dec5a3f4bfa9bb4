//! Run programs inside the namespaces of an existing process
//!
//! This crate translates a [`Configuration`] into an `nsenter` invocation:
//! - Configuration - which namespaces of the target to join, identity and
//!   directory overrides
//! - Compiler - deterministic argument vector for `nsenter`
//! - Executor - synchronous (or tokio) run with captured stdout/stderr

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod command;
pub mod config;
pub mod executor;

pub use command::{CommandLine, DEFAULT_PROGRAM, compile, compile_with_program};
pub use config::Configuration;
pub use executor::{NsenterExecutor, execute};

// Re-export commonly used types
pub use nsjoin_core::{ConfigError, Error, ExecutionOutput, Result, RunError};
