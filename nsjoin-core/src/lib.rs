//! nsjoin Core - Shared error taxonomy and execution results
//!
//! This crate provides the types passed between the command compiler,
//! the executor and the CLI.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod output;

pub use error::{ConfigError, Error, Result, RunError};
pub use output::ExecutionOutput;
