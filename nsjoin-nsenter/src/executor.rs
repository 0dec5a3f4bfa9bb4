//! Running programs in the namespaces of a target process
//!
//! Every call spawns exactly one process and blocks (or awaits) until it
//! exits. There is no timeout and no retry.

use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output, Stdio};

use nix::sys::signal::Signal;
use tracing::debug;

use nsjoin_core::{ConfigError, Error, ExecutionOutput, Result, RunError};

use crate::command::{CommandLine, DEFAULT_PROGRAM, compile_with_program};
use crate::config::Configuration;

/// Runs programs through `nsenter`
///
/// Holds no per-call state, so a single executor can be shared freely
/// between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsenterExecutor {
    program: String,
    wrapper: Vec<String>,
}

impl Default for NsenterExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl NsenterExecutor {
    /// Create an executor using `nsenter` from `PATH`
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            wrapper: Vec::new(),
        }
    }

    /// Use another delegated program (name or path)
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Launch the delegated program through a wrapper command such as `sudo -n`
    #[must_use]
    pub fn with_wrapper<I, S>(mut self, wrapper: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrapper = wrapper.into_iter().map(Into::into).collect();
        self
    }

    /// Delegated program
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Wrapper command, empty if none
    #[must_use]
    pub fn wrapper(&self) -> &[String] {
        &self.wrapper
    }

    /// Full command line that [`execute`](Self::execute) would launch
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration has no target.
    pub fn command_line<I, S>(
        &self,
        config: &Configuration,
        program: &str,
        args: I,
    ) -> std::result::Result<CommandLine, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut line = compile_with_program(config, self.program.as_str())?;
        line.arg(program).extend_args(args);

        Ok(line.wrapped(&self.wrapper))
    }

    /// Run `program` with `args` inside the target's namespaces
    ///
    /// Blocks until the process exits. Stdin is the null device; stdout and
    /// stderr are buffered in full.
    ///
    /// # Errors
    /// - [`Error::Setup`] if the configuration is rejected; nothing is spawned
    /// - [`Error::Run`] if the process cannot be launched or exits unsuccessfully;
    ///   the output captured so far is kept in the error
    pub fn execute<I, S>(
        &self,
        config: &Configuration,
        program: &str,
        args: I,
    ) -> Result<ExecutionOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let line = self
            .command_line(config, program, args)
            .map_err(Error::Setup)?;

        log_launch(config, &line);

        let result = line
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        collect(&line, result)
    }

    /// Async variant of [`execute`](Self::execute) on the tokio runtime
    ///
    /// # Errors
    /// Same as [`execute`](Self::execute).
    pub async fn execute_async<I, S>(
        &self,
        config: &Configuration,
        program: &str,
        args: I,
    ) -> Result<ExecutionOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let line = self
            .command_line(config, program, args)
            .map_err(Error::Setup)?;

        log_launch(config, &line);

        let result = line
            .to_tokio_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        collect(&line, result)
    }
}

/// Run `program` with `args` inside the target's namespaces using `nsenter`
/// from `PATH`
///
/// # Errors
/// See [`NsenterExecutor::execute`].
pub fn execute<I, S>(config: &Configuration, program: &str, args: I) -> Result<ExecutionOutput>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    NsenterExecutor::new().execute(config, program, args)
}

fn log_launch(config: &Configuration, line: &CommandLine) {
    debug!(
        target_pid = config.target,
        namespaces = ?config.enabled_namespaces(),
        "Entering namespaces of target process"
    );
    debug!(command = %line, "Launching");
}

fn collect(line: &CommandLine, result: std::io::Result<Output>) -> Result<ExecutionOutput> {
    let program = line.program().to_string();

    let output = match result {
        Ok(output) => output,
        Err(source) => {
            debug!(program = %program, error = %source, "Failed to launch");
            return Err(Error::Run {
                error: RunError::Spawn { program, source },
                output: ExecutionOutput::default(),
            });
        }
    };

    let captured = ExecutionOutput::from_bytes(&output.stdout, &output.stderr);

    if output.status.success() {
        debug!(
            stdout_len = captured.stdout.len(),
            stderr_len = captured.stderr.len(),
            "Command completed"
        );
        return Ok(captured);
    }

    let error = exit_failure(program, output.status);
    debug!(error = %error, "Command failed");

    Err(Error::Run {
        error,
        output: captured,
    })
}

fn exit_failure(program: String, status: ExitStatus) -> RunError {
    if let Some(code) = status.code() {
        return RunError::Exit { program, code };
    }

    let signal = status.signal().unwrap_or_default();

    RunError::Signaled {
        program,
        signal,
        name: signal_name(signal),
    }
}

fn signal_name(raw: i32) -> String {
    Signal::try_from(raw).map_or_else(|_| raw.to_string(), |s| s.as_str().to_string())
}
