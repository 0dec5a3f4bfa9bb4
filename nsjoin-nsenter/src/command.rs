//! Compilation of a [`Configuration`] into an `nsenter` command line

use std::fmt;

use nsjoin_core::ConfigError;

use crate::config::Configuration;

/// Program name used when no other is configured; resolved through `PATH`
pub const DEFAULT_PROGRAM: &str = "nsenter";

type FlagPredicate = fn(&Configuration) -> bool;

/// Value-less flags, in emission order
const BOOLEAN_FLAGS: [(FlagPredicate, &str); 10] = [
    (|c: &Configuration| c.cgroup, "--cgroup"),
    (|c: &Configuration| c.follow_context, "--follow-context"),
    (|c: &Configuration| c.ipc, "--ipc"),
    (|c: &Configuration| c.mount, "--mount"),
    (|c: &Configuration| c.net, "--net"),
    (|c: &Configuration| c.no_fork, "--no-fork"),
    (|c: &Configuration| c.pid, "--pid"),
    (
        |c: &Configuration| c.preserve_credentials,
        "--preserve-credentials",
    ),
    (|c: &Configuration| c.user, "--user"),
    (|c: &Configuration| c.uts, "--uts"),
];

/// A program and its argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Create a command line with no arguments
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Program to launch
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, without the program name
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Append one argument
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments in order
    pub fn extend_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run this command line through `wrapper` (e.g. `["sudo", "-n"]`)
    ///
    /// The wrapper's first element becomes the program; the current program
    /// and arguments follow the wrapper's own arguments. An empty wrapper
    /// leaves the command line unchanged.
    #[must_use]
    pub fn wrapped(self, wrapper: &[String]) -> Self {
        let Some((program, wrapper_args)) = wrapper.split_first() else {
            return self;
        };

        let mut args = Vec::with_capacity(wrapper_args.len() + 1 + self.args.len());
        args.extend(wrapper_args.iter().cloned());
        args.push(self.program);
        args.extend(self.args);

        Self {
            program: program.clone(),
            args,
        }
    }

    /// Full argument vector, program name first
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .cloned()
            .collect()
    }

    /// Build a [`std::process::Command`] with default stdio
    #[must_use]
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Build a [`tokio::process::Command`] with default stdio
    #[must_use]
    pub fn to_tokio_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Shell-style single quoting, only where needed for readability
fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));

    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Compile a configuration into an `nsenter` command line
///
/// See [`compile_with_program`].
pub fn compile(config: &Configuration) -> Result<CommandLine, ConfigError> {
    compile_with_program(config, DEFAULT_PROGRAM)
}

/// Compile a configuration into a command line for `program`
///
/// Arguments are emitted in a fixed order: `--target`, the boolean flags
/// (`--cgroup`, `--follow-context`, `--ipc`, `--mount`, `--net`,
/// `--no-fork`, `--pid`, `--preserve-credentials`, `--user`, `--uts`), then
/// `--setgid`, `--root`, `--setuid` and `--wd`. Unset values are omitted.
///
/// # Errors
/// Returns [`ConfigError::MissingTarget`] if `config.target` is zero.
pub fn compile_with_program(
    config: &Configuration,
    program: impl Into<String>,
) -> Result<CommandLine, ConfigError> {
    if config.target == 0 {
        return Err(ConfigError::MissingTarget);
    }

    if config.has_credential_conflict() {
        tracing::warn!(
            uid = config.uid,
            gid = config.gid,
            "preserve_credentials set together with an explicit UID/GID; nsenter decides precedence"
        );
    }

    let mut line = CommandLine::new(program);
    line.arg("--target").arg(config.target.to_string());

    line.extend_args(
        BOOLEAN_FLAGS
            .iter()
            .filter(|(enabled, _)| enabled(config))
            .map(|&(_, flag)| flag),
    );

    if config.gid != 0 {
        line.arg("--setgid").arg(config.gid.to_string());
    }
    if !config.root_directory.is_empty() {
        line.arg("--root").arg(config.root_directory.as_str());
    }
    if config.uid != 0 {
        line.arg("--setuid").arg(config.uid.to_string());
    }
    if !config.working_directory.is_empty() {
        line.arg("--wd").arg(config.working_directory.as_str());
    }

    tracing::debug!(command = %line, "Compiled nsenter command");

    Ok(line)
}
