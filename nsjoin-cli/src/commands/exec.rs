//! Exec command implementation

use std::io::Write;

use anyhow::{Result, anyhow};
use nsjoin_core::ExecutionOutput;
use tracing::{debug, warn};

use crate::cli::ExecArgs;

pub async fn execute(args: ExecArgs) -> Result<()> {
    let config = super::load_configuration(&args)?;
    let executor = super::executor(&args);
    let (program, program_args) = super::split_command(&args)?;

    if args.wrapper.is_empty() && !nix::unistd::geteuid().is_root() {
        warn!("Not running as root; entering namespaces will likely be denied");
    }

    if !config.has_any() {
        warn!("No namespace selected; only identity and directory options apply");
    }

    debug!(?config, "Loaded configuration");

    match executor
        .execute_async(&config, program, program_args.iter().cloned())
        .await
    {
        Ok(output) => {
            forward(&output)?;
            debug!("✅ {} completed", program);
            Ok(())
        }
        Err(e) => {
            if let Some(output) = e.output() {
                forward(output)?;
            }
            Err(e.into())
        }
    }
}

/// Write captured streams to our own stdout/stderr
fn forward(output: &ExecutionOutput) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.stdout.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| anyhow!("Failed to write stdout: {e}"))?;

    let mut stderr = std::io::stderr().lock();
    stderr
        .write_all(output.stderr.as_bytes())
        .and_then(|()| stderr.flush())
        .map_err(|e| anyhow!("Failed to write stderr: {e}"))?;

    Ok(())
}
