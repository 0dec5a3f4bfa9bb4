use crate::cli::{Commands, ExecArgs};
use anyhow::{Context, Result, anyhow};
use nsjoin_nsenter::{Configuration, NsenterExecutor};

pub mod exec;
pub mod show;
pub mod version;

/// Dispatch command to appropriate handler
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Exec(args) => exec::execute(args).await,
        Commands::Show(args) => show::execute(&args),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

/// Build the configuration from `--config` (if any) and the command-line options
fn load_configuration(args: &ExecArgs) -> Result<Configuration> {
    let base = match args.config {
        Some(ref path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                anyhow!("Failed to read config file {}: {e}", path.display())
            })?;
            serde_json::from_str(&raw)
                .map_err(|e| anyhow!("Invalid config file {}: {e}", path.display()))?
        }
        None => Configuration::default(),
    };

    Ok(args.namespaces.apply(base))
}

fn executor(args: &ExecArgs) -> NsenterExecutor {
    NsenterExecutor::new()
        .with_program(args.nsenter.as_str())
        .with_wrapper(args.wrapper.iter().cloned())
}

/// Split the trailing command into program and arguments
fn split_command(args: &ExecArgs) -> Result<(&str, &[String])> {
    let (program, rest) = args
        .command
        .split_first()
        .context("No program given to run")?;
    Ok((program.as_str(), rest))
}
