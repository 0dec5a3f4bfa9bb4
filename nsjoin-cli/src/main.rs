//! nsjoin CLI
//!
//! Runs a program inside the namespaces of an existing process through `nsenter`.

use clap::Parser;
use std::process;
use tracing::Level;

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity; stdout is reserved for program output
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::dispatch(cli.command).await {
        eprintln!("❌ Error: {e}");

        // Mirror the delegated program's status (128 + N when killed by signal N)
        let code = e
            .downcast_ref::<nsjoin_core::Error>()
            .and_then(nsjoin_core::Error::shell_status)
            .unwrap_or(1);
        process::exit(code);
    }
}
