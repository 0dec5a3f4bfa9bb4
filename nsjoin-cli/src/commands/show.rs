//! Show command implementation

use anyhow::{Result, anyhow};

use crate::cli::ShowArgs;

pub fn execute(args: &ShowArgs) -> Result<()> {
    let config = super::load_configuration(&args.exec)?;
    let (program, program_args) = super::split_command(&args.exec)?;

    let line = super::executor(&args.exec).command_line(
        &config,
        program,
        program_args.iter().cloned(),
    )?;

    if args.json {
        let json = serde_json::to_string(&line.to_vec())
            .map_err(|e| anyhow!("Failed to encode command: {e}"))?;
        println!("{json}");
    } else {
        println!("{line}");
    }

    Ok(())
}
