//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nsjoin_nsenter::{Configuration, DEFAULT_PROGRAM};

#[derive(Parser)]
#[command(name = "nsjoin")]
#[command(about = "Run a program in the namespaces of another process", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a program inside the target's namespaces
    Exec(ExecArgs),

    /// Print the nsenter command line without running it
    Show(ShowArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub namespaces: NamespaceArgs,

    /// JSON configuration file; command-line options are applied on top
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Program that enters the namespaces
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_PROGRAM)]
    pub nsenter: String,

    /// Wrapper command word, repeatable (e.g. --wrapper sudo --wrapper=-n)
    #[arg(long, value_name = "WORD", allow_hyphen_values = true)]
    pub wrapper: Vec<String>,

    /// Program to run and its arguments
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub exec: ExecArgs,

    /// Print the argument vector as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Options named after their nsenter counterparts
#[derive(Args, Debug, Default)]
pub struct NamespaceArgs {
    /// Target process PID
    #[arg(short = 't', long, value_name = "PID")]
    pub target: Option<u32>,

    /// Enter cgroup namespace
    #[arg(short = 'C', long)]
    pub cgroup: bool,

    /// Set SELinux security context from the target
    #[arg(short = 'Z', long)]
    pub follow_context: bool,

    /// Enter IPC namespace
    #[arg(short = 'i', long)]
    pub ipc: bool,

    /// Enter mount namespace
    #[arg(short = 'm', long)]
    pub mount: bool,

    /// Enter network namespace
    #[arg(short = 'n', long)]
    pub net: bool,

    /// Do not fork before executing the program
    #[arg(short = 'F', long)]
    pub no_fork: bool,

    /// Enter PID namespace
    #[arg(short = 'p', long)]
    pub pid: bool,

    /// Keep current UID/GID
    #[arg(long)]
    pub preserve_credentials: bool,

    /// Enter user namespace
    #[arg(short = 'U', long)]
    pub user: bool,

    /// Enter UTS namespace
    #[arg(short = 'u', long)]
    pub uts: bool,

    /// UID to run the program as
    #[arg(short = 'S', long, value_name = "UID")]
    pub setuid: Option<u32>,

    /// GID to run the program as
    #[arg(short = 'G', long, value_name = "GID")]
    pub setgid: Option<u32>,

    /// Root directory
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<String>,

    /// Working directory
    #[arg(short = 'w', long, value_name = "DIR")]
    pub wd: Option<String>,
}

impl NamespaceArgs {
    /// Layer these options over `config`; flags only ever enable
    pub fn apply(&self, mut config: Configuration) -> Configuration {
        if let Some(target) = self.target {
            config.target = target;
        }

        config.cgroup |= self.cgroup;
        config.follow_context |= self.follow_context;
        config.ipc |= self.ipc;
        config.mount |= self.mount;
        config.net |= self.net;
        config.no_fork |= self.no_fork;
        config.pid |= self.pid;
        config.preserve_credentials |= self.preserve_credentials;
        config.user |= self.user;
        config.uts |= self.uts;

        if let Some(uid) = self.setuid {
            config.uid = uid;
        }
        if let Some(gid) = self.setgid {
            config.gid = gid;
        }
        if let Some(ref root) = self.root {
            config.root_directory.clone_from(root);
        }
        if let Some(ref wd) = self.wd {
            config.working_directory.clone_from(wd);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exec() {
        let cli = Cli::try_parse_from([
            "nsjoin", "exec", "-t", "1", "-m", "--setuid", "1000", "--", "ls", "-la",
        ])
        .unwrap();

        let Commands::Exec(args) = cli.command else {
            panic!("expected exec");
        };
        assert_eq!(args.namespaces.target, Some(1));
        assert!(args.namespaces.mount);
        assert_eq!(args.command, vec!["ls", "-la"]);
        assert_eq!(args.nsenter, "nsenter");
    }

    #[test]
    fn test_apply_overrides_file_values() {
        let base = Configuration::new(5)
            .with_net(true)
            .with_uid(10)
            .with_root_directory("/old");

        let args = NamespaceArgs {
            target: Some(7),
            mount: true,
            root: Some("/new".to_string()),
            ..Default::default()
        };

        let config = args.apply(base);
        assert_eq!(config.target, 7);
        assert!(config.net);
        assert!(config.mount);
        assert_eq!(config.uid, 10);
        assert_eq!(config.root_directory, "/new");
    }

    #[test]
    fn test_wrapper_accepts_hyphen_values() {
        let cli = Cli::try_parse_from([
            "nsjoin", "show", "-t", "1", "--wrapper", "sudo", "--wrapper", "-n", "--", "id",
        ])
        .unwrap();

        let Commands::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.exec.wrapper, vec!["sudo", "-n"]);
    }
}
