//! Command line definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use super::ignore::IgnoreCommands;
use super::plan::PlanArgs;
use super::scan::ScanArgs;
use super::setup::SetupArgs;
use super::status::StatusArgs;

/// Choose which parts of your home directory the OpenClaw gateway container can see
#[derive(Parser)]
#[command(name = "clawcage", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review sensitive files, pick what to share, and write the mount plan
    Setup(SetupArgs),

    /// Report files that look sensitive without changing anything
    Scan(ScanArgs),

    /// Compile a mount plan without the interactive selector
    Plan(PlanArgs),

    /// Manage the ignore list
    Ignore {
        #[command(subcommand)]
        command: IgnoreCommands,
    },

    /// Show container runtime and gateway status
    Status(StatusArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_denies() {
        let cli = Cli::parse_from(["clawcage", "plan", "--deny", "~/.ssh", "--deny", "/tmp/x"]);
        match cli.command {
            Some(Commands::Plan(args)) => assert_eq!(args.deny.len(), 2),
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_setup() {
        let cli = Cli::parse_from(["clawcage"]);
        assert!(cli.command.is_none());
    }
}
