//! clawcage - choose what the OpenClaw gateway container can see

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use clawcage::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("CLAWCAGE_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("clawcage=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completion { shell }) => {
            generate(shell, &mut Cli::command(), "clawcage", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Setup(args)) => cli::setup::run(args).await,
        Some(Commands::Scan(args)) => cli::scan::run(args).await,
        Some(Commands::Plan(args)) => cli::plan::run(args).await,
        Some(Commands::Ignore { command }) => cli::ignore::run(command).await,
        Some(Commands::Status(args)) => cli::status::run(args).await,
        None => cli::setup::run(Default::default()).await,
    }
}
