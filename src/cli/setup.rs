//! `clawcage setup` command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::plan::{
    compile_with_fallback, plan_inputs, print_summary, print_written, require_workspace,
};
use super::prompt::{self, Prompter};
use super::Environment;
use crate::config::expand_tilde;
use crate::containers::docker::Docker;
use crate::containers::{ApplyAction, Gateway};
use crate::openclaw::SERVICE_NAME;
use crate::plan::compose::{write_artifacts, COMPOSE_FILE_NAME};
use crate::scan::TreeBuilder;
use crate::selection::{SelectionError, SelectionOutcome, Session};
use crate::tui;

#[derive(Args, Default)]
pub struct SetupArgs {
    /// Directory to browse instead of your home directory
    #[arg(long)]
    root: Option<String>,

    /// How many directory levels to scan
    #[arg(long)]
    max_depth: Option<usize>,

    /// Gateway token to use instead of the existing or a random one
    #[arg(long, env = "OPENCLAW_GATEWAY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write the plan without restarting the gateway
    #[arg(long)]
    no_restart: bool,

    /// Start the gateway if it is not already running
    #[arg(long)]
    start: bool,

    /// Ask line by line instead of opening the full-screen selector
    #[arg(long)]
    no_tui: bool,
}

pub async fn run(args: SetupArgs) -> Result<()> {
    let env = Environment::load()?;
    let restart = env.config.sandbox.restart_gateway && !args.no_restart;

    let gateway: Gateway<Docker> = Gateway::new(env.output_dir.join(COMPOSE_FILE_NAME));
    if restart || args.start {
        gateway.ensure_runtime()?;
    }
    let was_running = restart && gateway.is_running_or_warn();

    let workspace = require_workspace(&env)?;

    let root: PathBuf = match &args.root {
        Some(root) => expand_tilde(root, &env.home),
        None => env.config.scan_root(&env.home),
    };
    let mut options = env.config.scan_options();
    if let Some(depth) = args.max_depth {
        options.max_depth = depth;
    }

    println!("Scanning {}...", root.display());
    let tree = tokio::task::spawn_blocking(move || TreeBuilder::new(root, options).build()).await?;

    let session_options = env.config.session_options();
    let outcome = if args.no_tui {
        prompt::select(Session::new(tree, session_options), &mut Prompter::stdio())?
    } else {
        match tui::run_selector(Session::new(tree.clone(), session_options.clone())) {
            Ok(outcome) => outcome,
            Err(SelectionError::IoUnavailable(e)) => {
                tracing::warn!("Full-screen selector unavailable: {}", e);
                println!("Interactive terminal unavailable, asking line by line instead.");
                prompt::select(Session::new(tree, session_options), &mut Prompter::stdio())?
            }
        }
    };

    let selection = match outcome {
        SelectionOutcome::Confirmed(selection) => selection,
        SelectionOutcome::Cancelled => {
            println!("Setup cancelled. Nothing was written.");
            return Ok(());
        }
    };

    let mut inputs = plan_inputs(&env, workspace, selection)?;
    if args.token.is_some() {
        inputs.token = args.token;
    }
    let plan = compile_with_fallback(&mut inputs)?;

    print_summary(&plan);
    let paths = write_artifacts(&plan, &env.output_dir)?;
    print_written(&paths);
    println!();

    if !restart && !args.start {
        println!(
            "Apply with: docker compose -f {} up -d",
            paths.compose.display()
        );
        return Ok(());
    }

    match gateway.apply(was_running, args.start)? {
        ApplyAction::Restarted => println!("✓ Restarted {}", SERVICE_NAME),
        ApplyAction::Started => println!("✓ Started {}", SERVICE_NAME),
        ApplyAction::LeftStopped => {
            println!("{} is not running. Start it with: clawcage setup --start", SERVICE_NAME)
        }
    }

    Ok(())
}
