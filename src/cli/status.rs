//! `clawcage status` command implementation

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::Environment;
use crate::config::discover_workspace_from_env;
use crate::containers::docker::Docker;
use crate::containers::{Gateway, RuntimeStatus};
use crate::openclaw::SERVICE_NAME;
use crate::plan::compose::COMPOSE_FILE_NAME;

#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StatusJson {
    #[serde(flatten)]
    runtime: RuntimeStatus,
    workspace: Option<PathBuf>,
    compose_file: PathBuf,
    plan_written: bool,
}

pub async fn run(args: StatusArgs) -> Result<()> {
    let env = Environment::load()?;
    let compose_file = env.output_dir.join(COMPOSE_FILE_NAME);
    let gateway: Gateway<Docker> = Gateway::new(&compose_file);

    let status = StatusJson {
        runtime: gateway.status(),
        workspace: discover_workspace_from_env(&env.config, &env.home),
        plan_written: compose_file.exists(),
        compose_file,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let mark = |ok: bool| if ok { "✓" } else { "✗" };
    let runtime = &status.runtime;

    match &runtime.version {
        Some(version) => println!("{} Docker {}", mark(runtime.installed), version),
        None => println!("{} Docker installed", mark(runtime.installed)),
    }
    println!("{} Docker daemon running", mark(runtime.daemon_running));
    println!("{} {} running", mark(runtime.gateway_running), SERVICE_NAME);
    match &status.workspace {
        Some(ws) => println!("{} Workspace {}", mark(true), ws.display()),
        None => println!("{} Workspace not found", mark(false)),
    }
    if status.plan_written {
        println!("{} Mount plan {}", mark(true), status.compose_file.display());
    } else {
        println!("{} No mount plan yet. Run `clawcage setup`.", mark(false));
    }
    Ok(())
}
