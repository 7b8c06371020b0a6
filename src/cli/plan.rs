//! `clawcage plan` command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use super::{read_ignore_file, Environment};
use crate::config::{discover_workspace_from_env, expand_tilde, WORKSPACE_ENV};
use crate::openclaw::SERVICE_NAME;
use crate::plan::compose::{write_artifacts, ArtifactPaths, ENV_FILE_NAME};
use crate::plan::{compile, MountPlan, PlanError, PlanInputs, TOKEN_ENV};
use crate::scan::{top_level_paths, TreeBuilder};
use crate::selection::{minimal_cover, Selection};

#[derive(Args)]
pub struct PlanArgs {
    /// Path to keep out of the container (repeatable)
    #[arg(long, value_name = "PATH")]
    pub deny: Vec<String>,

    /// Directory whose entries are candidates for mounting (defaults to home)
    #[arg(long)]
    root: Option<String>,

    /// Gateway token to use instead of the existing or a random one
    #[arg(long, env = "OPENCLAW_GATEWAY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write the artifacts instead of only printing the plan
    #[arg(long)]
    write: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: PlanArgs) -> Result<()> {
    let env = Environment::load()?;
    let workspace = require_workspace(&env)?;

    let root = match &args.root {
        Some(root) => expand_tilde(root, &env.home),
        None => env.config.scan_root(&env.home),
    };
    let mut options = env.config.scan_options();
    options.max_depth = 1;
    let tree = TreeBuilder::new(&root, options).build();

    let previous = read_ignore_file(&env.ignore_file())?;
    let mut denied: Vec<PathBuf> = args
        .deny
        .iter()
        .map(|d| expand_tilde(d, &env.home))
        .collect();
    denied.extend(
        previous
            .iter()
            .map(Path::new)
            .filter(|p| p.is_absolute())
            .map(Path::to_path_buf),
    );

    let selection = Selection {
        denied_paths: minimal_cover(&denied),
        all_paths: top_level_paths(&tree),
    };

    let mut inputs = plan_inputs(&env, workspace, selection)?;
    if args.token.is_some() {
        inputs.token = args.token;
    }
    let plan = compile_with_fallback(&mut inputs)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_summary(&plan);
    }

    if args.write {
        let paths = write_artifacts(&plan, &env.output_dir)?;
        if !args.json {
            print_written(&paths);
        }
    }

    Ok(())
}

pub(crate) fn require_workspace(env: &Environment) -> Result<PathBuf> {
    discover_workspace_from_env(&env.config, &env.home).with_context(|| {
        format!(
            "No OpenClaw workspace found.\n\
             Looked for workspace_dir in the config, ~/.openclaw/workspace and ~/clawd.\n\
             Tip: set {} to your workspace directory",
            WORKSPACE_ENV
        )
    })
}

/// Compiler inputs for `selection`, filled from the user config and whatever a
/// previous run left in the output directory.
pub(crate) fn plan_inputs(
    env: &Environment,
    workspace: PathBuf,
    selection: Selection,
) -> Result<PlanInputs> {
    let sandbox = &env.config.sandbox;
    let mut inputs = PlanInputs::new(&env.home, workspace, &env.output_dir);
    inputs.all_paths = selection.all_paths;
    inputs.denied_paths = selection.denied_paths;
    inputs.previous_ignore = read_ignore_file(&env.ignore_file())?;
    inputs.token = existing_token(&env.output_dir.join(ENV_FILE_NAME));
    inputs.image = sandbox.image.clone();
    inputs.bind = sandbox.bind.clone();
    inputs.gateway_port = sandbox.gateway_port;
    inputs.bridge_port = sandbox.bridge_port;
    Ok(inputs)
}

/// Compile, falling back to the default app config when the existing one is unreadable.
pub(crate) fn compile_with_fallback(inputs: &mut PlanInputs) -> Result<MountPlan> {
    match compile(inputs) {
        Err(PlanError::ConfigRead { path, message }) => {
            tracing::warn!("Ignoring unreadable config {}: {}", path.display(), message);
            println!(
                "Warning: {} could not be parsed ({}). Using a default config.",
                path.display(),
                message
            );
            inputs.use_default_config = true;
            Ok(compile(inputs)?)
        }
        other => Ok(other?),
    }
}

/// Token from a previously written env file, so clients keep working across runs.
pub(crate) fn existing_token(env_file: &Path) -> Option<String> {
    let content = fs::read_to_string(env_file).ok()?;
    content.lines().find_map(|line| {
        let value = line.strip_prefix(TOKEN_ENV)?.strip_prefix('=')?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

pub(crate) fn print_summary(plan: &MountPlan) {
    println!("Mounts for {}:", SERVICE_NAME);
    for mount in &plan.volume_mounts {
        println!("  {}", mount.to_compose_spec());
    }

    if !plan.skipped.is_empty() {
        println!();
        println!("Skipped:");
        for skipped in &plan.skipped {
            println!("  {} ({})", skipped.path.display(), skipped.reason);
        }
    }

    println!();
    if plan.ignore_list.is_empty() {
        println!("Nothing hidden.");
    } else {
        println!("Hidden ({}):", plan.ignore_list.len());
        for pattern in plan.ignore_list.patterns() {
            println!("  {}", pattern);
        }
    }

    if plan.used_default_config {
        println!();
        println!("Using a default openclaw.json");
    }
}

pub(crate) fn print_written(paths: &ArtifactPaths) {
    println!();
    for path in [&paths.compose, &paths.env, &paths.config, &paths.ignore] {
        println!("✓ Wrote {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        assert_eq!(existing_token(&path), None);

        fs::write(&path, "HOME=/home/node\nOPENCLAW_GATEWAY_TOKEN=abc123\n").unwrap();
        assert_eq!(existing_token(&path), Some("abc123".to_string()));

        fs::write(&path, "OPENCLAW_GATEWAY_TOKEN=\n").unwrap();
        assert_eq!(existing_token(&path), None);
    }

    #[test]
    fn test_compile_with_fallback_recovers_from_bad_config() {
        let home = TempDir::new().unwrap();
        let state = home.path().join(".openclaw");
        fs::create_dir_all(&state).unwrap();
        fs::write(state.join("openclaw.json"), "{ not json").unwrap();

        let mut inputs = PlanInputs::new(
            home.path(),
            home.path().join("clawd"),
            home.path().join(".clawcage"),
        );
        inputs.token = Some("t".into());

        let plan = compile_with_fallback(&mut inputs).unwrap();
        assert!(plan.used_default_config);
        assert!(inputs.use_default_config);
    }
}
