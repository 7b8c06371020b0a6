//! `clawcage scan` command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::{truncate, Environment};
use crate::config::expand_tilde;
use crate::scan::{collect_sensitive, SensitiveFileItem, TreeBuilder};

const TABLE_COL_PATH: usize = 50;

#[derive(Args)]
pub struct ScanArgs {
    /// Directory to scan (defaults to the configured root or home)
    path: Option<String>,

    /// How many directory levels to scan
    #[arg(long)]
    max_depth: Option<usize>,

    /// Only look at names, never file contents
    #[arg(long)]
    no_content: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ScanArgs) -> Result<()> {
    let env = Environment::load()?;
    let root: PathBuf = match &args.path {
        Some(path) => expand_tilde(path, &env.home),
        None => env.config.scan_root(&env.home),
    };

    let mut options = env.config.scan_options();
    if let Some(depth) = args.max_depth {
        options.max_depth = depth;
    }
    if args.no_content {
        options.content_scan = false;
    }

    let scan_root = root.clone();
    let tree =
        tokio::task::spawn_blocking(move || TreeBuilder::new(scan_root, options).build()).await?;
    let items = collect_sensitive(&tree, None);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No sensitive files found under {}.", root.display());
        return Ok(());
    }

    print_table(&items);
    println!();
    println!("{} sensitive entries under {}", items.len(), root.display());
    Ok(())
}

fn print_table(items: &[SensitiveFileItem]) {
    println!("{:<width$} REASON", "PATH", width = TABLE_COL_PATH);
    println!("{}", "-".repeat(TABLE_COL_PATH + 30));
    for item in items {
        let path = truncate(&item.relative_path.display().to_string(), TABLE_COL_PATH);
        println!("{:<width$} {}", path, item.reason, width = TABLE_COL_PATH);
    }
}
