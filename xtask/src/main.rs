//! xtask - Development tasks for clawcage

use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for clawcage")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CLI documentation from clap definitions
    GenDocs {
        /// Directory to write reference.md into
        #[arg(long, default_value = "docs/cli")]
        out_dir: String,
    },
}

fn main() {
    let args = Xtask::parse();
    match args.command {
        Commands::GenDocs { out_dir } => generate_cli_docs(Path::new(&out_dir)),
    }
}

fn generate_cli_docs(docs_dir: &Path) {
    let markdown = clap_markdown::help_markdown::<clawcage::cli::Cli>();

    fs::create_dir_all(docs_dir).expect("Failed to create docs directory");

    let output_path = docs_dir.join("reference.md");
    fs::write(&output_path, markdown).expect("Failed to write CLI reference");

    println!("Generated CLI documentation at {}", output_path.display());
}
