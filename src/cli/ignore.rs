//! `clawcage ignore` subcommands implementation

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fs;

use super::{read_ignore_file, Environment};
use crate::config::expand_tilde;
use crate::plan::{Category, IgnoreList};

#[derive(Subcommand)]
pub enum IgnoreCommands {
    /// Show the ignore list by category
    List(IgnoreListArgs),

    /// Hide paths or patterns from the gateway
    Add(IgnorePatternArgs),

    /// Stop hiding paths or patterns
    Remove(IgnorePatternArgs),
}

#[derive(Args)]
pub struct IgnoreListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct IgnorePatternArgs {
    /// Paths or glob patterns; a leading ~ is expanded
    #[arg(required = true)]
    patterns: Vec<String>,
}

#[derive(Serialize)]
struct SectionJson {
    category: String,
    patterns: Vec<String>,
}

pub async fn run(command: IgnoreCommands) -> Result<()> {
    let env = Environment::load()?;
    match command {
        IgnoreCommands::List(args) => list(&env, args),
        IgnoreCommands::Add(args) => add(&env, args),
        IgnoreCommands::Remove(args) => remove(&env, args),
    }
}

fn load(env: &Environment) -> Result<IgnoreList> {
    let patterns = read_ignore_file(&env.ignore_file())?;
    Ok(IgnoreList::from_patterns(patterns))
}

fn save(env: &Environment, list: &IgnoreList) -> Result<()> {
    let path = env.ignore_file();
    fs::create_dir_all(&env.output_dir)
        .with_context(|| format!("Failed to create {}", env.output_dir.display()))?;
    fs::write(&path, list.render()).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn normalize(pattern: &str, env: &Environment) -> String {
    if pattern.starts_with('~') {
        expand_tilde(pattern, &env.home).display().to_string()
    } else {
        pattern.to_string()
    }
}

fn list(env: &Environment, args: IgnoreListArgs) -> Result<()> {
    let list = load(env)?;

    if args.json {
        let sections: Vec<SectionJson> = list
            .categories()
            .filter_map(|category| {
                list.section(category).map(|patterns| SectionJson {
                    category: category.to_string(),
                    patterns: patterns.iter().cloned().collect(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    if list.is_empty() {
        println!("Ignore list is empty.");
        return Ok(());
    }

    for category in list.categories() {
        let Some(patterns) = list.section(category) else {
            continue;
        };
        println!("{} ({})", category, patterns.len());
        for pattern in patterns {
            println!("  {}", pattern);
        }
    }
    Ok(())
}

fn add(env: &Environment, args: IgnorePatternArgs) -> Result<()> {
    let mut list = load(env)?;
    for pattern in &args.patterns {
        let pattern = normalize(pattern, env);
        let category = Category::of(&pattern);
        if list.insert(pattern.clone()) {
            println!("✓ Hiding {} ({})", pattern, category);
        } else {
            println!("Already hidden: {}", pattern);
        }
    }
    save(env, &list)?;
    println!("Run `clawcage setup` or `clawcage plan --write` to apply.");
    Ok(())
}

fn remove(env: &Environment, args: IgnorePatternArgs) -> Result<()> {
    let mut list = load(env)?;
    for pattern in &args.patterns {
        let pattern = normalize(pattern, env);
        if list.remove(&pattern) {
            println!("✓ No longer hiding {}", pattern);
        } else {
            println!("Not in the ignore list: {}", pattern);
        }
    }
    save(env, &list)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn environment(home: &TempDir) -> Environment {
        Environment {
            config: Config::default(),
            home: home.path().to_path_buf(),
            output_dir: home.path().join(".clawcage"),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let home = TempDir::new().unwrap();
        assert!(load(&environment(&home)).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_patterns() {
        let home = TempDir::new().unwrap();
        let env = environment(&home);
        let ssh = normalize("~/.ssh", &env);
        assert_eq!(ssh, home.path().join(".ssh").display().to_string());

        let mut list = IgnoreList::new();
        list.insert(ssh.clone());
        list.insert("*.log".to_string());
        save(&env, &list).unwrap();

        let loaded = load(&env).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.patterns().any(|p| p == ssh));
    }
}
