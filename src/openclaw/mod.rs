//! OpenClaw gateway layout
//!
//! Host-side locations of the gateway's state and where each piece appears inside
//! the gateway container.

pub mod config;

use std::path::{Path, PathBuf};

pub use config::{rewrite_home_paths, synthesize_default, OpenClawConfig};

/// Dotted state directory under the user's home.
pub const STATE_DIR_NAME: &str = ".openclaw";
pub const CONFIG_FILE_NAME: &str = "openclaw.json";
pub const IGNORE_FILE_NAME: &str = ".clawignore";
pub const CREDENTIALS_DIR_NAME: &str = "credentials";

/// State subdirectories the gateway writes to at runtime.
pub const RUNTIME_DIRS: &[&str] = &["agents", "sessions", "cron", "logs"];

pub const CONTAINER_HOME: &str = "/home/node";
pub const CONTAINER_STATE_DIR: &str = "/home/node/.openclaw";
pub const CONTAINER_WORKSPACE: &str = "/home/node/.openclaw/workspace";

pub const SERVICE_NAME: &str = "openclaw-gateway";
pub const DEFAULT_IMAGE: &str = "openclaw:local";
pub const GATEWAY_PORT: u16 = 18789;
pub const BRIDGE_PORT: u16 = 18790;
pub const DEFAULT_BIND: &str = "lan";

/// `~/.openclaw` for the given home.
pub fn state_dir(home: &Path) -> PathBuf {
    home.join(STATE_DIR_NAME)
}

pub fn config_path(home: &Path) -> PathBuf {
    state_dir(home).join(CONFIG_FILE_NAME)
}

/// Absolute container path for a state-relative entry.
pub fn container_state_path(name: &str) -> String {
    format!("{}/{}", CONTAINER_STATE_DIR, name)
}
