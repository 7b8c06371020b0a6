//! User configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::openclaw;
use crate::scan::{ScanOptions, DEFAULT_MAX_DEPTH};
use crate::selection::SessionOptions;

pub const APP_DIR_NAME: &str = ".clawcage";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Read once, and only when no default workspace location exists.
pub const WORKSPACE_ENV: &str = "OPENCLAW_WORKSPACE_DIR";

/// Workspace locations tried after `workspace_dir`, relative to home.
const DEFAULT_WORKSPACES: &[&str] = &[".openclaw/workspace", "clawd"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overrides workspace discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_dir: Option<String>,

    /// Where the compose file and friends are written. Defaults to the app dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory to offer for mounting. Defaults to home.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_true")]
    pub content_scan: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_depth: DEFAULT_MAX_DEPTH,
            content_scan: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Only list sensitive entries shallower than this in the review step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Deny sensitive entries the review step did not list.
    #[serde(default)]
    pub deny_unreviewed_sensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    #[serde(default = "default_image")]
    pub image: String,

    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_gateway_port")]
    pub gateway_port: u16,

    #[serde(default = "default_bridge_port")]
    pub bridge_port: u16,

    /// Restart a running gateway after writing a new plan.
    #[serde(default = "default_true")]
    pub restart_gateway: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            bind: default_bind(),
            gateway_port: default_gateway_port(),
            bridge_port: default_bridge_port(),
            restart_gateway: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_image() -> String {
    openclaw::DEFAULT_IMAGE.to_string()
}

fn default_bind() -> String {
    openclaw::DEFAULT_BIND.to_string()
}

fn default_gateway_port() -> u16 {
    openclaw::GATEWAY_PORT
}

fn default_bridge_port() -> u16 {
    openclaw::BRIDGE_PORT
}

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not find home directory")
}

/// `~/.clawcage`, created on first use.
pub fn get_app_dir() -> Result<PathBuf> {
    let dir = home_dir()?.join(APP_DIR_NAME);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join(CONFIG_FILE_NAME))
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(load_config()?.unwrap_or_default())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_depth: self.scan.max_depth,
            content_scan: self.scan.content_scan,
            ..Default::default()
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            review_max_depth: self.review.max_depth,
            deny_unreviewed_sensitive: self.review.deny_unreviewed_sensitive,
        }
    }

    pub fn scan_root(&self, home: &Path) -> PathBuf {
        self.scan
            .root
            .as_deref()
            .map(|r| expand_tilde(r, home))
            .unwrap_or_else(|| home.to_path_buf())
    }

    pub fn output_dir(&self, home: &Path) -> PathBuf {
        self.output_dir
            .as_deref()
            .map(|d| expand_tilde(d, home))
            .unwrap_or_else(|| home.join(APP_DIR_NAME))
    }
}

pub fn load_config() -> Result<Option<Config>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(Some(config))
}

pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    if let Some(stripped) = path.strip_prefix("~/") {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// First existing workspace: the configured one, the default locations, then the
/// environment override. `env_override` is only called when everything else is
/// missing.
pub fn discover_workspace(
    config: &Config,
    home: &Path,
    env_override: impl FnOnce() -> Option<PathBuf>,
) -> Option<PathBuf> {
    let configured = config
        .workspace_dir
        .as_deref()
        .map(|d| expand_tilde(d, home));

    let candidates = configured
        .into_iter()
        .chain(DEFAULT_WORKSPACES.iter().map(|d| home.join(d)));

    for candidate in candidates {
        if candidate.is_dir() {
            tracing::debug!("Using workspace {}", candidate.display());
            return Some(candidate);
        }
    }

    env_override().filter(|p| p.is_dir())
}

/// [`discover_workspace`] with the real environment.
pub fn discover_workspace_from_env(config: &Config, home: &Path) -> Option<PathBuf> {
    discover_workspace(config, home, || std::env::var_os(WORKSPACE_ENV).map(PathBuf::from))
}
