//! Mount plan compiler
//!
//! Turns a confirmed selection into everything the gateway container needs: volume
//! mounts with host paths remapped into the container, the environment, the
//! categorized ignore list and the gateway config with host home paths rewritten.
//! A denied path is enforced by never being mounted.

pub mod compose;
pub mod error;
pub mod ignore_list;

use rand::RngCore;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use compose::{render_compose, render_env_file, write_artifacts, ArtifactPaths};
pub use error::{PlanError, Result};
pub use ignore_list::{Category, IgnoreList};

use crate::openclaw::{
    self, container_state_path, rewrite_home_paths, synthesize_default, CONTAINER_HOME,
    CONTAINER_WORKSPACE, CREDENTIALS_DIR_NAME, RUNTIME_DIRS, STATE_DIR_NAME,
};
use crate::selection::is_covered;

/// Bytes of entropy in a generated gateway token.
pub const TOKEN_BYTES: usize = 32;

/// Environment variable carrying the gateway token.
pub const TOKEN_ENV: &str = "OPENCLAW_GATEWAY_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountMode {
    ReadWrite,
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeMount {
    pub host_path: PathBuf,
    pub container_path: String,
    pub mode: MountMode,
}

impl VolumeMount {
    pub fn read_write(host_path: impl Into<PathBuf>, container_path: impl Into<String>) -> Self {
        Self {
            host_path: host_path.into(),
            container_path: container_path.into(),
            mode: MountMode::ReadWrite,
        }
    }

    pub fn read_only(host_path: impl Into<PathBuf>, container_path: impl Into<String>) -> Self {
        Self {
            host_path: host_path.into(),
            container_path: container_path.into(),
            mode: MountMode::ReadOnly,
        }
    }

    /// `host:container` with a `:ro` suffix for read-only mounts.
    pub fn to_compose_spec(&self) -> String {
        let mut spec = format!("{}:{}", self.host_path.display(), self.container_path);
        if self.mode == MountMode::ReadOnly {
            spec.push_str(":ro");
        }
        spec
    }
}

/// Why a path that survived the deny filter was still not mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotADirectory,
    Reserved,
    ContainerPathCollision,
    /// `:` separates fields in a compose volume entry.
    UnsupportedPathCharacter,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotADirectory => write!(f, "not a directory"),
            SkipReason::Reserved => write!(f, "reserved for gateway state"),
            SkipReason::ContainerPathCollision => write!(f, "container path already in use"),
            SkipReason::UnsupportedPathCharacter => write!(f, "path contains ':'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything [`compile`] reads. Nothing else on the host is consulted besides the
/// existing gateway config and a stat of each candidate path.
#[derive(Debug, Clone)]
pub struct PlanInputs {
    pub home: PathBuf,
    /// Host directory mounted as the agent workspace.
    pub workspace: PathBuf,
    /// Where the artifacts will be written; the config and ignore file are mounted
    /// from here.
    pub output_dir: PathBuf,
    pub all_paths: Vec<PathBuf>,
    pub denied_paths: Vec<PathBuf>,
    /// Patterns from a previously written ignore file.
    pub previous_ignore: BTreeSet<String>,
    /// Generated when `None`.
    pub token: Option<String>,
    pub image: String,
    pub bind: String,
    pub gateway_port: u16,
    pub bridge_port: u16,
    /// Skip reading the host config and synthesize one instead.
    pub use_default_config: bool,
}

impl PlanInputs {
    pub fn new(
        home: impl Into<PathBuf>,
        workspace: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            home: home.into(),
            workspace: workspace.into(),
            output_dir: output_dir.into(),
            all_paths: Vec::new(),
            denied_paths: Vec::new(),
            previous_ignore: BTreeSet::new(),
            token: None,
            image: openclaw::DEFAULT_IMAGE.to_string(),
            bind: openclaw::DEFAULT_BIND.to_string(),
            gateway_port: openclaw::GATEWAY_PORT,
            bridge_port: openclaw::BRIDGE_PORT,
            use_default_config: false,
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        openclaw::state_dir(&self.home)
    }

    pub fn config_path(&self) -> PathBuf {
        openclaw::config_path(&self.home)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MountPlan {
    pub volume_mounts: Vec<VolumeMount>,
    pub environment: BTreeMap<String, String>,
    #[serde(skip)]
    pub ignore_list: IgnoreList,
    #[serde(skip)]
    pub rewritten_config: String,
    pub paths_to_mount: Vec<PathBuf>,
    pub skipped: Vec<SkippedPath>,
    pub used_default_config: bool,
}

impl MountPlan {
    /// Mounts that came from the user's selection rather than the baseline.
    pub fn user_mounts(&self) -> impl Iterator<Item = &VolumeMount> {
        let prefix = format!("{}/", CONTAINER_WORKSPACE);
        self.volume_mounts
            .iter()
            .filter(move |m| m.container_path.starts_with(&prefix))
    }
}

/// Every path in `all` that is neither denied nor under a denied path, in input order.
pub fn paths_to_mount(all: &[PathBuf], denied: &[PathBuf]) -> Vec<PathBuf> {
    all.iter()
        .filter(|p| !is_covered(p, denied))
        .cloned()
        .collect()
}

/// Mounts every plan has regardless of selection.
pub fn baseline_mounts(inputs: &PlanInputs) -> Vec<VolumeMount> {
    let state_dir = inputs.state_dir();
    let mut mounts = vec![
        VolumeMount::read_only(
            inputs.output_dir.join(openclaw::CONFIG_FILE_NAME),
            container_state_path(openclaw::CONFIG_FILE_NAME),
        ),
        VolumeMount::read_only(
            state_dir.join(CREDENTIALS_DIR_NAME),
            container_state_path(CREDENTIALS_DIR_NAME),
        ),
    ];

    for dir in RUNTIME_DIRS {
        mounts.push(VolumeMount::read_write(
            state_dir.join(dir),
            container_state_path(dir),
        ));
    }

    mounts.push(VolumeMount::read_only(
        inputs.output_dir.join(openclaw::IGNORE_FILE_NAME),
        container_state_path(openclaw::IGNORE_FILE_NAME),
    ));
    mounts.push(VolumeMount::read_write(&inputs.workspace, CONTAINER_WORKSPACE));
    mounts
}

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn compile(inputs: &PlanInputs) -> Result<MountPlan> {
    let candidates = paths_to_mount(&inputs.all_paths, &inputs.denied_paths);
    let mut skipped = Vec::new();
    let mut mounts = baseline_mounts(inputs);
    let mut used: HashSet<String> = mounts.iter().map(|m| m.container_path.clone()).collect();
    let mut mounted: Vec<&Path> = Vec::new();

    for path in &candidates {
        if !path.is_dir() {
            skipped.push(SkippedPath {
                path: path.clone(),
                reason: SkipReason::NotADirectory,
            });
            continue;
        }

        if path.to_string_lossy().contains(':') {
            tracing::warn!("Skipping {}: ':' cannot appear in a volume entry", path.display());
            skipped.push(SkippedPath {
                path: path.clone(),
                reason: SkipReason::UnsupportedPathCharacter,
            });
            continue;
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        if name == STATE_DIR_NAME {
            skipped.push(SkippedPath {
                path: path.clone(),
                reason: SkipReason::Reserved,
            });
            continue;
        }

        let container_path = format!("{}/{}", CONTAINER_WORKSPACE, name);
        if !used.insert(container_path.clone()) {
            tracing::warn!(
                "Skipping {}: {} is already mounted",
                path.display(),
                container_path
            );
            skipped.push(SkippedPath {
                path: path.clone(),
                reason: SkipReason::ContainerPathCollision,
            });
            continue;
        }

        mounts.push(VolumeMount::read_write(path, container_path));
        mounted.push(path);
    }

    let token = inputs.token.clone().unwrap_or_else(generate_token);
    let environment = environment(inputs, &token);

    let mut ignore_list =
        IgnoreList::from_patterns(inputs.denied_paths.iter().map(|p| p.display().to_string()));
    ignore_list.merge_previous(&inputs.previous_ignore, &mounted);

    let (raw_config, used_default_config) = load_config(inputs)?;
    let rewritten_config = rewrite_home_paths(&raw_config, &inputs.home.to_string_lossy());

    tracing::debug!(
        "Compiled plan: {} mounts, {} skipped, {} ignore entries",
        mounts.len(),
        skipped.len(),
        ignore_list.len()
    );

    Ok(MountPlan {
        volume_mounts: mounts,
        environment,
        ignore_list,
        rewritten_config,
        paths_to_mount: candidates,
        skipped,
        used_default_config,
    })
}

fn environment(inputs: &PlanInputs, token: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("HOME".to_string(), CONTAINER_HOME.to_string()),
        ("OPENCLAW_IMAGE".to_string(), inputs.image.clone()),
        (TOKEN_ENV.to_string(), token.to_string()),
        (
            "OPENCLAW_GATEWAY_PORT".to_string(),
            inputs.gateway_port.to_string(),
        ),
        (
            "OPENCLAW_BRIDGE_PORT".to_string(),
            inputs.bridge_port.to_string(),
        ),
        ("OPENCLAW_GATEWAY_BIND".to_string(), inputs.bind.clone()),
    ])
}

/// The host config text, or a synthesized default when there is none.
fn load_config(inputs: &PlanInputs) -> Result<(String, bool)> {
    let synthesized = || {
        synthesize_default(&inputs.bind, inputs.gateway_port)
            .map(|raw| (raw, true))
            .map_err(|e| PlanError::Render {
                artifact: openclaw::CONFIG_FILE_NAME,
                message: e.to_string(),
            })
    };

    if inputs.use_default_config {
        return synthesized();
    }

    let path = inputs.config_path();
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using default", path.display());
            return synthesized();
        }
        Err(e) => {
            return Err(PlanError::ConfigRead {
                path,
                message: e.to_string(),
            })
        }
    };

    if let Err(e) = serde_json::from_str::<serde_json::Value>(&raw) {
        return Err(PlanError::ConfigRead {
            path,
            message: e.to_string(),
        });
    }

    Ok((raw, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inputs(home: &Path) -> PlanInputs {
        let mut inputs = PlanInputs::new(home, home.join("clawd"), home.join(".clawcage"));
        inputs.token = Some("t".repeat(64));
        inputs
    }

    #[test]
    fn test_paths_to_mount_excludes_denied_and_descendants() {
        let all = vec![
            PathBuf::from("/h/a"),
            PathBuf::from("/h/a/b"),
            PathBuf::from("/h/ab"),
            PathBuf::from("/h/c"),
        ];
        let denied = vec![PathBuf::from("/h/a")];
        assert_eq!(
            paths_to_mount(&all, &denied),
            vec![PathBuf::from("/h/ab"), PathBuf::from("/h/c")]
        );
    }

    #[test]
    fn test_baseline_mounts() {
        let inputs = inputs(Path::new("/home/u"));
        let mounts = baseline_mounts(&inputs);

        let specs: Vec<String> = mounts.iter().map(VolumeMount::to_compose_spec).collect();
        assert_eq!(
            specs,
            vec![
                "/home/u/.clawcage/openclaw.json:/home/node/.openclaw/openclaw.json:ro",
                "/home/u/.openclaw/credentials:/home/node/.openclaw/credentials:ro",
                "/home/u/.openclaw/agents:/home/node/.openclaw/agents",
                "/home/u/.openclaw/sessions:/home/node/.openclaw/sessions",
                "/home/u/.openclaw/cron:/home/node/.openclaw/cron",
                "/home/u/.openclaw/logs:/home/node/.openclaw/logs",
                "/home/u/.clawcage/.clawignore:/home/node/.openclaw/.clawignore:ro",
                "/home/u/clawd:/home/node/.openclaw/workspace",
            ]
        );
    }

    #[test]
    fn test_compile_mounts_directories_only() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        fs::create_dir_all(home.join("Documents")).unwrap();
        fs::create_dir_all(home.join(".openclaw")).unwrap();
        fs::write(home.join("notes.md"), "x").unwrap();

        let mut inputs = inputs(home);
        inputs.all_paths = vec![
            home.join("Documents"),
            home.join(".openclaw"),
            home.join("notes.md"),
        ];

        let plan = compile(&inputs).unwrap();
        let user: Vec<&VolumeMount> = plan.user_mounts().collect();
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].container_path, "/home/node/.openclaw/workspace/Documents");
        assert_eq!(user[0].mode, MountMode::ReadWrite);

        let reasons: Vec<SkipReason> = plan.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SkipReason::Reserved, SkipReason::NotADirectory]);
    }

    #[test]
    fn test_compile_basename_collision() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        fs::create_dir_all(home.join("a/src")).unwrap();
        fs::create_dir_all(home.join("b/src")).unwrap();

        let mut inputs = inputs(home);
        inputs.all_paths = vec![home.join("a/src"), home.join("b/src")];

        let plan = compile(&inputs).unwrap();
        assert_eq!(plan.user_mounts().count(), 1);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].path, home.join("b/src"));
        assert_eq!(plan.skipped[0].reason, SkipReason::ContainerPathCollision);

        let mut seen = HashSet::new();
        assert!(plan
            .volume_mounts
            .iter()
            .all(|m| seen.insert(m.container_path.clone())));
    }

    #[test]
    fn test_compile_environment() {
        let temp = TempDir::new().unwrap();
        let plan = compile(&inputs(temp.path())).unwrap();

        assert_eq!(plan.environment["HOME"], "/home/node");
        assert_eq!(plan.environment["OPENCLAW_GATEWAY_TOKEN"], "t".repeat(64));
        assert_eq!(plan.environment["OPENCLAW_GATEWAY_PORT"], "18789");
        assert_eq!(plan.environment["OPENCLAW_BRIDGE_PORT"], "18790");
        assert_eq!(plan.environment["OPENCLAW_GATEWAY_BIND"], "lan");
        assert_eq!(plan.environment["OPENCLAW_IMAGE"], "openclaw:local");
    }

    #[test]
    fn test_generated_token() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_compile_is_deterministic_with_token() {
        let temp = TempDir::new().unwrap();
        let mut inputs = inputs(temp.path());
        inputs.denied_paths = vec![temp.path().join(".ssh"), temp.path().join("x/.env")];

        let a = compile(&inputs).unwrap();
        let b = compile(&inputs).unwrap();
        assert_eq!(a.volume_mounts, b.volume_mounts);
        assert_eq!(a.environment, b.environment);
        assert_eq!(a.ignore_list.render(), b.ignore_list.render());
        assert_eq!(a.rewritten_config, b.rewritten_config);
    }

    #[test]
    fn test_config_rewritten() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        fs::create_dir_all(home.join(".openclaw")).unwrap();
        let raw = format!(
            r#"{{"agents":{{"defaults":{{"workspace":"{}/clawd"}}}}}}"#,
            home.display()
        );
        fs::write(home.join(".openclaw/openclaw.json"), raw).unwrap();

        let plan = compile(&inputs(home)).unwrap();
        assert!(!plan.used_default_config);
        assert_eq!(
            plan.rewritten_config,
            r#"{"agents":{"defaults":{"workspace":"/home/node/clawd"}}}"#
        );
    }

    #[test]
    fn test_config_absent_uses_default() {
        let temp = TempDir::new().unwrap();
        let plan = compile(&inputs(temp.path())).unwrap();
        assert!(plan.used_default_config);
        let value: serde_json::Value = serde_json::from_str(&plan.rewritten_config).unwrap();
        assert_eq!(value["gateway"]["port"], 18789);
    }

    #[test]
    fn test_config_malformed_is_config_read_error() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        fs::create_dir_all(home.join(".openclaw")).unwrap();
        fs::write(home.join(".openclaw/openclaw.json"), "{ not json").unwrap();

        let mut inputs = inputs(home);
        assert!(matches!(
            compile(&inputs),
            Err(PlanError::ConfigRead { .. })
        ));

        inputs.use_default_config = true;
        let plan = compile(&inputs).unwrap();
        assert!(plan.used_default_config);
    }

    #[test]
    fn test_ignore_list_from_denied_and_previous() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        fs::create_dir_all(home.join("Documents")).unwrap();

        let mut inputs = inputs(home);
        inputs.all_paths = vec![home.join("Documents"), home.join(".ssh")];
        inputs.denied_paths = vec![home.join(".ssh")];
        inputs.previous_ignore = BTreeSet::from([
            home.join("Documents").display().to_string(),
            "**/*.pem".to_string(),
        ]);

        let plan = compile(&inputs).unwrap();
        let patterns: Vec<&str> = plan.ignore_list.patterns().collect();
        assert!(patterns.contains(&home.join(".ssh").to_str().unwrap()));
        assert!(patterns.contains(&"**/*.pem"));
        // Documents is mounted now, so the old entry is stale
        assert!(!plan
            .ignore_list
            .contains(&home.join("Documents").display().to_string()));
    }
}
