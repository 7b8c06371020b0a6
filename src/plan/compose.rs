//! Compose descriptor, env file and the artifact writer

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{PlanError, Result};
use super::MountPlan;
use crate::openclaw::{
    BRIDGE_PORT, CONFIG_FILE_NAME, DEFAULT_IMAGE, GATEWAY_PORT, IGNORE_FILE_NAME, SERVICE_NAME,
};

pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";
pub const ENV_FILE_NAME: &str = ".env";

#[derive(Debug, Serialize)]
struct ComposeFile {
    services: BTreeMap<String, ComposeService>,
}

#[derive(Debug, Serialize)]
struct ComposeService {
    image: String,
    restart: String,
    init: bool,
    environment: BTreeMap<String, String>,
    volumes: Vec<String>,
    ports: Vec<String>,
}

/// Where [`write_artifacts`] put each file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub compose: PathBuf,
    pub env: PathBuf,
    pub config: PathBuf,
    pub ignore: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            compose: dir.join(COMPOSE_FILE_NAME),
            env: dir.join(ENV_FILE_NAME),
            config: dir.join(CONFIG_FILE_NAME),
            ignore: dir.join(IGNORE_FILE_NAME),
        }
    }
}

/// YAML for the gateway service. Values that vary per host are referenced from the
/// env file instead of being inlined.
pub fn render_compose(plan: &MountPlan) -> Result<String> {
    let environment = plan
        .environment
        .keys()
        .map(|key| (key.clone(), format!("${{{}}}", key)))
        .collect();

    let service = ComposeService {
        image: format!("${{OPENCLAW_IMAGE:-{}}}", DEFAULT_IMAGE),
        restart: "unless-stopped".to_string(),
        init: true,
        environment,
        volumes: plan
            .volume_mounts
            .iter()
            .map(|m| m.to_compose_spec())
            .collect(),
        ports: vec![
            format!("${{OPENCLAW_GATEWAY_PORT:-{0}}}:{0}", GATEWAY_PORT),
            format!("${{OPENCLAW_BRIDGE_PORT:-{0}}}:{0}", BRIDGE_PORT),
        ],
    };

    let compose = ComposeFile {
        services: BTreeMap::from([(SERVICE_NAME.to_string(), service)]),
    };

    serde_yaml::to_string(&compose).map_err(|e| PlanError::Render {
        artifact: COMPOSE_FILE_NAME,
        message: e.to_string(),
    })
}

/// `KEY=value` lines in key order.
pub fn render_env_file(environment: &BTreeMap<String, String>) -> String {
    environment
        .iter()
        .map(|(k, v)| format!("{}={}\n", k, v))
        .collect()
}

/// Write every artifact of `plan` into `dir`, creating it if needed.
///
/// Stops at the first failure; files already written are left in place.
pub fn write_artifacts(plan: &MountPlan, dir: &Path) -> Result<ArtifactPaths> {
    let paths = ArtifactPaths::in_dir(dir);

    fs::create_dir_all(dir).map_err(|source| PlanError::WriteFailure {
        path: dir.to_path_buf(),
        source,
    })?;

    let compose = render_compose(plan)?;
    write_file(&paths.compose, &compose)?;
    write_file(&paths.env, &render_env_file(&plan.environment))?;
    write_file(&paths.config, &plan.rewritten_config)?;
    write_file(&paths.ignore, &plan.ignore_list.render())?;

    tracing::info!("Wrote mount plan to {}", dir.display());
    Ok(paths)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| PlanError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{compile, PlanInputs};
    use tempfile::TempDir;

    fn plan(home: &Path) -> MountPlan {
        let mut inputs = PlanInputs::new(home, home.join("clawd"), home.join(".clawcage"));
        inputs.token = Some("abc123".to_string());
        compile(&inputs).unwrap()
    }

    #[test]
    fn test_compose_shape() {
        let temp = TempDir::new().unwrap();
        let yaml = render_compose(&plan(temp.path())).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let service = &value["services"]["openclaw-gateway"];
        assert_eq!(service["image"], "${OPENCLAW_IMAGE:-openclaw:local}");
        assert_eq!(
            service["environment"]["OPENCLAW_GATEWAY_TOKEN"],
            "${OPENCLAW_GATEWAY_TOKEN}"
        );
        assert_eq!(service["ports"][0], "${OPENCLAW_GATEWAY_PORT:-18789}:18789");
        assert_eq!(service["ports"][1], "${OPENCLAW_BRIDGE_PORT:-18790}:18790");

        let volumes = service["volumes"].as_sequence().unwrap();
        assert!(volumes
            .iter()
            .any(|v| v.as_str().unwrap().ends_with(":/home/node/.openclaw/openclaw.json:ro")));
    }

    #[test]
    fn test_env_file_sorted() {
        let env = BTreeMap::from([
            ("B".to_string(), "2".to_string()),
            ("A".to_string(), "1".to_string()),
        ]);
        assert_eq!(render_env_file(&env), "A=1\nB=2\n");
    }

    #[test]
    fn test_write_artifacts() {
        let temp = TempDir::new().unwrap();
        let plan = plan(temp.path());
        let out = temp.path().join("out");

        let paths = write_artifacts(&plan, &out).unwrap();

        let env = fs::read_to_string(&paths.env).unwrap();
        assert!(env.contains("OPENCLAW_GATEWAY_TOKEN=abc123\n"));
        assert!(paths.compose.exists());
        assert_eq!(fs::read_to_string(&paths.config).unwrap(), plan.rewritten_config);
        assert!(fs::read_to_string(&paths.ignore)
            .unwrap()
            .starts_with("# clawcage ignore list"));
    }

    #[test]
    fn test_write_failure_names_path() {
        let temp = TempDir::new().unwrap();
        let plan = plan(temp.path());
        let blocker = temp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = write_artifacts(&plan, &blocker.join("sub")).unwrap_err();
        match err {
            PlanError::WriteFailure { path, .. } => assert_eq!(path, blocker.join("sub")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
