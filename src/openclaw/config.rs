//! OpenClaw configuration as seen by the container

use serde::{Deserialize, Serialize};

use super::{CONTAINER_HOME, CONTAINER_WORKSPACE};

/// The subset of `openclaw.json` that is written when no host config exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenClawConfig {
    pub agents: AgentsConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefaults {
    pub workspace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub mode: String,
    pub bind: String,
    pub port: u16,
    pub auth: GatewayAuth,
}

/// The token itself is passed through the environment, never the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayAuth {
    pub mode: String,
}

impl OpenClawConfig {
    pub fn new(bind: &str, port: u16) -> Self {
        Self {
            agents: AgentsConfig {
                defaults: AgentDefaults {
                    workspace: CONTAINER_WORKSPACE.to_string(),
                },
            },
            gateway: GatewayConfig {
                mode: "local".to_string(),
                bind: bind.to_string(),
                port,
                auth: GatewayAuth {
                    mode: "token".to_string(),
                },
            },
        }
    }
}

/// Minimal config for a host that never ran the gateway.
pub fn synthesize_default(bind: &str, port: u16) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&OpenClawConfig::new(bind, port))
}

/// Replace every literal occurrence of the host home path with the container home.
///
/// This is a plain text substitution, so paths that merely share the prefix as a
/// string (`/home/al` inside `/home/alice`) are rewritten too. An empty home is a
/// no-op.
pub fn rewrite_home_paths(raw: &str, host_home: &str) -> String {
    let host_home = host_home.trim_end_matches('/');
    if host_home.is_empty() {
        return raw.to_string();
    }
    raw.replace(host_home, CONTAINER_HOME)
}
