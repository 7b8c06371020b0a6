pub mod container_interface;
pub mod docker;
pub mod error;

use serde::Serialize;
use std::path::PathBuf;

pub use container_interface::ContainerRuntimeInterface;
pub use error::ContainerError;
use error::Result;

use crate::openclaw::SERVICE_NAME;

/// Snapshot of the runtime as reported by `clawcage status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeStatus {
    pub installed: bool,
    pub version: Option<String>,
    pub daemon_running: bool,
    pub gateway_running: bool,
}

/// What [`Gateway::apply`] did after a new plan was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Restarted,
    Started,
    LeftStopped,
}

/// The gateway service of one compose project.
pub struct Gateway<T: ContainerRuntimeInterface> {
    pub compose_file: PathBuf,
    pub service: String,
    runtime: T,
}

impl<T> Gateway<T>
where
    T: ContainerRuntimeInterface + Default,
{
    pub fn new(compose_file: impl Into<PathBuf>) -> Self {
        Self::with_runtime(compose_file, T::default())
    }
}

impl<T: ContainerRuntimeInterface> Gateway<T> {
    pub fn with_runtime(compose_file: impl Into<PathBuf>, runtime: T) -> Self {
        Self {
            compose_file: compose_file.into(),
            service: SERVICE_NAME.to_string(),
            runtime,
        }
    }

    /// Fail early with a specific error when the engine cannot be used at all.
    pub fn ensure_runtime(&self) -> Result<()> {
        if !self.runtime.is_available() {
            return Err(ContainerError::NotInstalled);
        }
        if !self.runtime.is_daemon_running() {
            return Err(ContainerError::DaemonNotRunning);
        }
        Ok(())
    }

    pub fn status(&self) -> RuntimeStatus {
        let installed = self.runtime.is_available();
        let version = installed.then(|| self.runtime.version().ok()).flatten();
        let daemon_running = installed && self.runtime.is_daemon_running();
        let gateway_running = daemon_running && self.is_running_or_warn();

        RuntimeStatus {
            installed,
            version,
            daemon_running,
            gateway_running,
        }
    }

    pub fn is_running(&self) -> Result<bool> {
        self.runtime
            .is_service_running(&self.compose_file, &self.service)
    }

    /// [`Self::is_running`], treating a failed query as stopped.
    pub fn is_running_or_warn(&self) -> bool {
        match self.is_running() {
            Ok(running) => running,
            Err(e) => {
                tracing::warn!("Could not tell whether {} is running: {}", self.service, e);
                false
            }
        }
    }

    pub fn start(&self) -> Result<()> {
        self.runtime.compose_up(&self.compose_file)
    }

    pub fn restart(&self) -> Result<()> {
        self.runtime
            .restart_service(&self.compose_file, &self.service)
    }

    /// Pick up a freshly written plan: restart a running gateway, otherwise start it
    /// only when asked to.
    pub fn apply(&self, was_running: bool, start_if_stopped: bool) -> Result<ApplyAction> {
        if was_running {
            tracing::info!("Restarting {} with the new mount plan", self.service);
            self.restart()?;
            return Ok(ApplyAction::Restarted);
        }

        if start_if_stopped {
            tracing::info!("Starting {}", self.service);
            self.start()?;
            return Ok(ApplyAction::Started);
        }

        Ok(ApplyAction::LeftStopped)
    }
}
