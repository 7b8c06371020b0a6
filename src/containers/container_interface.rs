use super::error::Result;
use std::path::Path;

/// A container engine that can run a compose project.
pub trait ContainerRuntimeInterface {
    // backend stuff
    fn is_available(&self) -> bool;

    fn is_daemon_running(&self) -> bool;

    fn version(&self) -> Result<String>;

    // compose project management
    fn is_service_running(&self, compose_file: &Path, service: &str) -> Result<bool>;

    fn compose_up(&self, compose_file: &Path) -> Result<()>;

    fn restart_service(&self, compose_file: &Path, service: &str) -> Result<()>;
}
