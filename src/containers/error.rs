use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(
        "Docker is not installed or not in PATH.\n\
         Install Docker: https://docs.docker.com/get-docker/"
    )]
    NotInstalled,

    #[error(
        "Docker daemon is not running.\n\
         Start Docker Desktop or run: sudo systemctl start docker"
    )]
    DaemonNotRunning,

    #[error(
        "Docker permission denied.\n\
         On Linux, add your user to the docker group:\n\
         sudo usermod -aG docker $USER\n\
         Then log out and back in."
    )]
    PermissionDenied,

    #[error("Compose file not found: {0}")]
    ComposeFileMissing(String),

    #[error("Failed to start gateway: {0}")]
    StartFailed(String),

    #[error("Failed to restart gateway: {0}")]
    RestartFailed(String),

    #[error("Docker command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContainerError>;

/// Map well-known docker stderr messages to specific errors.
pub(crate) fn classify_stderr(stderr: &str) -> Option<ContainerError> {
    if stderr.contains("permission denied") {
        return Some(ContainerError::PermissionDenied);
    }
    if stderr.contains("Cannot connect to the Docker daemon") {
        return Some(ContainerError::DaemonNotRunning);
    }
    None
}
