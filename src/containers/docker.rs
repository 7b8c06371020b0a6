use super::container_interface::ContainerRuntimeInterface;
use super::error::{classify_stderr, ContainerError, Result};
use std::path::Path;
use std::process::{Command, Output};

#[derive(Default)]
pub struct Docker;

impl Docker {
    /// `docker compose -f <file> <args...>`, run from the compose file's directory so
    /// the adjacent `.env` is picked up.
    fn compose(&self, compose_file: &Path, args: &[&str]) -> Result<Output> {
        if !compose_file.exists() {
            return Err(ContainerError::ComposeFileMissing(
                compose_file.display().to_string(),
            ));
        }

        let mut cmd = Command::new("docker");
        cmd.arg("compose").arg("-f").arg(compose_file).args(args);
        if let Some(dir) = compose_file.parent() {
            cmd.current_dir(dir);
        }

        tracing::debug!("docker compose -f {} {}", compose_file.display(), args.join(" "));
        Ok(cmd.output()?)
    }
}

impl ContainerRuntimeInterface for Docker {
    fn is_available(&self) -> bool {
        Command::new("docker")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn is_daemon_running(&self) -> bool {
        Command::new("docker")
            .args(["info"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn version(&self) -> Result<String> {
        let output = Command::new("docker").arg("--version").output()?;

        if !output.status.success() {
            return Err(ContainerError::NotInstalled);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn is_service_running(&self, compose_file: &Path, service: &str) -> Result<bool> {
        if !compose_file.exists() {
            return Ok(false);
        }

        let output = self.compose(
            compose_file,
            &["ps", "--status", "running", "--services"],
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr)
                .unwrap_or_else(|| ContainerError::CommandFailed(stderr.trim().to_string())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().any(|line| line.trim() == service))
    }

    fn compose_up(&self, compose_file: &Path) -> Result<()> {
        let output = self.compose(compose_file, &["up", "-d"])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("stderr: {}", stderr);
            return Err(classify_stderr(&stderr)
                .unwrap_or_else(|| ContainerError::StartFailed(stderr.trim().to_string())));
        }

        Ok(())
    }

    fn restart_service(&self, compose_file: &Path, service: &str) -> Result<()> {
        // recreate rather than restart so new mounts take effect
        let output = self.compose(
            compose_file,
            &["up", "-d", "--force-recreate", service],
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr)
                .unwrap_or_else(|| ContainerError::RestartFailed(stderr.trim().to_string())));
        }

        Ok(())
    }
}
