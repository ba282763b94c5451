//! Windows service control through PowerShell
//!
//! The background connector runs as a Windows service; the wizard only
//! reads its status and can ask the host to start it.

use async_trait::async_trait;
use std::process::Command;

use crate::domain::collaborators::{ServiceControl, ServiceControlError};

/// PowerShell-backed service control
pub struct PowerShellServiceControl {
    service_name: String,
}

impl PowerShellServiceControl {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn classify_stderr(&self, stderr: &str) -> Option<ServiceControlError> {
        if stderr.contains("Cannot find any service") || stderr.contains("ObjectNotFound") {
            return Some(ServiceControlError::NotFound(self.service_name.clone()));
        }
        if stderr.contains("Access is denied") || stderr.contains("permission") {
            return Some(ServiceControlError::AccessDenied);
        }
        None
    }

    async fn run(&self, command: String) -> Result<PsOutput, ServiceControlError> {
        let joined = tokio::task::spawn_blocking(move || {
            Command::new("powershell").args(["-Command", &command]).output()
        })
        .await
        .map_err(|e| ServiceControlError::Command(e.to_string()))?;
        let output = joined
            .map_err(|e| ServiceControlError::Command(format!("failed to launch powershell: {e}")))?;
        Ok(PsOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

struct PsOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

#[async_trait]
impl ServiceControl for PowerShellServiceControl {
    async fn status(&self) -> Result<bool, ServiceControlError> {
        let command = format!(
            "(Get-Service -Name '{}' -ErrorAction SilentlyContinue).Status -eq 'Running'",
            self.service_name
        );
        let out = self.run(command).await?;

        if out.stdout.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if !out.success {
            if let Some(err) = self.classify_stderr(&out.stderr) {
                return Err(err);
            }
            return Err(ServiceControlError::Command(format!(
                "error checking service status: {}",
                out.stderr
            )));
        }
        Ok(false)
    }

    async fn start(&self) -> Result<(), ServiceControlError> {
        let command = format!(
            "Start-Service -Name '{}' -ErrorAction Stop; $?",
            self.service_name
        );
        let out = self.run(command).await?;

        if out.success && (out.stdout.eq_ignore_ascii_case("true") || out.stdout.is_empty()) {
            return Ok(());
        }
        if let Some(err) = self.classify_stderr(&out.stderr) {
            return Err(err);
        }
        Err(ServiceControlError::Command(format!(
            "failed to start service: {}",
            out.stderr
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_classification_discriminates_known_failures() {
        let control = PowerShellServiceControl::new("ConnectorSageBitrix");
        assert!(matches!(
            control.classify_stderr("Cannot find any service with service name"),
            Some(ServiceControlError::NotFound(_))
        ));
        assert!(matches!(
            control.classify_stderr("Access is denied"),
            Some(ServiceControlError::AccessDenied)
        ));
        assert!(control.classify_stderr("something else entirely").is_none());
    }
}
