//! Infrastructure implementation of the `RemoteShell` port over OpenSSH.
//!
//! The private key is written to a fresh `0600` temp file for each command.
//! Host keys are not checked: every run talks to a brand-new instance.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::application::ports::{CommandRunner, RemoteShell, SshHost};
use crate::domain::RemoteOutput;

pub struct SshCli<R: CommandRunner> {
    runner: R,
    connect_timeout_secs: u64,
    command_timeout: Duration,
}

impl<R: CommandRunner> SshCli<R> {
    pub fn new(runner: R, connect_timeout_secs: u64, command_timeout: Duration) -> Self {
        Self {
            runner,
            connect_timeout_secs,
            command_timeout,
        }
    }
}

impl<R: CommandRunner> RemoteShell for SshCli<R> {
    async fn exec(&self, host: &SshHost<'_>, command: &str) -> Result<RemoteOutput> {
        let key_file = write_key_file(&host.key_pair.private_key)?;
        let key_arg = key_file.path().to_string_lossy().into_owned();
        let connect_timeout = format!("ConnectTimeout={}", self.connect_timeout_secs);
        let destination = format!("{}@{}", host.user, host.hostname);
        let args = [
            "-i",
            key_arg.as_str(),
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            "UserKnownHostsFile=/dev/null",
            "-o",
            "LogLevel=ERROR",
            "-o",
            "BatchMode=yes",
            "-o",
            connect_timeout.as_str(),
            destination.as_str(),
            command,
        ];
        tracing::debug!(host = host.hostname, command, "ssh exec");
        let output = self
            .runner
            .run_with_timeout("ssh", &args, self.command_timeout)
            .await?;
        Ok(RemoteOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn write_key_file(private_key: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("vault-ami-test-key-")
        .tempfile()
        .context("creating ssh key file")?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .context("restricting ssh key file")?;
    }
    file.write_all(private_key.as_bytes())
        .context("writing ssh key file")?;
    if !private_key.ends_with('\n') {
        file.write_all(b"\n").context("writing ssh key file")?;
    }
    file.flush().context("writing ssh key file")?;
    Ok(file)
}
