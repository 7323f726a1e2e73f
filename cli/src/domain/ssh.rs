//! SSH session classification.
//!
//! The `ssh` client reports its own failures with exit status 255; any
//! other nonzero status is the remote command's own exit code.

use crate::domain::error::HarnessError;

/// Exit status the OpenSSH client uses for connection-level failures.
pub const SSH_CLIENT_FAILURE: i32 = 255;

/// Captured result of one remote command, independent of `std::process`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    /// Exit code, `None` when the client was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RemoteOutput {
    /// Stdout followed by stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// Check a remote command result, returning the combined output on success.
///
/// # Errors
///
/// - [`HarnessError::RemoteExit`] when the remote command ran and exited
///   nonzero (definitive).
/// - [`HarnessError::SshConnection`] when the client could not run it
///   (transient).
pub fn check_remote_output(out: &RemoteOutput) -> Result<String, HarnessError> {
    match out.code {
        Some(0) => Ok(out.combined()),
        Some(SSH_CLIENT_FAILURE) => Err(HarnessError::SshConnection(
            out.stderr.trim().to_string(),
        )),
        Some(code) => Err(HarnessError::RemoteExit {
            code,
            output: out.combined(),
        }),
        None => Err(HarnessError::SshConnection(
            "ssh terminated by signal".to_string(),
        )),
    }
}
