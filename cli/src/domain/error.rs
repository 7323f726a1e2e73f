//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

/// Substring carried by every definitive remote command failure.
///
/// A remote command that ran and exited nonzero reports this text; anything
/// else (connection refused, ssh exit 255, timeouts) is treated as transient.
pub const PROCESS_EXITED_MARKER: &str = "Process exited with status";

// ── Harness errors ────────────────────────────────────────────────────────────

/// Errors raised while building, provisioning or verifying the image.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no base image matches owner {owner} in {region}")]
    NoBaseImage { owner: String, region: String },

    #[error("no default VPC found in {0}")]
    NoDefaultVpc(String),

    #[error("packer build finished without an artifact id")]
    MissingArtifact,

    #[error("terraform output '{0}' is missing or empty")]
    MissingOutput(String),

    #[error("Process exited with status {code}")]
    RemoteExit { code: i32, output: String },

    #[error("ssh connection failed: {0}")]
    SshConnection(String),

    #[error("Unexpected '{label}' stdout/stderr, want: {want}, got: {got:?}")]
    UnexpectedOutput {
        label: &'static str,
        want: String,
        got: String,
    },

    #[error("'{description}' unsuccessful after {attempts} retries")]
    RetriesExhausted { description: String, attempts: u32 },

    #[error("run aborted: {0}")]
    Aborted(String),

    #[error("{} teardown action(s) failed:\n{}", .0.len(), .0.join("\n"))]
    Teardown(Vec<String>),
}

impl HarnessError {
    /// Returns `true` when the error is a definitive remote failure that must
    /// not be retried.
    #[must_use]
    pub fn is_definitive(&self) -> bool {
        self.to_string().contains(PROCESS_EXITED_MARKER)
    }

    /// Stable machine-readable code for `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoBaseImage { .. } => "no_base_image",
            Self::NoDefaultVpc(_) => "no_default_vpc",
            Self::MissingArtifact => "missing_artifact",
            Self::MissingOutput(_) => "missing_output",
            Self::RemoteExit { .. } => "remote_exit",
            Self::SshConnection(_) => "ssh_connection",
            Self::UnexpectedOutput { .. } => "unexpected_output",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::Aborted(_) => "aborted",
            Self::Teardown(_) => "teardown_failed",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to harness configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Region pool is empty after applying allowed/forbidden lists.")]
    EmptyRegionPool,
}
