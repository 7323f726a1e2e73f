//! Domain types and validators for harness configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ec2::BaseImageFilter;
use crate::domain::error::ConfigError;
use crate::domain::packer::default_retryable_errors;
use crate::domain::region::region_pool;
use crate::domain::retry::RetryPolicy;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.vault-ami-test/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    pub packer: PackerConfig,
    pub terraform: TerraformConfig,
    pub ssh: SshConfig,
    pub naming: NamingConfig,
    pub regions: RegionConfig,
}

/// Image build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    /// Path of the Packer template.
    pub template: String,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    /// Per-attempt timeout for `packer build`.
    pub timeout_secs: u64,
    /// Output substring → explanation; a failed build containing any of
    /// these is retried.
    pub retryable_errors: BTreeMap<String, String>,
    pub base_image: BaseImageFilter,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            template: "template.json".to_string(),
            max_attempts: 3,
            retry_delay_secs: 15,
            timeout_secs: 3600,
            retryable_errors: default_retryable_errors(),
            base_image: BaseImageFilter::default(),
        }
    }
}

impl PackerConfig {
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }
}

/// Provisioning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformConfig {
    /// Directory holding the Terraform configuration.
    pub dir: String,
    /// Output naming the public address of the Vault host.
    pub host_output: String,
    pub timeout_secs: u64,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            dir: "terraform".to_string(),
            host_output: "vault_public_ip".to_string(),
            timeout_secs: 1800,
        }
    }
}

/// Remote verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub user: String,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    /// Wait after provisioning before the first remote command.
    pub settle_secs: u64,
    pub connect_timeout_secs: u64,
    pub command_timeout_secs: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: "ubuntu".to_string(),
            max_attempts: 5,
            retry_delay_secs: 5,
            settle_secs: 30,
            connect_timeout_secs: 10,
            command_timeout_secs: 120,
        }
    }
}

impl SshConfig {
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }
}

/// Resource naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Prefix of every generated resource name.
    pub prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: "terratest".to_string(),
        }
    }
}

/// Region pool restrictions applied when `AWS_REGION` is unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub allowed: Vec<String>,
    pub forbidden: Vec<String>,
}

// ── Validators ───────────────────────────────────────────────────────────────

impl HarnessConfig {
    /// Reject settings that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("packer.template", &self.packer.template)?;
        non_zero("packer.max_attempts", self.packer.max_attempts)?;
        non_empty("packer.base_image.owner", &self.packer.base_image.owner)?;
        non_empty("terraform.dir", &self.terraform.dir)?;
        non_empty("terraform.host_output", &self.terraform.host_output)?;
        non_empty("ssh.user", &self.ssh.user)?;
        non_zero("ssh.max_attempts", self.ssh.max_attempts)?;
        non_empty("naming.prefix", &self.naming.prefix)?;
        if self.naming.prefix.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                key: "naming.prefix",
                reason: "must not contain whitespace".to_string(),
            });
        }
        region_pool(&self.regions.allowed, &self.regions.forbidden)?;
        Ok(())
    }
}

fn non_empty(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn non_zero(key: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
