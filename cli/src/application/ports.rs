//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{BaseImageFilter, HarnessConfig, KeyPair, RemoteOutput, TerraformVars};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Address and credentials of the provisioned host.
pub struct SshHost<'a> {
    pub hostname: &'a str,
    pub user: &'a str,
    pub key_pair: &'a KeyPair,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Cloud Ports ───────────────────────────────────────────────────────────────

/// Network lookups.
#[allow(async_fn_in_trait)]
pub trait NetworkInspector {
    /// Id of the default VPC in `region`.
    async fn default_vpc_id(&self, region: &str) -> Result<String>;
}

/// Machine image lookups and removal.
#[allow(async_fn_in_trait)]
pub trait ImageCatalog {
    /// Id of the newest image matching `filter` in `region`.
    async fn most_recent_image(&self, region: &str, filter: &BaseImageFilter) -> Result<String>;
    /// Deregister `image_id` and delete every snapshot backing it.
    async fn delete_image_and_snapshots(&self, region: &str, image_id: &str) -> Result<()>;
}

/// Temporary key pair management.
#[allow(async_fn_in_trait)]
pub trait KeyPairStore {
    /// Generate a key pair locally and import its public half as `name`.
    async fn create_key_pair(&self, region: &str, name: &str) -> Result<KeyPair>;
    /// Remove the key pair from the region.
    async fn delete_key_pair(&self, key_pair: &KeyPair) -> Result<()>;
}

/// Composite trait: any type implementing all three sub-traits is a `CloudApi`.
pub trait CloudApi: NetworkInspector + ImageCatalog + KeyPairStore {}

/// Blanket implementation: any type implementing all three sub-traits is a `CloudApi`.
impl<T> CloudApi for T where T: NetworkInspector + ImageCatalog + KeyPairStore {}

// ── Tool Ports ────────────────────────────────────────────────────────────────

/// External image builder.
#[allow(async_fn_in_trait)]
pub trait ImageBuilder {
    /// Run one build of `template` with the given `-var` values.
    async fn build(&self, template: &str, vars: &[(&str, &str)]) -> Result<Output>;
}

/// External declarative provisioner bound to one configuration directory.
#[allow(async_fn_in_trait)]
pub trait InfraProvisioner {
    /// Initialise the working directory.
    async fn init(&self) -> Result<Output>;
    /// Create or update infrastructure.
    async fn apply(&self, vars: &TerraformVars) -> Result<Output>;
    /// Read one named output as a raw string.
    async fn output(&self, name: &str) -> Result<Output>;
    /// Destroy everything the configuration manages. Idempotent.
    async fn destroy(&self, vars: &TerraformVars) -> Result<Output>;
}

/// Command execution on a remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Execute `command` on `host` and capture its result.
    ///
    /// # Errors
    ///
    /// Returns an error only when the client could not be run at all
    /// (spawn failure, timeout). A command that ran and failed is reported
    /// through `RemoteOutput::code`.
    async fn exec(&self, host: &SshHost<'_>, command: &str) -> Result<RemoteOutput>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the harness configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<HarnessConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> Result<PathBuf>;
}
