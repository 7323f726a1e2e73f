//! Application service: release registered resources, last in first out.

use anyhow::{Context, Result};

use crate::application::ports::{CloudApi, InfraProvisioner, ProgressReporter};
use crate::domain::{Resource, TeardownStack};

/// Releases one resource. Implemented over the cloud and provisioner ports
/// by [`CloudReleaser`]; tests substitute recorders.
#[allow(async_fn_in_trait)]
pub trait ResourceReleaser {
    async fn release(&self, resource: &Resource) -> Result<()>;
}

/// Production releaser backed by the cloud API and the provisioner.
pub struct CloudReleaser<'a, C, P> {
    pub cloud: &'a C,
    pub provisioner: &'a P,
}

impl<C: CloudApi, P: InfraProvisioner> ResourceReleaser for CloudReleaser<'_, C, P> {
    async fn release(&self, resource: &Resource) -> Result<()> {
        match resource {
            Resource::Image { region, image_id } => self
                .cloud
                .delete_image_and_snapshots(region, image_id)
                .await
                .with_context(|| format!("deleting image {image_id}")),
            Resource::KeyPair(key_pair) => self
                .cloud
                .delete_key_pair(key_pair)
                .await
                .with_context(|| format!("deleting key pair {}", key_pair.name)),
            Resource::Infrastructure { vars } => {
                let output = self
                    .provisioner
                    .destroy(vars)
                    .await
                    .context("running terraform destroy")?;
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    anyhow::bail!("terraform destroy failed: {}", stderr.trim_end());
                }
                Ok(())
            }
        }
    }
}

/// Result of draining a teardown stack.
#[derive(Debug, Default)]
pub struct TeardownOutcome {
    /// Resources released, in release order.
    pub released: Vec<String>,
    /// `"<resource>: <error>"` for every release that failed.
    pub failures: Vec<String>,
}

/// Pop and release every registered resource.
///
/// A failed release does not stop the remaining ones.
pub async fn unwind(
    stack: &mut TeardownStack,
    releaser: &impl ResourceReleaser,
    reporter: &impl ProgressReporter,
) -> TeardownOutcome {
    let mut outcome = TeardownOutcome::default();
    while let Some(resource) = stack.pop() {
        let what = resource.describe();
        reporter.step(&format!("releasing {what}..."));
        match releaser.release(&resource).await {
            Ok(()) => {
                tracing::debug!(resource = %what, "released");
                reporter.success(&format!("released {what}"));
                outcome.released.push(what);
            }
            Err(err) => {
                tracing::error!(resource = %what, error = %format!("{err:#}"), "release failed");
                reporter.warn(&format!("failed to release {what}: {err:#}"));
                outcome.failures.push(format!("{what}: {err:#}"));
            }
        }
    }
    outcome
}
