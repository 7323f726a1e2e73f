//! Application service: the end-to-end image validation run.
//!
//! Resolve region → build image → create key pair → provision → settle →
//! init → unseal → login, then release everything that was created in
//! reverse order. Teardown runs on every exit path, including an abort.

use std::future::Future;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    CloudApi, ImageBuilder, InfraProvisioner, ProgressReporter, RemoteShell, SshHost,
};
use crate::application::services::image_build::{BuildRequest, build_image};
use crate::application::services::teardown::{CloudReleaser, unwind};
use crate::application::services::verify::verify_vault;
use crate::domain::region::{region_pool, resolve_region};
use crate::domain::{
    ConfigError, HarnessConfig, HarnessError, KeyPair, RegionChoice, Resource, RunReport,
    RunStamp, Stage, TeardownStack, TerraformVars, VerifyStep,
};

/// Collaborators and settings for one run.
pub struct Pipeline<'a, C, B, P, S, R> {
    pub cloud: &'a C,
    pub builder: &'a B,
    pub provisioner: &'a P,
    pub shell: &'a S,
    pub reporter: &'a R,
    pub config: &'a HarnessConfig,
    pub stamp: &'a RunStamp,
    /// `AWS_REGION` or `--region`, if given.
    pub requested_region: Option<&'a str>,
    /// Chooses an index below the argument; used when no region is requested.
    pub pick_region: fn(usize) -> usize,
}

/// Summary plus the overall verdict of a run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub result: Result<()>,
}

impl<C, B, P, S, R> Pipeline<'_, C, B, P, S, R>
where
    C: CloudApi,
    B: ImageBuilder,
    P: InfraProvisioner,
    S: RemoteShell,
    R: ProgressReporter,
{
    /// Execute the run. When `abort` completes first the remaining steps are
    /// skipped; registered resources are released either way.
    pub async fn run(&self, abort: impl Future<Output = ()>) -> RunOutcome {
        let mut report = RunReport::new(self.stamp.stamp());
        let mut stack = TeardownStack::new();

        let mut result = {
            let steps = self.execute(&mut stack, &mut report);
            tokio::pin!(steps);
            tokio::pin!(abort);
            tokio::select! {
                r = &mut steps => r,
                () = &mut abort => Err(HarnessError::Aborted("interrupted".to_string()).into()),
            }
        };

        if let Err(err) = &result {
            report.failed_after = Some(report.reached);
            tracing::error!(stage = %report.reached, error = %format!("{err:#}"), "run failed");
            self.reporter
                .warn(&format!("run failed after stage '{}'", report.reached));
        }

        if !stack.is_empty() {
            self.reporter.step("tearing down...");
        }
        let releaser = CloudReleaser {
            cloud: self.cloud,
            provisioner: self.provisioner,
        };
        let teardown = unwind(&mut stack, &releaser, self.reporter).await;
        report.released = teardown.released;

        if teardown.failures.is_empty() {
            report.advance(Stage::TornDown);
        } else if result.is_ok() {
            result = Err(HarnessError::Teardown(teardown.failures.clone()).into());
        }
        report.teardown_failures = teardown.failures;

        RunOutcome { report, result }
    }

    async fn execute(&self, stack: &mut TeardownStack, report: &mut RunReport) -> Result<()> {
        let config = self.config;
        let reporter = self.reporter;

        // ── Region ────────────────────────────────────────────────────────
        let pool = region_pool(&config.regions.allowed, &config.regions.forbidden)?;
        let choice = resolve_region(self.requested_region, &pool, self.pick_region)
            .ok_or(ConfigError::EmptyRegionPool)?;
        if let RegionChoice::Random(region) = &choice {
            tracing::info!(region = %region, "random region selected");
            reporter.step(&format!("Random AWS region selected: {region:?}"));
        }
        let region = choice.name().to_string();
        report.random_region = matches!(choice, RegionChoice::Random(_));
        report.region = Some(region.clone());
        report.advance(Stage::RegionResolved);

        let vpc_id = self
            .cloud
            .default_vpc_id(&region)
            .await
            .context("looking up default VPC")?;

        // ── Image ─────────────────────────────────────────────────────────
        let tag_owner = self.stamp.tag_owner();
        let image_id = build_image(
            self.cloud,
            self.builder,
            reporter,
            &BuildRequest {
                template: &config.packer.template,
                region: &region,
                tag_owner: &tag_owner,
                base_image: &config.packer.base_image,
                policy: config.packer.retry_policy(),
                retryable_errors: &config.packer.retryable_errors,
            },
        )
        .await
        .context("building image")?;
        stack.register(Resource::Image {
            region: region.clone(),
            image_id: image_id.clone(),
        });
        reporter.success(&format!("created image: {image_id}"));
        report.image_id = Some(image_id.clone());
        report.advance(Stage::ImageBuilt);

        // ── Key pair ──────────────────────────────────────────────────────
        let key_pair = self
            .cloud
            .create_key_pair(&region, &self.stamp.key_pair_name())
            .await
            .context("creating key pair")?;
        stack.register(Resource::KeyPair(key_pair.clone()));
        reporter.success(&format!("created key pair: {}", key_pair.name));
        report.key_pair = Some(key_pair.name.clone());
        report.advance(Stage::KeyPairCreated);

        // ── Infrastructure ────────────────────────────────────────────────
        let vars = terraform_vars(&key_pair, &image_id, &region, &vpc_id);
        stack.register(Resource::Infrastructure { vars: vars.clone() });
        reporter.step("provisioning infrastructure...");
        let init = self
            .provisioner
            .init()
            .await
            .context("running terraform init")?;
        ensure_success(&init, "terraform init")?;
        let apply = self
            .provisioner
            .apply(&vars)
            .await
            .context("running terraform apply")?;
        ensure_success(&apply, "terraform apply")?;

        let host = self.host_address().await?;
        reporter.success(&format!("infrastructure provisioned, host {host}"));
        report.host = Some(host.clone());
        report.advance(Stage::InfraProvisioned);

        // ── Settle ────────────────────────────────────────────────────────
        report.advance(Stage::ServiceSettling);
        let settle = Duration::from_secs(config.ssh.settle_secs);
        reporter.step(&format!(
            "waiting {}s for the Vault service to start...",
            settle.as_secs()
        ));
        tokio::time::sleep(settle).await;

        // ── Verify ────────────────────────────────────────────────────────
        let ssh_host = SshHost {
            hostname: &host,
            user: &config.ssh.user,
            key_pair: &key_pair,
        };
        verify_vault(
            self.shell,
            &ssh_host,
            config.ssh.retry_policy(),
            reporter,
            |step| {
                report.advance(match step {
                    VerifyStep::Init => Stage::Initialized,
                    VerifyStep::Unseal => Stage::Unsealed,
                    VerifyStep::Login => Stage::Authenticated,
                });
            },
        )
        .await
    }

    async fn host_address(&self) -> Result<String> {
        let name = &self.config.terraform.host_output;
        let output = self
            .provisioner
            .output(name)
            .await
            .with_context(|| format!("reading terraform output '{name}'"))?;
        let host = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || host.is_empty() {
            return Err(HarnessError::MissingOutput(name.clone()).into());
        }
        Ok(host)
    }
}

/// Input variables of the Terraform configuration.
#[must_use]
pub fn terraform_vars(
    key_pair: &KeyPair,
    image_id: &str,
    region: &str,
    vpc_id: &str,
) -> TerraformVars {
    [
        ("key_pair", key_pair.name.as_str()),
        ("vault_ami_id", image_id),
        ("aws_region", region),
        ("vpc_id", vpc_id),
        ("ssh_private_key", key_pair.private_key.as_str()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn ensure_success(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!(
        "{what} failed ({}):\n{}{}",
        output.status,
        stdout,
        stderr.trim_end()
    )
}
