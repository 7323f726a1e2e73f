//! Infrastructure implementation of the cloud ports over the `aws` CLI.
//!
//! Every call goes through a `CommandRunner` so tests can script replies.
//! Responses are requested as JSON and parsed by `crate::domain::ec2`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ImageCatalog, KeyPairStore, NetworkInspector};
use crate::domain::ec2::{default_vpc_id, most_recent_image, snapshot_ids};
use crate::domain::{BaseImageFilter, HarnessError, KeyPair};

/// Adapter that drives `aws ec2 ...` through a `CommandRunner`.
pub struct AwsCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> AwsCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn ec2(&self, region: &str, args: &[&str]) -> Result<Vec<u8>> {
        let mut full = vec!["ec2"];
        full.extend_from_slice(args);
        full.extend_from_slice(&["--region", region, "--output", "json"]);
        let output = self.runner.run("aws", &full).await?;
        ensure_success(&output, &format!("aws ec2 {}", args[0]))?;
        Ok(output.stdout)
    }
}

impl<R: CommandRunner> NetworkInspector for AwsCli<R> {
    async fn default_vpc_id(&self, region: &str) -> Result<String> {
        let json = self
            .ec2(
                region,
                &["describe-vpcs", "--filters", "Name=isDefault,Values=true"],
            )
            .await?;
        default_vpc_id(&json)?.ok_or_else(|| HarnessError::NoDefaultVpc(region.to_string()).into())
    }
}

impl<R: CommandRunner> ImageCatalog for AwsCli<R> {
    async fn most_recent_image(&self, region: &str, filter: &BaseImageFilter) -> Result<String> {
        let filters = filter.cli_filters();
        let mut args = vec!["describe-images", "--owners", filter.owner.as_str(), "--filters"];
        args.extend(filters.iter().map(String::as_str));
        let json = self.ec2(region, &args).await?;
        most_recent_image(&json)?.ok_or_else(|| {
            HarnessError::NoBaseImage {
                owner: filter.owner.clone(),
                region: region.to_string(),
            }
            .into()
        })
    }

    async fn delete_image_and_snapshots(&self, region: &str, image_id: &str) -> Result<()> {
        let json = self
            .ec2(region, &["describe-images", "--image-ids", image_id])
            .await?;
        let snapshots = snapshot_ids(&json)?;
        self.ec2(region, &["deregister-image", "--image-id", image_id])
            .await?;
        tracing::info!(image_id, region, "deregistered image");
        // The image is gone, so a snapshot skipped here could not be found again.
        let mut failures = Vec::new();
        for snapshot in &snapshots {
            match self
                .ec2(region, &["delete-snapshot", "--snapshot-id", snapshot])
                .await
            {
                Ok(_) => tracing::info!(snapshot, region, "deleted snapshot"),
                Err(err) => {
                    tracing::error!(snapshot, region, error = %format!("{err:#}"), "snapshot not deleted");
                    failures.push(format!("{snapshot}: {err:#}"));
                }
            }
        }
        anyhow::ensure!(
            failures.is_empty(),
            "image {image_id} deregistered but {} snapshot(s) not deleted:\n{}",
            failures.len(),
            failures.join("\n")
        );
        Ok(())
    }
}

impl<R: CommandRunner> KeyPairStore for AwsCli<R> {
    async fn create_key_pair(&self, region: &str, name: &str) -> Result<KeyPair> {
        let dir = tempfile::tempdir().context("creating key directory")?;
        let key_path = dir.path().join("id_rsa");
        let key_arg = key_path.to_string_lossy().into_owned();
        let output = self
            .runner
            .run(
                "ssh-keygen",
                &[
                    "-t", "rsa", "-b", "4096", "-m", "PEM", "-N", "", "-q", "-C", name, "-f",
                    &key_arg,
                ],
            )
            .await?;
        ensure_success(&output, "ssh-keygen")?;

        let private_key = std::fs::read_to_string(&key_path)
            .with_context(|| format!("cannot read {}", key_path.display()))?;
        let public_path = dir.path().join("id_rsa.pub");
        let public_key = std::fs::read_to_string(&public_path)
            .with_context(|| format!("cannot read {}", public_path.display()))?;

        let material = format!("fileb://{}", public_path.display());
        self.ec2(
            region,
            &[
                "import-key-pair",
                "--key-name",
                name,
                "--public-key-material",
                &material,
            ],
        )
        .await?;
        tracing::info!(name, region, "imported key pair");

        Ok(KeyPair {
            name: name.to_string(),
            region: region.to_string(),
            public_key: public_key.trim_end().to_string(),
            private_key,
        })
    }

    async fn delete_key_pair(&self, key_pair: &KeyPair) -> Result<()> {
        self.ec2(
            &key_pair.region,
            &["delete-key-pair", "--key-name", &key_pair.name],
        )
        .await?;
        tracing::info!(name = %key_pair.name, region = %key_pair.region, "deleted key pair");
        Ok(())
    }
}

fn ensure_success(output: &Output, what: &str) -> Result<()> {
    anyhow::ensure!(
        output.status.success(),
        "{what} failed ({}): {}",
        output.status,
        String::from_utf8_lossy(&output.stderr).trim_end()
    );
    Ok(())
}
