//! Application service: machine image build use-case.
//!
//! Resolves the newest base image, then runs the image builder with
//! retries on known-transient failures.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::application::ports::{ImageBuilder, ImageCatalog, ProgressReporter};
use crate::application::services::retry::do_with_retry;
use crate::domain::packer::{match_retryable, parse_artifact_id};
use crate::domain::{Attempt, BaseImageFilter, HarnessError, RetryPolicy};

/// Inputs of one image build.
pub struct BuildRequest<'a> {
    pub template: &'a str,
    pub region: &'a str,
    pub tag_owner: &'a str,
    pub base_image: &'a BaseImageFilter,
    pub policy: RetryPolicy,
    /// Output substring → explanation.
    pub retryable_errors: &'a BTreeMap<String, String>,
}

/// Build the image and return its id.
///
/// # Errors
///
/// Returns an error if no base image matches, the build fails with a
/// non-retryable error, retries are exhausted, or the build output carries
/// no artifact id.
pub async fn build_image(
    catalog: &impl ImageCatalog,
    builder: &impl ImageBuilder,
    reporter: &impl ProgressReporter,
    req: &BuildRequest<'_>,
) -> Result<String> {
    let base_image_id = catalog
        .most_recent_image(req.region, req.base_image)
        .await
        .context("resolving base image")?;
    reporter.step(&format!(
        "building image from base {base_image_id} in {}...",
        req.region
    ));

    let vars = [
        ("tag_owner", req.tag_owner),
        ("base_ami_id", base_image_id.as_str()),
        ("aws_region", req.region),
    ];
    let vars = &vars;
    let description = format!("Run Packer build of {}", req.template);

    do_with_retry(&description, req.policy, reporter, move || async move {
        let output = match builder.build(req.template, vars).await {
            Ok(output) => output,
            Err(err) => return Attempt::Fatal(err),
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            return match parse_artifact_id(&stdout) {
                Some(id) => Attempt::Done(id),
                None => Attempt::Fatal(HarnessError::MissingArtifact.into()),
            };
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{stdout}{stderr}");
        match match_retryable(&combined, req.retryable_errors) {
            Some((pattern, why)) => {
                reporter.warn(&format!("packer build hit '{pattern}': {why}"));
                Attempt::Retry(anyhow::anyhow!("packer build failed: {pattern}"))
            }
            None => Attempt::Fatal(anyhow::anyhow!(
                "packer build failed:\n{}",
                combined.trim_end()
            )),
        }
    })
    .await
}
