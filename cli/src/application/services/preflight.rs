//! Application service: external tool prerequisites.
//!
//! Runs before any cloud resource exists so a missing tool never leaves
//! anything behind.

use anyhow::Result;

use crate::application::ports::{CommandRunner, ProgressReporter};

const TERRAFORM_MIN_VERSION: semver::Version = semver::Version::new(0, 14, 0);

/// Program and the arguments that make it print its version.
const REQUIRED_TOOLS: &[(&str, &[&str])] = &[
    ("packer", &["version"]),
    ("terraform", &["version"]),
    ("aws", &["--version"]),
    ("ssh", &["-V"]),
];

/// Verify every external tool responds and Terraform is recent enough.
///
/// # Errors
///
/// Returns an error naming the first tool that is missing or too old.
pub async fn check_tools(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("checking prerequisites...");
    for (program, args) in REQUIRED_TOOLS {
        let output = runner.run(program, args).await.map_err(|e| {
            anyhow::anyhow!("{program} is not available: {e:#}\n\nInstall {program} and make sure it is on PATH.")
        })?;
        anyhow::ensure!(
            output.status.success(),
            "'{program} {}' failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
        if *program == "terraform" {
            check_terraform_version(&String::from_utf8_lossy(&output.stdout))?;
        }
    }
    reporter.success("prerequisites found");
    Ok(())
}

/// Parse `Terraform v1.5.7` from the first line of `terraform version`.
fn parse_terraform_version(stdout: &str) -> Option<semver::Version> {
    let word = stdout.lines().next()?.split_whitespace().nth(1)?;
    semver::Version::parse(word.trim_start_matches('v')).ok()
}

fn check_terraform_version(stdout: &str) -> Result<()> {
    if let Some(version) = parse_terraform_version(stdout)
        && version < TERRAFORM_MIN_VERSION
    {
        anyhow::bail!("terraform {version} is too old, need at least {TERRAFORM_MIN_VERSION}");
    }
    Ok(())
}
