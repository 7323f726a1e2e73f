//! Infrastructure implementation of the `InfraProvisioner` port over the
//! `terraform` CLI.
//!
//! Variables are written to a temporary JSON var-file so the private key
//! never appears on a command line.

use std::io::Write;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::application::ports::{CommandRunner, InfraProvisioner};
use crate::domain::TerraformVars;

pub struct TerraformCli<R: CommandRunner> {
    runner: R,
    chdir: String,
    timeout: Duration,
}

impl<R: CommandRunner> TerraformCli<R> {
    pub fn new(runner: R, dir: &str, timeout: Duration) -> Self {
        Self {
            runner,
            chdir: format!("-chdir={dir}"),
            timeout,
        }
    }

    async fn terraform(&self, args: &[&str]) -> Result<Output> {
        let mut full = vec![self.chdir.as_str()];
        full.extend_from_slice(args);
        self.runner
            .run_with_timeout("terraform", &full, self.timeout)
            .await
    }

    /// Run `subcommand` with the variables supplied through a var-file that
    /// lives until the command exits.
    async fn with_vars(&self, subcommand: &str, vars: &TerraformVars) -> Result<Output> {
        let var_file = write_var_file(vars)?;
        let var_arg = format!("-var-file={}", var_file.path().display());
        tracing::info!(subcommand, "running terraform");
        self.terraform(&[
            subcommand,
            "-input=false",
            "-auto-approve",
            "-no-color",
            &var_arg,
        ])
        .await
    }
}

impl<R: CommandRunner> InfraProvisioner for TerraformCli<R> {
    async fn init(&self) -> Result<Output> {
        tracing::info!("running terraform init");
        self.terraform(&["init", "-input=false", "-no-color"]).await
    }

    async fn apply(&self, vars: &TerraformVars) -> Result<Output> {
        self.with_vars("apply", vars).await
    }

    async fn output(&self, name: &str) -> Result<Output> {
        self.terraform(&["output", "-no-color", "-raw", name]).await
    }

    async fn destroy(&self, vars: &TerraformVars) -> Result<Output> {
        self.with_vars("destroy", vars).await
    }
}

fn write_var_file(vars: &TerraformVars) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("vault-ami-test-")
        .suffix(".tfvars.json")
        .tempfile()
        .context("creating terraform var-file")?;
    let json = serde_json::to_vec_pretty(vars).context("serializing terraform variables")?;
    file.write_all(&json).context("writing terraform var-file")?;
    file.flush().context("writing terraform var-file")?;
    Ok(file)
}
