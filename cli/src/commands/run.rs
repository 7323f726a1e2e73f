//! `vault-ami-test run`: the full build, provision, verify and teardown cycle.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, ProgressReporter};
use crate::application::services::pipeline::Pipeline;
use crate::application::services::preflight;
use crate::domain::region::random_index;
use crate::domain::{HarnessConfig, RunStamp};
use crate::infra::aws::AwsCli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::packer::PackerCli;
use crate::infra::ssh::SshCli;
use crate::infra::terraform::TerraformCli;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Region to test in (default: a random stable region)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Packer template, overriding `packer.template`
    #[arg(long, value_name = "PATH")]
    pub template: Option<String>,

    /// Terraform configuration directory, overriding `terraform.dir`
    #[arg(long, value_name = "DIR")]
    pub terraform_dir: Option<String>,
}

impl RunArgs {
    fn apply_to(&self, config: &mut HarnessConfig) {
        if let Some(template) = &self.template {
            config.packer.template.clone_from(template);
        }
        if let Some(dir) = &self.terraform_dir {
            config.terraform.dir.clone_from(dir);
        }
    }
}

/// Entry point for `vault-ami-test run`.
///
/// # Errors
///
/// Returns an error if the config is invalid, a prerequisite is missing, or
/// the run fails. Teardown has already happened by the time a run error is
/// returned.
pub async fn run(app: &AppContext, args: RunArgs) -> Result<ExitCode> {
    let mut config = app.config_store.load()?;
    args.apply_to(&mut config);
    let reporter = app.reporter();

    preflight::check_tools(&TokioCommandRunner::default(), &reporter).await?;

    let stamp = RunStamp::now(&config.naming.prefix);
    tracing::info!(stamp = stamp.stamp(), "starting run");

    let cloud = AwsCli::new(TokioCommandRunner::default());
    let builder = PackerCli::new(
        TokioCommandRunner::default(),
        Duration::from_secs(config.packer.timeout_secs),
    );
    let provisioner = TerraformCli::new(
        TokioCommandRunner::default(),
        &config.terraform.dir,
        Duration::from_secs(config.terraform.timeout_secs),
    );
    let shell = SshCli::new(
        TokioCommandRunner::default(),
        config.ssh.connect_timeout_secs,
        Duration::from_secs(config.ssh.command_timeout_secs),
    );

    let pipeline = Pipeline {
        cloud: &cloud,
        builder: &builder,
        provisioner: &provisioner,
        shell: &shell,
        reporter: &reporter,
        config: &config,
        stamp: &stamp,
        requested_region: args.region.as_deref(),
        pick_region: random_index,
    };

    let abort = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            reporter.warn("interrupted, tearing down...");
        } else {
            std::future::pending::<()>().await;
        }
    };

    let outcome = pipeline.run(abort).await;
    app.renderer().render_report(&outcome.report)?;
    outcome.result?;
    Ok(ExitCode::SUCCESS)
}
