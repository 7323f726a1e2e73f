//! Infrastructure implementation of the `ImageBuilder` port over the `packer` CLI.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ImageBuilder};

pub struct PackerCli<R: CommandRunner> {
    runner: R,
    timeout: Duration,
}

impl<R: CommandRunner> PackerCli<R> {
    pub fn new(runner: R, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

impl<R: CommandRunner> ImageBuilder for PackerCli<R> {
    async fn build(&self, template: &str, vars: &[(&str, &str)]) -> Result<Output> {
        let assignments: Vec<String> = vars.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let mut args = vec!["build", "-machine-readable"];
        for assignment in &assignments {
            args.push("-var");
            args.push(assignment);
        }
        args.push(template);
        tracing::info!(template, "running packer build");
        self.runner
            .run_with_timeout("packer", &args, self.timeout)
            .await
    }
}
