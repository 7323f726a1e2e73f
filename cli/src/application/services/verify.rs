//! Application service: remote Vault verification.
//!
//! Runs init, unseal and login over SSH in strict order. Each step is
//! retried on transient SSH failures and aborts on a definitive one.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, RemoteShell, SshHost};
use crate::application::services::retry::do_with_retry;
use crate::domain::ssh::check_remote_output;
use crate::domain::{Attempt, RetryPolicy, VerifyStep};

/// Run one verification step with retries.
///
/// # Errors
///
/// Returns an error if the remote command fails definitively, its output
/// does not match, or retries are exhausted.
pub async fn run_step(
    shell: &impl RemoteShell,
    host: &SshHost<'_>,
    step: VerifyStep,
    policy: RetryPolicy,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let description = format!("SSH to public host {}", host.hostname);
    let command = step.command();
    let command = command.as_str();

    do_with_retry(&description, policy, reporter, move || async move {
        reporter.step(&format!("Running SSH: '{command}'"));
        let output = match shell.exec(host, command).await {
            Ok(output) => output,
            Err(err) => return Attempt::Retry(err),
        };
        match check_remote_output(&output) {
            Ok(text) => match step.check_output(&text) {
                Ok(()) => Attempt::Done(()),
                Err(err) => Attempt::Fatal(err.into()),
            },
            Err(err) if err.is_definitive() => {
                reporter.warn(&format!(
                    "'{}' got stdout/stderr:\n{}",
                    step.label(),
                    output.combined()
                ));
                Attempt::Fatal(err.into())
            }
            Err(err) => Attempt::Retry(err.into()),
        }
    })
    .await
}

/// Run every verification step in order, stopping at the first failure.
///
/// `on_step` is invoked after each step succeeds.
///
/// # Errors
///
/// Returns the error of the first failing step.
pub async fn verify_vault(
    shell: &impl RemoteShell,
    host: &SshHost<'_>,
    policy: RetryPolicy,
    reporter: &impl ProgressReporter,
    mut on_step: impl FnMut(VerifyStep),
) -> Result<()> {
    for step in VerifyStep::ALL {
        run_step(shell, host, step, policy, reporter).await?;
        reporter.success(&format!("{} succeeded", step.label()));
        on_step(step);
    }
    Ok(())
}
