//! Fixed-interval retry executor.
//!
//! The executor only implements the loop and the sleep. Each attempt
//! classifies its own failure as retryable or fatal.

use std::future::Future;

use anyhow::Result;

use crate::application::ports::ProgressReporter;
use crate::domain::{Attempt, HarnessError, RetryPolicy};

/// Run `action` until it succeeds, fails fatally, or `policy.max_attempts`
/// attempts have been made.
///
/// Sleeps `policy.delay` between attempts, never after the last one.
///
/// # Errors
///
/// Returns the fatal error unchanged, or [`HarnessError::RetriesExhausted`]
/// wrapping the last retryable error.
pub async fn do_with_retry<T, F, Fut>(
    description: &str,
    policy: RetryPolicy,
    reporter: &impl ProgressReporter,
    mut action: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut last_err = None;
    for attempt in 1..=policy.max_attempts {
        match action().await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fatal(err) => return Err(err),
            Attempt::Retry(err) => {
                tracing::warn!(description, attempt, error = %format!("{err:#}"), "attempt failed");
                if attempt < policy.max_attempts {
                    reporter.warn(&format!(
                        "{description} returned an error: {err:#}. Sleeping for {}s and will try again.",
                        policy.delay.as_secs()
                    ));
                    tokio::time::sleep(policy.delay).await;
                }
                last_err = Some(err);
            }
        }
    }

    let exhausted = HarnessError::RetriesExhausted {
        description: description.to_string(),
        attempts: policy.max_attempts,
    };
    Err(match last_err {
        Some(err) => err.context(exhausted),
        None => exhausted.into(),
    })
}
