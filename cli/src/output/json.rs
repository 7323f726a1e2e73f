//! JSON output helpers.
//!
//! `--json` replaces all human output with one pretty-printed JSON document
//! on stdout. Failures are reported with the error object from
//! [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{ConfigError, HarnessConfig, HarnessError, RunReport};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Code for the outermost typed error wrapped in `err`.
///
/// `anyhow::Error::downcast_ref` looks through `.context()` layers, which
/// iterating `chain()` would not.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<HarnessError>() {
        return e.code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "invalid_config";
    }
    "error"
}

/// Renders domain types as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_report(&self, report: &RunReport) -> Result<()> {
        let out = serde_json::to_string_pretty(report).context("JSON serialization failed")?;
        println!("{out}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &HarnessConfig, path: &Path) -> Result<()> {
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        let out = serde_json::to_string_pretty(&obj).context("JSON serialization failed")?;
        println!("{out}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_regions(&self, pool: &[&str], chosen: Option<(&str, bool)>) -> Result<()> {
        let obj = match chosen {
            Some((region, random)) => serde_json::json!({
                "region": region,
                "random": random,
            }),
            None => serde_json::json!({ "regions": pool }),
        };
        let out = serde_json::to_string_pretty(&obj).context("JSON serialization failed")?;
        println!("{out}");
        Ok(())
    }
}
