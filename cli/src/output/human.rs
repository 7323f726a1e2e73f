//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{HarnessConfig, RunReport, Stage};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the summary of a finished run.
    pub fn render_report(&self, report: &RunReport) {
        println!();
        self.ctx.header("Run summary:");
        self.ctx.kv("Stamp:     ", &report.stamp);
        if let Some(region) = &report.region {
            let how = if report.random_region { " (random)" } else { "" };
            self.ctx.kv("Region:    ", &format!("{region}{how}"));
        }
        for (key, value) in [
            ("Image:     ", &report.image_id),
            ("Key pair:  ", &report.key_pair),
            ("Host:      ", &report.host),
        ] {
            if let Some(value) = value {
                self.ctx.kv(key, value);
            }
        }
        self.ctx.kv("Reached:   ", &report.reached.to_string());
        for resource in &report.released {
            self.ctx.kv("Released:  ", resource);
        }
        for failure in &report.teardown_failures {
            self.ctx.error(&format!("not released: {failure}"));
        }

        match report.failed_after {
            Some(stage) => self.ctx.error(&format!("FAILED after stage '{stage}'")),
            None if report.reached == Stage::TornDown => {
                self.ctx.success("Vault image validated");
            }
            None => self.ctx.warn("run finished with teardown failures"),
        }
    }

    /// Render the effective configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML serialization fails.
    pub fn render_config(&self, config: &HarnessConfig, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(config).context("cannot serialize config")?;
        if !self.ctx.quiet {
            self.ctx.kv("Config file:", &path.display().to_string());
            println!();
        }
        print!("{yaml}");
        Ok(())
    }

    /// Render the region pool, one per line, then the chosen region if any.
    pub fn render_regions(&self, pool: &[&str], chosen: Option<(&str, bool)>) {
        match chosen {
            Some((region, random)) => {
                if random && !self.ctx.quiet {
                    self.ctx.info(&format!("Random AWS region selected: {region:?}"));
                }
                println!("{region}");
            }
            None => {
                for region in pool {
                    println!("{region}");
                }
            }
        }
    }
}
