//! `vault-ami-test regions`: show where runs may land.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::domain::region::{random_index, region_pool, resolve_region};
use crate::domain::{ConfigError, RegionChoice};

/// Arguments for the regions command.
#[derive(Args)]
pub struct RegionsArgs {
    /// Print the single region a run would use instead of the pool
    #[arg(long)]
    pub resolve: bool,

    /// Requested region, as for `run`
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
}

/// Run the regions command.
///
/// # Errors
///
/// Returns an error if the config is invalid or leaves no regions.
pub fn run(app: &AppContext, args: &RegionsArgs) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let pool = region_pool(&config.regions.allowed, &config.regions.forbidden)?;

    let choice = if args.resolve {
        let choice = resolve_region(args.region.as_deref(), &pool, random_index)
            .ok_or(ConfigError::EmptyRegionPool)?;
        if let RegionChoice::Random(region) = &choice {
            tracing::info!(region = %region, "random region selected");
        }
        Some(choice)
    } else {
        None
    };

    let chosen = choice
        .as_ref()
        .map(|c| (c.name(), matches!(c, RegionChoice::Random(_))));
    app.renderer().render_regions(&pool, chosen)?;
    Ok(ExitCode::SUCCESS)
}
