//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod ec2;
pub mod error;
pub mod naming;
pub mod packer;
pub mod region;
pub mod retry;
pub mod run;
pub mod ssh;
pub mod teardown;
pub mod vault;

pub use config::HarnessConfig;
pub use ec2::{BaseImageFilter, KeyPair};
pub use error::{ConfigError, HarnessError};
pub use naming::RunStamp;
pub use region::{RegionChoice, STABLE_REGIONS};
pub use retry::{Attempt, RetryPolicy};
pub use run::{RunReport, Stage};
pub use ssh::RemoteOutput;
pub use teardown::{Resource, TeardownStack, TerraformVars};
pub use vault::VerifyStep;
