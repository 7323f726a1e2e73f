//! Run-scoped resource naming.
//!
//! One `RunStamp` is captured at the start of a run and every external
//! resource name is derived from it, so teardown always targets the names
//! that were created.

use chrono::{DateTime, TimeZone};

/// `YYYYMMDDhhmm`, minute resolution.
pub const STAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Timestamp shared by every resource created during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    prefix: String,
    stamp: String,
}

impl RunStamp {
    /// Capture a stamp from `at`.
    pub fn at<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            prefix: prefix.to_string(),
            stamp: at.format(STAMP_FORMAT).to_string(),
        }
    }

    /// Capture a stamp from the local clock.
    #[must_use]
    pub fn now(prefix: &str) -> Self {
        Self::at(prefix, &chrono::Local::now())
    }

    /// The raw timestamp component.
    #[must_use]
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Name of the temporary EC2 key pair.
    #[must_use]
    pub fn key_pair_name(&self) -> String {
        format!("{}-ami-vault-{}", self.prefix, self.stamp)
    }

    /// Value of the `tag_owner` Packer variable.
    #[must_use]
    pub fn tag_owner(&self) -> String {
        format!("{}-packer-vault-{}", self.prefix, self.stamp)
    }
}
