//! Pipeline stages and the run summary.

use std::fmt;

use serde::Serialize;

/// Progress of one run. Stages only ever advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Start,
    RegionResolved,
    ImageBuilt,
    KeyPairCreated,
    InfraProvisioned,
    ServiceSettling,
    Initialized,
    Unsealed,
    Authenticated,
    TornDown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::RegionResolved => "region resolved",
            Self::ImageBuilt => "image built",
            Self::KeyPairCreated => "key pair created",
            Self::InfraProvisioned => "infrastructure provisioned",
            Self::ServiceSettling => "service settling",
            Self::Initialized => "vault initialized",
            Self::Unsealed => "vault unsealed",
            Self::Authenticated => "vault authenticated",
            Self::TornDown => "torn down",
        };
        f.write_str(s)
    }
}

/// What a run produced, filled in as stages complete.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub stamp: String,
    pub region: Option<String>,
    pub random_region: bool,
    pub image_id: Option<String>,
    pub key_pair: Option<String>,
    pub host: Option<String>,
    pub reached: Stage,
    /// Last stage reached before the run failed.
    pub failed_after: Option<Stage>,
    pub released: Vec<String>,
    pub teardown_failures: Vec<String>,
}

impl RunReport {
    #[must_use]
    pub fn new(stamp: &str) -> Self {
        Self {
            stamp: stamp.to_string(),
            ..Self::default()
        }
    }

    /// Record that `stage` was reached.
    pub fn advance(&mut self, stage: Stage) {
        self.reached = self.reached.max(stage);
    }
}
