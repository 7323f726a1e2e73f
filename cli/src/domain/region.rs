//! AWS region selection.
//!
//! Pure functions only. The caller reads `AWS_REGION` and passes it in.

use crate::domain::error::ConfigError;

/// Regions considered reliable enough for automated testing.
pub const STABLE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-2",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-south-1",
    "ca-central-1",
    "sa-east-1",
];

/// How the region for a run was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionChoice {
    /// Taken verbatim from `AWS_REGION` or `--region`.
    Requested(String),
    /// Picked at random from the stable pool.
    Random(String),
}

impl RegionChoice {
    /// The region name regardless of how it was chosen.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Requested(r) | Self::Random(r) => r,
        }
    }
}

/// Build the candidate pool: the stable regions, narrowed to `allowed` when
/// non-empty, minus `forbidden`.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyRegionPool`] if nothing is left.
pub fn region_pool(allowed: &[String], forbidden: &[String]) -> Result<Vec<&'static str>, ConfigError> {
    let pool: Vec<&'static str> = STABLE_REGIONS
        .iter()
        .copied()
        .filter(|r| allowed.is_empty() || allowed.iter().any(|a| a == r))
        .filter(|r| !forbidden.iter().any(|f| f == r))
        .collect();
    if pool.is_empty() {
        return Err(ConfigError::EmptyRegionPool);
    }
    Ok(pool)
}

/// Resolve the region for a run.
///
/// A non-blank `requested` value wins. Otherwise `pick(pool.len())` chooses
/// an index into `pool`; out-of-range indices wrap.
#[must_use]
pub fn resolve_region(
    requested: Option<&str>,
    pool: &[&str],
    pick: impl FnOnce(usize) -> usize,
) -> Option<RegionChoice> {
    if let Some(region) = requested.map(str::trim).filter(|r| !r.is_empty()) {
        return Some(RegionChoice::Requested(region.to_string()));
    }
    if pool.is_empty() {
        return None;
    }
    let index = pick(pool.len()) % pool.len();
    Some(RegionChoice::Random(pool[index].to_string()))
}

/// Random index in `0..len` seeded from the clock and `RandomState`.
#[must_use]
pub fn random_index(len: usize) -> usize {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    if len == 0 {
        return 0;
    }
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    #[allow(clippy::cast_possible_truncation)]
    let value = hasher.finish() as usize;
    value % len
}
