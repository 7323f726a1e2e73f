//! EC2 value types and parsers for `aws ec2 ... --output json` responses.
//!
//! Pure functions only: no I/O. The infra layer runs the `aws` CLI and
//! hands the raw JSON here.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Canonical's AWS account, publisher of the official Ubuntu images.
pub const CANONICAL_ACCOUNT_ID: &str = "099720109477";

/// Owner and filter set used to find the newest published base image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseImageFilter {
    /// Account that published the image.
    pub owner: String,
    /// `describe-images` filters, name → accepted values.
    pub filters: BTreeMap<String, Vec<String>>,
}

impl Default for BaseImageFilter {
    fn default() -> Self {
        let filters = [
            ("name", "*ubuntu-bionic-18.04-amd64-server-*"),
            ("virtualization-type", "hvm"),
            ("architecture", "x86_64"),
            ("root-device-type", "ebs"),
            ("block-device-mapping.volume-type", "gp2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
        .collect();
        Self {
            owner: CANONICAL_ACCOUNT_ID.to_string(),
            filters,
        }
    }
}

impl BaseImageFilter {
    /// Render the filters as `Name=<k>,Values=<v1>,<v2>` CLI arguments.
    #[must_use]
    pub fn cli_filters(&self) -> Vec<String> {
        self.filters
            .iter()
            .map(|(name, values)| format!("Name={name},Values={}", values.join(",")))
            .collect()
    }
}

/// Ephemeral key pair registered with EC2 for the duration of one run.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub name: String,
    pub region: String,
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

// ── describe-images ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImages {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Image {
    image_id: String,
    #[serde(default)]
    creation_date: String,
    #[serde(default)]
    block_device_mappings: Vec<BlockDeviceMapping>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlockDeviceMapping {
    ebs: Option<Ebs>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Ebs {
    snapshot_id: Option<String>,
}

/// Pick the image with the newest `CreationDate`.
///
/// EC2 reports creation dates as ISO-8601 UTC strings, which sort
/// lexicographically. Returns `Ok(None)` when the response lists no images.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed.
pub fn most_recent_image(json: &[u8]) -> Result<Option<String>> {
    let resp: DescribeImages =
        serde_json::from_slice(json).context("parsing describe-images output")?;
    Ok(resp
        .images
        .into_iter()
        .max_by(|a, b| a.creation_date.cmp(&b.creation_date))
        .map(|img| img.image_id))
}

/// Collect the EBS snapshot ids backing every image in the response.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed.
pub fn snapshot_ids(json: &[u8]) -> Result<Vec<String>> {
    let resp: DescribeImages =
        serde_json::from_slice(json).context("parsing describe-images output")?;
    Ok(resp
        .images
        .into_iter()
        .flat_map(|img| img.block_device_mappings)
        .filter_map(|m| m.ebs.and_then(|e| e.snapshot_id))
        .collect())
}

// ── describe-vpcs ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcs {
    #[serde(default)]
    vpcs: Vec<Vpc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Vpc {
    vpc_id: String,
    #[serde(default)]
    is_default: bool,
}

/// Find the default VPC in a `describe-vpcs` response.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed.
pub fn default_vpc_id(json: &[u8]) -> Result<Option<String>> {
    let resp: DescribeVpcs = serde_json::from_slice(json).context("parsing describe-vpcs output")?;
    Ok(resp
        .vpcs
        .into_iter()
        .find(|v| v.is_default)
        .map(|v| v.vpc_id))
}
