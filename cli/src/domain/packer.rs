//! Packer machine-readable output parsing and error classification.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Packer escapes commas inside machine-readable fields with this token.
const PACKER_COMMA: &str = "%!(PACKER_COMMA)";

/// `<ts>,<builder>,artifact,<n>,id,<region>:<ami>`
#[allow(clippy::expect_used)]
static ARTIFACT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"artifact,\d+?,id,.+?:(.+)").expect("valid regex"));

/// Known-transient Packer failures, substring → explanation.
#[must_use]
pub fn default_retryable_errors() -> BTreeMap<String, String> {
    [
        (
            "Script disconnected unexpectedly",
            "Occasionally, Packer seems to lose connectivity to AWS, perhaps due to a brief network outage",
        ),
        (
            "exit status 1",
            "Occasionally, provision scripts will fail because of the apt-get",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Extract the image id from `packer build -machine-readable` output.
///
/// Looks for `<ts>,<builder>,artifact,<n>,id,<region>:<ami>` and returns
/// `<ami>`. For multi-region builds only the first region's id is returned.
#[must_use]
pub fn parse_artifact_id(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let caps = ARTIFACT_ID.captures(line.trim_end())?;
        let id = caps.get(1)?.as_str();
        let first = id.split(PACKER_COMMA).next()?.trim();
        (!first.is_empty()).then(|| first.to_string())
    })
}

/// Return the explanation of the first retryable pattern found in `output`.
#[must_use]
pub fn match_retryable<'a>(
    output: &str,
    retryable: &'a BTreeMap<String, String>,
) -> Option<(&'a str, &'a str)> {
    retryable
        .iter()
        .find(|(pattern, _)| output.contains(pattern.as_str()))
        .map(|(p, why)| (p.as_str(), why.as_str()))
}
