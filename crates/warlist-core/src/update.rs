//! Release update checks against the GitHub API.

use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

/// Release metadata endpoint.
pub const RELEASE_API: &str =
    "https://api.github.com/repos/Ap4kk/warlist/releases/latest";
/// Repository page offered when a newer build exists.
pub const RELEASE_PAGE: &str = "https://github.com/Ap4kk/warlist";

const CHECK_TIMEOUT: Duration = Duration::from_secs(6);

/// Metadata of the latest published release.
#[derive(Debug, Clone)]
pub struct Release {
    pub tag: String,
    pub page: String,
    pub notes: String,
}

/// Verdict of comparing the latest release against the running build.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// A newer release exists.
    Newer(Release),
    /// The running build is current.
    Current,
    /// The check failed; informational only.
    Failed(String),
}

/// Parse a dotted version tag into comparable numeric segments.
///
/// Leading `v`/`V` characters are stripped and segments that fail to parse
/// count as 0, so `"v1.2.beta"` compares as `[1, 2, 0]`. An empty tag
/// yields no segments.
pub fn parse_version_tag(tag: &str) -> Vec<u64> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Vec::new();
    }
    tag.trim_start_matches(['v', 'V'])
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

/// Whether `latest` names a strictly newer version than `current`.
pub fn is_newer(latest: &str, current: &str) -> bool {
    let latest = parse_version_tag(latest);
    !latest.is_empty() && latest > parse_version_tag(current)
}

/// Fetch the latest release from the API. Blocks up to the request timeout.
pub fn check_latest() -> Result<Release> {
    let client = reqwest::blocking::Client::builder()
        .timeout(CHECK_TIMEOUT)
        .build()
        .map_err(|err| Error::Update(format!("http client: {err}")))?;
    let response = client
        .get(RELEASE_API)
        .header(reqwest::header::USER_AGENT, "warlist-updater")
        .send()
        .map_err(|err| Error::Update(format!("network error: {err}")))?;
    if !response.status().is_success() {
        return Err(Error::Update(format!("HTTP error: {}", response.status())));
    }
    let data: serde_json::Value = response
        .json()
        .map_err(|err| Error::Update(format!("bad response: {err}")))?;

    let tag = data
        .get("tag_name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .or_else(|| data.get("name").and_then(|v| v.as_str()))
        .unwrap_or_default()
        .to_string();
    let page = data
        .get("html_url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(RELEASE_PAGE)
        .to_string();
    let notes = data
        .get("body")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Ok(Release { tag, page, notes })
}

/// Compare the published release against `current_version`.
pub fn check(current_version: &str) -> CheckOutcome {
    match check_latest() {
        Ok(release) if release.tag.is_empty() => {
            CheckOutcome::Failed("release info carries no tag".into())
        }
        Ok(release) => {
            debug!(latest = %release.tag, current = %current_version, "release check");
            if is_newer(&release.tag, current_version) {
                CheckOutcome::Newer(release)
            } else {
                CheckOutcome::Current
            }
        }
        Err(err) => CheckOutcome::Failed(err.to_string()),
    }
}

/// Run the release check on a background thread.
///
/// The outcome arrives on the returned channel; dropping the receiver
/// abandons the check without blocking anything.
pub fn spawn_check(current_version: &str) -> Receiver<CheckOutcome> {
    let current = current_version.to_string();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(check(&current));
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_tags() {
        assert_eq!(parse_version_tag("1.2.3"), [1, 2, 3]);
        assert_eq!(parse_version_tag("v1.0"), [1, 0]);
        assert_eq!(parse_version_tag(" V2.10 "), [2, 10]);
    }

    #[test]
    fn junk_segments_count_as_zero() {
        assert_eq!(parse_version_tag("v1.2.beta"), [1, 2, 0]);
        assert_eq!(parse_version_tag("release"), [0]);
        assert_eq!(parse_version_tag("v"), [0]);
    }

    #[test]
    fn empty_tag_has_no_segments() {
        assert!(parse_version_tag("").is_empty());
        assert!(parse_version_tag("   ").is_empty());
    }

    #[test]
    fn newer_comparison_is_segment_wise() {
        assert!(is_newer("v1.1", "v1.0"));
        assert!(is_newer("1.2.1", "1.2"));
        assert!(is_newer("2.0", "v1.9.9"));
        assert!(!is_newer("v1.0", "v1.0"));
        assert!(!is_newer("1.0", "1.0.1"));
        assert!(!is_newer("", "1.0"));
    }
}
