//! GitHub releases feed version source
//!
//! GitHub publishes releases as an Atom feed of 10 entries per page, with a
//! `?after=<tag>` cursor for older entries. The fetch is bounded: after the
//! first full page, at most [`GITHUB_MAX_EXTRA_FETCHES`] cursor fetches run,
//! and the loop stops as soon as a fetch makes no forward progress.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{GITHUB_FEED_PAGE_SIZE, GITHUB_MAX_EXTRA_FETCHES};
use crate::version::error::RegistryError;

static RELEASE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<id>tag:github\.com,2008:Repository/\d+/([^<]+)</id>").unwrap()
});

/// Fetch release tags for `owner/repo`, newest first, across feed pages.
///
/// A repository with more releases than the fetch ceiling covers is
/// silently truncated.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    repo: &str,
) -> Result<Vec<String>, RegistryError> {
    let mut versions = fetch_page(client, base_url, repo, None).await?;

    // A short first page means the feed is already exhausted.
    if versions.len() == GITHUB_FEED_PAGE_SIZE {
        let mut last_seen: Option<String> = None;
        for _ in 0..GITHUB_MAX_EXTRA_FETCHES {
            let last = versions.last().cloned();
            if last == last_seen {
                // No forward progress: the feed looped or ran out.
                break;
            }
            last_seen = last;
            let more = fetch_page(client, base_url, repo, last_seen.as_deref()).await?;
            versions.extend(more);
        }
        debug!("fetched {} release tags for {}", versions.len(), repo);
    }

    Ok(versions)
}

async fn fetch_page(
    client: &reqwest::Client,
    base_url: &str,
    repo: &str,
    after: Option<&str>,
) -> Result<Vec<String>, RegistryError> {
    // Feed URL: https://github.com/{owner}/{repo}/releases.atom?after=<tag>
    let mut url = format!("{base_url}/{repo}/releases.atom");
    if let Some(after) = after {
        url = format!("{url}?after={after}");
    }

    let response = client.get(&url).send().await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(repo.to_string()));
    }

    if !status.is_success() {
        warn!("GitHub releases feed returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let body = response.text().await?;

    Ok(RELEASE_ID
        .captures_iter(&body)
        .map(|caps| caps[1].to_string())
        .collect())
}
