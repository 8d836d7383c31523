//! GitLab tags feed version source
//!
//! GitLab publishes tags as an Atom feed of 20 entries per page, addressed
//! by page number. At most [`GITLAB_MAX_PAGES`] pages are fetched; the loop
//! stops early on a short page or when a page makes no forward progress.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{GITLAB_FEED_PAGE_SIZE, GITLAB_MAX_PAGES};
use crate::version::error::RegistryError;

static TAG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<id>[^<]*/tags/([^<]+)</id>").unwrap());

/// Fetch tags for `owner/repo`, newest first, across feed pages.
///
/// A repository with more tags than the page ceiling covers is silently
/// truncated.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    repo: &str,
) -> Result<Vec<String>, RegistryError> {
    let mut versions: Vec<String> = Vec::new();

    for page in 1..=GITLAB_MAX_PAGES {
        let fetched = fetch_page(client, base_url, repo, page).await?;

        if !versions.is_empty() && fetched.last() == versions.last() {
            // No forward progress: the feed looped or ran out.
            break;
        }

        let short_page = fetched.len() < GITLAB_FEED_PAGE_SIZE;
        versions.extend(fetched);

        if short_page {
            break;
        }
    }

    debug!("fetched {} tags for {}", versions.len(), repo);
    Ok(versions)
}

async fn fetch_page(
    client: &reqwest::Client,
    base_url: &str,
    repo: &str,
    page: usize,
) -> Result<Vec<String>, RegistryError> {
    // Feed URL: https://gitlab.com/{owner}/{repo}/-/tags?format=atom&page=<n>
    let url = format!("{base_url}/{repo}/-/tags?format=atom&page={page}");

    let response = client.get(&url).send().await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(repo.to_string()));
    }

    if !status.is_success() {
        warn!("GitLab tags feed returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let body = response.text().await?;

    Ok(TAG_ID
        .captures_iter(&body)
        .map(|caps| caps[1].to_string())
        .collect())
}
