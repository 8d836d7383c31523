//! unpkg version source (covers scoped and unscoped packages)
//!
//! unpkg has no version API; the browse page carries a version selector
//! whose `<option>` tags list every published version, oldest first.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::version::error::RegistryError;

static OPTION_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<option value="([^"]+)""#).unwrap());

/// Fetch all published versions of a package, newest first.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    package_name: &str,
) -> Result<Vec<String>, RegistryError> {
    // Browse URL: https://unpkg.com/browse/{name}/
    let url = format!("{base_url}/browse/{package_name}/");

    let response = client.get(&url).send().await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(package_name.to_string()));
    }

    if !status.is_success() {
        warn!("unpkg returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let body = response.text().await?;

    let mut versions: Vec<String> = OPTION_VALUE
        .captures_iter(&body)
        .map(|caps| caps[1].to_string())
        .collect();

    if versions.is_empty() {
        warn!("No version options found on unpkg browse page for {}", package_name);
        return Err(RegistryError::InvalidResponse(format!(
            "{package_name}: no <option value> entries in browse listing"
        )));
    }

    versions.reverse();
    Ok(versions)
}
