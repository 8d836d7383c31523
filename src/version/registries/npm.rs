//! npm registry version source

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::version::error::RegistryError;
use crate::version::semver::sort_newest_first;

/// Response from the npm registry package document
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    versions: HashMap<String, serde_json::Value>,
}

/// Encode package name for URL (handles scoped packages)
fn encode_package_name(package_name: &str) -> String {
    if package_name.starts_with('@') {
        // Scoped package: @scope/name -> @scope%2Fname
        package_name.replace('/', "%2F")
    } else {
        package_name.to_string()
    }
}

/// Fetch all published versions of a package, newest first.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    package_name: &str,
) -> Result<Vec<String>, RegistryError> {
    let encoded_name = encode_package_name(package_name);
    let url = format!("{base_url}/{encoded_name}");

    let response = client.get(&url).send().await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(package_name.to_string()));
    }

    if !status.is_success() {
        warn!("npm registry returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let package_info: NpmPackageResponse = response.json().await.map_err(|e| {
        warn!("Failed to parse npm registry response for {}: {}", package_name, e);
        RegistryError::InvalidResponse(format!(
            "{package_name}: missing or malformed `versions` field: {e}"
        ))
    })?;

    Ok(sort_newest_first(package_info.versions.into_keys()))
}
