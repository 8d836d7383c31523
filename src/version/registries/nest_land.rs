//! nest.land version source
//!
//! nest.land has no versions endpoint; its package document carries the
//! upload log as `"name@version"` identifiers, oldest first.

use serde::Deserialize;
use tracing::warn;

use crate::version::error::RegistryError;

/// Response from the nest.land package API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestPackageResponse {
    package_upload_names: Vec<String>,
}

/// Fetch all uploaded versions of a package, newest first.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    package_name: &str,
) -> Result<Vec<String>, RegistryError> {
    // API URL: https://x.nest.land/api/package/{name}
    let url = format!("{base_url}/api/package/{package_name}");

    let response = client.get(&url).send().await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(package_name.to_string()));
    }

    if !status.is_success() {
        warn!("nest.land API returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let package_info: NestPackageResponse = response.json().await.map_err(|e| {
        warn!("Failed to parse nest.land response for {}: {}", package_name, e);
        RegistryError::InvalidResponse(format!(
            "{package_name}: missing or malformed `packageUploadNames` field: {e}"
        ))
    })?;

    let mut versions: Vec<String> = package_info
        .package_upload_names
        .iter()
        .filter_map(|upload| upload.rsplit_once('@').map(|(_, version)| version.to_string()))
        .collect();
    versions.reverse();
    Ok(versions)
}
