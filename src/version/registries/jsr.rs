//! JSR (JavaScript Registry) version source

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::version::error::RegistryError;
use crate::version::semver::sort_newest_first;

/// Response from the JSR meta API
#[derive(Debug, Deserialize)]
struct JsrMetaResponse {
    versions: HashMap<String, serde_json::Value>,
}

/// Fetch all published versions of `@scope/pkg`, newest first.
///
/// The meta document keys its `versions` object by version string in no
/// useful order, so the keys are sorted by semver before use.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    package_name: &str,
) -> Result<Vec<String>, RegistryError> {
    // JSR API URL: https://jsr.io/@scope/package/meta.json
    let url = format!("{base_url}/{package_name}/meta.json");

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(package_name.to_string()));
    }

    if !status.is_success() {
        warn!("jsr registry returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let meta: JsrMetaResponse = response.json().await.map_err(|e| {
        warn!("Failed to parse jsr meta.json for {}: {}", package_name, e);
        RegistryError::InvalidResponse(format!(
            "{package_name}: missing or malformed `versions` field: {e}"
        ))
    })?;

    Ok(sort_newest_first(meta.versions.into_keys()))
}
