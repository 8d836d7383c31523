//! deno.land version source (covers both /x/ modules and /std)

use serde::Deserialize;
use tracing::warn;

use crate::version::error::RegistryError;

/// Response from the deno.land CDN versions endpoint
#[derive(Debug, Deserialize)]
struct VersionsResponse {
    versions: Vec<String>,
}

/// Fetch all published versions of a module, newest first.
///
/// The CDN lists versions oldest first; the array is reversed before use.
pub async fn fetch_versions(
    client: &reqwest::Client,
    base_url: &str,
    module: &str,
) -> Result<Vec<String>, RegistryError> {
    // CDN URL: https://cdn.deno.land/{module}/meta/versions.json
    let url = format!("{base_url}/{module}/meta/versions.json");

    let response = client.get(&url).send().await?;

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(module.to_string()));
    }

    if !status.is_success() {
        warn!("deno.land CDN returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {status}"
        )));
    }

    let payload: VersionsResponse = response.json().await.map_err(|e| {
        warn!("Failed to parse versions.json for {}: {}", module, e);
        RegistryError::InvalidResponse(format!(
            "{module}: missing or malformed `versions` field: {e}"
        ))
    })?;

    let mut versions = payload.versions;
    versions.reverse();
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_versions_reverses_the_oldest_first_listing() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/oak/meta/versions.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "latest": "v12.6.1",
                    "versions": ["v12.5.0", "v12.6.0", "v12.6.1"]
                }"#,
            )
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = fetch_versions(&client, &server.url(), "oak").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![
                "v12.6.1".to_string(),
                "v12.6.0".to_string(),
                "v12.5.0".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn fetch_versions_works_for_std() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/std/meta/versions.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": ["0.223.0", "0.224.0"]}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = fetch_versions(&client, &server.url(), "std").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["0.224.0".to_string(), "0.223.0".to_string()]);
    }

    #[tokio::test]
    async fn fetch_versions_returns_not_found_for_unknown_module() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/ghost/meta/versions.json")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = fetch_versions(&client, &server.url(), "ghost").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }
}
