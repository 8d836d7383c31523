//! Fetch entry point
//!
//! [`RegistrySource`] bundles the HTTP client, the endpoint base URLs, and
//! the version cache. Production code builds one at startup; tests build
//! their own with mock endpoints so nothing leaks between tests.

use tracing::debug;

use crate::config;
use crate::version::cache::{PackageKey, VersionCache};
use crate::version::error::RegistryError;
use crate::version::registries;
use crate::version::semver::is_prerelease;
use crate::version::url::{RegistryKind, RegistryUrl};

/// Base URLs for every consumed endpoint family.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub jsr: String,
    pub npm: String,
    pub deno_cdn: String,
    pub unpkg: String,
    pub github: String,
    pub gitlab: String,
    pub nest: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            jsr: config::JSR_BASE_URL.to_string(),
            npm: config::NPM_BASE_URL.to_string(),
            deno_cdn: config::DENO_CDN_BASE_URL.to_string(),
            unpkg: config::UNPKG_BASE_URL.to_string(),
            github: config::GITHUB_BASE_URL.to_string(),
            gitlab: config::GITLAB_BASE_URL.to_string(),
            nest: config::NEST_BASE_URL.to_string(),
        }
    }
}

/// Shared context for version fetches: one client, one cache.
pub struct RegistrySource {
    client: reqwest::Client,
    endpoints: Endpoints,
    cache: VersionCache,
}

impl RegistrySource {
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    /// Creates a RegistrySource with custom base URLs and a private cache
    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(config::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            endpoints,
            cache: VersionCache::new(),
        }
    }

    /// All published versions for the specifier's package, newest first.
    ///
    /// Completed fetches are memoized per package key; concurrent fetches
    /// of the same key are not deduplicated, only the first finished result
    /// is kept. The pre-release filter runs on the way out so the cached
    /// list stays complete regardless of the flag.
    pub async fn all_versions(
        &self,
        url: &RegistryUrl,
        allow_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError> {
        let key = PackageKey::new(cache_family(url.kind()), url.name());

        if let Some(cached) = self.cache.get(&key) {
            debug!("cache hit for {}/{}", key.kind.as_str(), key.name);
            return Ok(filter_prerelease(cached, allow_prerelease));
        }

        let client = &self.client;
        let versions = match url.kind() {
            RegistryKind::Jsr => {
                registries::jsr::fetch_versions(client, &self.endpoints.jsr, url.name()).await?
            }
            RegistryKind::Npm => {
                registries::npm::fetch_versions(client, &self.endpoints.npm, url.name()).await?
            }
            RegistryKind::DenoStd | RegistryKind::DenoLand => {
                registries::deno_land::fetch_versions(client, &self.endpoints.deno_cdn, url.name())
                    .await?
            }
            RegistryKind::UnpkgScope | RegistryKind::Unpkg => {
                registries::unpkg::fetch_versions(client, &self.endpoints.unpkg, url.name()).await?
            }
            RegistryKind::GithubRaw => {
                registries::github::fetch_versions(client, &self.endpoints.github, url.name())
                    .await?
            }
            RegistryKind::GitlabRaw => {
                registries::gitlab::fetch_versions(client, &self.endpoints.gitlab, url.name())
                    .await?
            }
            RegistryKind::NestLand => {
                registries::nest_land::fetch_versions(client, &self.endpoints.nest, url.name())
                    .await?
            }
        };

        self.cache.insert(key, versions.clone());
        Ok(filter_prerelease(versions, allow_prerelease))
    }
}

impl Default for RegistrySource {
    fn default() -> Self {
        Self::new()
    }
}

/// Dialects sharing an endpoint share a cache family: `deno.land/x/std` and
/// `deno.land/std` resolve to the same CDN document, as do scoped and
/// unscoped unpkg names.
fn cache_family(kind: RegistryKind) -> RegistryKind {
    match kind {
        RegistryKind::DenoStd => RegistryKind::DenoLand,
        RegistryKind::UnpkgScope => RegistryKind::Unpkg,
        other => other,
    }
}

fn filter_prerelease(versions: Vec<String>, allow_prerelease: bool) -> Vec<String> {
    if allow_prerelease {
        return versions;
    }
    versions.into_iter().filter(|v| !is_prerelease(v)).collect()
}

#[cfg(test)]
mod tests {
    use mockito::{Server, ServerGuard};

    use super::*;
    use crate::version::url::lookup;

    fn source_for(server: &ServerGuard) -> RegistrySource {
        RegistrySource::with_endpoints(Endpoints {
            jsr: server.url(),
            npm: server.url(),
            deno_cdn: server.url(),
            unpkg: server.url(),
            github: server.url(),
            gitlab: server.url(),
            nest: server.url(),
        })
    }

    #[tokio::test]
    async fn all_versions_fetches_once_per_package_key() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/@luca/flag/meta.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": {"1.0.0": {}, "1.2.0": {}}}"#)
            .expect(1)
            .create_async()
            .await;

        let source = source_for(&server);
        let url = lookup("jsr:@luca/flag@^1.0.0").unwrap();

        let first = source.all_versions(&url, false).await.unwrap();
        let second = source.all_versions(&url, false).await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, vec!["1.2.0".to_string(), "1.0.0".to_string()]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn all_versions_shares_the_cache_across_equivalent_specifiers() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/oak/meta/versions.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": ["v12.6.0", "v12.6.1"]}"#)
            .expect(1)
            .create_async()
            .await;

        let source = source_for(&server);
        let mod_ts = lookup("https://deno.land/x/oak@v12.6.0/mod.ts").unwrap();
        let helpers_ts = lookup("https://deno.land/x/oak@v12.6.0/helpers.ts").unwrap();

        source.all_versions(&mod_ts, false).await.unwrap();
        let second = source.all_versions(&helpers_ts, false).await.unwrap();

        mock.assert_async().await;
        assert_eq!(second[0], "v12.6.1");
    }

    #[tokio::test]
    async fn all_versions_filters_prereleases_unless_allowed() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/@luca/flag/meta.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": {"1.0.0": {}, "2.0.0-rc.1": {}}}"#)
            .expect(1)
            .create_async()
            .await;

        let source = source_for(&server);
        let url = lookup("jsr:@luca/flag@1.0.0").unwrap();

        let stable_only = source.all_versions(&url, false).await.unwrap();
        // Second call is served from the cache but with the other flag: the
        // cached list must still contain the pre-release.
        let with_prerelease = source.all_versions(&url, true).await.unwrap();

        mock.assert_async().await;
        assert_eq!(stable_only, vec!["1.0.0".to_string()]);
        assert_eq!(
            with_prerelease,
            vec!["2.0.0-rc.1".to_string(), "1.0.0".to_string()]
        );
    }

    #[tokio::test]
    async fn all_versions_propagates_registry_errors() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/@luca/flag/meta.json")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let source = source_for(&server);
        let url = lookup("jsr:@luca/flag@1.0.0").unwrap();

        let result = source.all_versions(&url, false).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }
}
