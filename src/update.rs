//! Upgrade engine over import-map dependency entries
//!
//! Selects aliases by an inclusion pattern, resolves each entry's latest
//! registry version concurrently, and rewrites outdated specifiers in
//! place. A second pass raises entries below a configured minimum version.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::config;
use crate::version::error::RegistryError;
use crate::version::semver::{parse_version, split_range_operator};
use crate::version::source::RegistrySource;
use crate::version::url::lookup;

/// Import alias to specifier string, in file order.
pub type DependencyMap = IndexMap<String, String>;

/// Line sink for user-facing progress output.
pub type Logger = Arc<dyn Fn(&str) + Send + Sync>;

pub struct UpdateOptions {
    /// Only aliases matching this pattern are upgrade candidates
    pub include: Regex,
    /// Forced minimum version per alias, applied after the latest pass
    pub pins: HashMap<String, String>,
    /// Rewrite entries whose current version is not semver
    pub force: bool,
    /// Consider pre-release versions when picking the latest
    pub allow_prerelease: bool,
    pub logger: Logger,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            include: Regex::new(config::DEFAULT_INCLUDE_PATTERN).unwrap(),
            pins: HashMap::new(),
            force: false,
            allow_prerelease: false,
            logger: Arc::new(|line| println!("{line}")),
        }
    }
}

impl UpdateOptions {
    fn log(&self, line: &str) {
        (self.logger)(line);
    }
}

/// Upgrade every selected entry of `map` to its latest registry version,
/// then apply the forced minimums. Returns whether anything changed.
///
/// The per-entry checks run as one concurrent batch; any registry error
/// fails the whole batch before a single rewrite lands in the map.
pub async fn update_dependency_map(
    map: &mut DependencyMap,
    options: &UpdateOptions,
    source: &RegistrySource,
) -> Result<bool, RegistryError> {
    let candidates: Vec<(String, String)> = map
        .iter()
        .filter(|(alias, _)| options.include.is_match(alias))
        .map(|(alias, specifier)| (alias.clone(), specifier.clone()))
        .collect();

    let checks = candidates
        .into_iter()
        .map(|(alias, specifier)| check_entry(alias, specifier, options, source));

    let rewrites = futures::future::try_join_all(checks).await?;

    let mut changed = false;
    for (alias, new_specifier) in rewrites.into_iter().flatten() {
        map.insert(alias, new_specifier);
        changed = true;
    }

    changed |= apply_minimum_versions(map, options)?;

    if !changed {
        options.log("dependencies already up to date");
    }
    Ok(changed)
}

/// Resolve one entry's latest version and decide whether to rewrite it.
///
/// Returns the rewritten `(alias, specifier)` pair, or `None` when the
/// entry is skipped or already current.
async fn check_entry(
    alias: String,
    specifier: String,
    options: &UpdateOptions,
    source: &RegistrySource,
) -> Result<Option<(String, String)>, RegistryError> {
    let Some(url) = lookup(&specifier) else {
        debug!("no registry matched {specifier}, leaving {alias} alone");
        return Ok(None);
    };

    let versions = source.all_versions(&url, options.allow_prerelease).await?;
    let Some(latest) = versions.first() else {
        options.log(&format!("warning: {alias}: registry lists no versions, skipping"));
        return Ok(None);
    };

    let current = url.version()?;
    let (operator, bare) = split_range_operator(current);

    if parse_version(bare).is_none() && !options.force {
        options.log(&format!(
            "warning: {alias}: current version {current} is not semver, skipping (pass --force to rewrite)"
        ));
        return Ok(None);
    }

    if bare == latest.as_str() {
        return Ok(None);
    }

    options.log(&format!("{alias}: {current} -> {operator}{latest}"));
    let rewritten = url.at(&format!("{operator}{latest}"));
    Ok(Some((alias, rewritten.to_specifier())))
}

/// Raise every pinned alias that sits below its configured minimum, even
/// when the latest-version pass saw nothing to do.
fn apply_minimum_versions(
    map: &mut DependencyMap,
    options: &UpdateOptions,
) -> Result<bool, RegistryError> {
    let mut changed = false;

    for (alias, minimum) in &options.pins {
        let Some(specifier) = map.get(alias) else {
            continue;
        };
        let Some(url) = lookup(specifier) else {
            continue;
        };

        let current = url.version()?.to_string();
        let (operator, bare) = split_range_operator(&current);
        let (Some(current_version), Some(minimum_version)) =
            (parse_version(bare), parse_version(minimum))
        else {
            continue;
        };

        if current_version < minimum_version {
            options.log(&format!(
                "{alias}: {current} -> {operator}{minimum} (configured minimum)"
            ));
            map.insert(alias.clone(), url.at(&format!("{operator}{minimum}")).to_specifier());
            changed = true;
        }
    }

    Ok(changed)
}
