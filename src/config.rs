use std::collections::HashMap;

use serde::Deserialize;

// =============================================================================
// Network constants
// =============================================================================

/// User-Agent sent with every registry request
pub const USER_AGENT: &str = concat!("denoup/", env!("CARGO_PKG_VERSION"));

/// Production base URLs, one per consumed endpoint family.
/// Tests replace these through `Endpoints`.
pub const JSR_BASE_URL: &str = "https://jsr.io";
pub const NPM_BASE_URL: &str = "https://registry.npmjs.org";
pub const DENO_CDN_BASE_URL: &str = "https://cdn.deno.land";
pub const UNPKG_BASE_URL: &str = "https://unpkg.com";
pub const GITHUB_BASE_URL: &str = "https://github.com";
pub const GITLAB_BASE_URL: &str = "https://gitlab.com";
pub const NEST_BASE_URL: &str = "https://x.nest.land";

// =============================================================================
// Feed pagination
// =============================================================================

/// Entries per page of the GitHub releases feed
pub const GITHUB_FEED_PAGE_SIZE: usize = 10;

/// Ceiling on cursor fetches after the first full releases page.
/// Bounds cost against looping feeds; repositories with more releases are
/// silently truncated.
pub const GITHUB_MAX_EXTRA_FETCHES: usize = 5;

/// Entries per page of the GitLab tags feed
pub const GITLAB_FEED_PAGE_SIZE: usize = 20;

/// Ceiling on total pages fetched from the GitLab tags feed
pub const GITLAB_MAX_PAGES: usize = 3;

// =============================================================================
// Upgrade engine
// =============================================================================

/// Aliases eligible for upgrade when the user gives no pattern
pub const DEFAULT_INCLUDE_PATTERN: &str = ".*";

/// Optional JSON configuration file.
///
/// Command-line flags win over anything configured here.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Alias inclusion pattern
    pub include: Option<String>,
    /// Forced minimum version per alias; entries below it are raised even
    /// when the latest-version check saw no change
    pub pins: HashMap<String, String>,
}
