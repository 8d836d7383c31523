//! Version resolution layer
//!
//! Core functionality for classifying dependency specifiers, fetching the
//! versions their registries publish, and caching the results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │     url     │────▶│   source    │────▶│    cache    │
//! │ (classify)  │     │  (dispatch) │     │ (memoize)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │ registries  │
//!                     │ (fetchers)  │
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`url`]: Registry URL dialects, classification, and rewriting
//! - [`source`]: Fetch entry point with endpoint overrides for tests
//! - [`registries`]: Per-registry fetch algorithms (single-shot and paginated)
//! - [`cache`]: Write-once in-memory version cache
//! - [`semver`]: Shared semver utilities
//! - [`error`]: Error types for registry operations

pub mod cache;
pub mod error;
pub mod registries;
pub mod semver;
pub mod source;
pub mod url;
