//! Per-registry version fetchers
//!
//! One module per endpoint family. Each exposes a single
//! `fetch_versions(client, base_url, name)` returning versions newest
//! first; [`crate::version::source::RegistrySource`] dispatches to them and
//! owns caching.

pub mod deno_land;
pub mod github;
pub mod gitlab;
pub mod jsr;
pub mod nest_land;
pub mod npm;
pub mod unpkg;
