//! In-memory version cache
//!
//! Fetched version lists are memoized for the lifetime of the process.
//! There is no refresh and no invalidation: once a package key has been
//! stored, later lookups never hit the network again.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::version::url::RegistryKind;

/// Cache key: registry family plus the package key within it
/// (`@scope/pkg` for jsr, `owner/repo` for the forges, plain name elsewhere).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageKey {
    pub kind: RegistryKind,
    pub name: String,
}

impl PackageKey {
    pub fn new(kind: RegistryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Process-lifetime store of fetched version lists, newest first.
///
/// Writes are first-wins: if two in-flight fetches race on the same key,
/// the list stored by the first to finish is the one everyone reads.
#[derive(Debug, Default)]
pub struct VersionCache {
    entries: Mutex<HashMap<PackageKey, Vec<String>>>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PackageKey) -> Option<Vec<String>> {
        self.lock_entries().get(key).cloned()
    }

    /// Store a version list unless the key is already present.
    pub fn insert(&self, key: PackageKey, versions: Vec<String>) {
        let mut entries = self.lock_entries();
        if entries.contains_key(&key) {
            debug!("cache already holds {}/{}", key.kind.as_str(), key.name);
            return;
        }
        entries.insert(key, versions);
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<PackageKey, Vec<String>>> {
        // A poisoned lock only means a panic elsewhere; the map is still valid.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
