/*!
 * Allocation Ledger
 *
 * Registry of every live resource the caller has told us about. The ledger
 * observes only: it never frees, closes or unmaps anything.
 *
 * ## Concurrency
 *
 * One `RwLock` guards the whole map. `track`/`release` take the write lock,
 * queries and `enumerate` take the read lock, and `enumerate` copies entries
 * out before returning so callers never hold a live view.
 */

mod entry;
mod snapshot;

pub use entry::{CategoryCounts, LedgerEntry};
pub use snapshot::Snapshot;

use crate::core::config::LedgerConfig;
use crate::core::types::{Category, ResourceId};
use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Shared allocation ledger
///
/// Create one at startup and hand clones to the resource manager and the
/// reporter; clones share the same store, so the instance lives as long as
/// the last clone (normally the whole process).
pub struct Ledger {
    entries: Arc<RwLock<HashMap<ResourceId, LedgerEntry, RandomState>>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_config(&LedgerConfig::default())
    }

    pub fn with_config(config: &LedgerConfig) -> Self {
        debug!(
            initial_capacity = config.initial_capacity,
            "Allocation ledger initialized"
        );
        Self {
            entries: Arc::new(RwLock::new(HashMap::with_capacity_and_hasher(
                config.initial_capacity,
                RandomState::new(),
            ))),
        }
    }

    /// Track `id` as a generic resource, overwriting any existing entry
    pub fn track(&self, id: impl Into<ResourceId>, tag: impl Into<String>) {
        self.track_as(id, tag, Category::Generic);
    }

    /// Track `id` with an explicit category, overwriting any existing entry
    pub fn track_as(&self, id: impl Into<ResourceId>, tag: impl Into<String>, category: Category) {
        let id = id.into();
        let entry = LedgerEntry::new(id, tag, category);
        trace!(id = %id, tag = %entry.tag, category = %category, "tracking resource");

        let previous = self.entries.write().insert(id, entry);

        if let Some(previous) = previous {
            debug!(
                id = %id,
                previous_tag = %previous.tag,
                previous_category = %previous.category,
                "re-tracked identity, previous entry overwritten"
            );
        }
    }

    /// Forget `id`, handing back the removed entry
    ///
    /// Releasing an identity that is not tracked is a no-op and returns `None`.
    pub fn release(&self, id: impl Into<ResourceId>) -> Option<LedgerEntry> {
        let id = id.into();
        let removed = self.entries.write().remove(&id);

        match &removed {
            Some(entry) => trace!(id = %id, tag = %entry.tag, "released resource"),
            None => trace!(id = %id, "release of untracked identity ignored"),
        }
        removed
    }

    pub fn is_tracked(&self, id: impl Into<ResourceId>) -> bool {
        self.entries.read().contains_key(&id.into())
    }

    pub fn get(&self, id: impl Into<ResourceId>) -> Option<LedgerEntry> {
        self.entries.read().get(&id.into()).cloned()
    }

    /// Copy every current entry out under the read lock
    pub fn enumerate(&self) -> Snapshot {
        let entries = self.entries.read().values().cloned().collect();
        Snapshot::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn count_by_category(&self) -> CategoryCounts {
        self.entries.read().values().collect()
    }

    /// Drop all bookkeeping, returning how many entries were forgotten
    ///
    /// The underlying resources are untouched.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut entries = self.entries.write();
            let count = entries.len();
            entries.clear();
            count
        };
        debug!(dropped, "ledger cleared");
        dropped
    }
}

impl Clone for Ledger {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").field("entries", &self.len()).finish()
    }
}
