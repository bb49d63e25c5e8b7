/*!
 * Ledger Snapshot
 * Stable, restartable view of the entries present at one instant
 */

use super::entry::{CategoryCounts, LedgerEntry};
use crate::core::types::ResourceId;

/// Owned copy of every entry, taken under the ledger lock
///
/// Later tracking or release never shows up here. Iteration can be
/// restarted any number of times; order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: Vec<LedgerEntry>,
}

impl Snapshot {
    pub(crate) fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    /// `(identity, kind tag)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (ResourceId, &str)> + '_ {
        self.entries.iter().map(|e| (e.id, e.tag.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn counts(&self) -> CategoryCounts {
        self.entries.iter().collect()
    }

    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }
}

impl IntoIterator for Snapshot {
    type Item = LedgerEntry;
    type IntoIter = std::vec::IntoIter<LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
