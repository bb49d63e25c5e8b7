/*!
 * Ledger Entries
 * Per-resource metadata and per-category tallies
 */

use crate::core::types::{Category, ResourceId};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Metadata recorded for one tracked resource
///
/// Replaced wholesale by a second track on the same identity, otherwise
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: ResourceId,
    pub tag: String,
    pub category: Category,
    /// When this entry was (last) written
    pub tracked_at: Instant,
}

impl LedgerEntry {
    pub fn new(id: ResourceId, tag: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            tag: tag.into(),
            category,
            tracked_at: Instant::now(),
        }
    }

    /// Time since the entry was written
    #[inline]
    pub fn age(&self) -> Duration {
        self.tracked_at.elapsed()
    }
}

/// Number of entries per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub generic: usize,
    pub file_handles: usize,
    pub sockets: usize,
    pub shared_memory: usize,
    pub custom: usize,
}

impl CategoryCounts {
    /// Count one more entry of the given category
    pub fn add(&mut self, category: &Category) {
        match category {
            Category::Generic => self.generic += 1,
            Category::FileHandle => self.file_handles += 1,
            Category::Socket => self.sockets += 1,
            Category::SharedMemory { .. } => self.shared_memory += 1,
            Category::Custom => self.custom += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.generic + self.file_handles + self.sockets + self.shared_memory + self.custom
    }
}

impl<'a> FromIterator<&'a LedgerEntry> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = &'a LedgerEntry>>(iter: I) -> Self {
        let mut counts = Self::default();
        for entry in iter {
            counts.add(&entry.category);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_category() {
        let entries = vec![
            LedgerEntry::new(ResourceId::new(1), "a", Category::Generic),
            LedgerEntry::new(ResourceId::new(2), "b", Category::Socket),
            LedgerEntry::new(ResourceId::new(3), "c", Category::Socket),
            LedgerEntry::new(ResourceId::new(4), "d", Category::SharedMemory { len: 8 }),
        ];

        let counts: CategoryCounts = entries.iter().collect();
        assert_eq!(counts.generic, 1);
        assert_eq!(counts.sockets, 2);
        assert_eq!(counts.shared_memory, 1);
        assert_eq!(counts.file_handles, 0);
        assert_eq!(counts.total(), 4);
    }
}
