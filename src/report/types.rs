/*!
 * Leak Report Types
 * Structured leak reports and the opt-in leak check error
 */

use crate::core::config::{ReportConfig, SortOrder};
use crate::core::types::{Category, ResourceId};
use crate::ledger::{CategoryCounts, LedgerEntry};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised by `LeakReporter::check` when entries remain
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LeakError {
    #[error("{count} suspected leak(s): {summary}")]
    #[diagnostic(
        code(report::leaks_detected),
        help("Every tracked resource must be released with its matching release call before the checkpoint.")
    )]
    LeaksDetected { count: usize, summary: String },
}

/// One suspected leak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakRecord {
    pub id: ResourceId,
    pub tag: String,
    pub category: Category,
    pub age_micros: u64,
}

impl From<&LedgerEntry> for LeakRecord {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id,
            tag: entry.tag.clone(),
            category: entry.category,
            age_micros: entry.age().as_micros() as u64,
        }
    }
}

/// Every entry still in the ledger at the time of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakReport {
    pub total: usize,
    pub entries: Vec<LeakRecord>,
    pub by_category: CategoryCounts,
}

impl LeakReport {
    pub(crate) fn new(mut entries: Vec<LeakRecord>, sort: SortOrder) -> Self {
        match sort {
            SortOrder::Id => entries.sort_by_key(|r| r.id),
            SortOrder::Tag => entries.sort_by(|a, b| a.tag.cmp(&b.tag).then(a.id.cmp(&b.id))),
            SortOrder::Age => {
                entries.sort_by(|a, b| b.age_micros.cmp(&a.age_micros).then(a.id.cmp(&b.id)))
            }
        }

        let mut by_category = CategoryCounts::default();
        for record in &entries {
            by_category.add(&record.category);
        }

        Self {
            total: entries.len(),
            entries,
            by_category,
        }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }

    /// Entries carrying the given kind tag
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a LeakRecord> + 'a {
        self.entries.iter().filter(move |r| r.tag == tag)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the human-readable form
    pub fn render<W: fmt::Write>(&self, out: &mut W, config: &ReportConfig) -> fmt::Result {
        if self.is_clean() {
            return writeln!(out, "No leaks detected");
        }

        writeln!(out, "Detected {} suspected leak(s):", self.total)?;

        let shown = config.max_lines.unwrap_or(self.total).min(self.total);
        for record in &self.entries[..shown] {
            write!(out, "  '{}' at {} ({}", record.tag, record.id, record.category)?;
            if config.show_age {
                write!(out, ", age {}us", record.age_micros)?;
            }
            writeln!(out, ")")?;
        }

        if shown < self.total {
            writeln!(out, "  ... and {} more", self.total - shown)?;
        }
        Ok(())
    }

    /// Short comma-separated description used in `LeakError`
    pub(crate) fn summary(&self, limit: usize) -> String {
        let mut parts: Vec<String> = self
            .entries
            .iter()
            .take(limit)
            .map(|r| format!("'{}' at {}", r.tag, r.id))
            .collect();
        if self.total > limit {
            parts.push(format!("{} more", self.total - limit));
        }
        parts.join(", ")
    }
}

impl fmt::Display for LeakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &ReportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, tag: &str, age_micros: u64) -> LeakRecord {
        LeakRecord {
            id: ResourceId::new(id),
            tag: tag.to_string(),
            category: Category::Generic,
            age_micros,
        }
    }

    #[test]
    fn test_sort_orders() {
        let records = vec![record(3, "b", 10), record(1, "c", 30), record(2, "a", 20)];

        let by_id = LeakReport::new(records.clone(), SortOrder::Id);
        let ids: Vec<u64> = by_id.entries.iter().map(|r| r.id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let by_tag = LeakReport::new(records.clone(), SortOrder::Tag);
        let tags: Vec<&str> = by_tag.entries.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "b", "c"]);

        let by_age = LeakReport::new(records, SortOrder::Age);
        let ages: Vec<u64> = by_age.entries.iter().map(|r| r.age_micros).collect();
        assert_eq!(ages, vec![30, 20, 10]);
    }

    #[test]
    fn test_render_truncates_lines_not_count() {
        let report = LeakReport::new(
            vec![record(1, "a", 0), record(2, "b", 0), record(3, "c", 0)],
            SortOrder::Id,
        );
        let mut out = String::new();
        report
            .render(&mut out, &ReportConfig::default().with_max_lines(1).with_age(false))
            .unwrap();

        assert_eq!(
            out,
            "Detected 3 suspected leak(s):\n  'a' at 0x1 (generic)\n  ... and 2 more\n"
        );
        assert_eq!(report.total, 3);
    }

    #[test]
    fn test_clean_report() {
        let report = LeakReport::new(Vec::new(), SortOrder::Id);
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "No leaks detected\n");
    }

    #[test]
    fn test_summary_limit() {
        let report = LeakReport::new(
            vec![record(1, "a", 0), record(2, "b", 0), record(3, "c", 0)],
            SortOrder::Id,
        );
        assert_eq!(report.summary(2), "'a' at 0x1, 'b' at 0x2, 1 more");
    }
}
