/*!
 * Leak Reporter
 * Read-only checkpoint over the ledger
 */

use super::types::{LeakError, LeakRecord, LeakReport};
use crate::core::config::{LedgerConfig, ReportConfig};
use crate::ledger::Ledger;
use crate::monitoring::span_operation;
use std::io::{self, Write};
use tracing::{info, warn};

/// Tags listed in a `LeakError` summary
const SUMMARY_LIMIT: usize = 5;

/// Leak reporter over an injected ledger
///
/// Reporting never releases entries; two reports with no release in
/// between see the same entries (plus anything tracked meanwhile).
#[derive(Debug, Clone)]
pub struct LeakReporter {
    ledger: Ledger,
    config: ReportConfig,
}

impl LeakReporter {
    pub fn new(ledger: Ledger) -> Self {
        Self::with_config(ledger, ReportConfig::default())
    }

    pub fn with_config(ledger: Ledger, config: ReportConfig) -> Self {
        Self { ledger, config }
    }

    /// Reporter using the report section of a loaded ledger configuration
    pub fn from_config(ledger: Ledger, config: &LedgerConfig) -> Self {
        Self::with_config(ledger, config.report.clone())
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Structured report of every entry currently tracked
    pub fn snapshot(&self) -> LeakReport {
        let snapshot = self.ledger.enumerate();
        let records = snapshot.iter().map(LeakRecord::from).collect();
        LeakReport::new(records, self.config.sort)
    }

    /// Render the report to stderr and return the number of suspected leaks
    ///
    /// Zero means no leaks. A failed write to stderr does not change the count.
    pub fn report(&self) -> usize {
        let report = self.snapshot_logged();
        if let Err(e) = self.write_report(&mut io::stderr().lock(), &report) {
            warn!(error = %e, "could not write leak report to stderr");
        }
        report.total
    }

    /// Render the report to `out` and return the number of suspected leaks
    pub fn report_to<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let report = self.snapshot_logged();
        self.write_report(out, &report)?;
        Ok(report.total)
    }

    /// Fail when any entry remains; whether that is fatal is up to the caller
    pub fn check(&self) -> Result<(), LeakError> {
        let report = self.snapshot_logged();
        if report.is_clean() {
            return Ok(());
        }
        Err(LeakError::LeaksDetected {
            count: report.total,
            summary: report.summary(SUMMARY_LIMIT),
        })
    }

    fn snapshot_logged(&self) -> LeakReport {
        let span = span_operation("leak_report");
        let _guard = span.enter();

        let report = self.snapshot();
        for record in &report.entries {
            warn!(
                id = %record.id,
                tag = %record.tag,
                category = %record.category,
                age_micros = record.age_micros,
                "suspected leak"
            );
        }
        info!(
            total = report.total,
            generic = report.by_category.generic,
            file_handles = report.by_category.file_handles,
            sockets = report.by_category.sockets,
            shared_memory = report.by_category.shared_memory,
            custom = report.by_category.custom,
            "leak report complete"
        );

        span.record_items_processed(report.total);
        span.record_result(report.is_clean());
        report
    }

    fn write_report<W: Write>(&self, out: &mut W, report: &LeakReport) -> io::Result<()> {
        let mut text = String::new();
        report
            .render(&mut text, &self.config)
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "failed to render leak report"))?;
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SortOrder;
    use crate::core::types::ResourceId;

    #[test]
    fn test_report_does_not_release() {
        let ledger = Ledger::new();
        let reporter = LeakReporter::new(ledger.clone());
        ledger.track(ResourceId::new(0x10), "int");

        assert_eq!(reporter.report(), 1);
        assert_eq!(reporter.report(), 1);
        assert!(ledger.is_tracked(ResourceId::new(0x10)));
    }

    #[test]
    fn test_check() {
        let ledger = Ledger::new();
        let reporter = LeakReporter::new(ledger.clone());
        assert!(reporter.check().is_ok());

        ledger.track(ResourceId::new(0x20), "buffer");
        let err = reporter.check().unwrap_err();
        assert_eq!(
            err,
            LeakError::LeaksDetected {
                count: 1,
                summary: "'buffer' at 0x20".to_string()
            }
        );
    }

    #[test]
    fn test_from_config_uses_report_section() {
        let config = LedgerConfig::from_lookup(|var| match var {
            "LEDGER_REPORT_MAX_LINES" => Some("2".to_string()),
            "LEDGER_REPORT_SORT" => Some("tag".to_string()),
            _ => None,
        })
        .unwrap();
        let ledger = Ledger::with_config(&config);
        let reporter = LeakReporter::from_config(ledger.clone(), &config);
        assert_eq!(reporter.config(), &config.report);
        assert_eq!(reporter.config().sort, SortOrder::Tag);

        ledger.track(ResourceId::new(0x1), "c");
        ledger.track(ResourceId::new(0x2), "a");
        ledger.track(ResourceId::new(0x3), "b");

        let mut out = Vec::new();
        assert_eq!(reporter.report_to(&mut out).unwrap(), 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1 + 2 + 1);
        assert!(text.contains("'a' at 0x2"));
        assert!(text.contains("'b' at 0x3"));
        assert!(!text.contains("'c' at 0x1"));
        assert!(text.ends_with("  ... and 1 more\n"));
    }
}
