/*!
 * Allocation Ledger Library
 *
 * Opt-in runtime ledger of live native resources (heap objects, files,
 * sockets, shared-memory mappings, custom handles) with on-demand leak
 * reports. The ledger observes only; callers still release their resources.
 *
 * ```no_run
 * use alloc_ledger::{Ledger, LeakReporter, ResourceManager};
 *
 * let ledger = Ledger::new();
 * let manager = ResourceManager::new(ledger.clone());
 * let reporter = LeakReporter::new(ledger);
 *
 * let file = std::fs::File::create("/tmp/example.log")?;
 * manager.track_file_handle(&file, "log");
 * manager.release_file_handle(file)?;
 *
 * assert_eq!(reporter.report(), 0);
 * # Ok::<(), Box<dyn std::error::Error>>(())
 * ```
 */

pub mod core;
pub mod ledger;
pub mod monitoring;
pub mod report;
pub mod resources;

// Re-exports
pub use crate::core::{
    Category, ConfigError, LedgerConfig, LedgerError, LedgerResult, ReportConfig, ResourceId,
    SortOrder,
};
pub use ledger::{CategoryCounts, Ledger, LedgerEntry, Snapshot};
pub use monitoring::init_tracing;
pub use report::{LeakError, LeakRecord, LeakReport, LeakReporter};
pub use resources::{CleanupHook, ResourceError, ResourceManager, ResourceResult};
