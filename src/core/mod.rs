/*!
 * Core Module
 * Fundamental types, configuration and error handling
 */

pub mod config;
pub mod errors;
pub mod types;

// Re-export for convenience
pub use config::{ConfigError, LedgerConfig, ReportConfig, SortOrder};
pub use errors::{LedgerError, LedgerResult};
pub use types::{Category, ResourceId};
