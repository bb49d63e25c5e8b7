/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

pub use super::config::ConfigError;
pub use crate::report::LeakError;
pub use crate::resources::ResourceError;

/// Unified ledger error type with miette diagnostics
///
/// Bookkeeping mismatches (double release, re-tracking) are not errors and
/// never appear here.
#[derive(Error, Debug, Diagnostic)]
pub enum LedgerError {
    #[error("Resource error: {0}")]
    #[diagnostic(transparent)]
    Resource(#[from] ResourceError),

    #[error("Leak check failed: {0}")]
    #[diagnostic(transparent)]
    Leak(#[from] LeakError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Common result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
