/*!
 * Resource Manager Types
 * Teardown errors surfaced by the category release calls
 */

use crate::core::types::{Category, ResourceId};
use miette::Diagnostic;
use nix::errno::Errno;
use thiserror::Error;

/// Resource operation result
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Teardown failures
///
/// The ledger entry is already gone when any of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ResourceError {
    #[error("Teardown of {category} {id} failed: {source}")]
    #[diagnostic(
        code(resources::teardown_failed),
        help("The OS rejected the close/unmap. The handle may have been closed elsewhere or never been valid.")
    )]
    Teardown {
        category: Category,
        id: ResourceId,
        #[source]
        source: Errno,
    },

    #[error("No tracked mapping length for {0}")]
    #[diagnostic(
        code(resources::unknown_mapping),
        help("Shared memory must be tracked with track_shared_memory so its length is known at release.")
    )]
    UnknownMapping(ResourceId),

    #[error("Cleanup hook for custom resource {id} failed: {reason}")]
    #[diagnostic(code(resources::cleanup_failed))]
    CleanupFailed { id: ResourceId, reason: String },
}

impl ResourceError {
    /// Identity the failed release was for
    pub fn id(&self) -> ResourceId {
        match self {
            ResourceError::Teardown { id, .. } => *id,
            ResourceError::UnknownMapping(id) => *id,
            ResourceError::CleanupFailed { id, .. } => *id,
        }
    }

    /// OS error code, if the failure came from a syscall
    pub fn errno(&self) -> Option<Errno> {
        match self {
            ResourceError::Teardown { source, .. } => Some(*source),
            _ => None,
        }
    }
}
