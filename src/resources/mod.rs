/*!
 * Resource Manager
 * Category façades over the allocation ledger
 *
 * Each category gets a symmetric track/release pair. Release always drops the
 * ledger entry first and only then runs the category teardown, so a failing
 * close or unmap can never leave bookkeeping stuck.
 *
 * | category      | teardown on release                 |
 * |---------------|-------------------------------------|
 * | generic       | none, caller frees the memory       |
 * | file handle   | close the descriptor                |
 * | socket        | close the descriptor                |
 * | shared memory | munmap with the tracked length      |
 * | custom        | caller-registered cleanup hook      |
 */

mod custom;
mod fds;
mod mappings;
mod memory;
mod sockets;
mod types;

pub use custom::CleanupHook;
pub use types::{ResourceError, ResourceResult};

use crate::core::types::{Category, ResourceId};
use crate::ledger::Ledger;
use crate::monitoring::span_operation;
use ahash::RandomState;
use dashmap::DashMap;
use std::os::unix::io::RawFd;
use std::sync::Arc;
use tracing::{debug, error};

/// Resource manager over an injected ledger
pub struct ResourceManager {
    ledger: Ledger,
    /// Cleanup hooks for custom resources, run once on release
    cleanup_hooks: Arc<DashMap<ResourceId, CleanupHook, RandomState>>,
}

impl ResourceManager {
    pub fn new(ledger: Ledger) -> Self {
        debug!("Resource manager initialized");
        Self {
            ledger,
            cleanup_hooks: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    /// The ledger this manager records into
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Forget the ledger entry and cleanup hook of every tracked resource
    ///
    /// Hooks are dropped without running and no resource is torn down.
    /// Returns the number of ledger entries forgotten.
    pub fn clear(&self) -> usize {
        let dropped_hooks = self.cleanup_hooks.len();
        self.cleanup_hooks.clear();
        let dropped = self.ledger.clear();
        debug!(dropped, dropped_hooks, "resource manager cleared");
        dropped
    }

    /// Drop any cleanup hook registered for `id` without running it
    ///
    /// Every path that overwrites or forgets an entry outside the custom
    /// category goes through here.
    fn discard_hook(&self, id: ResourceId) {
        if self.cleanup_hooks.remove(&id).is_some() {
            debug!(id = %id, "discarded stale cleanup hook");
        }
    }

    /// Forget the descriptor's ledger entry and close it
    fn close_descriptor(
        &self,
        fd: RawFd,
        category: Category,
        operation: &str,
    ) -> ResourceResult<()> {
        let id = ResourceId::from_fd(fd);
        let span = span_operation(operation);
        let _guard = span.enter();
        span.record_display("id", id);
        span.record("category", category.name());

        self.discard_hook(id);
        if self.ledger.release(id).is_none() {
            debug!(id = %id, category = %category, "closing descriptor that was not tracked");
        }

        match nix::unistd::close(fd) {
            Ok(()) => {
                span.record_result(true);
                Ok(())
            }
            Err(errno) => {
                error!(id = %id, category = %category, error = %errno, "descriptor close failed");
                span.record_error(errno.desc());
                Err(ResourceError::Teardown {
                    category,
                    id,
                    source: errno,
                })
            }
        }
    }
}

impl Clone for ResourceManager {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            cleanup_hooks: Arc::clone(&self.cleanup_hooks),
        }
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("ledger", &self.ledger)
            .field("pending_cleanups", &self.cleanup_hooks.len())
            .finish()
    }
}
