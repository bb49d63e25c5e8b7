/*!
 * Custom Resources
 * Opaque handles with optional caller-supplied cleanup
 */

use super::{ResourceError, ResourceManager, ResourceResult};
use crate::core::types::{Category, ResourceId};
use crate::monitoring::span_operation;
use tracing::{debug, error};

/// Cleanup closure run exactly once when a custom resource is released
pub type CleanupHook = Box<dyn FnOnce() -> Result<(), String> + Send + Sync>;

impl ResourceManager {
    /// Track an opaque handle with no teardown of its own
    ///
    /// Any hook left over from an earlier registration of `id` is dropped
    /// without running.
    pub fn track_custom(&self, id: impl Into<ResourceId>, name: impl Into<String>) {
        let id = id.into();
        self.discard_hook(id);
        self.ledger.track_as(id, name, Category::Custom);
    }

    /// Track an opaque handle whose release runs `hook`
    pub fn track_custom_with_cleanup<F>(
        &self,
        id: impl Into<ResourceId>,
        name: impl Into<String>,
        hook: F,
    ) where
        F: FnOnce() -> Result<(), String> + Send + Sync + 'static,
    {
        let id = id.into();
        self.cleanup_hooks.insert(id, Box::new(hook));
        self.ledger.track_as(id, name, Category::Custom);
    }

    /// Forget a custom handle and run its cleanup hook, if one was registered
    ///
    /// The hook only runs when the entry being released is still a custom
    /// one. If the identity was meanwhile dropped or re-tracked under another
    /// category straight through the ledger, the hook is discarded unrun.
    pub fn release_custom(&self, id: impl Into<ResourceId>) -> ResourceResult<()> {
        let id = id.into();
        let span = span_operation("release_custom");
        let _guard = span.enter();
        span.record_display("id", id);
        span.record("category", Category::Custom.name());

        let released = self.ledger.release(id).map(|entry| entry.category);

        // Taken out of the map first so the hook never runs under a shard lock
        let Some((_, hook)) = self.cleanup_hooks.remove(&id) else {
            span.record_result(true);
            return Ok(());
        };

        if released != Some(Category::Custom) {
            debug!(
                id = %id,
                category = ?released,
                "discarded cleanup hook of a stale custom entry"
            );
            span.record_result(true);
            return Ok(());
        }

        match hook() {
            Ok(()) => {
                span.record_items_processed(1);
                span.record_result(true);
                Ok(())
            }
            Err(reason) => {
                error!(id = %id, reason = %reason, "custom cleanup hook failed");
                span.record_error(&reason);
                Err(ResourceError::CleanupFailed { id, reason })
            }
        }
    }

    /// Number of registered cleanup hooks not yet run
    ///
    /// Hooks whose identity is no longer tracked as custom are dropped first.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanup_hooks.retain(|id, _| {
            matches!(
                self.ledger.get(*id).map(|entry| entry.category),
                Some(Category::Custom)
            )
        });
        self.cleanup_hooks.len()
    }
}
