/*!
 * Generic Resources
 * Heap objects tracked by address; the caller frees the memory
 */

use super::ResourceManager;
use crate::core::types::{Category, ResourceId};

impl ResourceManager {
    /// Track the object behind `ptr`
    ///
    /// The pointer is only used as an identity and is never dereferenced.
    pub fn track_resource<T: ?Sized>(&self, ptr: *const T, name: impl Into<String>) {
        let id = ResourceId::from_ptr(ptr);
        self.discard_hook(id);
        self.ledger.track_as(id, name, Category::Generic);
    }

    /// Forget the object behind `ptr`, returning whether it was tracked
    ///
    /// Nothing is freed.
    pub fn release_resource<T: ?Sized>(&self, ptr: *const T) -> bool {
        let id = ResourceId::from_ptr(ptr);
        self.discard_hook(id);
        self.ledger.release(id).is_some()
    }
}
