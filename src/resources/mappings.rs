/*!
 * Shared Memory Resources
 * Track memory mappings together with their length and unmap on release
 */

use super::{ResourceError, ResourceManager, ResourceResult};
use crate::core::types::{Category, ResourceId};
use crate::monitoring::span_operation;
use std::ffi::c_void;
use std::ptr::NonNull;
use tracing::{error, warn};

impl ResourceManager {
    /// Track a mapping starting at `addr` spanning `len` bytes
    ///
    /// The length is stored with the entry and is what release unmaps.
    pub fn track_shared_memory(&self, addr: NonNull<c_void>, len: usize, name: impl Into<String>) {
        let id = ResourceId::from_ptr(addr.as_ptr());
        self.discard_hook(id);
        self.ledger.track_as(id, name, Category::SharedMemory { len });
    }

    /// Forget a mapping and unmap it, returning the number of bytes unmapped
    ///
    /// If `addr` is not tracked as shared memory the length is unknown, so
    /// nothing is unmapped and [`ResourceError::UnknownMapping`] is returned.
    /// Any entry under another category for `addr` is still released.
    ///
    /// # Safety
    ///
    /// The mapping must not be accessed after this call, through `addr` or any
    /// pointer derived from it.
    pub unsafe fn release_shared_memory(&self, addr: NonNull<c_void>) -> ResourceResult<usize> {
        let id = ResourceId::from_ptr(addr.as_ptr());
        let span = span_operation("release_shared_memory");
        let _guard = span.enter();
        span.record_display("id", id);

        self.discard_hook(id);
        let len = match self.ledger.release(id).map(|entry| entry.category) {
            Some(Category::SharedMemory { len }) => len,
            other => {
                warn!(
                    id = %id,
                    category = ?other,
                    "shared memory release without a tracked mapping length"
                );
                span.record_error("unknown mapping length");
                return Err(ResourceError::UnknownMapping(id));
            }
        };
        span.record_display("category", Category::SharedMemory { len });

        // SAFETY: the caller guarantees the mapping is no longer accessed; the
        // length is the one it was tracked with.
        match unsafe { nix::sys::mman::munmap(addr, len) } {
            Ok(()) => {
                span.record_result(true);
                Ok(len)
            }
            Err(errno) => {
                error!(id = %id, len, error = %errno, "munmap failed");
                span.record_error(errno.desc());
                Err(ResourceError::Teardown {
                    category: Category::SharedMemory { len },
                    id,
                    source: errno,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::ResourceId;
    use crate::ledger::Ledger;
    use crate::resources::{ResourceError, ResourceManager};
    use nix::errno::Errno;
    use nix::sys::mman::{mmap_anonymous, MapFlags, ProtFlags};
    use std::ffi::c_void;
    use std::num::NonZeroUsize;
    use std::ptr::NonNull;

    fn map_shared(len: usize) -> NonNull<c_void> {
        unsafe {
            mmap_anonymous(
                None,
                NonZeroUsize::new(len).unwrap(),
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
            )
        }
        .unwrap()
    }

    #[test]
    fn test_release_unmaps_tracked_length() {
        let manager = ResourceManager::new(Ledger::new());
        let len = 3 * 4096;
        let addr = map_shared(len);

        manager.track_shared_memory(addr, len, "ring");
        let entry = manager.ledger().get(ResourceId::from_ptr(addr.as_ptr())).unwrap();
        assert_eq!(entry.category.mapping_len(), Some(len));

        let unmapped = unsafe { manager.release_shared_memory(addr) }.unwrap();
        assert_eq!(unmapped, len);
        assert!(manager.ledger().is_empty());
    }

    #[test]
    fn test_untracked_mapping_is_not_unmapped() {
        let manager = ResourceManager::new(Ledger::new());
        let addr = map_shared(4096);

        let err = unsafe { manager.release_shared_memory(addr) }.unwrap_err();
        assert!(matches!(err, ResourceError::UnknownMapping(_)));

        // Still mapped: writing must not fault
        unsafe { addr.cast::<u8>().as_ptr().write(7) };
        unsafe { nix::sys::mman::munmap(addr, 4096) }.unwrap();
    }

    #[test]
    fn test_munmap_failure_still_releases_entry() {
        let manager = ResourceManager::new(Ledger::new());
        // Not page aligned, so munmap rejects it with EINVAL
        let addr = NonNull::new(0x1001 as *mut c_void).unwrap();

        manager.track_shared_memory(addr, 4096, "bogus");
        let err = unsafe { manager.release_shared_memory(addr) }.unwrap_err();

        assert_eq!(err.errno(), Some(Errno::EINVAL));
        assert!(manager.ledger().is_empty());
    }

    #[test]
    fn test_mapping_paths_drop_custom_hook() {
        let manager = ResourceManager::new(Ledger::new());
        let addr = NonNull::new(0x2001 as *mut c_void).unwrap();
        let id = ResourceId::from_ptr(addr.as_ptr());

        manager.track_custom_with_cleanup(id, "handle", || Err("ran".to_string()));
        manager.track_shared_memory(addr, 4096, "ring");
        assert!(manager.cleanup_hooks.is_empty());

        manager.track_custom_with_cleanup(id, "handle", || Err("ran".to_string()));
        let err = unsafe { manager.release_shared_memory(addr) }.unwrap_err();
        assert!(matches!(err, ResourceError::UnknownMapping(_)));
        assert!(manager.cleanup_hooks.is_empty());
        assert!(manager.ledger().is_empty());
    }
}
