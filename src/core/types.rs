/*!
 * Core Types
 * Identity and category vocabulary shared by the ledger, manager and reporter
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::os::unix::io::RawFd;

/// Opaque identity of a tracked resource
///
/// Addresses, descriptors and custom handles all live in this one space.
/// Uniqueness is only meaningful while an identity is tracked: the OS is free
/// to hand the same address or descriptor out again after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Identity of the object a pointer refers to (metadata of fat pointers is dropped)
    #[inline]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr as *const () as usize as u64)
    }

    /// Identity of a raw descriptor, stored verbatim (negative values included)
    #[inline]
    pub const fn from_fd(fd: RawFd) -> Self {
        Self(fd as i64 as u64)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for ResourceId {
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}

impl From<usize> for ResourceId {
    fn from(raw: usize) -> Self {
        Self::new(raw as u64)
    }
}

impl From<u32> for ResourceId {
    fn from(raw: u32) -> Self {
        Self::new(u64::from(raw))
    }
}

impl From<RawFd> for ResourceId {
    fn from(fd: RawFd) -> Self {
        Self::from_fd(fd)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Resource category attached to every ledger entry
///
/// Category is metadata only. Two categories never get separate identity
/// namespaces, so an id tracked as a socket is visible to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Category {
    /// Heap object; the caller frees the memory
    #[default]
    Generic,
    FileHandle,
    Socket,
    /// Memory mapping together with the length it was mapped with
    SharedMemory { len: usize },
    /// Opaque handle, optionally paired with a caller-supplied cleanup hook
    Custom,
}

impl Category {
    /// Stable short name for logs and reports
    pub const fn name(&self) -> &'static str {
        match self {
            Category::Generic => "generic",
            Category::FileHandle => "file_handle",
            Category::Socket => "socket",
            Category::SharedMemory { .. } => "shared_memory",
            Category::Custom => "custom",
        }
    }

    /// Mapping length, only known for shared memory
    #[inline]
    pub const fn mapping_len(&self) -> Option<usize> {
        match self {
            Category::SharedMemory { len } => Some(*len),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::SharedMemory { len } => write!(f, "shared_memory[{} bytes]", len),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fd_identity_is_verbatim() {
        assert_eq!(ResourceId::from_fd(7).as_u64(), 7);
        assert_eq!(ResourceId::from_fd(-1).as_u64(), u64::MAX);
        assert_eq!(ResourceId::from(7i32), ResourceId::new(7));
    }

    #[test]
    fn test_pointer_identity() {
        let value = Box::new(5i32);
        let ptr: *const i32 = &*value;
        assert_eq!(ResourceId::from_ptr(ptr).as_u64(), ptr as usize as u64);

        let slice: &[u8] = &[1, 2, 3];
        let fat: *const [u8] = slice;
        assert_eq!(ResourceId::from_ptr(fat).as_u64(), slice.as_ptr() as usize as u64);
    }

    #[test]
    fn test_null_identity_allowed() {
        let null: *const u8 = std::ptr::null();
        assert_eq!(ResourceId::from_ptr(null), ResourceId::new(0));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Socket.to_string(), "socket");
        assert_eq!(
            Category::SharedMemory { len: 4096 }.to_string(),
            "shared_memory[4096 bytes]"
        );
        assert_eq!(Category::SharedMemory { len: 1 }.mapping_len(), Some(1));
        assert_eq!(Category::Custom.mapping_len(), None);
    }

    #[test]
    fn test_category_serde_shape() {
        let json = serde_json::to_string(&Category::SharedMemory { len: 64 }).unwrap();
        assert_eq!(json, r#"{"kind":"shared_memory","len":64}"#);
        let back: Category = serde_json::from_str(r#"{"kind":"file_handle"}"#).unwrap();
        assert_eq!(back, Category::FileHandle);
    }
}
