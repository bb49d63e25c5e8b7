/*!
 * File Handle Resources
 * Track open files and close them on release
 */

use super::{ResourceManager, ResourceResult};
use crate::core::types::{Category, ResourceId};
use std::os::unix::io::{AsRawFd, IntoRawFd};

impl ResourceManager {
    /// Track an open file under its descriptor
    ///
    /// The handle is not validated; anything with a raw descriptor works,
    /// including a bare `RawFd`.
    pub fn track_file_handle<F: AsRawFd + ?Sized>(&self, file: &F, name: impl Into<String>) {
        let id = ResourceId::from_fd(file.as_raw_fd());
        self.discard_hook(id);
        self.ledger.track_as(id, name, Category::FileHandle);
    }

    /// Forget a file and close its descriptor
    ///
    /// Takes ownership so the closed handle cannot be used afterwards. A
    /// failing close is returned, but the ledger entry is removed regardless.
    pub fn release_file_handle<F: IntoRawFd>(&self, file: F) -> ResourceResult<()> {
        self.close_descriptor(file.into_raw_fd(), Category::FileHandle, "release_file_handle")
    }
}
