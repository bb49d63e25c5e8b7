/*!
 * Socket Resources
 * Track network sockets and close their descriptors on release
 */

use super::{ResourceManager, ResourceResult};
use crate::core::types::{Category, ResourceId};
use std::os::unix::io::{AsRawFd, IntoRawFd};

impl ResourceManager {
    /// Track a socket under its descriptor
    pub fn track_socket<S: AsRawFd + ?Sized>(&self, socket: &S, name: impl Into<String>) {
        let id = ResourceId::from_fd(socket.as_raw_fd());
        self.discard_hook(id);
        self.ledger.track_as(id, name, Category::Socket);
    }

    /// Forget a socket and close its descriptor
    ///
    /// Close may block while the kernel flushes buffers; there is no timeout.
    pub fn release_socket<S: IntoRawFd>(&self, socket: S) -> ResourceResult<()> {
        self.close_descriptor(socket.into_raw_fd(), Category::Socket, "release_socket")
    }
}
