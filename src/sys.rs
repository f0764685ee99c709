//! Raw `sendto`/`recvfrom` entry points and last-error accessors.
//!
//! Linux and the BSD family share the POSIX signatures (`socklen_t` is a
//! 32-bit unsigned integer on both); they differ only in the address
//! layout they are handed. Windows takes `i32` lengths and reports errors
//! through `WSAGetLastError`.
//!
//! All functions return the byte count or a negative value on failure. The
//! caller must read [`last_error`] before making any other OS call.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::{last_error, recv_from, send_to, SocketHandle};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::{last_error, recv_from, send_to, SocketHandle};
