//! UDP datagram send/receive without per-call allocations.
//!
//! [`send_to`] and [`receive_from`] fill a native socket address structure
//! on the stack (Linux, Windows or BSD flavour, picked once per process) and
//! hand it straight to the kernel.

pub mod address;
pub mod error;
pub mod layout;
pub mod platform;
pub mod sys;
pub mod transport;

pub use address::{IpVersion, SocketAddress};
pub use error::{Error, Result};
pub use platform::Platform;
pub use sys::SocketHandle;
pub use transport::udp::UdpSocketExt;
pub use transport::{receive_from, send_to, MsgFlags, NativeStrategy, Strategy, Transport};
