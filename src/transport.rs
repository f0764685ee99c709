pub mod udp;
#[cfg(test)]
mod transport_test;

use crate::address::SocketAddress;
use crate::error::{Error, Result};
use crate::layout::{Layout, RawSockAddr};
use crate::sys::{self, SocketHandle};

/// Flags passed through to `sendto`/`recvfrom`. Only [`MsgFlags::NONE`] is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MsgFlags(i32);

impl MsgFlags {
    pub const NONE: MsgFlags = MsgFlags(0);

    pub fn bits(self) -> i32 {
        self.0
    }

    fn check(self) -> Result<()> {
        if self != MsgFlags::NONE {
            return Err(Error::UnsupportedFlags(self.0));
        }
        Ok(())
    }
}

impl From<i32> for MsgFlags {
    fn from(value: i32) -> Self {
        MsgFlags(value)
    }
}

/// Everything that differs between platform families at the syscall boundary.
pub trait Strategy {
    fn layout(&self) -> Layout;

    /// Returns the byte count, or a negative value on failure.
    fn send(&self, socket: SocketHandle, buf: &[u8], flags: i32, addr: &RawSockAddr) -> isize;

    /// Returns the byte count, or a negative value on failure. Updates the
    /// length stored in `addr`.
    fn receive(
        &self,
        socket: SocketHandle,
        buf: &mut [u8],
        flags: i32,
        addr: &mut RawSockAddr,
    ) -> isize;

    /// Error code of the last failed `send`/`receive` on this thread.
    fn last_error(&self) -> i32;

    fn encode(&self, addr: &SocketAddress, raw: &mut RawSockAddr) {
        self.layout().encode(addr, raw)
    }

    fn decode(&self, raw: &RawSockAddr) -> Result<SocketAddress> {
        self.layout().decode(raw)
    }
}

/// Strategy for the running process: layout picked by the platform
/// classifier, syscalls from the compiled-in bindings.
#[derive(Debug, Clone, Copy)]
pub struct NativeStrategy {
    layout: Layout,
}

impl NativeStrategy {
    pub fn new() -> Self {
        Self {
            layout: Layout::native(),
        }
    }
}

impl Default for NativeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for NativeStrategy {
    fn layout(&self) -> Layout {
        self.layout
    }
    fn send(&self, socket: SocketHandle, buf: &[u8], flags: i32, addr: &RawSockAddr) -> isize {
        sys::send_to(socket, buf, flags, addr)
    }
    fn receive(
        &self,
        socket: SocketHandle,
        buf: &mut [u8],
        flags: i32,
        addr: &mut RawSockAddr,
    ) -> isize {
        sys::recv_from(socket, buf, flags, addr)
    }
    fn last_error(&self) -> i32 {
        sys::last_error()
    }
}

/// Sends and receives datagrams on caller-owned sockets.
///
/// Stateless: each call is one syscall and blocks according to the socket's
/// own mode. Errors are returned, never logged here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transport<S = NativeStrategy> {
    strategy: S,
}

impl Transport<NativeStrategy> {
    pub fn native() -> Self {
        Self::with_strategy(NativeStrategy::new())
    }
}

impl<S: Strategy> Transport<S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn send_to(
        &self,
        socket: SocketHandle,
        buf: &[u8],
        flags: MsgFlags,
        dest: impl Into<SocketAddress>,
    ) -> Result<usize> {
        flags.check()?;
        let dest = dest.into();
        let mut raw = RawSockAddr::zeroed();
        self.strategy.encode(&dest, &mut raw);

        let sent = self.strategy.send(socket, buf, flags.bits(), &raw);
        if sent < 0 {
            return Err(Error::from_os_code(self.strategy.last_error()));
        }
        log::trace!("Sent {sent} bytes to {dest}");
        Ok(sent as usize)
    }

    pub fn receive_from(
        &self,
        socket: SocketHandle,
        buf: &mut [u8],
        flags: MsgFlags,
    ) -> Result<(usize, SocketAddress)> {
        flags.check()?;
        let mut raw = RawSockAddr::zeroed();
        self.strategy.layout().prepare_receive(&mut raw);

        let received = self.strategy.receive(socket, buf, flags.bits(), &mut raw);
        if received < 0 {
            return Err(Error::from_os_code(self.strategy.last_error()));
        }
        let source = self.strategy.decode(&raw)?;
        log::trace!("Received {received} bytes from {source}");
        Ok((received as usize, source))
    }
}

/// [`Transport::send_to`] with the native strategy.
pub fn send_to(
    socket: SocketHandle,
    buf: &[u8],
    flags: MsgFlags,
    dest: impl Into<SocketAddress>,
) -> Result<usize> {
    Transport::native().send_to(socket, buf, flags, dest)
}

/// [`Transport::receive_from`] with the native strategy.
pub fn receive_from(
    socket: SocketHandle,
    buf: &mut [u8],
    flags: MsgFlags,
) -> Result<(usize, SocketAddress)> {
    Transport::native().receive_from(socket, buf, flags)
}
