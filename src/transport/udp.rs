use std::net::UdpSocket;

use crate::address::SocketAddress;
use crate::error::Result;
use crate::sys::SocketHandle;
use crate::transport::MsgFlags;

#[cfg(unix)]
fn raw_handle(socket: &UdpSocket) -> SocketHandle {
    use std::os::fd::AsRawFd;
    socket.as_raw_fd()
}

#[cfg(windows)]
fn raw_handle(socket: &UdpSocket) -> SocketHandle {
    use std::os::windows::io::AsRawSocket;
    socket.as_raw_socket()
}

/// Allocation-free send/receive for standard library sockets.
pub trait UdpSocketExt {
    fn send_to_shim(&self, buf: &[u8], dest: impl Into<SocketAddress>) -> Result<usize>;
    fn recv_from_shim(&self, buf: &mut [u8]) -> Result<(usize, SocketAddress)>;
}

impl UdpSocketExt for UdpSocket {
    fn send_to_shim(&self, buf: &[u8], dest: impl Into<SocketAddress>) -> Result<usize> {
        super::send_to(raw_handle(self), buf, MsgFlags::NONE, dest)
    }

    fn recv_from_shim(&self, buf: &mut [u8]) -> Result<(usize, SocketAddress)> {
        super::receive_from(raw_handle(self), buf, MsgFlags::NONE)
    }
}
