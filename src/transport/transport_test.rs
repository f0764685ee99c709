use std::cell::Cell;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use super::udp::UdpSocketExt;
use super::*;
use crate::layout::{V4_LEN, V6_LEN};

/// Kernel double: counts calls and plays back a canned result.
struct StubKernel {
    layout: Layout,
    sends: Cell<usize>,
    receives: Cell<usize>,
    sent_addr: Cell<Option<RawSockAddr>>,
    peer: RawSockAddr,
    payload: &'static [u8],
    fail_with: Option<i32>,
}

impl StubKernel {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            sends: Cell::new(0),
            receives: Cell::new(0),
            sent_addr: Cell::new(None),
            peer: RawSockAddr::zeroed(),
            payload: b"",
            fail_with: None,
        }
    }

    fn with_peer(mut self, peer: RawSockAddr, payload: &'static [u8]) -> Self {
        self.peer = peer;
        self.payload = payload;
        self
    }

    fn failing(mut self, code: i32) -> Self {
        self.fail_with = Some(code);
        self
    }

    fn syscalls(&self) -> usize {
        self.sends.get() + self.receives.get()
    }
}

impl Strategy for StubKernel {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn send(&self, _socket: SocketHandle, buf: &[u8], _flags: i32, addr: &RawSockAddr) -> isize {
        self.sends.set(self.sends.get() + 1);
        self.sent_addr.set(Some(*addr));
        match self.fail_with {
            Some(_) => -1,
            None => buf.len() as isize,
        }
    }

    fn receive(
        &self,
        _socket: SocketHandle,
        buf: &mut [u8],
        _flags: i32,
        addr: &mut RawSockAddr,
    ) -> isize {
        self.receives.set(self.receives.get() + 1);
        assert_eq!(addr.len() as usize, V6_LEN);
        if self.fail_with.is_some() {
            return -1;
        }
        let n = self.peer.len() as usize;
        addr.bytes_mut()[..n].copy_from_slice(&self.peer.bytes()[..n]);
        addr.set_len(self.peer.len());
        buf[..self.payload.len()].copy_from_slice(self.payload);
        self.payload.len() as isize
    }

    fn last_error(&self) -> i32 {
        self.fail_with.unwrap_or(0)
    }
}

fn encoded(layout: Layout, addr: SocketAddress) -> RawSockAddr {
    let mut raw = RawSockAddr::zeroed();
    layout.encode(&addr, &mut raw);
    raw
}

const SOCKET: SocketHandle = 3;

#[test]
fn flags_rejected_before_send() {
    let transport = Transport::with_strategy(StubKernel::new(Layout::LINUX));
    let err = transport
        .send_to(SOCKET, b"x", MsgFlags::from(0x40), SocketAddress::v4([127, 0, 0, 1], 1))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFlags(0x40)));
    assert_eq!(transport.strategy().syscalls(), 0);
}

#[test]
fn flags_rejected_before_receive() {
    let transport = Transport::with_strategy(StubKernel::new(Layout::BSD));
    let mut buf = [0u8; 16];
    let err = transport
        .receive_from(SOCKET, &mut buf, MsgFlags::from(2))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFlags(2)));
    assert_eq!(transport.strategy().syscalls(), 0);
}

#[test]
fn send_populates_layout() {
    for layout in [Layout::LINUX, Layout::WINDOWS, Layout::BSD] {
        let transport = Transport::with_strategy(StubKernel::new(layout));
        let dest: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        let sent = transport
            .send_to(SOCKET, b"hello world", MsgFlags::NONE, dest)
            .unwrap();
        assert_eq!(sent, 11);
        assert_eq!(transport.strategy().sends.get(), 1);

        let raw = transport.strategy().sent_addr.get().unwrap();
        assert_eq!(raw.len() as usize, V4_LEN);
        assert_eq!(layout.family(&raw), layout.af_inet());
        assert_eq!(&raw.bytes()[2..4], &12345u16.to_be_bytes());
        assert_eq!(&raw.bytes()[4..8], &[127, 0, 0, 1]);
    }
}

#[test]
fn send_failure_carries_code() {
    let transport = Transport::with_strategy(StubKernel::new(Layout::WINDOWS).failing(10054));
    let err = transport
        .send_to(SOCKET, b"x", MsgFlags::NONE, SocketAddress::v6([0; 16], 7, 0))
        .unwrap_err();
    assert_eq!(err.raw_os_error(), Some(10054));
    assert_eq!(transport.strategy().sends.get(), 1);
}

#[test]
fn receive_v4_peer_into_v6_scratch() {
    for layout in [Layout::LINUX, Layout::WINDOWS, Layout::BSD] {
        let peer = encoded(layout, SocketAddress::v4([10, 0, 0, 9], 8080));
        let transport = Transport::with_strategy(StubKernel::new(layout).with_peer(peer, b"ping"));
        let mut buf = [0u8; 1024];
        let (n, source) = transport
            .receive_from(SOCKET, &mut buf, MsgFlags::NONE)
            .unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"ping");
        assert_eq!(source, SocketAddress::v4([10, 0, 0, 9], 8080), "{layout:?}");
        assert_eq!(transport.strategy().receives.get(), 1);
    }
}

#[test]
fn receive_v6_peer() {
    let mut ip = [0u8; 16];
    ip[0] = 0xfe;
    ip[1] = 0x80;
    ip[15] = 5;
    let peer = encoded(Layout::BSD, SocketAddress::v6(ip, 443, 9));
    let transport = Transport::with_strategy(StubKernel::new(Layout::BSD).with_peer(peer, b""));
    let mut buf = [0u8; 8];
    let (n, source) = transport
        .receive_from(SOCKET, &mut buf, MsgFlags::NONE)
        .unwrap();
    assert_eq!(n, 0);
    assert_eq!(source, SocketAddress::v6(ip, 443, 9));
}

#[test]
fn receive_unknown_family() {
    let mut peer = RawSockAddr::zeroed();
    peer.bytes_mut()[..2].copy_from_slice(&1u16.to_ne_bytes());
    peer.set_len(V4_LEN as u32);
    let transport = Transport::with_strategy(StubKernel::new(Layout::LINUX).with_peer(peer, b"abc"));
    let mut buf = [0u8; 8];
    let err = transport
        .receive_from(SOCKET, &mut buf, MsgFlags::NONE)
        .unwrap_err();
    assert!(matches!(err, Error::AddressFamilyNotSupported(1)));
}

#[test]
fn receive_failure_carries_code() {
    let transport = Transport::with_strategy(StubKernel::new(Layout::LINUX).failing(11));
    let mut buf = [0u8; 8];
    let err = transport
        .receive_from(SOCKET, &mut buf, MsgFlags::NONE)
        .unwrap_err();
    assert_eq!(err.raw_os_error(), Some(11));
}

fn loopback_pair(addr: &str) -> Option<(UdpSocket, UdpSocket)> {
    let sender = UdpSocket::bind(addr).ok()?;
    let receiver = UdpSocket::bind(addr).ok()?;
    receiver
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    Some((sender, receiver))
}

#[test]
fn loopback_ipv4() {
    let (sender, receiver) = loopback_pair("127.0.0.1:0").unwrap();
    let dest = receiver.local_addr().unwrap();

    let sent = sender.send_to_shim(b"hello world", dest).unwrap();
    assert_eq!(sent, 11);

    let mut buf = [0u8; 1024];
    let (n, source) = receiver.recv_from_shim(&mut buf).unwrap();
    assert_eq!(n, 11);
    assert_eq!(&buf[..n], b"hello world");
    assert_eq!(SocketAddr::from(source), sender.local_addr().unwrap());
}

#[test]
fn loopback_ipv6() {
    // Hosts without IPv6 cannot bind ::1.
    let Some((sender, receiver)) = loopback_pair("[::1]:0") else {
        return;
    };
    let dest = receiver.local_addr().unwrap();

    sender.send_to_shim(b"hello world", dest).unwrap();
    let mut buf = [0u8; 1024];
    let (n, source) = receiver.recv_from_shim(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello world");
    assert_eq!(source.ip_version(), crate::address::IpVersion::V6);
    assert_eq!(source.scope_id(), 0);
    assert_eq!(SocketAddr::from(source), sender.local_addr().unwrap());
}

#[test]
fn interoperates_with_std() {
    let (sender, receiver) = loopback_pair("127.0.0.1:0").unwrap();
    sender
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    sender
        .send_to(b"from std", receiver.local_addr().unwrap())
        .unwrap();
    let mut buf = [0u8; 64];
    let (n, source) = receiver.recv_from_shim(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"from std");

    receiver.send_to_shim(b"from shim", source).unwrap();
    let (n, from) = sender.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"from shim");
    assert_eq!(from, receiver.local_addr().unwrap());
}

#[test]
fn receive_timeout_is_socket_error() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_millis(50)))
        .unwrap();
    let mut buf = [0u8; 16];
    let err = receiver.recv_from_shim(&mut buf).unwrap_err();
    assert!(matches!(err, Error::Socket(_)));
    assert_ne!(err.raw_os_error(), Some(0));
    assert!(err.raw_os_error().is_some());
}

#[cfg(unix)]
const INVALID_SOCKET: SocketHandle = -1;
#[cfg(windows)]
const INVALID_SOCKET: SocketHandle = SocketHandle::MAX;

#[test]
fn send_on_invalid_socket() {
    let err = super::send_to(
        INVALID_SOCKET,
        b"lost",
        MsgFlags::NONE,
        SocketAddress::v4([127, 0, 0, 1], 9000),
    )
    .unwrap_err();
    let code = err.raw_os_error().unwrap();
    assert_ne!(code, 0);
    #[cfg(unix)]
    assert_eq!(code, nix::libc::EBADF);
}
