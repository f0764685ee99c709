//! Byte-exact native socket address structures.
//!
//! Linux and Windows start `sockaddr_in`/`sockaddr_in6` with a 16-bit
//! family field. BSD kernels (Apple included) split those two bytes into a
//! total-length byte followed by an 8-bit family. Every field after the
//! first two bytes sits at the same offset in all three layouts:
//!
//! ```text
//! sockaddr_in  (16): family | port(BE) | addr[4] | zero[8]
//! sockaddr_in6 (28): family | port(BE) | flowinfo | addr[16] | scope_id
//! ```

pub mod byte_order;

use crate::address::SocketAddress;
use crate::error::{Error, Result};
use crate::platform::Platform;

pub const V4_LEN: usize = 16;
pub const V6_LEN: usize = 28;

const PORT: std::ops::Range<usize> = 2..4;
const V4_ADDR: std::ops::Range<usize> = 4..8;
const V6_FLOWINFO: std::ops::Range<usize> = 4..8;
const V6_ADDR: std::ops::Range<usize> = 8..24;
const V6_SCOPE_ID: std::ops::Range<usize> = 24..28;

pub const AF_INET: u16 = 2;
pub const LINUX_AF_INET6: u16 = 10;
pub const WINDOWS_AF_INET6: u16 = 23;
#[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
pub const BSD_AF_INET6: u16 = 28;
#[cfg(any(target_os = "openbsd", target_os = "netbsd"))]
pub const BSD_AF_INET6: u16 = 24;
// Apple value; also used when exercising the BSD layout on other hosts.
#[cfg(not(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
pub const BSD_AF_INET6: u16 = 30;

#[cfg(target_os = "linux")]
const _: () = {
    use nix::libc;
    assert!(std::mem::size_of::<libc::sockaddr_in>() == V4_LEN);
    assert!(std::mem::size_of::<libc::sockaddr_in6>() == V6_LEN);
    assert!(libc::AF_INET as u16 == AF_INET);
    assert!(libc::AF_INET6 as u16 == LINUX_AF_INET6);
};

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd",
    target_os = "netbsd"
))]
const _: () = {
    use nix::libc;
    assert!(std::mem::size_of::<libc::sockaddr_in>() == V4_LEN);
    assert!(std::mem::size_of::<libc::sockaddr_in6>() == V6_LEN);
    assert!(libc::AF_INET as u16 == AF_INET);
    assert!(libc::AF_INET6 as u16 == BSD_AF_INET6);
};

#[cfg(windows)]
const _: () = {
    use windows_sys::Win32::Networking::WinSock;
    assert!(std::mem::size_of::<WinSock::SOCKADDR_IN>() == V4_LEN);
    assert!(std::mem::size_of::<WinSock::SOCKADDR_IN6>() == V6_LEN);
    assert!(WinSock::AF_INET == AF_INET);
    assert!(WinSock::AF_INET6 == WINDOWS_AF_INET6);
};

/// Stack scratch space large enough for either address structure, plus the
/// length value handed to the kernel.
#[repr(C, align(4))]
#[derive(Debug, Clone, Copy)]
pub struct RawSockAddr {
    bytes: [u8; V6_LEN],
    len: u32,
}

impl RawSockAddr {
    pub fn zeroed() -> Self {
        Self {
            bytes: [0; V6_LEN],
            len: 0,
        }
    }

    pub fn bytes(&self) -> &[u8; V6_LEN] {
        &self.bytes
    }
    pub fn bytes_mut(&mut self) -> &mut [u8; V6_LEN] {
        &mut self.bytes
    }

    /// Length of the structure currently held, as given to or reported by the kernel.
    pub fn len(&self) -> u32 {
        self.len
    }
    pub fn set_len(&mut self, len: u32) {
        self.len = len;
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }
}

impl Default for RawSockAddr {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    /// 16-bit family in host order.
    Wide,
    /// Length byte, then 8-bit family.
    LengthPrefixed,
}

/// One platform's flavour of the IPv4/IPv6 address structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    header: Header,
    af_inet: u16,
    af_inet6: u16,
}

impl Layout {
    pub const LINUX: Layout = Layout {
        header: Header::Wide,
        af_inet: AF_INET,
        af_inet6: LINUX_AF_INET6,
    };
    pub const WINDOWS: Layout = Layout {
        header: Header::Wide,
        af_inet: AF_INET,
        af_inet6: WINDOWS_AF_INET6,
    };
    pub const BSD: Layout = Layout {
        header: Header::LengthPrefixed,
        af_inet: AF_INET,
        af_inet6: BSD_AF_INET6,
    };

    pub fn for_platform(platform: Platform) -> Layout {
        match platform {
            Platform::Windows => Layout::WINDOWS,
            Platform::Bsd => Layout::BSD,
            Platform::Linux => Layout::LINUX,
        }
    }

    pub fn native() -> Layout {
        Layout::for_platform(Platform::current())
    }

    pub fn af_inet(&self) -> u16 {
        self.af_inet
    }
    pub fn af_inet6(&self) -> u16 {
        self.af_inet6
    }
    pub fn has_length_prefix(&self) -> bool {
        self.header == Header::LengthPrefixed
    }

    fn write_header(&self, bytes: &mut [u8; V6_LEN], family: u16, struct_len: usize) {
        match self.header {
            Header::Wide => bytes[..2].copy_from_slice(&family.to_ne_bytes()),
            Header::LengthPrefixed => {
                bytes[0] = struct_len as u8;
                bytes[1] = family as u8;
            }
        }
    }

    /// Family discriminant currently stored in `raw`.
    pub fn family(&self, raw: &RawSockAddr) -> u16 {
        let bytes = raw.bytes();
        match self.header {
            Header::Wide => u16::from_ne_bytes([bytes[0], bytes[1]]),
            Header::LengthPrefixed => bytes[1] as u16,
        }
    }

    /// Fills `raw` with the structure for `addr` and sets its length.
    pub fn encode(&self, addr: &SocketAddress, raw: &mut RawSockAddr) {
        *raw = RawSockAddr::zeroed();
        match *addr {
            SocketAddress::V4 { addr, port } => {
                let bytes = raw.bytes_mut();
                self.write_header(bytes, self.af_inet, V4_LEN);
                bytes[PORT].copy_from_slice(&byte_order::port_to_field(port));
                bytes[V4_ADDR].copy_from_slice(&addr);
                raw.set_len(V4_LEN as u32);
            }
            SocketAddress::V6 {
                addr,
                port,
                scope_id,
            } => {
                let bytes = raw.bytes_mut();
                self.write_header(bytes, self.af_inet6, V6_LEN);
                bytes[PORT].copy_from_slice(&byte_order::port_to_field(port));
                bytes[V6_FLOWINFO].copy_from_slice(&0u32.to_ne_bytes());
                bytes[V6_ADDR].copy_from_slice(&addr);
                bytes[V6_SCOPE_ID].copy_from_slice(&scope_id.to_ne_bytes());
                raw.set_len(V6_LEN as u32);
            }
        }
    }

    /// Readies `raw` to receive an address of either family.
    pub fn prepare_receive(&self, raw: &mut RawSockAddr) {
        *raw = RawSockAddr::zeroed();
        if self.has_length_prefix() {
            raw.bytes_mut()[0] = V6_LEN as u8;
        }
        raw.set_len(V6_LEN as u32);
    }

    /// Reads the address back. The stored family decides the variant, not
    /// the size of the buffer it was received into.
    pub fn decode(&self, raw: &RawSockAddr) -> Result<SocketAddress> {
        let family = self.family(raw);
        let bytes = raw.bytes();
        let port = byte_order::port_from_field([bytes[PORT.start], bytes[PORT.start + 1]]);
        if family == self.af_inet {
            let mut addr = [0u8; 4];
            addr.copy_from_slice(&bytes[V4_ADDR]);
            Ok(SocketAddress::v4(addr, port))
        } else if family == self.af_inet6 {
            let mut addr = [0u8; 16];
            addr.copy_from_slice(&bytes[V6_ADDR]);
            let mut scope_id = [0u8; 4];
            scope_id.copy_from_slice(&bytes[V6_SCOPE_ID]);
            Ok(SocketAddress::v6(addr, port, u32::from_ne_bytes(scope_id)))
        } else {
            Err(Error::AddressFamilyNotSupported(family))
        }
    }
}
