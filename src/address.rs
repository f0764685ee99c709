use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

/// IP endpoint passed to and returned from the transport.
///
/// Fixed size and `Copy`: building one never allocates. Ports are kept in
/// host order, address bytes in network order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketAddress {
    V4 {
        addr: [u8; 4],
        port: u16,
    },
    V6 {
        addr: [u8; 16],
        port: u16,
        scope_id: u32,
    },
}

impl SocketAddress {
    pub fn v4(addr: [u8; 4], port: u16) -> Self {
        SocketAddress::V4 { addr, port }
    }

    pub fn v6(addr: [u8; 16], port: u16, scope_id: u32) -> Self {
        SocketAddress::V6 {
            addr,
            port,
            scope_id,
        }
    }

    pub fn ip_version(&self) -> IpVersion {
        match self {
            SocketAddress::V4 { .. } => IpVersion::V4,
            SocketAddress::V6 { .. } => IpVersion::V6,
        }
    }

    pub fn port(&self) -> u16 {
        match *self {
            SocketAddress::V4 { port, .. } | SocketAddress::V6 { port, .. } => port,
        }
    }

    /// Zero for IPv4.
    pub fn scope_id(&self) -> u32 {
        match *self {
            SocketAddress::V4 { .. } => 0,
            SocketAddress::V6 { scope_id, .. } => scope_id,
        }
    }
}

impl From<SocketAddrV4> for SocketAddress {
    fn from(value: SocketAddrV4) -> Self {
        SocketAddress::v4(value.ip().octets(), value.port())
    }
}

// Flow info has no place in SocketAddress and is dropped here.
impl From<SocketAddrV6> for SocketAddress {
    fn from(value: SocketAddrV6) -> Self {
        SocketAddress::v6(value.ip().octets(), value.port(), value.scope_id())
    }
}

impl From<SocketAddr> for SocketAddress {
    fn from(value: SocketAddr) -> Self {
        match value {
            SocketAddr::V4(a) => a.into(),
            SocketAddr::V6(a) => a.into(),
        }
    }
}

impl From<SocketAddress> for SocketAddr {
    fn from(value: SocketAddress) -> Self {
        match value {
            SocketAddress::V4 { addr, port } => {
                SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::from(addr), port))
            }
            SocketAddress::V6 {
                addr,
                port,
                scope_id,
            } => SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::from(addr), port, 0, scope_id)),
        }
    }
}

impl std::fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SocketAddr::from(*self).fmt(f)
    }
}
