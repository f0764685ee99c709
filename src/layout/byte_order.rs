/// Host-order port to the value stored in a native address structure.
#[inline]
pub fn host_to_network(port: u16) -> u16 {
    port.to_be()
}

/// Value read from a native address structure back to a host-order port.
#[inline]
pub fn network_to_host(port: u16) -> u16 {
    u16::from_be(port)
}

/// Port field bytes, exactly as they sit in memory.
#[inline]
pub fn port_to_field(port: u16) -> [u8; 2] {
    host_to_network(port).to_ne_bytes()
}

#[inline]
pub fn port_from_field(field: [u8; 2]) -> u16 {
    network_to_host(u16::from_ne_bytes(field))
}
