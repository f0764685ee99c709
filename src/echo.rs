use std::net::{SocketAddr, UdpSocket};

use anyhow::Context;
use udp_shim::UdpSocketExt;

pub const MAX_DATAGRAM_SIZE: usize = u16::MAX as usize;

pub fn datagram_buffer() -> Box<[u8; MAX_DATAGRAM_SIZE]> {
    Box::new([0u8; MAX_DATAGRAM_SIZE])
}

pub struct EchoServer {
    socket: UdpSocket,
    local_address: SocketAddr,
}

impl EchoServer {
    pub fn bind(local_address: SocketAddr) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(local_address).with_context(|| {
            format!("Failed to bind listening socket to address {local_address}")
        })?;
        let local_address = socket
            .local_addr()
            .context("Failed to get local_addr from listener")?;
        return Ok(Self {
            socket,
            local_address,
        });
    }

    pub fn get_local_address(&self) -> &SocketAddr {
        &self.local_address
    }

    /// Receives one datagram and sends it back to where it came from.
    pub fn echo_once(&self, read_buf: &mut [u8]) -> anyhow::Result<usize> {
        let (recv_len, peer_addr) = self
            .socket
            .recv_from_shim(read_buf)
            .context("recv_from_shim failed")?;
        log::debug!("Received {recv_len} bytes from {peer_addr}");

        match self.socket.send_to_shim(&read_buf[..recv_len], peer_addr) {
            Ok(send_len) => {
                if send_len != recv_len {
                    log::error!("Cannot echo entire datagram to {peer_addr}: {send_len} != {recv_len}");
                }
            }
            Err(e) => {
                log::error!("Cannot echo {recv_len} bytes datagram to {peer_addr}: {e}");
            }
        }
        return Ok(recv_len);
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let mut read_buf = datagram_buffer();
        loop {
            self.echo_once(read_buf.as_mut())?;
        }
    }
}
