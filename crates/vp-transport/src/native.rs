//! Native UDP transport, grounded on `ice-core`'s `UdpSocket::bind` usage
//! generalized to a blocking/non-blocking surface via `socket2`, since the
//! orchestrator's network-send thread (spec §5) is a plain OS thread, not
//! an async task.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;

use crate::error::{Result, TransportError};

/// A bound UDP datagram socket. Blocking by default; `set_blocking(false)`
/// switches every subsequent call to non-blocking semantics.
pub struct UdpTransport {
    socket: UdpSocket,
    connected: bool,
}

impl UdpTransport {
    /// Bind to a local address. Port 0 lets the OS choose an ephemeral
    /// port, as `ice-core`'s host-candidate gathering does.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        debug!(%addr, "UDP transport bound");
        Ok(Self { socket: socket.into(), connected: false })
    }

    /// Associate the socket with a single remote peer so `send()` can be
    /// used instead of `sendto()`.
    pub fn connect(&mut self, addr: SocketAddr) -> Result<()> {
        self.socket.connect(addr)?;
        self.connected = true;
        Ok(())
    }

    pub fn set_blocking(&mut self, blocking: bool) -> Result<()> {
        self.socket.set_nonblocking(!blocking)?;
        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn sendto(&self, buf: &[u8], addr: SocketAddr) -> Result<usize> {
        Ok(self.socket.send_to(buf, addr)?)
    }

    /// Send to the peer bound via `connect()`.
    pub fn send(&self, buf: &[u8]) -> Result<usize> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        Ok(self.socket.send(buf)?)
    }

    pub fn recvfrom(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        Ok(self.socket.recv_from(buf)?)
    }

    /// Block up to `timeout` for a datagram to become available, without
    /// consuming it. Returns `true` if one is ready.
    pub fn poll(&self, timeout: Duration) -> Result<bool> {
        self.socket.set_read_timeout(Some(timeout))?;
        let mut probe = [0u8; 1];
        match self.socket.peek_from(&mut probe) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Consume and close the transport. Dropping it has the same effect;
    /// this exists so callers can match the spec's explicit `close()` op.
    pub fn close(self) {
        drop(self);
    }
}
