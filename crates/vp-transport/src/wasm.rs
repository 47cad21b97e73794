//! WASM-target stub (spec §4.11): network I/O is delegated to the host
//! environment via signalling the embedder does not model here. Every
//! operation fails with `Unsupported`; the pipeline's local loop (capture
//! → process → encode → callback) tolerates send/recv always failing and
//! keeps running, per spec.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, TransportError};

pub struct UdpTransport;

impl UdpTransport {
    pub fn bind(_addr: SocketAddr) -> Result<Self> {
        Ok(Self)
    }

    pub fn connect(&mut self, _addr: SocketAddr) -> Result<()> {
        Err(TransportError::Unsupported)
    }

    pub fn set_blocking(&mut self, _blocking: bool) -> Result<()> {
        Err(TransportError::Unsupported)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Err(TransportError::Unsupported)
    }

    pub fn sendto(&self, _buf: &[u8], _addr: SocketAddr) -> Result<usize> {
        Err(TransportError::Unsupported)
    }

    pub fn send(&self, _buf: &[u8]) -> Result<usize> {
        Err(TransportError::Unsupported)
    }

    pub fn recvfrom(&self, _buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        Err(TransportError::Unsupported)
    }

    pub fn poll(&self, _timeout: Duration) -> Result<bool> {
        Ok(false)
    }

    pub fn close(self) {
        drop(self);
    }
}
