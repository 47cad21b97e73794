//! # vp-transport: datagram transport abstraction (C11)
//!
//! `bind`/`connect`/`sendto`/`recvfrom`/`poll`/`close` over a UDP datagram
//! socket, blocking or non-blocking. On `wasm32` targets the same surface
//! compiles to a stub that always fails network operations and delegates
//! I/O to the host environment instead.

pub mod error;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use native::UdpTransport;
#[cfg(target_arch = "wasm32")]
pub use wasm::UdpTransport;

pub use error::{Result, TransportError};
