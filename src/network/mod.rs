//! Network layer for enumerating and representing local interfaces.
//!
//! This module provides types and traits for:
//! - Representing one discovered interface ([`InterfaceSnapshot`])
//! - Enumerating interfaces through a trait seam ([`InterfaceSource`])
//! - Netmask and broadcast derivation ([`netmask`])
//! - Binary-to-text address conversion ([`text_from_address`])
//! - Socket receive-buffer tuning ([`set_recv_buffer_size`])
//! - Platform-specific backends ([`platform`])

#[cfg(any(windows, test))]
mod buffer;
mod collect;
pub mod netmask;
pub mod platform;
mod snapshot;
mod sockopt;
mod source;
mod textaddr;

pub use snapshot::InterfaceSnapshot;
pub use sockopt::{set_recv_buffer_size, set_recv_buffer_size_raw};
pub use source::{EnumerateError, InterfaceSource, enumerate, enumerate_from};
pub use textaddr::{AddressFamily, text_from_address};
