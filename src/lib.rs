//! ifscout: local network interface enumeration.
//!
//! A library for taking a one-shot snapshot of the active local network
//! interfaces (address, netmask, broadcast address, name) so that discovery
//! code built on UDP broadcast can run without per-platform branching.

pub mod network;

pub use network::{
    InterfaceSnapshot, enumerate, enumerate_from, set_recv_buffer_size, text_from_address,
};
