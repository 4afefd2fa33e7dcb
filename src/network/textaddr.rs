//! Binary-to-text address conversion.
//!
//! Fills the gap on platforms whose C runtime lacks a usable `inet_ntop`.
//! The conversion is numeric-only: no reverse DNS, no service lookup.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Address family tag for [`text_from_address`].
///
/// Restricting the input to these two variants makes unsupported families
/// unrepresentable rather than a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// IPv4, four raw bytes.
    V4,
    /// IPv6, sixteen raw bytes.
    V6,
}

/// Converts a raw network-order address buffer into its canonical text form.
///
/// Returns `None` when `raw` is shorter than the family requires; extra
/// trailing bytes are ignored, matching the behavior of reading a fixed-size
/// address out of a larger socket-address structure.
#[must_use]
pub fn text_from_address(family: AddressFamily, raw: &[u8]) -> Option<String> {
    match family {
        AddressFamily::V4 => {
            let octets: [u8; 4] = raw.get(..4)?.try_into().ok()?;
            Some(Ipv4Addr::from(octets).to_string())
        }
        AddressFamily::V6 => {
            let octets: [u8; 16] = raw.get(..16)?.try_into().ok()?;
            Some(Ipv6Addr::from(octets).to_string())
        }
    }
}
