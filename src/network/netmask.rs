//! Netmask and broadcast derivation.
//!
//! Two strategies exist on Windows: modern systems expose an on-link
//! prefix length per unicast address ([`mask_from_prefix`]); systems
//! without that metadata fall back to a one-shot snapshot of the flat IP
//! address table ([`LegacyAddrTable`]). The broadcast formula is shared
//! by every backend.

use std::net::Ipv4Addr;

/// Builds an IPv4 netmask from a CIDR prefix length.
///
/// The prefix is clamped to 32; `0` yields `0.0.0.0` rather than taking
/// an undefined full-width shift.
#[must_use]
pub fn mask_from_prefix(prefix: u8) -> Ipv4Addr {
    let prefix = u32::from(prefix.min(32));
    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    };
    Ipv4Addr::from(bits)
}

/// Computes the broadcast address as `addr | !mask` on the raw 32-bit value.
#[must_use]
pub fn broadcast_addr(addr: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    let addr = u32::from_be_bytes(addr.octets());
    let mask = u32::from_be_bytes(mask.octets());
    Ipv4Addr::from(addr | !mask)
}

/// One row of the legacy IP address table: an assigned address and its mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyAddrRow {
    /// Assigned interface address.
    pub addr: Ipv4Addr,
    /// Netmask associated with `addr`.
    pub mask: Ipv4Addr,
}

/// A transient snapshot of the legacy (address, mask) lookup table.
///
/// Taken once per enumeration call, passed by value into the resolver,
/// and never cached across calls: interface reconfiguration would make a
/// longer-lived copy stale.
#[derive(Debug, Clone, Default)]
pub struct LegacyAddrTable {
    rows: Vec<LegacyAddrRow>,
}

impl LegacyAddrTable {
    /// Creates a table from pre-collected rows.
    #[must_use]
    pub fn new(rows: Vec<LegacyAddrRow>) -> Self {
        Self { rows }
    }

    /// Returns the mask of the first row whose address matches.
    #[must_use]
    pub fn lookup(&self, addr: Ipv4Addr) -> Option<Ipv4Addr> {
        self.rows
            .iter()
            .find(|row| row.addr == addr)
            .map(|row| row.mask)
    }

    /// Resolves the netmask for `addr`, substituting the most restrictive
    /// mask on a miss.
    ///
    /// The miss default (`255.255.255.255`) keeps broadcast derivation
    /// confined to the single host rather than guessing a subnet.
    #[must_use]
    pub fn resolve(&self, addr: Ipv4Addr) -> Ipv4Addr {
        self.lookup(addr).unwrap_or_else(|| {
            tracing::warn!("no address table row for {addr}, using 255.255.255.255");
            Ipv4Addr::BROADCAST
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    mod prefix {
        use super::*;

        #[test]
        fn prefix_24_is_class_c_mask() {
            assert_eq!(mask_from_prefix(24), v4("255.255.255.0"));
        }

        #[test]
        fn prefix_32_is_host_mask() {
            assert_eq!(mask_from_prefix(32), v4("255.255.255.255"));
        }

        #[test]
        fn prefix_0_is_empty_mask() {
            assert_eq!(mask_from_prefix(0), v4("0.0.0.0"));
        }

        #[test]
        fn prefix_above_32_is_clamped() {
            assert_eq!(mask_from_prefix(200), v4("255.255.255.255"));
        }

        #[test]
        fn uneven_prefix() {
            assert_eq!(mask_from_prefix(20), v4("255.255.240.0"));
        }
    }

    mod broadcast {
        use super::*;

        #[test]
        fn class_c_broadcast() {
            assert_eq!(
                broadcast_addr(v4("192.168.1.5"), v4("255.255.255.0")),
                v4("192.168.1.255")
            );
        }

        #[test]
        fn host_mask_broadcast_is_addr() {
            assert_eq!(
                broadcast_addr(v4("10.1.2.3"), v4("255.255.255.255")),
                v4("10.1.2.3")
            );
        }

        #[test]
        fn empty_mask_broadcast_is_all_ones() {
            assert_eq!(
                broadcast_addr(v4("10.1.2.3"), v4("0.0.0.0")),
                v4("255.255.255.255")
            );
        }
    }

    mod legacy_table {
        use super::*;

        fn table() -> LegacyAddrTable {
            LegacyAddrTable::new(vec![
                LegacyAddrRow {
                    addr: v4("192.168.1.5"),
                    mask: v4("255.255.255.0"),
                },
                LegacyAddrRow {
                    addr: v4("10.0.0.2"),
                    mask: v4("255.0.0.0"),
                },
            ])
        }

        #[test]
        fn lookup_finds_matching_row() {
            assert_eq!(table().lookup(v4("10.0.0.2")), Some(v4("255.0.0.0")));
        }

        #[test]
        fn lookup_miss_is_none() {
            assert_eq!(table().lookup(v4("172.16.0.1")), None);
        }

        #[test]
        fn resolve_uses_matching_row() {
            assert_eq!(table().resolve(v4("192.168.1.5")), v4("255.255.255.0"));
        }

        #[test]
        fn resolve_miss_defaults_to_host_mask() {
            assert_eq!(table().resolve(v4("172.16.0.1")), v4("255.255.255.255"));
        }

        #[test]
        fn empty_table_always_defaults() {
            let table = LegacyAddrTable::default();
            assert_eq!(table.resolve(v4("192.168.1.5")), Ipv4Addr::BROADCAST);
        }
    }
}
