//! Core value type for one discovered interface.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use super::netmask::broadcast_addr;

/// A snapshot of a single local network interface at enumeration time.
///
/// Only IPv4 interfaces are produced today, but `addr` keeps the full
/// address-family tag so the type does not need to change when IPv6
/// support lands.
///
/// # Equality
///
/// Two snapshots are equal if all four fields are equal by value. Two
/// consecutive enumerations with no network reconfiguration in between
/// yield element-wise equal lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotParts")]
pub struct InterfaceSnapshot {
    addr: IpAddr,
    netmask: Option<IpAddr>,
    broadcast: Option<Ipv4Addr>,
    name: String,
}

/// Wire form of [`InterfaceSnapshot`].
///
/// Deserialization funnels through [`InterfaceSnapshot::new`] so the
/// broadcast field is re-derived rather than trusted; a serialized
/// `broadcast` value (matching or not) is ignored as an unknown field.
#[derive(Deserialize)]
struct SnapshotParts {
    addr: IpAddr,
    netmask: Option<IpAddr>,
    name: String,
}

impl From<SnapshotParts> for InterfaceSnapshot {
    fn from(parts: SnapshotParts) -> Self {
        Self::new(parts.addr, parts.netmask, parts.name)
    }
}

impl InterfaceSnapshot {
    /// Creates a snapshot from an address, an optional netmask, and a name.
    ///
    /// The broadcast address is derived as `addr | !netmask` whenever both
    /// `addr` and `netmask` are IPv4, and absent otherwise. Deriving it
    /// here, rather than trusting whatever a backend copied out of the OS,
    /// keeps the broadcast invariant unconditional.
    #[must_use]
    pub fn new(addr: IpAddr, netmask: Option<IpAddr>, name: impl Into<String>) -> Self {
        let broadcast = match (addr, netmask) {
            (IpAddr::V4(a), Some(IpAddr::V4(m))) => Some(broadcast_addr(a, m)),
            _ => None,
        };
        Self {
            addr,
            netmask,
            broadcast,
            name: name.into(),
        }
    }

    /// Convenience constructor for an IPv4 interface with a known netmask.
    #[must_use]
    pub fn ipv4(addr: Ipv4Addr, netmask: Ipv4Addr, name: impl Into<String>) -> Self {
        Self::new(IpAddr::V4(addr), Some(IpAddr::V4(netmask)), name)
    }

    /// The interface address. Always present.
    #[must_use]
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    /// The subnet mask, when the OS supplied or the backend derived one.
    #[must_use]
    pub const fn netmask(&self) -> Option<IpAddr> {
        self.netmask
    }

    /// The broadcast address. Present only when both `addr` and `netmask`
    /// are IPv4; always equals `addr | !netmask`.
    #[must_use]
    pub const fn broadcast(&self) -> Option<Ipv4Addr> {
        self.broadcast
    }

    /// Human-readable interface name. Empty when the OS-supplied name
    /// could not be converted.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for InterfaceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.addr)?;
        if let Some(mask) = self.netmask {
            write!(f, " mask {mask}")?;
        }
        if let Some(bcast) = self.broadcast {
            write!(f, " bcast {bcast}")?;
        }
        Ok(())
    }
}
