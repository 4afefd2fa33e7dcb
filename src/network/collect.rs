//! Platform-independent candidate filtering.
//!
//! Both backends normalize raw OS records into [`Candidate`] values and
//! feed them, in native OS order, through [`collect_snapshots`]. Keeping
//! the inclusion rules out of the `cfg` blocks lets the filtering, ordering
//! and family-skip behavior test without touching the OS.

use std::net::IpAddr;

use super::snapshot::InterfaceSnapshot;

/// One raw interface record before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    /// The interface is operationally up.
    pub up: bool,
    /// The interface is a point-to-point link (always false on Windows,
    /// which filters by operational status alone).
    pub point_to_point: bool,
    /// Interface address, when the OS supplied one.
    pub addr: Option<IpAddr>,
    /// Subnet mask, when the OS supplied or the backend derived one.
    pub netmask: Option<IpAddr>,
    /// Interface name; empty when name conversion failed.
    pub name: String,
}

impl Candidate {
    fn included(&self) -> bool {
        self.up && !self.point_to_point && self.addr.is_some()
    }
}

/// How to report candidates skipped for an unsupported address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipLog {
    /// Warn per skipped candidate. Used on Windows, where the adapter
    /// query is IPv4-scoped and an IPv6 entry is an unimplemented gap.
    Warn,
    /// Note the skip at debug level. Used on POSIX, where non-IPv4
    /// entries are a routine part of every dual-stack host's list.
    Debug,
}

/// Filters candidates into snapshots, preserving input order.
///
/// A candidate is included when it is up, not point-to-point, and carries
/// an IPv4 address. Non-IPv4 addresses on otherwise qualifying interfaces
/// are skipped and logged per `skip_log`; IPv6 support is not implemented.
pub(crate) fn collect_snapshots(
    candidates: impl IntoIterator<Item = Candidate>,
    skip_log: SkipLog,
) -> Vec<InterfaceSnapshot> {
    let mut snapshots = Vec::new();

    for candidate in candidates {
        if !candidate.included() {
            continue;
        }
        match candidate.addr {
            Some(addr @ IpAddr::V4(_)) => {
                snapshots.push(InterfaceSnapshot::new(
                    addr,
                    candidate.netmask,
                    candidate.name,
                ));
            }
            Some(IpAddr::V6(addr)) => match skip_log {
                SkipLog::Warn => tracing::warn!(
                    "skipping {} ({addr}): IPv6 support not yet implemented",
                    candidate.name
                ),
                SkipLog::Debug => tracing::debug!(
                    "skipping {} ({addr}): IPv6 support not yet implemented",
                    candidate.name
                ),
            },
            None => {}
        }
    }

    snapshots
}
