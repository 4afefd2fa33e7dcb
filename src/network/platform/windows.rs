//! Windows interface enumeration using `GetAdaptersAddresses`.

use std::net::{IpAddr, Ipv4Addr};

use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, ERROR_INSUFFICIENT_BUFFER, NO_ERROR};
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GAA_FLAG_SKIP_MULTICAST,
    GetAdaptersAddresses, GetIpAddrTable, IP_ADAPTER_ADDRESSES_LH, IP_ADAPTER_UNICAST_ADDRESS_LH,
    MIB_IPADDRTABLE,
};
use windows::Win32::NetworkManagement::Ndis::IfOperStatusUp;
use windows::Win32::Networking::WinSock::{AF_INET, AF_INET6, SOCKADDR_IN};

use crate::network::buffer::{QueryStatus, fill_sized_buffer};
use crate::network::collect::{Candidate, SkipLog, collect_snapshots};
use crate::network::netmask::{LegacyAddrRow, LegacyAddrTable, mask_from_prefix};
use crate::network::snapshot::InterfaceSnapshot;
use crate::network::source::{EnumerateError, InterfaceSource};

/// Initial buffer guess for `GetAdaptersAddresses`. The API reports the
/// required size when this is insufficient.
const INITIAL_BUFFER_SIZE: usize = 15000;

/// Total allocation attempts before enumeration fails.
const MAX_BUFFER_ATTEMPTS: u32 = 3;

/// Netmask derivation strategy, selected once at source construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetmaskStrategy {
    /// Derive the mask from each address's on-link prefix length.
    /// Exact and O(1); available on Vista and later.
    PrefixLength,
    /// Scan a one-shot snapshot of the flat IP address table, for systems
    /// whose unicast addresses carry no prefix-length metadata.
    LegacyTable,
}

/// Windows implementation of [`InterfaceSource`] using `GetAdaptersAddresses`.
///
/// Walks every adapter's unicast address list and keeps the IPv4 addresses
/// of operationally-up adapters, deriving netmask and broadcast per the
/// configured [`NetmaskStrategy`].
#[derive(Debug, Clone)]
pub struct WindowsSource {
    strategy: NetmaskStrategy,
}

impl WindowsSource {
    /// Creates a source using the modern prefix-length strategy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strategy: NetmaskStrategy::PrefixLength,
        }
    }

    /// Creates a source that resolves netmasks through the legacy IP
    /// address table, for pre-Vista systems.
    #[must_use]
    pub const fn with_legacy_table() -> Self {
        Self {
            strategy: NetmaskStrategy::LegacyTable,
        }
    }
}

impl Default for WindowsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceSource for WindowsSource {
    fn interfaces(&self) -> Result<Vec<InterfaceSnapshot>, EnumerateError> {
        // The table snapshot is taken before the adapter walk and dropped
        // with this call; caching it would go stale on reconfiguration.
        let table = match self.strategy {
            NetmaskStrategy::PrefixLength => None,
            NetmaskStrategy::LegacyTable => Some(read_legacy_table()),
        };

        let buffer = query_adapter_addresses()?;
        Ok(collect_snapshots(
            walk_adapters(&buffer, table.as_ref()),
            SkipLog::Warn,
        ))
    }
}

/// Calls `GetAdaptersAddresses` through the sized-buffer protocol:
/// 15000-byte guess, fresh allocation per retry, at most 3 attempts.
fn query_adapter_addresses() -> Result<Vec<u8>, EnumerateError> {
    // Flags to skip data we don't need (anycast, multicast, DNS servers)
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let family = u32::from(AF_INET.0);

    fill_sized_buffer(INITIAL_BUFFER_SIZE, MAX_BUFFER_ATTEMPTS, |buffer| {
        let mut size = u32::try_from(buffer.len()).unwrap_or(u32::MAX);

        // SAFETY: We provide a valid buffer and size. The function writes
        // adapter information to the buffer and updates `size` with the
        // required length.
        let result = unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut size,
            )
        };

        match result {
            r if r == NO_ERROR.0 => QueryStatus::Done,
            r if r == ERROR_BUFFER_OVERFLOW.0 => QueryStatus::BufferTooSmall(size as usize),
            r => QueryStatus::Failed(r),
        }
    })
}

/// Walks the adapter linked list, producing candidates in OS report order.
fn walk_adapters(raw: &[u8], table: Option<&LegacyAddrTable>) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for
    // IP_ADAPTER_ADDRESSES_LH; the list is valid while `raw` is alive.
    #[allow(clippy::cast_ptr_alignment)]
    let mut current = raw.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    while !current.is_null() {
        let adapter = unsafe { &*current };

        if adapter.OperStatus == IfOperStatusUp {
            let name = friendly_name(adapter);
            collect_unicast(adapter, &name, table, &mut candidates);
        }

        current = adapter.Next;
    }

    candidates
}

/// Collects candidates from one adapter's unicast address list.
fn collect_unicast(
    adapter: &IP_ADAPTER_ADDRESSES_LH,
    name: &str,
    table: Option<&LegacyAddrTable>,
    out: &mut Vec<Candidate>,
) {
    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: We iterate through a linked list of unicast addresses. Each
    // entry is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let entry = unsafe { &*unicast };
        if let Some(candidate) = candidate_from(entry, name, table) {
            out.push(candidate);
        }
        unicast = entry.Next;
    }
}

/// Builds a candidate from one unicast address entry.
///
/// IPv6 entries become address-only candidates so the shared collector
/// can warn and skip them; unknown families are dropped silently.
///
/// # Safety Note
///
/// The pointer cast to `SOCKADDR_IN` is allowed despite alignment concerns
/// because Windows guarantees proper alignment of these structures when
/// returned from the networking APIs.
#[allow(clippy::cast_ptr_alignment)]
fn candidate_from(
    entry: &IP_ADAPTER_UNICAST_ADDRESS_LH,
    name: &str,
    table: Option<&LegacyAddrTable>,
) -> Option<Candidate> {
    // SAFETY: the Address field contains a valid SOCKET_ADDRESS pointing to
    // a SOCKADDR_IN (IPv4) or SOCKADDR_IN6 (IPv6).
    let sockaddr = unsafe { entry.Address.lpSockaddr.as_ref() }?;

    match sockaddr.sa_family {
        f if f == AF_INET => {
            // SAFETY: We verified the family is AF_INET, so this is a valid cast.
            let sockaddr_in = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
            // SAFETY: sin_addr contains the IPv4 address bytes in network order.
            let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
            let addr = Ipv4Addr::new(octets.s_b1, octets.s_b2, octets.s_b3, octets.s_b4);

            let mask = table.map_or_else(
                || mask_from_prefix(entry.OnLinkPrefixLength),
                |table| table.resolve(addr),
            );

            Some(Candidate {
                up: true,
                point_to_point: false,
                addr: Some(IpAddr::V4(addr)),
                netmask: Some(IpAddr::V4(mask)),
                name: name.to_string(),
            })
        }
        f if f == AF_INET6 => Some(Candidate {
            up: true,
            point_to_point: false,
            addr: Some(read_ipv6(sockaddr)),
            netmask: None,
            name: name.to_string(),
        }),
        _ => None,
    }
}

#[allow(clippy::cast_ptr_alignment)]
fn read_ipv6(sockaddr: &windows::Win32::Networking::WinSock::SOCKADDR) -> IpAddr {
    use windows::Win32::Networking::WinSock::SOCKADDR_IN6;

    // SAFETY: the caller verified the family is AF_INET6.
    let sockaddr_in6 = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN6>()) };
    // SAFETY: the union field is valid for an IPv6 address.
    let octets = unsafe { sockaddr_in6.sin6_addr.u.Byte };
    IpAddr::from(octets)
}

/// Converts the adapter's wide-character friendly name.
///
/// A malformed wide string warns and substitutes an empty name rather
/// than propagating undefined buffer content.
fn friendly_name(adapter: &IP_ADAPTER_ADDRESSES_LH) -> String {
    // SAFETY: FriendlyName points to a NUL-terminated wide string inside
    // the adapter buffer.
    match unsafe { adapter.FriendlyName.to_string() } {
        Ok(name) => name,
        Err(_) => {
            tracing::warn!("adapter friendly name is not valid UTF-16, using empty name");
            String::new()
        }
    }
}

/// Takes the one-shot legacy IP address table snapshot.
///
/// A failed read warns and yields an empty table, so every lookup takes
/// the documented 255.255.255.255 miss path.
fn read_legacy_table() -> LegacyAddrTable {
    let result = fill_sized_buffer(
        std::mem::size_of::<MIB_IPADDRTABLE>(),
        MAX_BUFFER_ATTEMPTS,
        |buffer| {
            let mut size = u32::try_from(buffer.len()).unwrap_or(u32::MAX);

            // SAFETY: buffer and size describe a writable allocation; the
            // API updates `size` with the required length when too small.
            #[allow(clippy::cast_ptr_alignment)]
            let result = unsafe {
                GetIpAddrTable(Some(buffer.as_mut_ptr().cast()), &raw mut size, false)
            };

            match result {
                r if r == NO_ERROR.0 => QueryStatus::Done,
                r if r == ERROR_INSUFFICIENT_BUFFER.0 => QueryStatus::BufferTooSmall(size as usize),
                r => QueryStatus::Failed(r),
            }
        },
    );

    match result {
        Ok(buffer) => parse_legacy_table(&buffer),
        Err(e) => {
            tracing::warn!("failed to read legacy IP address table: {e}");
            LegacyAddrTable::default()
        }
    }
}

fn parse_legacy_table(raw: &[u8]) -> LegacyAddrTable {
    // SAFETY: GetIpAddrTable filled the buffer with a MIB_IPADDRTABLE
    // header followed by dwNumEntries contiguous rows.
    #[allow(clippy::cast_ptr_alignment)]
    let table = unsafe { &*raw.as_ptr().cast::<MIB_IPADDRTABLE>() };

    let mut rows = Vec::with_capacity(table.dwNumEntries as usize);
    let first = table.table.as_ptr();
    for i in 0..table.dwNumEntries as usize {
        // SAFETY: row i is within the dwNumEntries rows the API wrote.
        let row = unsafe { &*first.add(i) };
        // dwAddr and dwMask are in network byte order; their memory bytes
        // are the address octets.
        rows.push(LegacyAddrRow {
            addr: Ipv4Addr::from(row.dwAddr.to_ne_bytes()),
            mask: Ipv4Addr::from(row.dwMask.to_ne_bytes()),
        });
    }

    LegacyAddrTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_source_new_uses_prefix_length() {
        let source = WindowsSource::new();
        assert_eq!(source.strategy, NetmaskStrategy::PrefixLength);
    }

    #[test]
    fn legacy_constructor_uses_table() {
        let source = WindowsSource::with_legacy_table();
        assert_eq!(source.strategy, NetmaskStrategy::LegacyTable);
    }

    // Integration test: actually enumerates adapters on the host.
    #[test]
    fn interfaces_include_loopback() {
        let source = WindowsSource::new();
        let result = source.interfaces();

        assert!(result.is_ok(), "interfaces() failed: {:?}", result.err());

        let interfaces = result.unwrap();
        let has_loopback = interfaces
            .iter()
            .any(|i| i.addr() == IpAddr::V4(Ipv4Addr::LOCALHOST));

        assert!(
            has_loopback,
            "Expected the loopback interface, got: {interfaces:?}"
        );
    }

    #[test]
    fn every_interface_has_a_netmask() {
        let source = WindowsSource::new();
        let interfaces = source.interfaces().expect("interfaces() failed");

        for iface in &interfaces {
            assert!(
                iface.netmask().is_some(),
                "Expected a derived netmask: {iface:?}"
            );
        }
    }

    #[test]
    fn legacy_strategy_still_enumerates() {
        let source = WindowsSource::with_legacy_table();
        let interfaces = source.interfaces().expect("interfaces() failed");

        // Every record still satisfies the broadcast invariant, whichever
        // mask the table produced.
        for iface in &interfaces {
            assert!(iface.broadcast().is_some(), "missing broadcast: {iface:?}");
        }
    }
}
