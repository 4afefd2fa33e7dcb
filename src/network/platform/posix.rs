//! POSIX interface enumeration using `getifaddrs`.

use std::ffi::CStr;
use std::io;
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::network::collect::{Candidate, SkipLog, collect_snapshots};
use crate::network::snapshot::InterfaceSnapshot;
use crate::network::source::{EnumerateError, InterfaceSource};

/// POSIX implementation of [`InterfaceSource`] using `getifaddrs`.
///
/// Walks the OS interface-address list in native order and keeps every
/// entry that is up, not point-to-point, and carries an IPv4 address.
///
/// # Example
///
/// ```no_run
/// use ifscout::network::{InterfaceSource, platform::PosixSource};
///
/// let source = PosixSource::new();
/// let interfaces = source.interfaces().expect("getifaddrs failed");
///
/// for iface in interfaces {
///     println!("{iface}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PosixSource {
    // Currently no configuration needed, but struct allows future extension
    _private: (),
}

impl PosixSource {
    /// Creates a new POSIX interface source.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceSource for PosixSource {
    fn interfaces(&self) -> Result<Vec<InterfaceSnapshot>, EnumerateError> {
        let list = IfAddrs::fetch()?;
        // Non-IPv4 entries are routine here (every dual-stack host has
        // them), so they are skipped quietly rather than warned about.
        Ok(collect_snapshots(
            list.iter().map(candidate_from),
            SkipLog::Debug,
        ))
    }
}

/// Owning handle for a `getifaddrs` list, freed on drop.
struct IfAddrs {
    head: *mut libc::ifaddrs,
}

impl IfAddrs {
    fn fetch() -> Result<Self, EnumerateError> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();

        // SAFETY: getifaddrs writes a valid list head (or leaves it
        // untouched on failure) into the out-pointer.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(EnumerateError::Platform {
                message: format!("getifaddrs failed: {}", io::Error::last_os_error()),
            });
        }

        Ok(Self { head })
    }

    fn iter(&self) -> IfAddrsIter<'_> {
        IfAddrsIter {
            next: self.head,
            _list: PhantomData,
        }
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.head.is_null() {
            // SAFETY: head came from getifaddrs and is freed exactly once.
            unsafe { libc::freeifaddrs(self.head) };
        }
    }
}

struct IfAddrsIter<'a> {
    next: *mut libc::ifaddrs,
    _list: PhantomData<&'a IfAddrs>,
}

impl<'a> Iterator for IfAddrsIter<'a> {
    type Item = &'a libc::ifaddrs;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() {
            return None;
        }
        // SAFETY: non-null node of a list that outlives 'a.
        let entry = unsafe { &*self.next };
        self.next = entry.ifa_next;
        Some(entry)
    }
}

fn candidate_from(entry: &libc::ifaddrs) -> Candidate {
    let up_flag = libc::IFF_UP as libc::c_uint;
    let ptp_flag = libc::IFF_POINTOPOINT as libc::c_uint;

    Candidate {
        up: entry.ifa_flags & up_flag != 0,
        point_to_point: entry.ifa_flags & ptp_flag != 0,
        addr: sockaddr_to_ip(entry.ifa_addr),
        netmask: sockaddr_to_ip(entry.ifa_netmask),
        name: interface_name(entry.ifa_name),
    }
}

/// Reads an [`IpAddr`] out of a raw `sockaddr`, if the pointer is non-null
/// and the family is one we understand.
///
/// # Safety Note
///
/// The pointer casts to `sockaddr_in` and `sockaddr_in6` are allowed
/// despite alignment concerns because the OS guarantees proper alignment
/// of the structures in the `getifaddrs` list.
#[allow(clippy::cast_ptr_alignment)]
fn sockaddr_to_ip(sa: *mut libc::sockaddr) -> Option<IpAddr> {
    if sa.is_null() {
        return None;
    }

    // SAFETY: sa points into the live getifaddrs list.
    let family = i32::from(unsafe { (*sa).sa_family });
    match family {
        libc::AF_INET => {
            // SAFETY: AF_INET guarantees the structure is a sockaddr_in.
            let sin = unsafe { &*sa.cast::<libc::sockaddr_in>() };
            // s_addr is in network byte order; its memory bytes are the octets.
            Some(IpAddr::V4(Ipv4Addr::from(sin.sin_addr.s_addr.to_ne_bytes())))
        }
        libc::AF_INET6 => {
            // SAFETY: AF_INET6 guarantees the structure is a sockaddr_in6.
            let sin6 = unsafe { &*sa.cast::<libc::sockaddr_in6>() };
            Some(IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
        }
        _ => None,
    }
}

fn interface_name(name: *mut libc::c_char) -> String {
    if name.is_null() {
        return String::new();
    }
    // SAFETY: getifaddrs yields NUL-terminated interface names.
    unsafe { CStr::from_ptr(name) }
        .to_string_lossy()
        .into_owned()
}
