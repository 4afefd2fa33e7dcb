//! Socket receive-buffer tuning.
//!
//! Discovery traffic arrives in bursts; the default receive buffer can
//! drop datagrams before the caller drains them. The only platform
//! difference is the width of the value handed to `setsockopt`: native
//! `c_int` on POSIX, `u32` on Windows.

#[cfg(unix)]
use std::os::fd::{AsRawFd, RawFd};
#[cfg(windows)]
use std::os::windows::io::{AsRawSocket, RawSocket};

/// Sets the receive-buffer size (`SO_RCVBUF`) on a socket.
///
/// Returns whether the underlying option-set call succeeded. No retry and
/// no validation of `size` beyond what the OS itself enforces; callers
/// decide how severe a `false` is.
#[cfg(unix)]
pub fn set_recv_buffer_size<S: AsRawFd>(socket: &S, size: usize) -> bool {
    set_recv_buffer_size_raw(socket.as_raw_fd(), size)
}

/// Raw-descriptor form of [`set_recv_buffer_size`].
#[cfg(unix)]
#[must_use]
pub fn set_recv_buffer_size_raw(fd: RawFd, size: usize) -> bool {
    let Ok(value) = libc::c_int::try_from(size) else {
        return false;
    };

    // SAFETY: the value pointer and length describe a valid c_int; an
    // invalid descriptor makes the call fail, it does not misbehave.
    let result = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_RCVBUF,
            std::ptr::from_ref(&value).cast(),
            libc::socklen_t::try_from(std::mem::size_of::<libc::c_int>()).unwrap_or(4),
        )
    };
    result == 0
}

/// Sets the receive-buffer size (`SO_RCVBUF`) on a socket.
///
/// Returns whether the underlying option-set call succeeded. No retry and
/// no validation of `size` beyond what the OS itself enforces; callers
/// decide how severe a `false` is.
#[cfg(windows)]
pub fn set_recv_buffer_size<S: AsRawSocket>(socket: &S, size: usize) -> bool {
    set_recv_buffer_size_raw(socket.as_raw_socket(), size)
}

/// Raw-descriptor form of [`set_recv_buffer_size`].
#[cfg(windows)]
#[must_use]
pub fn set_recv_buffer_size_raw(socket: RawSocket, size: usize) -> bool {
    use windows::Win32::Networking::WinSock::{SO_RCVBUF, SOCKET, SOL_SOCKET, setsockopt};

    let Ok(value) = u32::try_from(size) else {
        return false;
    };

    // SAFETY: the option value is a fixed-width u32 byte slice; an invalid
    // socket makes the call fail, it does not misbehave.
    let result = unsafe {
        setsockopt(
            SOCKET(socket as usize),
            i32::try_from(SOL_SOCKET).unwrap_or_default(),
            i32::try_from(SO_RCVBUF).unwrap_or_default(),
            Some(&value.to_ne_bytes()),
        )
    };
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;

    #[test]
    fn open_socket_accepts_one_megabyte() {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        assert!(set_recv_buffer_size(&socket, 1_048_576));
    }

    #[cfg(unix)]
    #[test]
    fn invalid_descriptor_returns_false() {
        assert!(!set_recv_buffer_size_raw(-1, 1_048_576));
    }

    #[cfg(windows)]
    #[test]
    fn invalid_descriptor_returns_false() {
        use windows::Win32::Networking::WinSock::INVALID_SOCKET;
        assert!(!set_recv_buffer_size_raw(INVALID_SOCKET.0 as RawSocket, 1_048_576));
    }

    #[test]
    fn oversized_request_returns_false() {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        assert!(!set_recv_buffer_size(&socket, usize::MAX));
    }
}
