//! Platform-specific interface source implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`InterfaceSource`] trait.
//!
//! # Platform Support
//!
//! - **POSIX** (Linux, macOS, BSDs): `getifaddrs` via the `libc` crate.
//! - **Windows**: `GetAdaptersAddresses` via the `windows` crate, with a
//!   legacy `GetIpAddrTable` netmask fallback for systems without
//!   per-address prefix-length metadata.
//!
//! [`InterfaceSource`]: crate::network::InterfaceSource

#[cfg(unix)]
mod posix;

#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use posix::PosixSource;

#[cfg(windows)]
pub use windows::{NetmaskStrategy, WindowsSource};

// Re-export the platform-specific source as PlatformSource for convenience
#[cfg(unix)]
pub use posix::PosixSource as PlatformSource;
#[cfg(windows)]
pub use windows::WindowsSource as PlatformSource;
