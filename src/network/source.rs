//! Interface source trait and error types.

use thiserror::Error;

use super::platform::PlatformSource;
use super::snapshot::InterfaceSnapshot;

/// Error type for interface enumeration.
///
/// Describes what went wrong without dictating recovery strategy. The
/// [`enumerate`] wrapper downgrades every variant to an empty list plus a
/// warning; callers that need the distinction use the trait directly.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// The buffer-sizing retry loop exhausted its attempt bound.
    #[error("adapter buffer sizing exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Number of allocation attempts made before giving up.
        attempts: u32,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for enumerating local network interfaces.
///
/// # Design
///
/// - Platform backends implement this trait; tests inject mocks.
/// - One call is one snapshot: no watching, no caching, no shared state
///   between calls, so concurrent callers need no locking.
/// - The result is never partial. Implementations either return the full
///   list in OS report order or an error.
pub trait InterfaceSource: Send + Sync {
    /// Takes one snapshot of the local network interfaces.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerateError`] when the OS-level query fails or, on
    /// Windows, when the adapter buffer sizing loop exhausts its retries.
    fn interfaces(&self) -> Result<Vec<InterfaceSnapshot>, EnumerateError>;
}

/// Enumerates the active local network interfaces.
///
/// The sole entry point for discovery callers. Failure is downgraded to an
/// empty list with a warning: an empty result means "no interfaces
/// currently discoverable", never an exceptional condition.
#[must_use]
pub fn enumerate() -> Vec<InterfaceSnapshot> {
    enumerate_from(&PlatformSource::new())
}

/// Enumerates through a specific source, downgrading every error to an
/// empty list plus a warning.
///
/// [`enumerate`] delegates here with the platform source; tests and
/// callers with their own [`InterfaceSource`] use this form directly.
pub fn enumerate_from(source: &impl InterfaceSource) -> Vec<InterfaceSnapshot> {
    match source.interfaces() {
        Ok(snapshots) => snapshots,
        Err(e) => {
            tracing::warn!("failed to enumerate network interfaces: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;

    /// A mock source returning predefined results, one per call.
    struct MockSource {
        results: Mutex<VecDeque<Result<Vec<InterfaceSnapshot>, EnumerateError>>>,
    }

    impl MockSource {
        fn new(results: Vec<Result<Vec<InterfaceSnapshot>, EnumerateError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    impl InterfaceSource for MockSource {
        fn interfaces(&self) -> Result<Vec<InterfaceSnapshot>, EnumerateError> {
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    fn sample() -> Vec<InterfaceSnapshot> {
        vec![
            InterfaceSnapshot::ipv4(
                Ipv4Addr::new(127, 0, 0, 1),
                Ipv4Addr::new(255, 0, 0, 0),
                "lo",
            ),
            InterfaceSnapshot::ipv4(
                Ipv4Addr::new(192, 168, 1, 5),
                Ipv4Addr::new(255, 255, 255, 0),
                "eth0",
            ),
        ]
    }

    #[test]
    fn mock_source_preserves_order() {
        let source = MockSource::new(vec![Ok(sample())]);
        let snapshots = source.interfaces().unwrap();

        let names: Vec<_> = snapshots.iter().map(InterfaceSnapshot::name).collect();
        assert_eq!(names, ["lo", "eth0"]);
    }

    #[test]
    fn unchanged_source_yields_value_equal_lists() {
        let source = MockSource::new(vec![Ok(sample()), Ok(sample())]);

        let first = source.interfaces().unwrap();
        let second = source.interfaces().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn mock_source_can_return_errors() {
        let source = MockSource::new(vec![Err(EnumerateError::RetryExhausted { attempts: 3 })]);

        let error = source.interfaces().unwrap_err();
        assert!(error.to_string().contains("3 attempts"));
    }

    #[test]
    fn enumerate_from_passes_snapshots_through() {
        let source = MockSource::new(vec![Ok(sample())]);
        assert_eq!(enumerate_from(&source), sample());
    }

    #[test]
    fn retry_exhaustion_downgrades_to_empty() {
        let source = MockSource::new(vec![Err(EnumerateError::RetryExhausted { attempts: 3 })]);
        assert!(enumerate_from(&source).is_empty());
    }

    #[test]
    fn platform_failure_downgrades_to_empty() {
        let source = MockSource::new(vec![Err(EnumerateError::Platform {
            message: "getifaddrs failed".to_string(),
        })]);
        assert!(enumerate_from(&source).is_empty());
    }

    #[test]
    fn downgrade_is_per_call_not_sticky() {
        let source = MockSource::new(vec![
            Err(EnumerateError::Platform {
                message: "transient".to_string(),
            }),
            Ok(sample()),
        ]);

        assert!(enumerate_from(&source).is_empty());
        assert_eq!(enumerate_from(&source), sample());
    }

    #[test]
    fn platform_error_displays_message() {
        let error = EnumerateError::Platform {
            message: "getifaddrs failed".to_string(),
        };
        assert!(error.to_string().contains("getifaddrs failed"));
    }

    // Real-system smoke test: must not panic, and every returned record
    // satisfies the addr/broadcast invariants.
    #[test]
    fn enumerate_result_upholds_invariants() {
        use crate::network::netmask::broadcast_addr;
        use std::net::IpAddr;

        for snapshot in enumerate() {
            assert!(snapshot.addr().is_ipv4());
            if let (IpAddr::V4(addr), Some(IpAddr::V4(mask))) =
                (snapshot.addr(), snapshot.netmask())
            {
                assert_eq!(snapshot.broadcast(), Some(broadcast_addr(addr, mask)));
            }
        }
    }

    #[test]
    fn consecutive_enumerations_are_value_equal() {
        assert_eq!(enumerate(), enumerate());
    }
}
