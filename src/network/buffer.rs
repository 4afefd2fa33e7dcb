//! Sized-buffer query protocol used by the Windows backend.
//!
//! `GetAdaptersAddresses` and `GetIpAddrTable` both follow the same
//! pattern: the caller guesses a buffer size, and the API reports the
//! required size when the guess is too small. The loop lives here,
//! decoupled from the OS call, so the retry bound is testable on any
//! platform.

use super::source::EnumerateError;

/// Outcome of one sized-buffer query attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryStatus {
    /// The buffer was filled; enumeration data is valid.
    Done,
    /// The buffer was too small; retry with the given size.
    BufferTooSmall(usize),
    /// The query failed with an OS status code.
    Failed(u32),
}

/// Runs `query` against a freshly allocated buffer, growing it on
/// [`QueryStatus::BufferTooSmall`] up to `max_attempts` total attempts.
///
/// Each retry allocates a fresh buffer at the size the previous attempt
/// reported. Exhausting the bound is a hard enumeration failure.
pub(crate) fn fill_sized_buffer(
    initial_size: usize,
    max_attempts: u32,
    mut query: impl FnMut(&mut Vec<u8>) -> QueryStatus,
) -> Result<Vec<u8>, EnumerateError> {
    let mut size = initial_size;

    for _ in 0..max_attempts {
        let mut buffer = vec![0u8; size];
        match query(&mut buffer) {
            QueryStatus::Done => return Ok(buffer),
            QueryStatus::BufferTooSmall(needed) => {
                // A needed size not larger than the guess would loop forever.
                size = needed.max(size + 1);
            }
            QueryStatus::Failed(code) => {
                return Err(EnumerateError::Platform {
                    message: format!("interface query failed with OS status {code}"),
                });
            }
        }
    }

    Err(EnumerateError::RetryExhausted {
        attempts: max_attempts,
    })
}
