//! Definitions of error related things.

use std::fmt;

/// Errors of this crate
#[derive(Debug)]
#[non_exhaustive]
pub enum LubyError {
    /// The chunk size must be at least one byte
    InvalidChunkSize,
    /// The payload needs more chunks than a packet can address
    TooManyChunks { chunk_count: u64 },
    /// The destination region cannot hold the payload
    DestinationTooSmall {
        destination_len: usize,
        payload_size: u64,
    },
    /// The packet was encoded from a payload of a different size
    MismatchedPayloadSize { expected: u64, actual: u64 },
    /// The packet was encoded with a different chunk size
    MismatchedChunkSize { expected: u32, actual: u32 },
    /// The packet carries more data bytes than one chunk can hold
    OversizedData { len: usize, chunk_size: u32 },
    /// Wrapper around and io error from the std lib
    IoError(std::io::Error),
}

impl From<std::io::Error> for LubyError {
    fn from(e: std::io::Error) -> Self {
        LubyError::IoError(e)
    }
}

impl fmt::Display for LubyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            LubyError::InvalidChunkSize => write!(f, "The chunk size cannot be 0"),
            LubyError::TooManyChunks { chunk_count } => write!(
                f,
                "The payload splits into {} chunks, more than packets can address",
                chunk_count
            ),
            LubyError::DestinationTooSmall {
                destination_len: dl,
                payload_size: ps,
            } => write!(
                f,
                "The destination region ({} bytes) cannot hold the {} byte payload",
                dl, ps
            ),
            LubyError::MismatchedPayloadSize { expected, actual } => write!(
                f,
                "Packet encoded from a {} byte payload, decoder expects {}",
                actual, expected
            ),
            LubyError::MismatchedChunkSize { expected, actual } => write!(
                f,
                "Packet encoded with chunk size {}, decoder expects {}",
                actual, expected
            ),
            LubyError::OversizedData {
                len: l,
                chunk_size: cs,
            } => write!(
                f,
                "Packet carries {} data bytes but chunks hold at most {}",
                l, cs
            ),
            LubyError::IoError(e) => write!(f, "IoError: {}", e),
        }
    }
}

impl std::error::Error for LubyError {}
