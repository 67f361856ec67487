//! Luby transform fountain code over byte payloads.
//!
//! A fountain code turns a payload of `K` chunks into an unbounded
//! stream of encoded packets; any sufficient subset of the stream
//! (slightly more than `K` packets) reconstructs the payload, with no
//! retransmission requests in either direction.
//!
//! [`LubyEncoder`] and [`LubyDecoder`] are the two types users wishing
//! to produce and / or consume packet streams should use.
//!
//! # LubyEncoder Examples
//!
//! ```
//! use luby::{LubyEncoder, LubyEncoderBuilder};
//!
//! # fn main() -> Result<(), luby::LubyError> {
//! let payload = b"the quick brown fox jumps over the lazy dog";
//!
//! // the stream never ends, pull as many packets as the channel needs
//! let encoder = LubyEncoder::new(payload, 77, 8)?;
//! let packets: Vec<_> = encoder.take(32).collect();
//! assert_eq!(packets.len(), 32);
//!
//! // the builder picks a random seed and a default chunk size
//! let mut encoder = LubyEncoderBuilder::new().build(payload)?;
//! let packet = encoder.next().unwrap();
//! assert_eq!(packet.payload_size(), payload.len() as u64);
//! # Ok(())
//! # }
//! ```
//!
//! # LubyDecoder Examples
//!
//! ```
//! use luby::{LubyDecoder, LubyEncoder};
//!
//! # fn main() -> Result<(), luby::LubyError> {
//! let payload = b"the quick brown fox jumps over the lazy dog";
//! let encoder = LubyEncoder::new(payload, 77, 8)?;
//!
//! let mut destination = vec![0u8; payload.len()];
//! let mut decoder = LubyDecoder::new(&mut destination, payload.len() as u64, 8)?;
//! let consumed = decoder.decode(encoder.take(10_000))?;
//!
//! assert!(decoder.is_complete());
//! assert!(consumed >= u64::from(decoder.chunk_count()));
//! assert_eq!(&destination[..], &payload[..]);
//! # Ok(())
//! # }
//! ```
//!
//! When the packet headers are trusted, [`decode_buffer`] configures
//! itself from the first packet:
//!
//! ```
//! use luby::{decode_buffer, LubyEncoder};
//!
//! # fn main() -> Result<(), luby::LubyError> {
//! let payload = b"fountain coded";
//! let encoder = LubyEncoder::new(payload, 3, 4)?;
//!
//! let mut destination = vec![0u8; payload.len()];
//! decode_buffer(&mut destination, encoder.take(10_000))?;
//! assert_eq!(&destination[..], &payload[..]);
//! # Ok(())
//! # }
//! ```

pub(crate) mod random;

pub mod chunks;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod packet;
pub mod xor;

pub use decoder::{decode_buffer, LubyDecoder};
pub use encoder::{LubyEncoder, LubyEncoderBuilder, DEFAULT_CHUNK_SIZE};
pub use errors::LubyError;
pub use packet::Packet;

/// Result type of this crate.
pub type Result<T> = std::result::Result<T, LubyError>;
