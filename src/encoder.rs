//! Packet production.
//!
//! [`LubyEncoder`] turns a borrowed payload into an unbounded, lazily
//! produced stream of [`Packet`]s. Consumers pull packets one at a time;
//! stopping the pulls is the only form of cancellation.

use crate::chunks::{chunk_count, FixedChunks};
use crate::random::{packet_indices, SeedStream};
use crate::xor::combine;
use crate::{LubyError, Packet};

/// Default number of payload bytes per chunk.
///
/// A power of two small enough that a framed packet fits common
/// transport MTUs.
pub const DEFAULT_CHUNK_SIZE: u32 = 1024;

/// Produces the packet stream for one payload.
///
/// Each pull draws a fresh per-packet seed, expands it into a set of
/// chunk indices and emits the XOR of those chunks. The stream is
/// infinite for any non-empty payload; use [`Iterator::take`] or stop
/// pulling once the receiving side reports completion.
///
/// # Example
///
/// ```
/// use luby::LubyEncoder;
///
/// # fn main() -> Result<(), luby::LubyError> {
/// let payload = b"abcdefghijklmnop";
/// let mut encoder = LubyEncoder::new(payload, 14, 4)?;
///
/// let packet = encoder.next().unwrap();
/// assert_eq!(packet.payload_size(), 16);
/// assert_eq!(packet.chunk_size(), 4);
/// assert!(packet.data().len() <= 4);
/// # Ok(())
/// # }
/// ```
pub struct LubyEncoder<'a> {
    chunks: FixedChunks<'a>,
    seeds: SeedStream,
    payload_size: u64,
    chunk_size: u32,
    num_chunks: u32,
}

impl<'a> LubyEncoder<'a> {
    /// Creates an encoder over `source` with the given top-level seed.
    ///
    /// Two encoders built from the same `(source, seed, chunk_size)`
    /// emit identical packet streams.
    pub fn new(source: &'a [u8], seed: u32, chunk_size: u32) -> crate::Result<Self> {
        if chunk_size == 0 {
            return Err(LubyError::InvalidChunkSize);
        }
        let payload_size = source.len() as u64;
        let num_chunks = chunk_count(payload_size, chunk_size);
        if num_chunks > u64::from(u32::MAX) {
            return Err(LubyError::TooManyChunks {
                chunk_count: num_chunks,
            });
        }

        Ok(Self {
            chunks: FixedChunks::new(source, chunk_size),
            seeds: SeedStream::new(seed),
            payload_size,
            chunk_size,
            num_chunks: num_chunks as u32,
        })
    }

    /// Number of chunks the payload splits into.
    pub fn chunk_count(&self) -> u32 {
        self.num_chunks
    }
}

impl<'a> Iterator for LubyEncoder<'a> {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        if self.num_chunks == 0 {
            return None;
        }

        let seed = self.seeds.next();
        let indices = packet_indices(seed, self.num_chunks);
        let data = combine(indices.iter().map(|&index| self.chunks.read(index)))
            .unwrap_or_default();

        Some(Packet::new(seed, self.payload_size, self.chunk_size, data))
    }
}

/// Builder to personalize a [`LubyEncoder`].
///
/// Supplies the defaults of the encoder entry point: chunk size
/// [`DEFAULT_CHUNK_SIZE`] and a randomly drawn top-level seed.
pub struct LubyEncoderBuilder {
    seed: Option<u32>,
    chunk_size: u32,
}

impl LubyEncoderBuilder {
    pub fn new() -> Self {
        Self {
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Builds the encoder, drawing a random seed if none was given.
    pub fn build(self, source: &[u8]) -> crate::Result<LubyEncoder> {
        let seed = self.seed.unwrap_or_else(rand::random);
        LubyEncoder::new(source, seed, self.chunk_size)
    }
}

impl Default for LubyEncoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
