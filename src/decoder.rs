//! The peeling decoder.
//!
//! Packets arrive in any order and any subset; the decoder keeps no
//! notion of loss or retransmission. A packet whose chunks are all but
//! one already known resolves that last chunk immediately; a packet
//! with two or more unknown chunks waits in the deferred pool. Every
//! resolution re-sweeps the pool, because a freshly written chunk can
//! turn a deferred packet into a resolvable one, and that resolution
//! can cascade further.

use std::collections::BTreeSet;

use crate::chunks::{chunk_count, FixedChunksMut};
use crate::random::packet_indices;
use crate::xor::xor;
use crate::{LubyError, Packet};

/// A packet whose chunk set is known but not yet resolvable.
///
/// `data` stays exactly as received; the contributions of chunks that
/// resolve in the meantime are folded in at resolution time, against
/// the resolved set of that moment.
struct PreparedPacket {
    indices: BTreeSet<u32>,
    data: Vec<u8>,
}

/// Reconstructs a payload from any sufficient subset of its packets.
///
/// The decoder borrows the destination region for the whole decode and
/// writes each chunk exactly once. It never fails on packet content;
/// the only errors are packets whose header disagrees with the
/// decoder's configuration, which are rejected and leave the state
/// untouched.
///
/// # Example
///
/// ```
/// use luby::{LubyDecoder, LubyEncoder};
///
/// # fn main() -> Result<(), luby::LubyError> {
/// let payload = b"abcdefghijklmnop";
/// let encoder = LubyEncoder::new(payload, 14, 4)?;
///
/// let mut destination = vec![0u8; payload.len()];
/// let mut decoder = LubyDecoder::new(&mut destination, payload.len() as u64, 4)?;
/// decoder.decode(encoder.take(10_000))?;
///
/// assert!(decoder.is_complete());
/// assert_eq!(&destination[..], &payload[..]);
/// # Ok(())
/// # }
/// ```
pub struct LubyDecoder<'a> {
    destination: FixedChunksMut<'a>,
    resolved: BTreeSet<u32>,
    deferred: Vec<PreparedPacket>,
    payload_size: u64,
    chunk_size: u32,
    num_chunks: u32,
    packets_received: u64,
}

impl<'a> LubyDecoder<'a> {
    /// Creates a decoder writing into `destination`.
    ///
    /// The destination must hold at least `payload_size` bytes; only
    /// the first `payload_size` of them are written.
    pub fn new(
        destination: &'a mut [u8],
        payload_size: u64,
        chunk_size: u32,
    ) -> crate::Result<Self> {
        if chunk_size == 0 {
            return Err(LubyError::InvalidChunkSize);
        }
        if (destination.len() as u64) < payload_size {
            return Err(LubyError::DestinationTooSmall {
                destination_len: destination.len(),
                payload_size,
            });
        }
        let num_chunks = chunk_count(payload_size, chunk_size);
        if num_chunks > u64::from(u32::MAX) {
            return Err(LubyError::TooManyChunks {
                chunk_count: num_chunks,
            });
        }

        let region = &mut destination[..payload_size as usize];
        Ok(Self {
            destination: FixedChunksMut::new(region, chunk_size),
            resolved: BTreeSet::new(),
            deferred: Vec::new(),
            payload_size,
            chunk_size,
            num_chunks: num_chunks as u32,
            packets_received: 0,
        })
    }

    /// Feeds one packet to the decoder.
    ///
    /// A packet whose header disagrees with the decoder's configuration
    /// is rejected with an error and not counted; whether to keep going
    /// is the caller's call. An accepted packet is discarded as
    /// redundant, resolved immediately, or deferred.
    pub fn receive(&mut self, packet: &Packet) -> crate::Result<()> {
        self.validate(packet)?;
        self.packets_received += 1;

        if self.num_chunks == 0 {
            // an empty payload has nothing left to resolve
            return Ok(());
        }

        let indices = packet_indices(packet.seed(), self.num_chunks);
        let unknown: Vec<u32> = indices
            .iter()
            .filter(|i| !self.resolved.contains(i))
            .copied()
            .collect();
        match unknown.as_slice() {
            // everything known already, the packet carries no new information
            [] => {}
            [index] => {
                let index = *index;
                let data = self.fold_resolved(&indices, packet.data().to_vec());
                self.resolve(index, &data);
                self.cascade();
            }
            _ => self.deferred.push(PreparedPacket {
                indices,
                data: packet.data().to_vec(),
            }),
        }
        Ok(())
    }

    /// Pulls packets until the payload is complete or the stream ends.
    ///
    /// Returns the number of packets consumed. Comparing that count
    /// against [`LubyDecoder::is_complete`] tells an exhausted stream
    /// apart from a finished decode.
    pub fn decode<I>(&mut self, packets: I) -> crate::Result<u64>
    where
        I: IntoIterator<Item = Packet>,
    {
        let mut packets = packets.into_iter();
        let mut consumed = 0;
        while !self.is_complete() {
            let packet = match packets.next() {
                Some(packet) => packet,
                None => break,
            };
            self.receive(&packet)?;
            consumed += 1;
        }
        Ok(consumed)
    }

    /// True once every chunk of the payload has been written.
    pub fn is_complete(&self) -> bool {
        self.resolved.len() as u64 == u64::from(self.num_chunks)
    }

    /// Number of chunks the payload splits into.
    pub fn chunk_count(&self) -> u32 {
        self.num_chunks
    }

    /// Number of chunks whose bytes are known.
    pub fn resolved_count(&self) -> u32 {
        self.resolved.len() as u32
    }

    /// Number of packets waiting for more chunks to resolve.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Number of packets accepted so far, redundant ones included.
    pub fn packets_received(&self) -> u64 {
        self.packets_received
    }

    fn validate(&self, packet: &Packet) -> crate::Result<()> {
        if packet.payload_size() != self.payload_size {
            return Err(LubyError::MismatchedPayloadSize {
                expected: self.payload_size,
                actual: packet.payload_size(),
            });
        }
        if packet.chunk_size() != self.chunk_size {
            return Err(LubyError::MismatchedChunkSize {
                expected: self.chunk_size,
                actual: packet.chunk_size(),
            });
        }
        if packet.data().len() > self.chunk_size as usize {
            return Err(LubyError::OversizedData {
                len: packet.data().len(),
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }

    /// XORs the destination bytes of every already resolved member of
    /// `indices` into `data`.
    fn fold_resolved(&self, indices: &BTreeSet<u32>, mut data: Vec<u8>) -> Vec<u8> {
        for index in indices.iter().filter(|i| self.resolved.contains(i)) {
            data = xor(&data, &self.destination.read(*index));
        }
        data
    }

    fn resolve(&mut self, index: u32, data: &[u8]) {
        debug_assert!(!self.resolved.contains(&index));
        self.destination.write(index, data);
        self.resolved.insert(index);
    }

    /// Sweeps the deferred pool until a full pass resolves nothing.
    fn cascade(&mut self) {
        loop {
            let mut progressed = false;
            let mut i = 0;
            while i < self.deferred.len() {
                match self.single_unknown(&self.deferred[i].indices) {
                    Some(index) => {
                        let PreparedPacket { indices, data } = self.deferred.swap_remove(i);
                        let data = self.fold_resolved(&indices, data);
                        self.resolve(index, &data);
                        progressed = true;
                    }
                    None => i += 1,
                }
            }
            if !progressed {
                break;
            }
        }
    }

    /// The single unresolved index of `indices`, if there is exactly one.
    fn single_unknown(&self, indices: &BTreeSet<u32>) -> Option<u32> {
        let mut unknown = indices.iter().filter(|i| !self.resolved.contains(i));
        let first = unknown.next().copied()?;
        match unknown.next() {
            None => Some(first),
            Some(_) => None,
        }
    }
}

/// Reconstructs a payload into `destination` from a raw packet stream.
///
/// The decoder configuration (payload size and chunk size) is taken
/// from the first packet's header; the destination must be large
/// enough for the payload it announces. Returns the number of packets
/// consumed, which is zero for an empty stream. Use [`LubyDecoder`]
/// directly to inspect partial progress when the stream may end early.
pub fn decode_buffer<I>(destination: &mut [u8], packets: I) -> crate::Result<u64>
where
    I: IntoIterator<Item = Packet>,
{
    let mut packets = packets.into_iter();
    let first = match packets.next() {
        Some(packet) => packet,
        None => return Ok(0),
    };

    let mut decoder = LubyDecoder::new(destination, first.payload_size(), first.chunk_size())?;
    decoder.receive(&first)?;
    Ok(decoder.decode(packets)? + 1)
}
