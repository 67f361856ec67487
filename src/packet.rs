//! The encoded packet and its binary form.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::chunks::chunk_count;
use crate::LubyError;

/// One encoded block of a packet stream.
///
/// A packet is self-describing: `seed` regenerates the set of source
/// chunks that were XORed into `data`, while `payload_size` and
/// `chunk_size` let a receiver size its destination and derive the same
/// chunk count the encoder used. How packets are framed on the wire is
/// the caller's business; [`Packet::write_to`] and [`Packet::read_from`]
/// only fix the byte layout of one packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    seed: u32,
    payload_size: u64,
    chunk_size: u32,
    data: Vec<u8>,
}

impl Packet {
    pub fn new(seed: u32, payload_size: u64, chunk_size: u32, data: Vec<u8>) -> Self {
        Self {
            seed,
            payload_size,
            chunk_size,
            data,
        }
    }

    /// The seed the packet's chunk indices are derived from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Size in bytes of the whole source payload.
    pub fn payload_size(&self) -> u64 {
        self.payload_size
    }

    /// Size in bytes of a full chunk.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// The XOR of the source chunks selected by [`Packet::seed`].
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of chunks the payload splits into.
    pub fn chunk_count(&self) -> u64 {
        chunk_count(self.payload_size, self.chunk_size)
    }

    /// Tries to read one packet from the source.
    pub fn read_from<R: Read>(src: &mut R) -> crate::Result<Self> {
        let seed = src.read_u32::<LittleEndian>()?;
        let payload_size = src.read_u64::<LittleEndian>()?;
        let chunk_size = src.read_u32::<LittleEndian>()?;
        let data_len = src.read_u32::<LittleEndian>()?;

        if chunk_size == 0 {
            return Err(LubyError::InvalidChunkSize);
        }
        if data_len > chunk_size {
            return Err(LubyError::OversizedData {
                len: data_len as usize,
                chunk_size,
            });
        }

        let mut data = vec![0u8; data_len as usize];
        src.read_exact(&mut data)?;
        Ok(Self {
            seed,
            payload_size,
            chunk_size,
            data,
        })
    }

    /// Writes the packet to the destination.
    pub fn write_to<W: Write>(&self, dst: &mut W) -> std::io::Result<()> {
        dst.write_u32::<LittleEndian>(self.seed)?;
        dst.write_u64::<LittleEndian>(self.payload_size)?;
        dst.write_u32::<LittleEndian>(self.chunk_size)?;
        dst.write_u32::<LittleEndian>(self.data.len() as u32)?;
        dst.write_all(&self.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn packet_round_trips() {
        let packet = Packet::new(0xDEAD_BEEF, 113, 5, vec![1, 2, 3, 4, 5]);

        let mut buffer = Cursor::new(Vec::<u8>::new());
        packet.write_to(&mut buffer).unwrap();

        buffer.set_position(0);
        assert_eq!(Packet::read_from(&mut buffer).unwrap(), packet);
    }

    #[test]
    fn empty_data_round_trips() {
        let packet = Packet::new(3, 16, 4, vec![]);

        let mut buffer = Cursor::new(Vec::<u8>::new());
        packet.write_to(&mut buffer).unwrap();

        buffer.set_position(0);
        assert_eq!(Packet::read_from(&mut buffer).unwrap(), packet);
    }

    #[test]
    fn oversized_data_is_rejected() {
        let mut buffer = Cursor::new(Vec::<u8>::new());
        buffer.write_u32::<LittleEndian>(7).unwrap();
        buffer.write_u64::<LittleEndian>(100).unwrap();
        buffer.write_u32::<LittleEndian>(4).unwrap();
        // claims 5 data bytes for 4 byte chunks
        buffer.write_u32::<LittleEndian>(5).unwrap();
        buffer.write_all(&[0u8; 5]).unwrap();

        buffer.set_position(0);
        match Packet::read_from(&mut buffer) {
            Err(LubyError::OversizedData { len, chunk_size }) => {
                assert_eq!(len, 5);
                assert_eq!(chunk_size, 4);
            }
            other => panic!("expected OversizedData, got {:?}", other),
        }
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let mut buffer = Cursor::new(Vec::<u8>::new());
        buffer.write_u32::<LittleEndian>(7).unwrap();
        buffer.write_u64::<LittleEndian>(100).unwrap();
        buffer.write_u32::<LittleEndian>(0).unwrap();
        buffer.write_u32::<LittleEndian>(0).unwrap();

        buffer.set_position(0);
        assert!(matches!(
            Packet::read_from(&mut buffer),
            Err(LubyError::InvalidChunkSize)
        ));
    }

    #[test]
    fn truncated_packet_is_an_io_error() {
        let packet = Packet::new(1, 16, 4, vec![9, 9, 9, 9]);
        let mut buffer = Cursor::new(Vec::<u8>::new());
        packet.write_to(&mut buffer).unwrap();

        let bytes = buffer.into_inner();
        let mut truncated = Cursor::new(&bytes[..bytes.len() - 2]);
        assert!(matches!(
            Packet::read_from(&mut truncated),
            Err(LubyError::IoError(_))
        ));
    }

    #[test]
    fn chunk_count_is_derived_from_the_header() {
        assert_eq!(Packet::new(0, 113, 5, vec![]).chunk_count(), 23);
        assert_eq!(Packet::new(0, 10, 10, vec![]).chunk_count(), 1);
        assert_eq!(Packet::new(0, 0, 10, vec![]).chunk_count(), 0);
    }
}
