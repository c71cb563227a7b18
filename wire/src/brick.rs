//! Brick packet, §6: type byte + up to N records of
//! `{x1(i16), y1(i16), x2(i16), y2(i16), freq(i16), brickId(u16), startTime(u32)}`.

use crate::support::{require_capacity, require_data, SizedRead, SizedWrite, WirePacket};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use corelib::NetworkResult;

pub const BRICK_PACKET_TYPE: u8 = 0x21;
pub const BRICK_RECORD_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickRecord {
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
    pub freq: i16,
    pub brick_id: u16,
    pub start_time: u32,
}

impl WirePacket for BrickRecord {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, BRICK_RECORD_SIZE)?;
        stream.write_i16::<LittleEndian>(self.x1)?;
        stream.write_i16::<LittleEndian>(self.y1)?;
        stream.write_i16::<LittleEndian>(self.x2)?;
        stream.write_i16::<LittleEndian>(self.y2)?;
        stream.write_i16::<LittleEndian>(self.freq)?;
        stream.write_u16::<LittleEndian>(self.brick_id)?;
        stream.write_u32::<LittleEndian>(self.start_time)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, BRICK_RECORD_SIZE)?;
        Ok(BrickRecord {
            x1: stream.read_i16::<LittleEndian>()?,
            y1: stream.read_i16::<LittleEndian>()?,
            x2: stream.read_i16::<LittleEndian>()?,
            y2: stream.read_i16::<LittleEndian>()?,
            freq: stream.read_i16::<LittleEndian>()?,
            brick_id: stream.read_u16::<LittleEndian>()?,
            start_time: stream.read_u32::<LittleEndian>()?,
        })
    }
}

/// Given the maximum packet size and the reliable-transport header
/// overhead, compute how many brick records fit in one packet (§4.3).
#[inline]
pub fn records_per_packet(max_packet: usize, reliable_header: usize) -> usize {
    (max_packet.saturating_sub(reliable_header + 1)) / BRICK_RECORD_SIZE
}

/// Split `records` into reliable-header-budgeted chunks ready for framing.
pub fn chunk_records(records: &[BrickRecord], per_packet: usize) -> Vec<&[BrickRecord]> {
    if per_packet == 0 {
        return Vec::new();
    }
    records.chunks(per_packet).collect()
}
