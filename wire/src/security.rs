//! Security request/response packets, §6. All request fields are LE u32;
//! the response packet mirrors the client's lag/checksum report.

use crate::support::{require_capacity, require_data, SizedRead, SizedWrite, WirePacket};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use corelib::NetworkResult;

pub const SECURITY_REQUEST_TYPE: u8 = 0x18;
pub const SECURITY_RESPONSE_TYPE: u8 = 0x1A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityRequest {
    pub green_seed: u32,
    pub door_seed: u32,
    pub timestamp: u32,
    pub key: u32,
}

impl WirePacket for SecurityRequest {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, 17)?;
        stream.write_u8(SECURITY_REQUEST_TYPE)?;
        stream.write_u32::<LittleEndian>(self.green_seed)?;
        stream.write_u32::<LittleEndian>(self.door_seed)?;
        stream.write_u32::<LittleEndian>(self.timestamp)?;
        stream.write_u32::<LittleEndian>(self.key)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, 16)?;
        Ok(SecurityRequest {
            green_seed: stream.read_u32::<LittleEndian>()?,
            door_seed: stream.read_u32::<LittleEndian>()?,
            timestamp: stream.read_u32::<LittleEndian>()?,
            key: stream.read_u32::<LittleEndian>()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityResponse {
    pub weapon_count: u32,
    pub s2c_slow_total: u16,
    pub s2c_fast_total: u16,
    pub s2c_slow_current: u16,
    pub s2c_fast_current: u16,
    pub unknown1: u16,
    pub last_ping: u16,
    pub average_ping: u16,
    pub lowest_ping: u16,
    pub highest_ping: u16,
    pub map_checksum: u32,
    pub exe_checksum: u32,
    pub setting_checksum: u32,
}

impl WirePacket for SecurityResponse {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, 37)?;
        stream.write_u8(SECURITY_RESPONSE_TYPE)?;
        stream.write_u32::<LittleEndian>(self.weapon_count)?;
        stream.write_u16::<LittleEndian>(self.s2c_slow_total)?;
        stream.write_u16::<LittleEndian>(self.s2c_fast_total)?;
        stream.write_u16::<LittleEndian>(self.s2c_slow_current)?;
        stream.write_u16::<LittleEndian>(self.s2c_fast_current)?;
        stream.write_u16::<LittleEndian>(self.unknown1)?;
        stream.write_u16::<LittleEndian>(self.last_ping)?;
        stream.write_u16::<LittleEndian>(self.average_ping)?;
        stream.write_u16::<LittleEndian>(self.lowest_ping)?;
        stream.write_u16::<LittleEndian>(self.highest_ping)?;
        stream.write_u32::<LittleEndian>(self.map_checksum)?;
        stream.write_u32::<LittleEndian>(self.exe_checksum)?;
        stream.write_u32::<LittleEndian>(self.setting_checksum)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, 36)?;
        Ok(SecurityResponse {
            weapon_count: stream.read_u32::<LittleEndian>()?,
            s2c_slow_total: stream.read_u16::<LittleEndian>()?,
            s2c_fast_total: stream.read_u16::<LittleEndian>()?,
            s2c_slow_current: stream.read_u16::<LittleEndian>()?,
            s2c_fast_current: stream.read_u16::<LittleEndian>()?,
            unknown1: stream.read_u16::<LittleEndian>()?,
            last_ping: stream.read_u16::<LittleEndian>()?,
            average_ping: stream.read_u16::<LittleEndian>()?,
            lowest_ping: stream.read_u16::<LittleEndian>()?,
            highest_ping: stream.read_u16::<LittleEndian>()?,
            map_checksum: stream.read_u32::<LittleEndian>()?,
            exe_checksum: stream.read_u32::<LittleEndian>()?,
            setting_checksum: stream.read_u32::<LittleEndian>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn request_roundtrips() {
        let req = SecurityRequest {
            green_seed: 0x1111_2222,
            door_seed: 0x3333_4444,
            timestamp: 1_700_000_000,
            key: 0xdead_beef,
        };
        let mut buf = [0u8; 17];
        req.encode(&mut Cursor::new(&mut buf[..])).unwrap();
        assert_eq!(SecurityRequest::decode(&mut Cursor::new(&buf[..])).unwrap(), req);
    }

    #[test]
    fn response_roundtrips() {
        let resp = SecurityResponse {
            weapon_count: 12,
            map_checksum: 0xAABB_CCDD,
            exe_checksum: 0x1122_3344,
            setting_checksum: 0x5566_7788,
            ..Default::default()
        };
        let mut buf = [0u8; 37];
        resp.encode(&mut Cursor::new(&mut buf[..])).unwrap();
        assert_eq!(SecurityResponse::decode(&mut Cursor::new(&buf[..])).unwrap(), resp);
    }
}
