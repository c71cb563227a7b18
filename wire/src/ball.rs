//! Server<->client ball packet, §6: `{type, ballId(u8), x(i16), y(i16),
//! xSpeed(i16), ySpeed(i16), carrierId(i16, -1 if none), time(u32)}`.

use crate::support::{require_capacity, require_data, SizedRead, SizedWrite, WirePacket};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use corelib::NetworkResult;

pub const BALL_PACKET_TYPE: u8 = 0x03;
pub const BALL_PACKET_SIZE: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallPacket {
    pub ball_id: u8,
    pub x: i16,
    pub y: i16,
    pub x_speed: i16,
    pub y_speed: i16,
    /// `None` encodes as wire value `-1`.
    pub carrier_id: Option<i16>,
    pub time: u32,
}

impl WirePacket for BallPacket {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, BALL_PACKET_SIZE)?;
        stream.write_u8(BALL_PACKET_TYPE)?;
        stream.write_u8(self.ball_id)?;
        stream.write_i16::<LittleEndian>(self.x)?;
        stream.write_i16::<LittleEndian>(self.y)?;
        stream.write_i16::<LittleEndian>(self.x_speed)?;
        stream.write_i16::<LittleEndian>(self.y_speed)?;
        stream.write_i16::<LittleEndian>(self.carrier_id.unwrap_or(-1))?;
        stream.write_u32::<LittleEndian>(self.time)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, BALL_PACKET_SIZE)?;
        let _type = stream.read_u8()?;
        let ball_id = stream.read_u8()?;
        let x = stream.read_i16::<LittleEndian>()?;
        let y = stream.read_i16::<LittleEndian>()?;
        let x_speed = stream.read_i16::<LittleEndian>()?;
        let y_speed = stream.read_i16::<LittleEndian>()?;
        let carrier_raw = stream.read_i16::<LittleEndian>()?;
        let time = stream.read_u32::<LittleEndian>()?;
        Ok(BallPacket {
            ball_id,
            x,
            y,
            x_speed,
            y_speed,
            carrier_id: if carrier_raw < 0 { None } else { Some(carrier_raw) },
            time,
        })
    }
}

/// Inbound `PickupBall{ballId, time}` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupBallRequest {
    pub ball_id: u8,
    pub time: u32,
}

impl WirePacket for PickupBallRequest {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, 6)?;
        stream.write_u8(self.ball_id)?;
        stream.write_u32::<LittleEndian>(self.time)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, 5)?;
        let ball_id = stream.read_u8()?;
        let time = stream.read_u32::<LittleEndian>()?;
        Ok(PickupBallRequest { ball_id, time })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ball_packet_roundtrips_with_carrier() {
        let packet = BallPacket {
            ball_id: 3,
            x: -100,
            y: 250,
            x_speed: 10,
            y_speed: -10,
            carrier_id: Some(42),
            time: 0,
        };
        let mut buf = [0u8; BALL_PACKET_SIZE];
        packet.encode(&mut Cursor::new(&mut buf[..])).unwrap();
        let decoded = BallPacket::decode(&mut Cursor::new(&buf[..])).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn ball_packet_roundtrips_without_carrier() {
        let packet = BallPacket {
            ball_id: 0,
            x: 512,
            y: 512,
            x_speed: 0,
            y_speed: 0,
            carrier_id: None,
            time: 12345,
        };
        let mut buf = [0u8; BALL_PACKET_SIZE];
        packet.encode(&mut Cursor::new(&mut buf[..])).unwrap();
        let decoded = BallPacket::decode(&mut Cursor::new(&buf[..])).unwrap();
        assert_eq!(decoded.carrier_id, None);
    }

    #[test]
    fn decode_signals_wait_on_short_buffer() {
        let buf = [0u8; 4];
        let err = BallPacket::decode(&mut Cursor::new(&buf[..])).unwrap_err();
        assert_eq!(err, corelib::NetworkError::Wait);
    }
}
