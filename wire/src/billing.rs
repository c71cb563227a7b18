//! Billing uplink packet types, §4.7/§6. Strings on this link are
//! NUL-terminated fixed-length fields, matching the rest of the protocol
//! family.

use crate::support::{require_capacity, require_data, SizedRead, SizedWrite, WirePacket};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use corelib::padded::{decode_padded, encode_padded};
use corelib::NetworkResult;

/// Opcodes the zone server sends to the biller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UplinkOpcode {
    ServerConnect = 0x01,
    Login = 0x02,
    Logoff = 0x03,
    UserCommand = 0x04,
    UserChannelChat = 0x05,
    UserPrivateChat = 0x06,
    UserDemographics = 0x07,
    UserBanner = 0x08,
    ServerCapabilities = 0x09,
    Ping = 0x0A,
    ServerDisconnect = 0x0B,
}

/// Opcodes the biller sends down to the zone server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DownlinkOpcode {
    UserLogin = 0x31,
    UserPrivateChat = 0x32,
    UserKickout = 0x33,
    UserCommandChat = 0x34,
    UserChannelChat = 0x35,
    ScoreReset = 0x36,
    UserPacket = 0x37,
    BillingIdentity = 0x38,
    UserMulticastChannelChat = 0x39,
}

impl DownlinkOpcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x31 => DownlinkOpcode::UserLogin,
            0x32 => DownlinkOpcode::UserPrivateChat,
            0x33 => DownlinkOpcode::UserKickout,
            0x34 => DownlinkOpcode::UserCommandChat,
            0x35 => DownlinkOpcode::UserChannelChat,
            0x36 => DownlinkOpcode::ScoreReset,
            0x37 => DownlinkOpcode::UserPacket,
            0x38 => DownlinkOpcode::BillingIdentity,
            0x39 => DownlinkOpcode::UserMulticastChannelChat,
            _ => return None,
        })
    }
}

pub const NAME_FIELD_WIDTH: usize = 32;
pub const PASSWORD_FIELD_WIDTH: usize = 32;
pub const SQUAD_FIELD_WIDTH: usize = 24;
/// Trailing client-specific extra bytes are capped, matching the "truncated
/// to a fixed cap" requirement in §4.7.
pub const EXTRA_DATA_CAP: usize = 64;

/// Outbound `ServerLogin` request (§4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLogin {
    pub name: String,
    pub password: String,
    pub ip: u32,
    pub mac_id: u32,
    pub timezone_bias: i32,
    pub client_version: u32,
    pub extra: Vec<u8>,
}

impl WirePacket for ServerLogin {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        let extra_len = self.extra.len().min(EXTRA_DATA_CAP);
        let size = 1 + NAME_FIELD_WIDTH + PASSWORD_FIELD_WIDTH + 4 + 4 + 4 + 4 + extra_len;
        require_capacity(stream, size)?;
        stream.write_u8(UplinkOpcode::Login as u8)?;
        stream.write_all(
            &encode_padded::<NAME_FIELD_WIDTH>(&self.name)
                .map_err(|_| corelib::NetworkError::Fatal(corelib::ErrorKind::BadLength))?,
        )?;
        stream.write_all(
            &encode_padded::<PASSWORD_FIELD_WIDTH>(&self.password)
                .map_err(|_| corelib::NetworkError::Fatal(corelib::ErrorKind::BadLength))?,
        )?;
        stream.write_u32::<LittleEndian>(self.ip)?;
        stream.write_u32::<LittleEndian>(self.mac_id)?;
        stream.write_i32::<LittleEndian>(self.timezone_bias)?;
        stream.write_u32::<LittleEndian>(self.client_version)?;
        stream.write_all(&self.extra[..extra_len])?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, NAME_FIELD_WIDTH + PASSWORD_FIELD_WIDTH + 16)?;
        let _opcode = stream.read_u8()?;
        let mut name_field = [0u8; NAME_FIELD_WIDTH];
        stream.read_exact(&mut name_field)?;
        let mut password_field = [0u8; PASSWORD_FIELD_WIDTH];
        stream.read_exact(&mut password_field)?;
        let ip = stream.read_u32::<LittleEndian>()?;
        let mac_id = stream.read_u32::<LittleEndian>()?;
        let timezone_bias = stream.read_i32::<LittleEndian>()?;
        let client_version = stream.read_u32::<LittleEndian>()?;
        let mut extra = Vec::new();
        stream.read_to_end(&mut extra)?;
        extra.truncate(EXTRA_DATA_CAP);
        Ok(ServerLogin {
            name: decode_padded(&name_field),
            password: decode_padded(&password_field),
            ip,
            mac_id,
            timezone_bias,
            client_version,
            extra,
        })
    }
}

/// Downlink `UserLogin` response (§4.7), biller -> zone server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLoginResponse {
    pub result_code: u8,
    pub user_id: u32,
    pub first_login: u32,
    pub usage_seconds: u32,
    pub authenticated_name: String,
    pub squad: String,
    pub banner: Option<Vec<u8>>,
    pub score: Option<ScoreBlock>,
}

/// `{kills, deaths, flags, killPoints, flagPoints}`, §4.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBlock {
    pub kills: u32,
    pub deaths: u32,
    pub flags: u32,
    pub kill_points: u32,
    pub flag_points: u32,
}

impl WirePacket for ScoreBlock {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, 20)?;
        stream.write_u32::<LittleEndian>(self.kills)?;
        stream.write_u32::<LittleEndian>(self.deaths)?;
        stream.write_u32::<LittleEndian>(self.flags)?;
        stream.write_u32::<LittleEndian>(self.kill_points)?;
        stream.write_u32::<LittleEndian>(self.flag_points)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, 20)?;
        Ok(ScoreBlock {
            kills: stream.read_u32::<LittleEndian>()?,
            deaths: stream.read_u32::<LittleEndian>()?,
            flags: stream.read_u32::<LittleEndian>()?,
            kill_points: stream.read_u32::<LittleEndian>()?,
            flag_points: stream.read_u32::<LittleEndian>()?,
        })
    }
}

/// Maps a biller result code to the outcome the auth gate acts on (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginResultCode {
    Ok,
    NewName,
    BadPassword,
    LockedOut,
    NoNewConn,
    BadName,
    ServerBusy,
    AskDemographics,
    NoPermission,
}

impl LoginResultCode {
    pub fn from_wire(code: u8) -> Self {
        match code {
            0 => LoginResultCode::Ok,
            1 => LoginResultCode::NewName,
            2 => LoginResultCode::BadPassword,
            3 => LoginResultCode::LockedOut,
            4 => LoginResultCode::NoNewConn,
            5 => LoginResultCode::BadName,
            6 => LoginResultCode::ServerBusy,
            7 => LoginResultCode::AskDemographics,
            _ => LoginResultCode::NoPermission,
        }
    }
}

/// Outbound `ServerLogoff` (§4.7), with an optional trailing score block
/// sent only when a saved score exists and persistence is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLogoff {
    pub user_id: u32,
    pub score: Option<ScoreBlock>,
}

impl WirePacket for ServerLogoff {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        let size = 1 + 4 + if self.score.is_some() { 20 } else { 0 };
        require_capacity(stream, size)?;
        stream.write_u8(UplinkOpcode::Logoff as u8)?;
        stream.write_u32::<LittleEndian>(self.user_id)?;
        if let Some(score) = &self.score {
            score.encode(stream)?;
        }
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, 4)?;
        let _opcode = stream.read_u8()?;
        let user_id = stream.read_u32::<LittleEndian>()?;
        let score = if stream.remaining_data() >= 20 {
            Some(ScoreBlock::decode(stream)?)
        } else {
            None
        };
        Ok(ServerLogoff { user_id, score })
    }
}
