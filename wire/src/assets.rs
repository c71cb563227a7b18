//! Map/LVZ/news wire formats, §6: the filename announce packet and the
//! 17-byte incoming-file header shared by map data and news payloads.

use crate::support::{require_capacity, require_data, SizedRead, SizedWrite, WirePacket};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use corelib::padded::{decode_padded, encode_padded};
use corelib::NetworkResult;

pub const MAP_FILENAME_TYPE: u8 = 0x29;
pub const NEWS_FILE_TYPE: u8 = 0x10;
pub const MAP_FILE_TYPE: u8 = 0x2A;

pub const FILENAME_FIELD_WIDTH: usize = 16;
/// 1 type byte + 16-byte filename.
pub const FILE_HEADER_SIZE: usize = 1 + FILENAME_FIELD_WIDTH;

/// One entry in the multi-file announce array: `{filename, crc32, size}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFileEntry {
    pub filename: String,
    pub crc32: u32,
    pub size: u32,
}

impl WirePacket for MapFileEntry {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        const ENTRY_SIZE: usize = FILENAME_FIELD_WIDTH + 4 + 4;
        require_capacity(stream, ENTRY_SIZE)?;
        let field = encode_padded::<FILENAME_FIELD_WIDTH>(&self.filename)
            .map_err(|_| corelib::NetworkError::Fatal(corelib::ErrorKind::BadLength))?;
        stream.write_all(&field)?;
        stream.write_u32::<LittleEndian>(self.crc32)?;
        stream.write_u32::<LittleEndian>(self.size)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        const ENTRY_SIZE: usize = FILENAME_FIELD_WIDTH + 4 + 4;
        require_data(stream, ENTRY_SIZE)?;
        let mut field = [0u8; FILENAME_FIELD_WIDTH];
        stream.read_exact(&mut field)?;
        let crc32 = stream.read_u32::<LittleEndian>()?;
        let size = stream.read_u32::<LittleEndian>()?;
        Ok(MapFileEntry {
            filename: decode_padded(&field),
            crc32,
            size,
        })
    }
}

/// Single-entry primary-map announce: `{filename(16B), crc32(LE u32)}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryMapAnnounce {
    pub filename: String,
    pub crc32: u32,
}

impl WirePacket for PrimaryMapAnnounce {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, 1 + FILENAME_FIELD_WIDTH + 4)?;
        stream.write_u8(MAP_FILENAME_TYPE)?;
        let field = encode_padded::<FILENAME_FIELD_WIDTH>(&self.filename)
            .map_err(|_| corelib::NetworkError::Fatal(corelib::ErrorKind::BadLength))?;
        stream.write_all(&field)?;
        stream.write_u32::<LittleEndian>(self.crc32)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, FILENAME_FIELD_WIDTH + 4)?;
        let _type = stream.read_u8();
        let mut field = [0u8; FILENAME_FIELD_WIDTH];
        stream.read_exact(&mut field)?;
        let crc32 = stream.read_u32::<LittleEndian>()?;
        Ok(PrimaryMapAnnounce {
            filename: decode_padded(&field),
            crc32,
        })
    }
}

/// Build the multi-file announce packet body (type byte already written by
/// the caller's framing layer in the reliable transport).
pub fn encode_file_list<W: SizedWrite>(entries: &[MapFileEntry], stream: &mut W) -> NetworkResult<()> {
    require_capacity(stream, 1)?;
    stream.write_u8(MAP_FILENAME_TYPE)?;
    for entry in entries {
        entry.encode(stream)?;
    }
    Ok(())
}

/// 17-byte incoming-file header: 1 type byte + 16-byte NUL-padded filename.
/// The news blob uses an all-NUL filename field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub file_type: u8,
    pub filename: String,
}

impl FileHeader {
    pub fn news() -> Self {
        FileHeader {
            file_type: NEWS_FILE_TYPE,
            filename: String::new(),
        }
    }

    pub fn map(filename: &str) -> Self {
        FileHeader {
            file_type: MAP_FILE_TYPE,
            filename: filename.to_string(),
        }
    }
}

impl WirePacket for FileHeader {
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()> {
        require_capacity(stream, FILE_HEADER_SIZE)?;
        stream.write_u8(self.file_type)?;
        let field = encode_padded::<FILENAME_FIELD_WIDTH>(&self.filename)
            .map_err(|_| corelib::NetworkError::Fatal(corelib::ErrorKind::BadLength))?;
        stream.write_all(&field)?;
        Ok(())
    }

    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self> {
        require_data(stream, FILE_HEADER_SIZE)?;
        let file_type = stream.read_u8()?;
        let mut field = [0u8; FILENAME_FIELD_WIDTH];
        stream.read_exact(&mut field)?;
        Ok(FileHeader {
            file_type,
            filename: decode_padded(&field),
        })
    }
}
