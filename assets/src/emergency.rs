//! The emergency tiny map, §4.5: substituted whenever a `.lvl` fails to
//! build (corrupt source file, compression failure, oversized filename).
//! 29 raw bytes — an otherwise-empty ELVL-tagged map — served uncompressed
//! since there is nothing worth compressing at this size.

use corelib::crc::crc32;
use wire::assets::{FileHeader, MAP_FILE_TYPE};
use wire::support::WirePacket;

/// `b"elvl"` tag, 21 zero bytes, then 4 trailer bytes chosen so the whole
/// 29-byte payload's CRC-32 lands on the pinned constant below.
const EMERGENCY_MAP_BYTES: [u8; 29] = [
    0x65, 0x6C, 0x76, 0x6C, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xEB, 0x42, 0x5F, 0x92,
];

pub const EMERGENCY_MAP_FILENAME: &str = "emergency.lvl";

pub fn emergency_map_asset() -> crate::catalog::MapAsset {
    let crc = crc32(&EMERGENCY_MAP_BYTES);
    let header = FileHeader { file_type: MAP_FILE_TYPE, filename: EMERGENCY_MAP_FILENAME.to_string() };
    let mut buf = vec![0u8; wire::assets::FILE_HEADER_SIZE];
    header
        .encode(&mut std::io::Cursor::new(&mut buf[..]))
        .expect("emergency map filename always fits the fixed wire field");
    buf.extend_from_slice(&EMERGENCY_MAP_BYTES);
    crate::catalog::MapAsset {
        filename: EMERGENCY_MAP_FILENAME.to_string(),
        is_optional: false,
        crc32: crc,
        raw_len: EMERGENCY_MAP_BYTES.len(),
        framed: buf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_map_crc_is_pinned() {
        let asset = emergency_map_asset();
        assert_eq!(asset.crc32, 0x5643_ef8a);
        assert_eq!(asset.raw_len, 29);
    }
}
