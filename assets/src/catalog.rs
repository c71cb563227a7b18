//! Per-arena map/LVZ catalog, §4.5: one `MapAsset` per file, built once at
//! arena create. `.lvl` files are zlib-compressed; `.lvz` files are sent
//! as-is (they may already be compressed internally).

use crate::emergency::emergency_map_asset;
use corelib::crc::crc32;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use wire::assets::{FileHeader, MAP_FILE_TYPE};

/// Warn (not reject) past this size, §4.5.
pub const WARN_COMPRESSED_SIZE: usize = 256 * 1024;

#[derive(Debug, Clone)]
pub struct MapAsset {
    pub filename: String,
    pub is_optional: bool,
    pub crc32: u32,
    /// The pre-built 17-byte header followed by the (possibly compressed)
    /// payload, ready to serve byte-for-byte to a sized-send producer.
    pub framed: Vec<u8>,
    pub raw_len: usize,
}

impl MapAsset {
    pub fn payload_len(&self) -> usize {
        self.framed.len()
    }

    /// Bytes [offset, offset+buf.len()) of the framed asset (header +
    /// payload), used as the sized-send producer for `MapRequest`.
    pub fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        if offset >= self.framed.len() {
            return 0;
        }
        let end = (offset + buf.len()).min(self.framed.len());
        let n = end - offset;
        buf[..n].copy_from_slice(&self.framed[offset..end]);
        n
    }
}

/// Builds one asset: compresses `.lvl` bytes, passes `.lvz` bytes through,
/// computes the CRC over the *raw* (uncompressed) bytes, and prepends the
/// 17-byte incoming-file header. On `.lvl` compression failure, substitutes
/// the emergency tiny map (§7: permanent I/O failure → degraded mode).
pub fn build_asset(filename: &str, raw: &[u8], is_optional: bool, log: &slog::Logger) -> MapAsset {
    let crc = crc32(raw);
    let is_lvl = filename.to_ascii_lowercase().ends_with(".lvl");
    let payload = if is_lvl {
        match compress_lvl(raw) {
            Ok(compressed) => compressed,
            Err(e) => {
                slog::warn!(log, "lvl compression failed, substituting emergency map"; "filename" => filename, "error" => %e);
                return emergency_map_asset();
            }
        }
    } else {
        raw.to_vec()
    };

    if payload.len() > WARN_COMPRESSED_SIZE {
        slog::warn!(log, "compressed asset exceeds warn threshold"; "filename" => filename, "bytes" => payload.len());
    }

    let header = match (FileHeader { file_type: MAP_FILE_TYPE, filename: filename.to_string() }).encode_to_vec() {
        Ok(bytes) => bytes,
        Err(_) => {
            slog::warn!(log, "filename does not fit the wire field, substituting emergency map"; "filename" => filename);
            return emergency_map_asset();
        }
    };

    let mut framed = header;
    framed.extend_from_slice(&payload);
    MapAsset { filename: filename.to_string(), is_optional, crc32: crc, raw_len: raw.len(), framed }
}

fn compress_lvl(raw: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(raw)?;
    encoder.finish()
}

/// Small helper trait so `build_asset` can use `?`-free error handling on
/// `FileHeader` encoding without pulling in the full `WirePacket` trait's
/// `SizedWrite` machinery for a one-shot `Vec<u8>` buffer.
trait EncodeToVec {
    fn encode_to_vec(&self) -> Result<Vec<u8>, corelib::NetworkError>;
}

impl EncodeToVec for FileHeader {
    fn encode_to_vec(&self) -> Result<Vec<u8>, corelib::NetworkError> {
        use wire::support::WirePacket;
        let mut buf = vec![0u8; wire::assets::FILE_HEADER_SIZE];
        self.encode(&mut std::io::Cursor::new(&mut buf[..]))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> slog::Logger {
        corelib::logging::discard()
    }

    #[test]
    fn lvz_files_pass_through_uncompressed() {
        let raw = b"already-compressed-lvz-bytes";
        let asset = build_asset("tiles.lvz", raw, true, &log());
        assert_eq!(asset.crc32, crc32(raw));
        assert!(asset.framed.ends_with(raw));
    }

    #[test]
    fn lvl_files_are_compressed_but_crc_is_over_raw_bytes() {
        let raw = vec![0u8; 4096];
        let asset = build_asset("bigmap.lvl", &raw, false, &log());
        assert_eq!(asset.crc32, crc32(&raw));
        assert!(asset.payload_len() < raw.len() + wire::assets::FILE_HEADER_SIZE);
    }

    #[test]
    fn read_at_serves_contiguous_framed_bytes() {
        let raw = b"hello world";
        let asset = build_asset("tiny.lvz", raw, false, &log());
        let mut buf = vec![0u8; asset.payload_len()];
        let n = asset.read_at(0, &mut buf);
        assert_eq!(n, asset.payload_len());
        assert!(buf.ends_with(raw));
    }

    #[test]
    fn read_at_past_end_returns_zero() {
        let asset = build_asset("tiny.lvz", b"x", false, &log());
        let mut buf = [0u8; 4];
        assert_eq!(asset.read_at(asset.payload_len(), &mut buf), 0);
    }
}
