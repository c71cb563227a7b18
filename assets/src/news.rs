//! The news watcher, §4.5/§6/§7: `news.txt`, compressed and reloaded only
//! when its CRC changes, with a bounded retry for "file temporarily
//! locked" races (30 attempts, 100ms apart).

use corelib::crc::crc32;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use wire::assets::FileHeader;
use wire::support::WirePacket;

pub const RELOAD_MAX_ATTEMPTS: u32 = 30;
pub const RELOAD_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct NewsBlob {
    pub crc32: u32,
    /// 17-byte all-NUL-filename header followed by the compressed payload.
    pub framed: Vec<u8>,
}

impl NewsBlob {
    pub fn is_empty(&self) -> bool {
        self.framed.len() <= wire::assets::FILE_HEADER_SIZE
    }

    pub fn payload_len(&self) -> usize {
        self.framed.len()
    }

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

fn build_blob(raw: &[u8]) -> io::Result<NewsBlob> {
    let crc = crc32(raw);
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(raw)?;
    let compressed = encoder.finish()?;
    let header = FileHeader::news();
    let mut framed = vec![0u8; wire::assets::FILE_HEADER_SIZE];
    header
        .encode(&mut io::Cursor::new(&mut framed[..]))
        .expect("news header always fits the fixed wire field");
    framed.extend_from_slice(&compressed);
    Ok(NewsBlob { crc32: crc, framed })
}

/// §7 "transient I/O, retry with backoff bounded by attempts": retries
/// `read_fn` on any error up to `RELOAD_MAX_ATTEMPTS` times, 100ms apart,
/// then gives up and leaves the caller's last-good blob in place.
pub fn read_with_retry(mut read_fn: impl FnMut() -> io::Result<Vec<u8>>) -> io::Result<Vec<u8>> {
    let mut last_err = None;
    for attempt in 0..RELOAD_MAX_ATTEMPTS {
        match read_fn() {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                last_err = Some(e);
                if attempt + 1 < RELOAD_MAX_ATTEMPTS {
                    thread::sleep(RELOAD_RETRY_DELAY);
                }
            }
        }
    }
    Err(last_err.expect("loop runs at least once"))
}

/// §6 S6: reload only if the raw content actually changed (by CRC); an
/// identical replacement is a drivel-level no-op, not a rebroadcast.
pub fn reload_if_changed(current: Option<&NewsBlob>, raw: &[u8]) -> io::Result<Option<NewsBlob>> {
    let new_crc = crc32(raw);
    if current.map(|c| c.crc32) == Some(new_crc) {
        return Ok(None);
    }
    build_blob(raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_does_not_trigger_a_reload() {
        let first = build_blob(b"hello").unwrap();
        let result = reload_if_changed(Some(&first), b"hello").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn changed_content_produces_a_new_blob_with_a_different_crc() {
        let first = build_blob(b"hello").unwrap();
        let result = reload_if_changed(Some(&first), b"goodbye").unwrap().unwrap();
        assert_ne!(result.crc32, first.crc32);
    }

    #[test]
    fn missing_current_blob_always_reloads() {
        let result = reload_if_changed(None, b"first run").unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn read_with_retry_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result = read_with_retry(|| {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::WouldBlock, "locked"))
        });
        assert!(result.is_err());
        assert_eq!(calls, RELOAD_MAX_ATTEMPTS);
    }

    #[test]
    fn read_with_retry_succeeds_once_the_lock_clears() {
        let mut calls = 0;
        let result = read_with_retry(|| {
            calls += 1;
            if calls < 3 {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "locked"))
            } else {
                Ok(b"news content".to_vec())
            }
        });
        assert_eq!(result.unwrap(), b"news content");
        assert_eq!(calls, 3);
    }
}
