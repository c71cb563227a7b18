//! Sized-send download engine: streams a byte source (file or in-memory) to
//! a client behind a 17-byte type+filename header, §4.6.

use corelib::padded::{encode_padded, PaddedFieldError};
use slog::Logger;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

pub const HEADER_SIZE: usize = 17;
/// The reliable transport's sized-send length is an i32; 17 bytes are spent
/// on the header, so the source must leave room for it.
pub const MAX_SOURCE_SIZE: u64 = i32::MAX as u64 - HEADER_SIZE as u64;

#[derive(Debug)]
pub enum DownloadError {
    TooLarge { size: u64 },
    BadFilename(PaddedFieldError),
    Io(io::Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::TooLarge { size } => {
                write!(f, "source size {} exceeds the sized-send limit", size)
            }
            DownloadError::BadFilename(err) => write!(f, "bad filename: {}", err),
            DownloadError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<io::Error> for DownloadError {
    fn from(err: io::Error) -> Self {
        DownloadError::Io(err)
    }
}

/// A producer-side download: a 17-byte header plus a streamed byte source,
/// of known total length (`header + remaining source bytes`).
pub struct Download {
    header: [u8; HEADER_SIZE],
    source: Box<dyn Read + Send>,
    total_size: u64,
    delete_after: Option<PathBuf>,
    log: Logger,
    completed: bool,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("header", &self.header)
            .field("total_size", &self.total_size)
            .field("delete_after", &self.delete_after)
            .field("completed", &self.completed)
            .finish()
    }
}

impl Download {
    /// `source_len` is the number of bytes the source will yield from its
    /// current position. `filename` must encode to 1..=15 bytes so a
    /// trailing NUL fits in the 16-byte field (news' empty/all-NUL filename
    /// is a special case built directly via `wire::assets::FileHeader::news`,
    /// not through this generic constructor).
    pub fn new(
        file_type: u8,
        filename: &str,
        source_len: u64,
        source: Box<dyn Read + Send>,
        delete_after: Option<PathBuf>,
        log: &Logger,
    ) -> Result<Download, DownloadError> {
        if filename.is_empty() || filename.len() > 15 {
            return Err(DownloadError::BadFilename(PaddedFieldError {
                encoded_len: filename.len(),
                capacity: 16,
            }));
        }
        if source_len > MAX_SOURCE_SIZE {
            return Err(DownloadError::TooLarge { size: source_len });
        }

        let field = encode_padded::<16>(filename).map_err(DownloadError::BadFilename)?;
        let mut header = [0u8; HEADER_SIZE];
        header[0] = file_type;
        header[1..].copy_from_slice(&field);

        Ok(Download {
            header,
            source,
            total_size: source_len + HEADER_SIZE as u64,
            delete_after,
            log: log.new(slog::o!("filename" => filename.to_string())),
            completed: false,
        })
    }

    /// Total bytes the sized-send must advertise (header + source).
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Producer callback contract: fill `buf` from the header for bytes
    /// `[0, 17)` at `offset`, then from the stream thereafter, reading
    /// contiguously until `buf` is full or the source is exhausted. Called
    /// with an empty `buf` to signal the transfer is done (cancellation or
    /// natural completion); on that call the source is dropped and, if
    /// requested, the source path is deleted.
    pub fn produce(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            self.finish();
            return Ok(0);
        }

        let mut written = 0usize;

        if offset < HEADER_SIZE as u64 {
            let header_offset = offset as usize;
            let available = HEADER_SIZE - header_offset;
            let take = available.min(buf.len());
            buf[..take].copy_from_slice(&self.header[header_offset..header_offset + take]);
            written += take;
        }

        if written < buf.len() {
            written += self.source.read(&mut buf[written..])?;
        }

        Ok(written)
    }

    fn finish(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        slog::info!(self.log, "download complete");
        if let Some(path) = self.delete_after.take() {
            if let Err(err) = fs::remove_file(&path) {
                slog::warn!(self.log, "failed deleting source after send"; "path" => ?path, "error" => %err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::logging::discard;
    use std::io::Cursor;

    #[test]
    fn header_then_body_is_contiguous() {
        let body = b"hello world".to_vec();
        let log = discard();
        let mut dl = Download::new(0x2A, "zone.lvl", body.len() as u64, Box::new(Cursor::new(body.clone())), None, &log).unwrap();

        let mut out = Vec::new();
        let mut offset = 0u64;
        loop {
            let mut buf = [0u8; 4];
            let n = dl.produce(offset, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
            offset += n as u64;
        }
        assert_eq!(&out[..HEADER_SIZE], &dl.header[..]);
        assert_eq!(&out[HEADER_SIZE..], &body[..]);
    }

    #[test]
    fn rejects_oversized_filename() {
        let log = discard();
        let name: String = std::iter::repeat('a').take(16).collect();
        let err = Download::new(0x2A, &name, 10, Box::new(Cursor::new(vec![0u8; 10])), None, &log).unwrap_err();
        assert!(matches!(err, DownloadError::BadFilename(_)));
    }

    #[test]
    fn rejects_source_too_large() {
        let log = discard();
        let err = Download::new(0x2A, "x", MAX_SOURCE_SIZE + 1, Box::new(Cursor::new(Vec::new())), None, &log)
            .unwrap_err();
        assert!(matches!(err, DownloadError::TooLarge { .. }));
    }

    #[test]
    fn empty_buffer_marks_complete_without_panicking() {
        let log = discard();
        let mut dl = Download::new(0x2A, "x", 4, Box::new(Cursor::new(vec![1, 2, 3, 4])), None, &log).unwrap();
        assert_eq!(dl.produce(0, &mut []).unwrap(), 0);
        assert!(dl.completed);
    }
}
