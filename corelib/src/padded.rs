//! Fixed-width, NUL-padded ASCII byte fields, as used on the wire for map
//! filenames and billing identity strings.

use std::fmt;

#[derive(Debug, Eq, PartialEq)]
pub struct PaddedFieldError {
    pub encoded_len: usize,
    pub capacity: usize,
}

impl fmt::Display for PaddedFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value encodes to {} bytes, which does not leave room for a trailing NUL in a {}-byte field",
            self.encoded_len, self.capacity
        )
    }
}

impl std::error::Error for PaddedFieldError {}

/// Encode `value` into a `WIDTH`-byte NUL-padded field. `value` must encode
/// to at most `WIDTH - 1` bytes so a trailing NUL always fits, matching the
/// map asset filename contract (<=15 bytes of name in a 16-byte field).
pub fn encode_padded<const WIDTH: usize>(value: &str) -> Result<[u8; WIDTH], PaddedFieldError> {
    let bytes = value.as_bytes();
    if bytes.len() > WIDTH - 1 {
        return Err(PaddedFieldError {
            encoded_len: bytes.len(),
            capacity: WIDTH,
        });
    }
    let mut field = [0u8; WIDTH];
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(field)
}

/// Decode a NUL-padded field back into a string, stopping at the first NUL.
/// Bytes are interpreted as Latin-1/ASCII, matching the client's wire
/// contract; non-ASCII bytes are kept verbatim via lossy UTF-8 decoding.
pub fn decode_padded(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let encoded = encode_padded::<16>("bigmap.lvl").unwrap();
        assert_eq!(decode_padded(&encoded), "bigmap.lvl");
        assert_eq!(encoded[10], 0);
    }

    #[test]
    fn rejects_names_with_no_room_for_nul() {
        // 15 bytes exactly fills a 16-byte field with no room for the NUL.
        let name: String = std::iter::repeat('a').take(15).collect();
        assert!(encode_padded::<16>(&name).is_err());
        let name: String = std::iter::repeat('a').take(14).collect();
        assert!(encode_padded::<16>(&name).is_ok());
    }

    #[test]
    fn decode_stops_at_first_nul() {
        let mut field = [b'x'; 8];
        field[3] = 0;
        field[4] = b'y';
        assert_eq!(decode_padded(&field), "xxx");
    }
}
