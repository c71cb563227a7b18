//! CRC-32 helpers shared by the asset streamer, the security cycle's map
//! checksum, and the config-authorization advisor's file-change detector.

use crc32fast::Hasher;

/// Compute the CRC-32 (IEEE) of a byte slice.
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// A reusable hasher for callers that fold many slices (e.g. a map checksum
/// walking non-contiguous tile regions) without re-allocating per call.
pub struct Crc32Pool {
    hasher: Hasher,
}

impl Crc32Pool {
    pub fn new() -> Self {
        Crc32Pool { hasher: Hasher::new() }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.update(data);
        self
    }

    /// Finalize and reset the pool for reuse.
    pub fn finish(&mut self) -> u32 {
        let finished = std::mem::replace(&mut self.hasher, Hasher::new());
        finished.finalize()
    }
}

impl Default for Crc32Pool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn pool_matches_one_shot() {
        let mut pool = Crc32Pool::new();
        pool.update(b"hello ").update(b"world");
        assert_eq!(pool.finish(), crc32(b"hello world"));
    }

    #[test]
    fn pool_resets_after_finish() {
        let mut pool = Crc32Pool::new();
        pool.update(b"abc");
        let first = pool.finish();
        pool.update(b"abc");
        assert_eq!(pool.finish(), first);
    }
}
