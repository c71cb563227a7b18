//! Manual wire (de)serialization support, generalized from
//! `flux::shared::{Serialize, Deserialize, SizedWrite, SizedRead}`. The
//! client wire formats are bit-exact, so packets are never derived from a
//! generic serde format — every struct below hand-writes its layout.

use corelib::{ErrorKind, NetworkError, NetworkResult};
use std::io;

/// Augmented `io::Write` that is aware of remaining free capacity, so a
/// packet builder can bail out with `NetworkError::Wait` instead of
/// panicking when a datagram is full.
pub trait SizedWrite: io::Write {
    fn free_capacity(&self) -> usize;
}

/// Augmented `io::Read` that is aware of remaining data.
pub trait SizedRead: io::Read {
    fn remaining_data(&self) -> usize;
}

impl SizedWrite for io::Cursor<&mut [u8]> {
    fn free_capacity(&self) -> usize {
        self.get_ref().len() - self.position() as usize
    }
}

impl SizedWrite for io::Cursor<Vec<u8>> {
    fn free_capacity(&self) -> usize {
        usize::MAX - self.position() as usize
    }
}

impl SizedRead for io::Cursor<&[u8]> {
    fn remaining_data(&self) -> usize {
        self.get_ref().len() - self.position() as usize
    }
}

/// A type with a fixed, bit-exact wire layout.
pub trait WirePacket: Sized {
    /// Encode into `stream`, returning `NetworkError::Wait` if the stream's
    /// remaining free capacity is too small rather than panicking.
    fn encode<W: SizedWrite>(&self, stream: &mut W) -> NetworkResult<()>;

    /// Decode from `stream`, returning `NetworkError::Wait` if fewer bytes
    /// remain than the fixed layout requires.
    fn decode<R: SizedRead>(stream: &mut R) -> NetworkResult<Self>;
}

/// Require at least `n` bytes of write capacity, else signal `Wait`.
#[inline]
pub fn require_capacity<W: SizedWrite>(stream: &W, n: usize) -> NetworkResult<()> {
    if stream.free_capacity() < n {
        Err(NetworkError::Wait)
    } else {
        Ok(())
    }
}

/// Require at least `n` bytes of remaining data, else signal `Wait`.
#[inline]
pub fn require_data<R: SizedRead>(stream: &R, n: usize) -> NetworkResult<()> {
    if stream.remaining_data() < n {
        Err(NetworkError::Wait)
    } else {
        Ok(())
    }
}

/// Reject a packet whose declared length does not match what the transport
/// actually delivered; this is the "malicious: bad length" case from the
/// error handling design, not a `Wait`.
#[inline]
pub fn require_exact_len(actual: usize, expected: usize) -> NetworkResult<()> {
    if actual < expected {
        Err(NetworkError::Fatal(ErrorKind::ShortPacket))
    } else {
        Ok(())
    }
}
