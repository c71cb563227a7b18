//! Shared error vocabulary for manual wire codecs, generalized from
//! `flux::shared::{NetworkError, ErrorType}`.

use std::fmt;
use std::io;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// `Wait` means "not enough data/capacity was available yet" and is not an
/// error worth logging; `Fatal` carries a reason worth dropping the packet
/// and logging at the malicious/warn level for.
#[derive(Debug, Eq, PartialEq)]
pub enum NetworkError {
    Wait,
    Fatal(ErrorKind),
}

#[derive(Debug, Eq, PartialEq)]
pub enum ErrorKind {
    ShortPacket,
    BadState,
    BadLength,
    UnexpectedResponse,
    Serialization,
    Io(io::ErrorKind),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Wait => write!(f, "wait: insufficient data or capacity"),
            NetworkError::Fatal(kind) => write!(f, "fatal: {:?}", kind),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<io::Error> for NetworkError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock => NetworkError::Wait,
            kind => NetworkError::Fatal(ErrorKind::Io(kind)),
        }
    }
}

pub trait ErrorUtils {
    /// True for any error other than `Wait` (which is a normal retry signal).
    fn has_failed(&self) -> bool;
}

impl<T> ErrorUtils for NetworkResult<T> {
    fn has_failed(&self) -> bool {
        !matches!(self, Ok(_) | Err(NetworkError::Wait))
    }
}
