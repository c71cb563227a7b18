//! Shared utilities used across every zone server subsystem: logging
//! bootstrap, CRC-32 helpers, padded wire fields, time sources, a generic
//! error vocabulary, a reusable buffer pool and a cooperative work queue.

pub mod crc;
pub mod error;
pub mod logging;
pub mod padded;
pub mod pool;
pub mod time;
pub mod workqueue;

pub use error::{ErrorKind, ErrorUtils, NetworkError, NetworkResult};
