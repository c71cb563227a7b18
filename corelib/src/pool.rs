//! A tiny free-list pool of reusable byte buffers, used on the upload chunk
//! path so the reliable-transport thread does not allocate per chunk.

use std::sync::Mutex;

pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    chunk_size: usize,
}

impl BufferPool {
    pub fn new(chunk_size: usize) -> Self {
        BufferPool {
            free: Mutex::new(Vec::new()),
            chunk_size,
        }
    }

    /// Rent a buffer, reusing a freed one if available, sized to hold
    /// exactly `len` bytes copied from `data`.
    pub fn rent(&self, data: &[u8]) -> Vec<u8> {
        let mut buf = self
            .free
            .lock()
            .expect("buffer pool mutex poisoned")
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.chunk_size));
        buf.clear();
        buf.extend_from_slice(data);
        buf
    }

    /// Return a buffer to the pool for reuse.
    pub fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut free = self.free.lock().expect("buffer pool mutex poisoned");
        if free.len() < 64 {
            free.push(buf);
        }
    }
}
