//! Banner upload buffering, §4.7: outbound banner sets queue per player and
//! drain up to `MaxConcurrentBannerUpload` concurrent reliable sends.

use arena::player::PlayerId;
use std::collections::VecDeque;

pub struct BannerUploadQueue {
    max_concurrent: usize,
    in_flight: usize,
    pending: VecDeque<(PlayerId, Vec<u8>)>,
}

impl BannerUploadQueue {
    pub fn new(max_concurrent: usize) -> Self {
        BannerUploadQueue { max_concurrent, in_flight: 0, pending: VecDeque::new() }
    }

    pub fn enqueue(&mut self, player_id: PlayerId, banner: Vec<u8>) {
        self.pending.push_back((player_id, banner));
    }

    /// Pulls the next banner ready to send, if a send slot is free.
    pub fn start_next(&mut self) -> Option<(PlayerId, Vec<u8>)> {
        if self.in_flight >= self.max_concurrent {
            return None;
        }
        let next = self.pending.pop_front();
        if next.is_some() {
            self.in_flight += 1;
        }
        next
    }

    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
