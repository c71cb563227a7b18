//! Per-arena brick queue, §4.1/§4.3: FIFO insertion order, cap
//! `MAX_ACTIVE_BRICKS`, tick collision avoidance ("no two bricks share a
//! tick", a client indexing quirk), and expiry-ordered popping.

use crate::config::MAX_ACTIVE_BRICKS;
use arena::FreqNum;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brick {
    pub id: u32,
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
    pub freq: FreqNum,
    pub start_tick: u32,
}

impl Brick {
    pub fn expires_at(&self, brick_time: u32) -> u32 {
        self.start_tick + brick_time
    }
}

#[derive(Default)]
pub struct BrickQueue {
    bricks: VecDeque<Brick>,
    next_id: u32,
    last_tick: u32,
}

impl BrickQueue {
    pub fn new() -> Self {
        BrickQueue { bricks: VecDeque::new(), next_id: 0, last_tick: 0 }
    }

    pub fn active(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// §4.3: pops expired bricks from the head of the FIFO queue while
    /// `now >= brick.tick + BrickTime`.
    pub fn expire_bricks(&mut self, now: u32, brick_time: u32) -> Vec<Brick> {
        let mut expired = Vec::new();
        while let Some(front) = self.bricks.front() {
            if now >= front.expires_at(brick_time) {
                expired.push(self.bricks.pop_front().unwrap());
            } else {
                break;
            }
        }
        expired
    }

    /// Places a batch of spans as bricks, all sharing one assigned tick
    /// (`max(now, lastTick+1)`, so consecutive placements never collide).
    /// Expires first; rejects the whole batch if it would exceed the cap,
    /// preserving client/server brick-index sync.
    pub fn place_batch(&mut self, spans: &[(i16, i16, i16, i16)], freq: FreqNum, now: u32, brick_time: u32) -> Result<Vec<Brick>, &'static str> {
        self.expire_bricks(now, brick_time);
        if self.bricks.len() + spans.len() > MAX_ACTIVE_BRICKS {
            return Err("brick batch would exceed the active brick cap");
        }
        let tick = now.max(self.last_tick + 1);
        self.last_tick = tick;
        let placed: Vec<Brick> = spans
            .iter()
            .map(|&(x1, y1, x2, y2)| {
                let brick = Brick { id: self.next_id, x1, y1, x2, y2, freq, start_tick: tick };
                self.next_id += 1;
                brick
            })
            .collect();
        self.bricks.extend(placed.iter().cloned());
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_assigns_a_shared_tick_past_the_last_one() {
        let mut queue = BrickQueue::new();
        let first = queue.place_batch(&[(0, 0, 5, 0)], 0, 100, 6000).unwrap();
        let second = queue.place_batch(&[(0, 0, 5, 0)], 0, 100, 6000).unwrap();
        assert_eq!(first[0].start_tick, 100);
        assert_eq!(second[0].start_tick, 101);
    }

    #[test]
    fn batch_rejected_when_it_would_exceed_the_cap() {
        let mut queue = BrickQueue::new();
        let full: Vec<_> = (0..MAX_ACTIVE_BRICKS).map(|_| (0, 0, 1, 0)).collect();
        queue.place_batch(&full, 0, 0, 6000).unwrap();
        let result = queue.place_batch(&[(0, 0, 1, 0)], 0, 0, 6000);
        assert!(result.is_err());
        assert_eq!(queue.len(), MAX_ACTIVE_BRICKS);
    }

    #[test]
    fn expiry_pops_fifo_while_past_expiry_tick() {
        let mut queue = BrickQueue::new();
        queue.place_batch(&[(0, 0, 1, 0)], 0, 0, 100).unwrap();
        queue.place_batch(&[(0, 0, 1, 0)], 0, 50, 100).unwrap();
        let expired = queue.expire_bricks(101, 100);
        assert_eq!(expired.len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn no_two_bricks_in_one_batch_share_a_tick_with_a_prior_batch() {
        let mut queue = BrickQueue::new();
        queue.place_batch(&[(0, 0, 1, 0)], 0, 1000, 6000).unwrap();
        let second = queue.place_batch(&[(0, 0, 1, 0)], 0, 500, 6000).unwrap();
        assert!(second[0].start_tick > 1000);
    }
}
