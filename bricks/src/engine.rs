//! Ties the Lateral placement mode and the brick queue together into the
//! placement-request and arena-entry-sync operations of §4.3.

use crate::config::BrickConfig;
use crate::lateral::{direction_for_rotation, scan_span, TileMap};
use crate::queue::{Brick, BrickQueue};
use arena::FreqNum;
use wire::brick::{records_per_packet, BrickRecord};

pub struct BrickEngine {
    pub config: BrickConfig,
}

impl BrickEngine {
    pub fn new(config: BrickConfig) -> Self {
        BrickEngine { config }
    }

    /// Handles one placement request: computes the Lateral-mode span from
    /// the player's rotation and places it as a single-brick batch.
    pub fn place(
        &self,
        queue: &mut BrickQueue,
        map: &dyn TileMap,
        x: i16,
        y: i16,
        rotation: u8,
        last_rotation_delta: i8,
        freq: FreqNum,
        now: u32,
    ) -> Result<Vec<Brick>, &'static str> {
        let direction = direction_for_rotation(rotation, last_rotation_delta);
        let span = scan_span(map, x, y, direction, self.config.brick_span);
        queue.place_batch(&[span], freq, now, self.config.brick_time)
    }

    /// §4.3: players entering the arena receive the current non-expired
    /// brick list, chunked to fit `records_per_packet` per S2C packet.
    pub fn sync_packets_for_entry(&self, queue: &BrickQueue, max_packet: usize, reliable_header: usize) -> Vec<Vec<BrickRecord>> {
        let per_packet = records_per_packet(max_packet, reliable_header);
        if per_packet == 0 {
            return Vec::new();
        }
        let records: Vec<BrickRecord> = queue
            .active()
            .map(|b| BrickRecord {
                x1: b.x1,
                y1: b.y1,
                x2: b.x2,
                y2: b.y2,
                freq: b.freq as i16,
                brick_id: b.id as u16,
                start_time: b.start_tick,
            })
            .collect();
        records.chunks(per_packet).map(|chunk| chunk.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OpenMap;
    impl TileMap for OpenMap {
        fn is_empty(&self, _x: i16, _y: i16) -> bool {
            true
        }
    }

    #[test]
    fn place_emits_one_brick_along_the_facing_direction() {
        let engine = BrickEngine::new(BrickConfig::default());
        let mut queue = BrickQueue::new();
        let bricks = engine.place(&mut queue, &OpenMap, 500, 500, 0, 0, 2, 100).unwrap();
        assert_eq!(bricks.len(), 1);
        assert_eq!(bricks[0].freq, 2);
        assert_eq!((bricks[0].x1, bricks[0].y1), (500, 500));
    }

    #[test]
    fn entry_sync_chunks_records_to_the_packet_budget() {
        let engine = BrickEngine::new(BrickConfig::default());
        let mut queue = BrickQueue::new();
        for i in 0..40u32 {
            queue.place_batch(&[(i as i16, 0, i as i16 + 1, 0)], 0, i, 6000).unwrap();
        }
        let packets = engine.sync_packets_for_entry(&queue, 512, 6);
        let total: usize = packets.iter().map(|p| p.len()).sum();
        assert_eq!(total, 40);
        assert!(packets[0].len() <= records_per_packet(512, 6));
    }
}
