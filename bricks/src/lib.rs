//! Brick Engine, §4.3: time-limited team walls. Lateral placement mode,
//! the FIFO expiry queue, and the arena-entry sync packet chunking.

pub mod config;
pub mod engine;
pub mod lateral;
pub mod queue;

pub use config::{BrickConfig, MAX_ACTIVE_BRICKS};
pub use engine::BrickEngine;
pub use lateral::{direction_for_rotation, scan_span, LateralMode, TileMap};
pub use queue::{Brick, BrickQueue};
