//! `Brick:*` and `Routing:WallResendCount` settings, §4.3.

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_ACTIVE_BRICKS: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickConfig {
    /// Ticks (100ths of a second) a brick stays up after placement.
    pub brick_time: u32,
    /// Maximum tile-scan length for the Lateral placement mode.
    pub brick_span: u16,
    /// Extra unreliable, urgent/droppable resends on top of the one
    /// reliable send, §4.3.
    pub wall_resend_count: u8,
}

impl Default for BrickConfig {
    fn default() -> Self {
        BrickConfig {
            brick_time: 6000,
            brick_span: 10,
            wall_resend_count: 2,
        }
    }
}

impl BrickConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> BrickConfig {
        serdeconv::from_toml_file(path).expect("error loading brick configuration file")
    }
}
