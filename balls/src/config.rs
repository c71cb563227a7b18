//! `Soccer:*` settings, §4.2.

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_BALLS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    All,
    LeftRight,
    TopBottom,
    QuadrantsDefend1,
    QuadrantsDefend3,
    SidesDefend1,
    SidesDefend3,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i16,
    pub y: i16,
    pub radius: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoccerConfig {
    pub ball_count: u8,
    pub mode: Mode,
    pub spawns: Vec<SpawnPoint>,
    pub send_time_ms: u32,
    pub goal_delay_ticks: u32,
    pub allow_goal_by_death: bool,
    pub killer_ignore_pass_delay: bool,
    /// Negative encodes "uniform random in [0, |value|]" per the source
    /// convention; resolved via `new_game_delay_ticks`.
    pub new_game_delay: i32,
}

impl Default for SoccerConfig {
    fn default() -> Self {
        SoccerConfig {
            ball_count: 0,
            mode: Mode::All,
            spawns: vec![SpawnPoint { x: 512, y: 512, radius: 50 }],
            send_time_ms: 100,
            goal_delay_ticks: 0,
            allow_goal_by_death: false,
            killer_ignore_pass_delay: false,
            new_game_delay: 0,
        }
    }
}

impl SoccerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> SoccerConfig {
        serdeconv::from_toml_file(path).expect("error loading soccer configuration file")
    }

    /// Clamps `send_time_ms` to the documented [25, 500] range.
    pub fn effective_send_time_ms(&self) -> u32 {
        self.send_time_ms.clamp(25, 500)
    }

    pub fn ball_count(&self) -> usize {
        (self.ball_count as usize).min(MAX_BALLS)
    }
}
