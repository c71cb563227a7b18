//! Ball Engine, §4.2: authoritative state for up to `MAX_BALLS` balls per
//! arena, the periodic broadcast task, and scoring on goal tiles.

pub mod config;
pub mod engine;
pub mod goal;
pub mod state;

pub use config::{Mode, SoccerConfig, SpawnPoint, MAX_BALLS};
pub use engine::{BallEngine, BallsState, GoalEvent, GoalOutcome, ShootOutcome, TileMap};
pub use state::{Ball, BallState};
