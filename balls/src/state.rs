//! Per-ball state, §4.2: `OnMap`, `Carried`, `Waiting`.

use arena::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallState {
    OnMap {
        x: i16,
        y: i16,
        x_speed: i16,
        y_speed: i16,
        last_shooter: Option<PlayerId>,
        time: u32,
    },
    Carried {
        carrier: PlayerId,
    },
    Waiting {
        spawn_at_tick: u32,
    },
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u8,
    pub state: BallState,
    pub last_killer: Option<PlayerId>,
    pub killer_valid_pickup_time: u32,
}

impl Ball {
    pub fn new_waiting(id: u8, spawn_at_tick: u32) -> Self {
        Ball {
            id,
            state: BallState::Waiting { spawn_at_tick },
            last_killer: None,
            killer_valid_pickup_time: 0,
        }
    }

    pub fn carrier(&self) -> Option<PlayerId> {
        match self.state {
            BallState::Carried { carrier } => Some(carrier),
            _ => None,
        }
    }

    pub fn is_on_map(&self) -> bool {
        matches!(self.state, BallState::OnMap { .. })
    }
}
