//! Greet-on-entry, periodic tick bookkeeping, and idle timeout tracking
//! (§2): a small ambient module living in the arena runtime crate since it
//! only touches the player lifecycle hooks the rest of the crate already
//! exposes.

use crate::player::PlayerId;
use corelib::time::TickClock;
use std::collections::HashMap;

/// Builds the greeting sent to a player on arena entry.
pub fn greet(arena_name: &str, player_name: &str) -> String {
    format!("Welcome to {}, {}.", arena_name, player_name)
}

/// Tracks per-player last-activity ticks and reports who has gone idle.
pub struct IdleTracker {
    clock: TickClock,
    idle_ticks: u32,
    last_activity: HashMap<PlayerId, u32>,
}

impl IdleTracker {
    pub fn new(clock: TickClock, idle_timeout_secs: u32) -> Self {
        IdleTracker {
            clock,
            idle_ticks: idle_timeout_secs.saturating_mul(corelib::time::TICKS_PER_SECOND as u32),
            last_activity: HashMap::new(),
        }
    }

    pub fn note_activity(&mut self, player: PlayerId) {
        self.last_activity.insert(player, self.clock.now());
    }

    pub fn remove(&mut self, player: PlayerId) {
        self.last_activity.remove(&player);
    }

    /// Players whose last recorded activity is at least `idle_ticks` ago,
    /// called periodically from the main loop's tick handler.
    pub fn idle_players(&self) -> Vec<PlayerId> {
        let now = self.clock.now();
        self.last_activity
            .iter()
            .filter(|(_, &last)| now.saturating_sub(last) >= self.idle_ticks)
            .map(|(&id, _)| id)
            .collect()
    }
}
