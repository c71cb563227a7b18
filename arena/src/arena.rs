//! The arena itself, §3/§5: name, config snapshot, freq table, and the
//! single non-recursive lock guarding freq/player membership. Ball, brick
//! and map-asset state live in their own crates and are reached through
//! `ExtraData` slots rather than fields here, so this crate never depends
//! on `balls`/`bricks`/`assets`.

use crate::extradata::ExtraData;
use crate::freq::Freq;
use crate::player::{FreqNum, Player, PlayerId};
use std::collections::HashMap;
use std::sync::Mutex;

/// Invariant: every `PlayerId` held in a `Freq`'s player set also has an
/// entry in `players`, and that player's `freq` equals the freq's number.
pub struct ArenaState {
    pub freqs: HashMap<FreqNum, Freq>,
    pub players: HashMap<PlayerId, Player>,
}

impl ArenaState {
    fn new() -> Self {
        ArenaState {
            freqs: HashMap::new(),
            players: HashMap::new(),
        }
    }
}

pub struct Arena {
    pub name: String,
    pub spec_freq: FreqNum,
    state: Mutex<ArenaState>,
    pub extra: Mutex<ExtraData>,
}

impl Arena {
    pub fn new(name: impl Into<String>, spec_freq: FreqNum) -> Self {
        let mut state = ArenaState::new();
        // Persists for the arena's whole lifetime without ever counting as
        // a Team-Manager "required team" (that flag carries balancing
        // semantics the spectator freq must not be subject to).
        let mut spec = Freq::new(spec_freq);
        spec.flags.remembered = true;
        state.freqs.insert(spec_freq, spec);
        Arena {
            name: name.into(),
            spec_freq,
            state: Mutex::new(state),
            extra: Mutex::new(ExtraData::new()),
        }
    }

    /// Runs `f` while holding the arena's single lock. Callers must not
    /// re-enter `with_state` from within `f`: the mutex is not recursive.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ArenaState) -> R) -> R {
        let mut guard = self.state.lock().expect("arena state mutex poisoned");
        f(&mut guard)
    }

    pub fn player_count(&self) -> usize {
        self.with_state(|s| s.players.len())
    }

    /// Adds a player, placing them on `spec_freq` until a ship/freq change
    /// request moves them, §3. Ensures the spec freq entry exists.
    pub fn add_player(&self, player: Player) {
        self.with_state(|s| {
            let freq = player.freq;
            let id = player.id;
            s.players.insert(id, player);
            s.freqs.entry(freq).or_insert_with(|| Freq::new(freq)).players.insert(id);
        });
    }

    /// Removes a player and disbands their former freq if it is now
    /// disbandable, §4.1.
    pub fn remove_player(&self, id: PlayerId) -> Option<Player> {
        self.with_state(|s| {
            let removed = s.players.remove(&id)?;
            if let Some(freq) = s.freqs.get_mut(&removed.freq) {
                freq.players.remove(&id);
                if freq.can_disband() {
                    s.freqs.remove(&removed.freq);
                }
            }
            Some(removed)
        })
    }

    /// Moves a player to `new_freq`, creating it if necessary and
    /// disbanding the old one if it becomes empty and disbandable.
    pub fn move_player_to_freq(&self, id: PlayerId, new_freq: FreqNum) {
        self.with_state(|s| {
            let old_freq = match s.players.get(&id) {
                Some(p) => p.freq,
                None => return,
            };
            if old_freq == new_freq {
                return;
            }
            if let Some(freq) = s.freqs.get_mut(&old_freq) {
                freq.players.remove(&id);
                if freq.can_disband() {
                    s.freqs.remove(&old_freq);
                }
            }
            s.freqs.entry(new_freq).or_insert_with(|| Freq::new(new_freq)).players.insert(id);
            if let Some(p) = s.players.get_mut(&id) {
                p.freq = new_freq;
            }
        });
    }
}
