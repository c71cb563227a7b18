//! Team Manager, §4.1: `Initial`, `ShipChange`, `FreqChange`, and the
//! default `Balancer` contract, folding in `FreqEnforcer` advisors
//! registered on the arena's capability registry.

use crate::balancer::{can_change_to_freq, find_entry_freq};
use crate::config::TeamConfig;
use arena::{run_veto_chain, Arena, Balancer, CapabilityRegistry, FreqEnforcer, FreqNum, Player, Ship};

/// Bitmask over ships 1..8 (bit 0 = ship 1). All ships allowed by default;
/// client-resolution-based ship restriction is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipMask(pub u8);

impl ShipMask {
    pub const ALL: ShipMask = ShipMask(0xFF);

    pub fn allows(&self, ship: Ship) -> bool {
        match ship.index() {
            Some(i) => self.0 & (1 << (i - 1)) != 0,
            None => true,
        }
    }

    pub fn lowest_allowed(&self) -> Option<Ship> {
        (Ship::MIN_INDEX..=Ship::MAX_INDEX).find(|&i| self.0 & (1 << (i - 1)) != 0).map(Ship::Numbered)
    }
}

pub fn allowable_ships(_config: &TeamConfig) -> ShipMask {
    ShipMask::ALL
}

pub struct TeamManager {
    pub config: TeamConfig,
}

impl TeamManager {
    pub fn new(config: TeamConfig) -> Self {
        TeamManager { config }
    }

    fn check_freq_change_with_advisors(
        &self,
        arena: &Arena,
        player: &Player,
        requested_freq: FreqNum,
        registry: &CapabilityRegistry,
    ) -> Result<(), String> {
        let state_result = arena.with_state(|s| can_change_to_freq(s, &self.config, player.id, player.freq, requested_freq));
        if let Err(reason) = state_result {
            return Err(reason);
        }
        let verdict = run_veto_chain(registry.iter::<dyn FreqEnforcer>(), |enforcer| {
            enforcer.check_freq_change(arena, player, requested_freq)
        });
        match verdict {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// §4.1 `Initial`: decide ship and freq for a player entering the
    /// arena.
    pub fn initial(&self, arena: &Arena, player: &Player, spec_freq: FreqNum, registry: &CapabilityRegistry) -> (Ship, FreqNum) {
        if self.config.initial_spec || self.check_freq_change_with_advisors(arena, player, spec_freq, registry).is_err() {
            return (Ship::Spec, spec_freq);
        }

        let freq = arena.with_state(|s| find_entry_freq(s, &self.config, player.id, spec_freq));
        if freq == spec_freq {
            return (Ship::Spec, spec_freq);
        }

        let mask = allowable_ships(&self.config);
        match mask.lowest_allowed() {
            Some(ship) => (ship, freq),
            None => (Ship::Spec, spec_freq),
        }
    }

    /// §4.1 `ShipChange`.
    pub fn ship_change(
        &self,
        arena: &Arena,
        player: &Player,
        requested_ship: Ship,
        spec_freq: FreqNum,
        registry: &CapabilityRegistry,
    ) -> (Ship, FreqNum) {
        if requested_ship.is_spec() {
            return (Ship::Spec, spec_freq);
        }

        let was_spectating = player.ship.is_spec();
        if was_spectating {
            if self.check_freq_change_with_advisors(arena, player, player.freq, registry).is_err() {
                return (player.ship, player.freq);
            }
        } else if !self.config.include_spectators {
            let freq_ok = arena.with_state(|s| {
                let metric = s.freqs.get(&player.freq).map(|f| f.players.len() as u32).unwrap_or(0);
                let cap = self.config.max_metric_for(player.freq);
                cap == 0 || metric <= cap
            });
            if !freq_ok {
                return (player.ship, player.freq);
            }
        }

        let freq = if was_spectating {
            arena.with_state(|s| find_entry_freq(s, &self.config, player.id, spec_freq))
        } else {
            player.freq
        };

        let mask = allowable_ships(&self.config);
        let ship = if mask.allows(requested_ship) {
            requested_ship
        } else if mask.allows(player.ship) {
            player.ship
        } else {
            match mask.lowest_allowed() {
                Some(s) => s,
                None => Ship::Spec,
            }
        };

        if ship.is_spec() && self.config.disallow_team_spectators {
            return (Ship::Spec, spec_freq);
        }

        (ship, freq)
    }

    /// §4.1 `FreqChange`.
    pub fn freq_change(
        &self,
        arena: &Arena,
        player: &Player,
        requested_freq: FreqNum,
        spec_freq: FreqNum,
        registry: &CapabilityRegistry,
    ) -> Result<(Ship, FreqNum), String> {
        if requested_freq == spec_freq {
            return Ok((player.ship, spec_freq));
        }
        if requested_freq >= self.config.max_frequency {
            return Err("That frequency is not used".to_string());
        }

        self.check_freq_change_with_advisors(arena, player, requested_freq, registry)?;

        let coming_from_spec = player.freq == spec_freq;
        if coming_from_spec && self.config.disallow_team_spectators {
            let mask = allowable_ships(&self.config);
            return match mask.lowest_allowed() {
                Some(ship) => Ok((ship, requested_freq)),
                None => Err("No ship is available on that team.".to_string()),
            };
        }

        if !player.ship.is_spec() {
            let mask = allowable_ships(&self.config);
            let ship = if mask.allows(player.ship) { player.ship } else { mask.lowest_allowed().unwrap_or(Ship::Spec) };
            return Ok((ship, requested_freq));
        }

        Ok((player.ship, requested_freq))
    }
}

impl Balancer for TeamManager {
    fn find_entry_freq(&self, arena: &Arena, player: &Player) -> FreqNum {
        arena.with_state(|s| find_entry_freq(s, &self.config, player.id, arena.spec_freq))
    }
}
