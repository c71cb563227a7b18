//! `CanChangeToFreq`, `FindEntryFreq`, and the default balancer contract,
//! §4.1. Open Question #1 (§9) is resolved here: a player may leave a
//! required team that would empty only when the destination is itself an
//! empty required team; this makes the "except when moving to another
//! empty required team" comment in the source load-bearing rather than
//! dead.

use crate::config::TeamConfig;
use arena::{ArenaState, FreqNum, PlayerId};

/// Player-count metric for `freq`, ignoring `excluding` (used when
/// evaluating whether leaving would empty the team).
fn metric_excluding(state: &ArenaState, freq: FreqNum, excluding: PlayerId) -> u32 {
    state
        .freqs
        .get(&freq)
        .map(|f| f.players.iter().filter(|&&p| p != excluding).count() as u32)
        .unwrap_or(0)
}

fn metric(state: &ArenaState, freq: FreqNum) -> u32 {
    state.freqs.get(&freq).map(|f| f.players.len() as u32).unwrap_or(0)
}

fn is_required(state: &ArenaState, freq: FreqNum) -> bool {
    state.freqs.get(&freq).map(|f| f.flags.required).unwrap_or(false)
}

/// True if some required freq other than `excepting` would have zero
/// members once `leaving_player` is removed from its current freq.
fn any_other_required_freq_empty(state: &ArenaState, leaving_player: PlayerId, excepting: FreqNum) -> bool {
    state.freqs.values().any(|f| {
        f.flags.required && f.freq_num != excepting && f.players.iter().filter(|&&p| p != leaving_player).count() == 0
    })
}

/// §4.1 `CanChangeToFreq`. `current_freq` is the player's present freq
/// (may equal `requested_freq` for an entry check against `SpecFreq`).
pub fn can_change_to_freq(
    state: &ArenaState,
    config: &TeamConfig,
    player: PlayerId,
    current_freq: FreqNum,
    requested_freq: FreqNum,
) -> Result<(), String> {
    let player_metric = 1u32;
    let dest_metric = metric(state, requested_freq);

    // (b) leaving a required team that would empty is allowed only when
    // moving into another, currently empty, required team. Only applies
    // when the player is actually the team's last counted member; an
    // already-empty team (the player was never tracked on it, e.g. a
    // fresh entry check from SpecFreq) is not "emptied" by this move.
    let leaving_required = is_required(state, current_freq);
    let leaving_would_empty = leaving_required
        && state
            .freqs
            .get(&current_freq)
            .map(|f| f.players.contains(&player) && f.players.len() == 1)
            .unwrap_or(false);
    if leaving_would_empty {
        let dest_required = is_required(state, requested_freq);
        let dest_empty = metric(state, requested_freq) == 0;
        if !(dest_required && dest_empty) {
            return Err("Changing teams would empty a required team.".to_string());
        }
    }

    // (c) no required team may sit empty while moving to a non-required
    // team.
    if !is_required(state, requested_freq) && any_other_required_freq_empty(state, player, requested_freq) {
        return Err("A required team cannot be left empty.".to_string());
    }

    // (e) balance difference to the originating team and every
    // balanced-against team. Checked before the raw capacity cap: a move
    // that both unbalances and overfills reports the balance reason.
    let max_diff = config.maximum_difference();
    let dest_after = dest_metric + player_metric;
    if max_diff != u32::MAX {
        let origin_after = metric_excluding(state, current_freq, player);
        if dest_after.abs_diff(origin_after) > max_diff {
            return Err("Changing to that team would make it too powerful.".to_string());
        }
        for freq in state.freqs.values() {
            if !config.is_balanced_against(freq.freq_num) || freq.freq_num == requested_freq {
                continue;
            }
            let other = freq.players.len() as u32;
            if dest_after.abs_diff(other) > max_diff {
                return Err("Changing to that team would make it too powerful.".to_string());
            }
        }
    }

    // (a)/(d) destination capacity.
    let dest_cap = config.max_metric_for(requested_freq);
    if dest_cap != 0 && dest_after > dest_cap {
        return Err("That team is full.".to_string());
    }

    Ok(())
}

/// §4.1 `FindEntryFreq`. Returns `spec_freq` if no freq admits the player.
pub fn find_entry_freq(state: &ArenaState, config: &TeamConfig, player: PlayerId, spec_freq: FreqNum) -> FreqNum {
    let mut best: Option<(FreqNum, u32)> = None;
    for i in 0..config.desired_teams {
        if can_change_to_freq(state, config, player, spec_freq, i).is_ok() {
            let m = metric(state, i);
            if best.map(|(_, bm)| m < bm).unwrap_or(true) {
                best = Some((i, m));
            }
        }
    }
    if let Some((freq, _)) = best {
        return freq;
    }

    for i in config.desired_teams..config.max_frequency {
        match can_change_to_freq(state, config, player, spec_freq, i) {
            Ok(()) => return i,
            Err(_) => {
                if metric(state, i) == 0 {
                    // blocker heuristic: an empty freq that still fails
                    // cannot be worked around by scanning further.
                    break;
                }
            }
        }
    }

    spec_freq
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena::{Arena, ClientKind, Player};

    fn setup(max_per_team: u32, force_even: bool, max_diff: u32) -> (Arena, TeamConfig) {
        let arena = Arena::new("duel", 9999);
        let mut config = TeamConfig::default();
        config.desired_teams = 3;
        config.max_per_team = max_per_team;
        config.force_even_teams = force_even;
        config.max_team_difference = max_diff;
        (arena, config)
    }

    #[test]
    fn s2_balancer_rejects_overpowering_move_from_nonempty_freq() {
        let (arena, config) = setup(3, true, 1);
        for id in 0..3 {
            arena.add_player(Player::new(id, format!("p{id}"), ClientKind::GameBinaryB, 9999));
            arena.move_player_to_freq(id, 0);
        }
        for id in 3..5 {
            arena.add_player(Player::new(id, format!("p{id}"), ClientKind::GameBinaryB, 9999));
            arena.move_player_to_freq(id, 1);
        }

        arena.with_state(|s| {
            let result = can_change_to_freq(s, &config, 3, 1, 0);
            assert_eq!(result.unwrap_err(), "Changing to that team would make it too powerful.");
        });
    }

    #[test]
    fn s2_balancer_rejects_from_empty_freq_too() {
        let (arena, config) = setup(3, true, 1);
        for id in 0..3 {
            arena.add_player(Player::new(id, format!("p{id}"), ClientKind::GameBinaryB, 9999));
            arena.move_player_to_freq(id, 0);
        }
        for id in 3..5 {
            arena.add_player(Player::new(id, format!("p{id}"), ClientKind::GameBinaryB, 9999));
            arena.move_player_to_freq(id, 1);
        }
        arena.add_player(Player::new(5, "q", ClientKind::GameBinaryB, 9999));
        arena.move_player_to_freq(5, 2);

        arena.with_state(|s| {
            let result = can_change_to_freq(s, &config, 5, 2, 0);
            assert_eq!(result.unwrap_err(), "Changing to that team would make it too powerful.");
        });
    }

    #[test]
    fn max_frequency_boundary_is_rejected_by_caller_before_reaching_balancer() {
        let (_arena, config) = setup(0, false, 0);
        assert_eq!(config.max_frequency, 10000);
        // Out-of-range rejection ([0, MaxFrequency)) is enforced by the
        // manager layer, not can_change_to_freq; documented by this test
        // asserting the configured bound itself.
    }

    #[test]
    fn required_team_cannot_be_emptied_into_a_nonempty_destination() {
        let (arena, mut config) = setup(0, false, 0);
        config.required_teams = 1;
        arena.with_state(|s| {
            s.freqs.entry(0).or_insert_with(|| arena::Freq::required(0));
        });
        arena.add_player(Player::new(1, "a", ClientKind::GameBinaryB, 9999));
        arena.move_player_to_freq(1, 0);
        arena.add_player(Player::new(2, "b", ClientKind::GameBinaryB, 9999));
        arena.move_player_to_freq(2, 5);

        arena.with_state(|s| {
            let result = can_change_to_freq(s, &config, 1, 0, 5);
            assert!(result.is_err());
        });
    }

    #[test]
    fn required_team_may_empty_into_another_empty_required_team() {
        let (arena, config) = setup(0, false, 0);
        arena.with_state(|s| {
            s.freqs.insert(0, arena::Freq::required(0));
            s.freqs.insert(1, arena::Freq::required(1));
        });
        arena.add_player(Player::new(1, "a", ClientKind::GameBinaryB, 9999));
        arena.move_player_to_freq(1, 0);

        arena.with_state(|s| {
            let result = can_change_to_freq(s, &config, 1, 0, 1);
            assert!(result.is_ok());
        });
    }

    #[test]
    fn find_entry_freq_picks_smallest_admitting_freq_among_desired_teams() {
        let (arena, config) = setup(0, false, 0);
        arena.with_state(|s| {
            s.freqs.insert(0, arena::Freq::new(0));
            s.freqs.insert(1, arena::Freq::new(1));
        });
        arena.add_player(Player::new(1, "a", ClientKind::GameBinaryB, 9999));
        arena.move_player_to_freq(1, 0);

        arena.with_state(|s| {
            let freq = find_entry_freq(s, &config, 2, 9999);
            assert_eq!(freq, 1);
        });
    }
}
