//! The ball state machine itself, §4.2: pickup, shoot, goal, spawn, and
//! post-leave/ship-change cleanup, plus the 250ms periodic broadcast task.
//! Map-tile lookup (the map-data collaborator) and the PRNG are external
//! collaborators threaded in by the caller rather than owned here.

use crate::config::SoccerConfig;
use crate::goal::is_scorable;
use crate::state::{Ball, BallState};
use arena::{FreqNum, PlayerId};
use rand::Rng;
use wire::ball::BallPacket;

/// The map-tile data provider, out of scope per §1; this crate only needs
/// "is this a goal tile" and "find the nearest empty tile to spawn at".
pub trait TileMap: Send + Sync {
    fn nearest_empty_tile(&self, x: i16, y: i16) -> Option<(i16, i16)>;
    fn is_goal_tile(&self, x: i16, y: i16) -> bool;
}

/// Per-arena ball state, stored behind an `ExtraDataKey<BallsState>` slot on
/// the arena (§9: typed per-arena extra-data, not a field on `Arena`
/// itself, so the `arena` crate never depends on `balls`).
pub struct BallsState {
    pub balls: Vec<Ball>,
}

impl BallsState {
    fn find_mut(&mut self, ball_id: u8) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == ball_id)
    }
}

pub struct GoalEvent {
    pub ball_id: u8,
    pub scorer: PlayerId,
    pub freq: FreqNum,
    pub x: i16,
    pub y: i16,
}

pub struct ShootOutcome {
    pub packet: BallPacket,
    pub goal: Option<GoalOutcome>,
}

pub struct BallEngine {
    pub config: SoccerConfig,
}

const MAP_TILES: i16 = 1024;
/// Low bits of the 8-bit spawn jitter draw used as a sub-tile offset.
const SUB_TILE_JITTER_MASK: u8 = 0x0F;

impl BallEngine {
    pub fn new(config: SoccerConfig) -> Self {
        BallEngine { config }
    }

    /// Builds the initial per-arena ball set on create. `NewGameDelay`
    /// negative encodes "uniform random in [0, |value|]" (§4.2).
    pub fn initial_state(&self, rng: &mut impl Rng) -> BallsState {
        let delay = if self.config.new_game_delay < 0 {
            rng.gen_range(0..=(-self.config.new_game_delay) as u32)
        } else {
            self.config.new_game_delay as u32
        };
        let balls = (0..self.config.ball_count())
            .map(|i| Ball::new_waiting(i as u8, delay))
            .collect();
        BallsState { balls }
    }

    /// 250ms periodic task, gated by the arena's `SendTime`: broadcasts
    /// every ball's current snapshot (copying the carrier's live position
    /// for a `Carried` ball, via `position_of`) and spawns any `Waiting`
    /// ball whose time has come.
    pub fn periodic_tick(
        &self,
        now: u32,
        state: &mut BallsState,
        map: &dyn TileMap,
        rng: &mut impl Rng,
        position_of: &dyn Fn(PlayerId) -> Option<(i16, i16)>,
    ) -> Vec<BallPacket> {
        let mut packets = Vec::with_capacity(state.balls.len());
        let ids: Vec<u8> = state.balls.iter().map(|b| b.id).collect();
        for id in ids {
            let due = matches!(
                state.find_mut(id).map(|b| &b.state),
                Some(BallState::Waiting { spawn_at_tick }) if now >= *spawn_at_tick
            );
            if due {
                if let Some(packet) = self.spawn(id, state, map, rng) {
                    packets.push(packet);
                }
                continue;
            }
            if let Some(ball) = state.balls.iter().find(|b| b.id == id) {
                if let Some(packet) = snapshot_packet(ball, position_of) {
                    packets.push(packet);
                }
            }
        }
        packets
    }

    /// §4.2 `Pickup`. `time` must match the ball's current map-entry time,
    /// or the recorded killer-valid-pickup-time when `requester` is the
    /// last killer (so the killer can re-pick up ahead of the pass delay).
    pub fn pickup(
        &self,
        state: &mut BallsState,
        ball_id: u8,
        time: u32,
        requester: PlayerId,
        already_carrying_another: bool,
    ) -> Result<BallPacket, &'static str> {
        if already_carrying_another {
            return Err("you are already carrying a ball");
        }
        let ball = state.find_mut(ball_id).ok_or("no such ball")?;
        let (entry_time, x, y) = match ball.state {
            BallState::OnMap { time, x, y, .. } => (time, x, y),
            _ => return Err("ball is not on the map"),
        };
        let killer_valid = ball.last_killer == Some(requester) && time == ball.killer_valid_pickup_time;
        if time != entry_time && !killer_valid {
            return Err("stale pickup time");
        }
        ball.state = BallState::Carried { carrier: requester };
        ball.last_killer = None;
        Ok(BallPacket {
            ball_id,
            x,
            y,
            x_speed: 0,
            y_speed: 0,
            carrier_id: Some(requester as i16),
            time: 0,
        })
    }

    /// §4.2 `Shoot`. Transitions the ball to `OnMap` at the client-supplied
    /// kinematics and, if the landing tile is a goal tile, invokes `goal`
    /// inline without waiting for an explicit goal packet (S1's
    /// race-avoidance: the client may never send one if the shot scores).
    pub fn shoot(
        &self,
        state: &mut BallsState,
        ball_id: u8,
        requester: PlayerId,
        requester_freq: FreqNum,
        x: i16,
        y: i16,
        x_speed: i16,
        y_speed: i16,
        time: u32,
        now: u32,
        map: &dyn TileMap,
        rng: &mut impl Rng,
    ) -> Result<ShootOutcome, &'static str> {
        {
            let ball = state.find_mut(ball_id).ok_or("no such ball")?;
            if ball.carrier() != Some(requester) {
                return Err("you are not carrying that ball");
            }
            ball.state = BallState::OnMap {
                x,
                y,
                x_speed,
                y_speed,
                last_shooter: Some(requester),
                time,
            };
        }
        let packet = onmap_packet(state.find_mut(ball_id).unwrap()).expect("ball is on map");
        let goal = if map.is_goal_tile(x, y) {
            Some(self.goal(state, ball_id, requester, requester_freq, now, map, rng)?)
        } else {
            None
        };
        Ok(ShootOutcome { packet, goal })
    }

    /// §4.2 `Goal`. Verifies the ball is still `OnMap` and carrier-of-record
    /// before consulting the scoring-mode policy; a blocked goal re-
    /// broadcasts the ball's current state unchanged.
    pub fn goal(
        &self,
        state: &mut BallsState,
        ball_id: u8,
        requester: PlayerId,
        player_freq: FreqNum,
        now: u32,
        map: &dyn TileMap,
        rng: &mut impl Rng,
    ) -> Result<GoalOutcome, &'static str> {
        let (x, y) = {
            let ball = state.find_mut(ball_id).ok_or("no such ball")?;
            match ball.state {
                BallState::OnMap { x, y, last_shooter, .. } if last_shooter == Some(requester) => (x, y),
                BallState::OnMap { .. } => return Err("you are not the carrier of record"),
                _ => return Err("ball is not on the map"),
            }
        };
        if !is_scorable(self.config.mode, x, y, player_freq) {
            let packet = onmap_packet(state.find_mut(ball_id).unwrap()).expect("ball is on map");
            return Ok(GoalOutcome::Blocked { resend: packet });
        }
        let respawn_packet = if self.config.goal_delay_ticks == 0 {
            self.spawn(ball_id, state, map, rng)
        } else {
            let ball = state.find_mut(ball_id).unwrap();
            ball.state = BallState::Waiting { spawn_at_tick: now + self.config.goal_delay_ticks };
            None
        };
        Ok(GoalOutcome::Scored {
            event: GoalEvent { ball_id, scorer: requester, freq: player_freq, x, y },
            respawn: respawn_packet,
        })
    }

    /// §4.2 `Spawn`. Picks the `ballId mod len(spawns)` spawn point,
    /// samples uniformly inside its radius, wraps toroidally onto the
    /// 1024-tile grid, asks the map for the nearest empty tile, and jitters
    /// the sub-tile position from the low bits of an 8-bit random draw.
    pub fn spawn(&self, ball_id: u8, state: &mut BallsState, map: &dyn TileMap, rng: &mut impl Rng) -> Option<BallPacket> {
        if self.config.spawns.is_empty() {
            return None;
        }
        let spawn = &self.config.spawns[ball_id as usize % self.config.spawns.len()];
        let (sample_x, sample_y) = sample_in_circle(spawn.x, spawn.y, spawn.radius, rng);
        let wrapped_x = wrap_tile(sample_x);
        let wrapped_y = wrap_tile(sample_y);
        let (tile_x, tile_y) = map.nearest_empty_tile(wrapped_x, wrapped_y)?;
        let jitter: u8 = rng.gen();
        let jitter_bits = jitter & SUB_TILE_JITTER_MASK;
        let x = tile_x.wrapping_add(jitter_bits as i16);
        let y = tile_y;

        let ball = state.find_mut(ball_id)?;
        ball.state = BallState::OnMap { x, y, x_speed: 0, y_speed: 0, last_shooter: None, time: 1 };
        ball.last_killer = None;
        Some(BallPacket { ball_id, x, y, x_speed: 0, y_speed: 0, carrier_id: None, time: 1 })
    }

    /// §4.2 `Cleanup-after`: a player left, changed ship, or died while
    /// carrying one or more balls. `last_position` is the player's last
    /// known map position (owned by the physics/position collaborator,
    /// out of scope per §1); the ball drops there. `keep_carrier` is true
    /// for a simple ship-change (the player may re-pick-up their own
    /// dropped ball); false for leaving the arena or a death that isn't
    /// exempted by `AllowGoalByDeath`.
    pub fn cleanup_after(
        &self,
        state: &mut BallsState,
        player: PlayerId,
        last_position: (i16, i16),
        now: u32,
        keep_carrier: bool,
        record_as_killer: Option<PlayerId>,
    ) {
        let (x, y) = last_position;
        for ball in state.balls.iter_mut() {
            if ball.carrier() != Some(player) {
                continue;
            }
            ball.state = BallState::OnMap {
                x,
                y,
                x_speed: 0,
                y_speed: 0,
                last_shooter: if keep_carrier { Some(player) } else { None },
                time: now.max(1),
            };
            if let Some(killer) = record_as_killer {
                if self.config.killer_ignore_pass_delay {
                    ball.last_killer = Some(killer);
                    // Open Question #3: the source reads as an unsigned
                    // subtraction of a signed delay; tightened to a
                    // saturating subtraction so an early tick never wraps.
                    ball.killer_valid_pickup_time = now.saturating_sub(1);
                }
            }
        }
    }
}

pub enum GoalOutcome {
    Blocked { resend: BallPacket },
    Scored { event: GoalEvent, respawn: Option<BallPacket> },
}

fn onmap_packet(ball: &Ball) -> Option<BallPacket> {
    match ball.state {
        BallState::OnMap { x, y, x_speed, y_speed, time, .. } => Some(BallPacket {
            ball_id: ball.id,
            x,
            y,
            x_speed,
            y_speed,
            carrier_id: None,
            time,
        }),
        _ => None,
    }
}

fn snapshot_packet(ball: &Ball, position_of: &dyn Fn(PlayerId) -> Option<(i16, i16)>) -> Option<BallPacket> {
    match ball.state {
        BallState::OnMap { .. } => onmap_packet(ball),
        BallState::Carried { carrier } => {
            let (x, y) = position_of(carrier).unwrap_or((0, 0));
            Some(BallPacket { ball_id: ball.id, x, y, x_speed: 0, y_speed: 0, carrier_id: Some(carrier as i16), time: 0 })
        }
        BallState::Waiting { .. } => None,
    }
}

fn wrap_tile(v: i16) -> i16 {
    v.rem_euclid(MAP_TILES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, SoccerConfig, SpawnPoint};

    struct FixedMap {
        goal: (i16, i16),
    }
    impl TileMap for FixedMap {
        fn nearest_empty_tile(&self, x: i16, y: i16) -> Option<(i16, i16)> {
            Some((x, y))
        }
        fn is_goal_tile(&self, x: i16, y: i16) -> bool {
            (x, y) == self.goal
        }
    }

    fn engine() -> BallEngine {
        let mut config = SoccerConfig::default();
        config.ball_count = 1;
        config.mode = Mode::All;
        config.goal_delay_ticks = 0;
        config.spawns = vec![SpawnPoint { x: 500, y: 500, radius: 0 }];
        BallEngine::new(config)
    }

    fn one_onmap_ball(time: u32) -> BallsState {
        BallsState {
            balls: vec![Ball {
                id: 0,
                state: BallState::OnMap { x: 200, y: 200, x_speed: 0, y_speed: 0, last_shooter: None, time },
                last_killer: None,
                killer_valid_pickup_time: 0,
            }],
        }
    }

    #[test]
    fn pickup_accepts_matching_time_and_transitions_to_carried() {
        let engine = engine();
        let mut state = one_onmap_ball(10);
        let packet = engine.pickup(&mut state, 0, 10, 7, false).unwrap();
        assert_eq!(packet.carrier_id, Some(7));
        assert!(matches!(state.balls[0].state, BallState::Carried { carrier: 7 }));
    }

    #[test]
    fn pickup_rejects_stale_time_unless_killer_valid() {
        let engine = engine();
        let mut state = one_onmap_ball(10);
        assert!(engine.pickup(&mut state, 0, 9, 7, false).is_err());

        state.balls[0].last_killer = Some(7);
        state.balls[0].killer_valid_pickup_time = 9;
        let packet = engine.pickup(&mut state, 0, 9, 7, false).unwrap();
        assert_eq!(packet.carrier_id, Some(7));
    }

    #[test]
    fn pickup_rejects_when_already_carrying_another() {
        let engine = engine();
        let mut state = one_onmap_ball(10);
        assert!(engine.pickup(&mut state, 0, 10, 7, true).is_err());
    }

    /// S1: a shoot onto a goal tile with `GoalDelay=0` scores inline and a
    /// new spawn packet is broadcast, without a separate goal packet.
    #[test]
    fn shoot_onto_goal_tile_scores_inline_and_respawns() {
        let engine = engine();
        let mut state = BallsState {
            balls: vec![Ball { id: 0, state: BallState::Carried { carrier: 7 }, last_killer: None, killer_valid_pickup_time: 0 }],
        };
        let map = FixedMap { goal: (200, 200) };
        let mut rng = rand::thread_rng();
        let outcome = engine.shoot(&mut state, 0, 7, 3, 200, 200, 0, 0, 50, 100, &map, &mut rng).unwrap();
        assert!(outcome.goal.is_some());
        match outcome.goal.unwrap() {
            GoalOutcome::Scored { event, respawn } => {
                assert_eq!(event.freq, 3);
                assert_eq!(event.scorer, 7);
                assert!(respawn.is_some());
            }
            GoalOutcome::Blocked { .. } => panic!("expected the goal to score in Mode::All"),
        }
        assert!(state.balls[0].is_on_map());
    }

    #[test]
    fn goal_by_non_carrier_of_record_is_rejected() {
        let engine = engine();
        let mut state = one_onmap_ball(10);
        let map = FixedMap { goal: (200, 200) };
        let mut rng = rand::thread_rng();
        assert!(engine.goal(&mut state, 0, 999, 0, 20, &map, &mut rng).is_err());
    }

    #[test]
    fn goal_delay_nonzero_phases_ball_into_waiting() {
        let mut config = engine().config;
        config.goal_delay_ticks = 500;
        let engine = BallEngine::new(config);
        let mut state = BallsState {
            balls: vec![Ball {
                id: 0,
                state: BallState::OnMap { x: 200, y: 200, x_speed: 0, y_speed: 0, last_shooter: Some(7), time: 10 },
                last_killer: None,
                killer_valid_pickup_time: 0,
            }],
        };
        let map = FixedMap { goal: (200, 200) };
        let mut rng = rand::thread_rng();
        let result = engine.goal(&mut state, 0, 7, 0, 1000, &map, &mut rng).unwrap();
        assert!(matches!(result, GoalOutcome::Scored { respawn: None, .. }));
        assert!(matches!(state.balls[0].state, BallState::Waiting { spawn_at_tick: 1500 }));
    }

    #[test]
    fn cleanup_after_leave_drops_ball_without_carrier() {
        let engine = engine();
        let mut state = BallsState {
            balls: vec![Ball { id: 0, state: BallState::Carried { carrier: 7 }, last_killer: None, killer_valid_pickup_time: 0 }],
        };
        engine.cleanup_after(&mut state, 7, (300, 400), 50, false, None);
        match state.balls[0].state {
            BallState::OnMap { x, y, last_shooter, .. } => {
                assert_eq!((x, y), (300, 400));
                assert_eq!(last_shooter, None);
            }
            _ => panic!("expected ball to be dropped on the map"),
        }
    }

    #[test]
    fn cleanup_after_ship_change_keeps_carrier_for_re_pickup() {
        let engine = engine();
        let mut state = BallsState {
            balls: vec![Ball { id: 0, state: BallState::Carried { carrier: 7 }, last_killer: None, killer_valid_pickup_time: 0 }],
        };
        engine.cleanup_after(&mut state, 7, (300, 400), 50, true, None);
        assert!(matches!(state.balls[0].state, BallState::OnMap { last_shooter: Some(7), .. }));
    }

    #[test]
    fn spawn_wraps_into_a_tile_the_map_reports_empty() {
        let engine = engine();
        let mut state = engine.initial_state(&mut rand::thread_rng());
        let map = FixedMap { goal: (999, 999) };
        let mut rng = rand::thread_rng();
        let packet = engine.spawn(0, &mut state, &map, &mut rng).unwrap();
        assert!(packet.x >= 0 && packet.y >= 0);
        assert!(state.balls[0].is_on_map());
    }

    #[test]
    fn periodic_tick_spawns_waiting_ball_once_due() {
        let engine = engine();
        let mut state = BallsState { balls: vec![Ball::new_waiting(0, 5)] };
        let map = FixedMap { goal: (999, 999) };
        let mut rng = rand::thread_rng();
        let packets = engine.periodic_tick(10, &mut state, &map, &mut rng, &|_| None);
        assert_eq!(packets.len(), 1);
        assert!(state.balls[0].is_on_map());
    }
}

fn sample_in_circle(cx: i16, cy: i16, radius: u16, rng: &mut impl Rng) -> (i16, i16) {
    if radius == 0 {
        return (cx, cy);
    }
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = (rng.gen_range(0.0_f64..1.0)).sqrt() * radius as f64;
    let dx = (r * angle.cos()).round() as i32;
    let dy = (r * angle.sin()).round() as i32;
    ((cx as i32 + dx) as i16, (cy as i32 + dy) as i16)
}
