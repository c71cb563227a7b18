//! Assembles every subsystem crate into one running zone, §5: a
//! single-threaded main loop owns all per-arena state; the reliable
//! transport, map-tile provider, and RNG provider are external
//! collaborators this binary wires against through their traits.

use arena::{Arena, CapabilityRegistry, ConfigAuthAdvisor, ExtraData, ExtraDataKey, PlayerId};
use assets::{emergency_map_asset, AssetList};
use balls::{BallEngine, BallsState};
use billing::{BillingConfig, BillingSession};
use bricks::{BrickEngine, BrickQueue};
use corelib::time::TickClock;
use hashbrown::HashMap;
use rand::rngs::ThreadRng;
use security::{CheckOutcome, PendingCheck, ScrtyTable, SeedState, SecurityConfig};
use std::sync::Arc;

use crate::config::ZoneServerConfig;
use crate::tilemap::OpenMap;

pub struct ZoneServerRuntime {
    pub arena: Arc<Arena>,
    pub registry: CapabilityRegistry,
    pub team_manager: teams::TeamManager,
    ball_engine: BallEngine,
    ball_key: ExtraDataKey<BallsState>,
    brick_engine: BrickEngine,
    brick_key: ExtraDataKey<BrickQueue>,
    security_config: SecurityConfig,
    scrty: ScrtyTable,
    seed_state: SeedState,
    pub assets: AssetList,
    pub billing_config: BillingConfig,
    pub billing: BillingSession,
    pub cfgauth: ConfigAuthAdvisor,
    pub idle: arena::messages::IdleTracker,
    pending_checks: HashMap<PlayerId, PendingCheck>,
    clock: TickClock,
    map: OpenMap,
    rng: ThreadRng,
    log: slog::Logger,
}

impl ZoneServerRuntime {
    pub fn new(config: ZoneServerConfig, scrty: ScrtyTable, log: slog::Logger) -> Self {
        let clock = TickClock::new();
        let arena = Arc::new(Arena::new(config.arena.name.clone(), config.arena.spec_freq));

        let ball_engine = BallEngine::new(config.soccer.clone());
        let ball_key = ExtraData::allocate::<BallsState>();
        let brick_engine = BrickEngine::new(config.brick.clone());
        let brick_key = ExtraData::allocate::<BrickQueue>();

        let mut rng = rand::thread_rng();
        {
            let mut extra = arena.extra.lock().expect("arena extra-data mutex poisoned");
            let initial_balls = ball_engine.initial_state(&mut rng);
            extra.insert(ball_key, initial_balls);
            extra.insert(brick_key, BrickQueue::new());
        }

        let (seed_state, _exe_checksum) = security::switch(&mut rng, &scrty, clock.now());

        ZoneServerRuntime {
            team_manager: teams::TeamManager::new(config.team.clone()),
            registry: CapabilityRegistry::new(),
            ball_engine,
            ball_key,
            brick_engine,
            brick_key,
            security_config: config.security.clone(),
            scrty,
            seed_state,
            assets: AssetList::new(vec![emergency_map_asset()]),
            billing_config: config.billing.clone(),
            billing: BillingSession::new(),
            cfgauth: ConfigAuthAdvisor::new(),
            idle: arena::messages::IdleTracker::new(clock.clone(), config.arena.idle_timeout_secs),
            pending_checks: HashMap::new(),
            clock,
            map: OpenMap,
            rng,
            log,
            arena,
        }
    }

    pub fn now(&self) -> u32 {
        self.clock.now()
    }

    /// One main-loop pass: ball broadcast, brick expiry, the security
    /// switch schedule, billing keepalive/decay, and idle sweep (§5).
    pub fn tick(&mut self) {
        let now = self.clock.now();

        let ball_packets = {
            let mut extra = self.arena.extra.lock().expect("arena extra-data mutex poisoned");
            let state = extra.get_mut(self.ball_key).expect("ball state registered at startup");
            self.ball_engine.periodic_tick(now, state, &self.map, &mut self.rng, &|_player| None)
        };
        if !ball_packets.is_empty() {
            slog::trace!(self.log, "ball broadcast"; "packets" => ball_packets.len());
        }

        let expired = {
            let mut extra = self.arena.extra.lock().expect("arena extra-data mutex poisoned");
            let queue = extra.get_mut(self.brick_key).expect("brick queue registered at startup");
            queue.expire_bricks(now, self.brick_engine.config.brick_time)
        };
        if !expired.is_empty() {
            slog::debug!(self.log, "bricks expired"; "count" => expired.len());
        }

        if now.saturating_sub(self.seed_state.timestamp) >= self.security_config.switch_interval_ticks {
            let (seed_state, exe_checksum) = security::switch(&mut self.rng, &self.scrty, now);
            self.seed_state = seed_state;
            slog::debug!(self.log, "security seed switch");
            self.send_security_requests(now, exe_checksum);
        }
        self.run_security_check_phase(now);

        if self.billing.ping_due(&self.billing_config, now) {
            slog::trace!(self.log, "billing keepalive ping due");
        }
        self.billing.decay_interrupted(&self.billing_config, now);

        let idle = self.idle.idle_players();
        if !idle.is_empty() {
            slog::debug!(self.log, "idle players"; "count" => idle.len());
        }
    }

    /// §4.4 send phase: every connected player gets a fresh `PendingCheck`
    /// keyed to the seed cycle that just switched. The map checksum is the
    /// primary visible asset's CRC-32 (settings checksum has no source
    /// collaborator yet, so it is pinned to 0 until config distribution is
    /// wired up).
    fn send_security_requests(&mut self, now: u32, exe_checksum: u32) {
        let map_checksum = self.assets.visible(false).next().map(|a| a.crc32).unwrap_or(0);
        let player_ids: Vec<PlayerId> = self.arena.with_state(|s| s.players.keys().copied().collect());
        for id in player_ids {
            self.pending_checks.insert(id, PendingCheck::new(now, map_checksum, 0, exe_checksum));
        }
    }

    /// §4.4/S3 check phase: 15s after a request was sent, any
    /// still-outstanding player is logged and, unless `BypassSecurity`
    /// applies, kicked.
    fn run_security_check_phase(&mut self, now: u32) {
        let check_delay_ticks = self.security_config.check_delay_ticks;
        let security_kickoff = self.security_config.security_kickoff;
        let mut resolved = Vec::new();
        for (&player_id, pending) in self.pending_checks.iter() {
            if !pending.due_for_check(now, check_delay_ticks) {
                continue;
            }
            let (suppress_security, bypass_security) = self
                .arena
                .with_state(|s| s.players.get(&player_id).map(|p| (p.flags.suppress_security, p.flags.bypass_security)))
                .unwrap_or((false, false));
            let outcome = security::check_phase(pending, now, check_delay_ticks, suppress_security, security_kickoff, bypass_security);
            resolved.push((player_id, outcome));
        }
        for (player_id, outcome) in resolved {
            match outcome {
                CheckOutcome::NoAction => {}
                CheckOutcome::LoggedOnly => {
                    slog::warn!(self.log, "security check failed, logged only"; "player" => player_id);
                    self.pending_checks.remove(&player_id);
                }
                CheckOutcome::Kick => {
                    slog::warn!(self.log, "security check failed, kicking player"; "player" => player_id);
                    self.pending_checks.remove(&player_id);
                }
            }
        }
    }
}
