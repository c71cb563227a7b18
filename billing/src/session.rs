//! `BillingSession`, §4.7: the gatekeeper for every player's authentication,
//! the keepalive schedule, and the interrupted-auth dampening timer. A
//! long-lived reliable-UDP session with a pending/interrupted auth window,
//! rather than a single synchronous lookup.

use crate::config::BillingConfig;
use crate::player::PlayerRecord;
use crate::state::BillingState;
use arena::player::PlayerId;
use hashbrown::HashMap;
use wire::billing::{LoginResultCode, ScoreBlock, ServerLogin, ServerLogoff, UserLoginResponse};

/// What the gate decided about a login attempt (§4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward `login` to the biller; the pending-auth counter is already
    /// incremented and `player_id`'s record is marked pending.
    Forward(ServerLogin),
    /// The biller is unreachable; delegate to a fallback authenticator if
    /// one is registered.
    Fallback,
    /// The biller is unreachable and no fallback authenticator exists.
    NotFound,
    /// The biller is reachable but the pending/interrupted auth window is
    /// full.
    ServerBusy,
}

/// What completing an auth round-trip means for the caller (§4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCompletion {
    pub code: LoginResultCode,
    pub should_deliver_banner: bool,
    pub load_score: Option<ScoreBlock>,
}

pub struct BillingSession {
    pub state: BillingState,
    pending_auths: u32,
    interrupted_auths: u32,
    last_ping_tick: u32,
    last_decay_tick: u32,
    players: HashMap<PlayerId, PlayerRecord>,
}

impl BillingSession {
    pub fn new() -> Self {
        BillingSession {
            state: BillingState::NoSocket,
            pending_auths: 0,
            interrupted_auths: 0,
            last_ping_tick: 0,
            last_decay_tick: 0,
            players: HashMap::new(),
        }
    }

    pub fn pending_auths(&self) -> u32 {
        self.pending_auths
    }

    pub fn interrupted_auths(&self) -> u32 {
        self.interrupted_auths
    }

    fn record_mut(&mut self, player_id: PlayerId) -> &mut PlayerRecord {
        self.players.entry(player_id).or_insert_with(PlayerRecord::new)
    }

    pub fn record(&self, player_id: PlayerId) -> Option<&PlayerRecord> {
        self.players.get(&player_id)
    }

    /// §4.7 auth gate: decides whether to forward, fall back, or refuse.
    /// `fallback_available` reflects whether a `BillingFallback` capability
    /// is registered for this arena; without one an unreachable biller is
    /// `NotFound` rather than `Fallback`.
    pub fn gate_login(
        &mut self,
        config: &BillingConfig,
        player_id: PlayerId,
        login: ServerLogin,
        fallback_available: bool,
    ) -> GateDecision {
        if !self.state.is_logged_in() {
            return if fallback_available { GateDecision::Fallback } else { GateDecision::NotFound };
        }
        if self.pending_auths >= config.pending_auth_cap || self.interrupted_auths >= config.interrupted_auth_cap {
            return GateDecision::ServerBusy;
        }
        self.pending_auths += 1;
        self.record_mut(player_id).pending_auth_request = true;
        GateDecision::Forward(login)
    }

    /// §4.7 auth completion: biller's `UserLogin` response arrived.
    pub fn complete_auth(&mut self, player_id: PlayerId, response: UserLoginResponse) -> AuthCompletion {
        self.pending_auths = self.pending_auths.saturating_sub(1);
        let record = self.record_mut(player_id);
        record.pending_auth_request = false;

        let code = LoginResultCode::from_wire(response.result_code);
        let grants_access = matches!(code, LoginResultCode::Ok | LoginResultCode::AskDemographics);

        if grants_access {
            record.known_to_biller = true;
            record.user_id = response.user_id;
            record.first_login = response.first_login;
            record.usage_seconds = response.usage_seconds;
            record.squad = response.squad.clone();
            record.loaded_score = response.score;
        }

        AuthCompletion {
            code,
            should_deliver_banner: grants_access && response.banner.is_some(),
            load_score: if grants_access { response.score } else { None },
        }
    }

    /// §5 cancellation: a player disconnects mid-auth. No response is ever
    /// dispatched to the destroyed player; the pending slot becomes
    /// interrupted instead of silently leaking.
    pub fn player_disconnected_during_auth(&mut self, player_id: PlayerId) {
        if let Some(record) = self.players.get_mut(&player_id) {
            if record.pending_auth_request {
                record.pending_auth_request = false;
                self.pending_auths = self.pending_auths.saturating_sub(1);
                self.interrupted_auths += 1;
            }
        }
    }

    pub fn player_left(&mut self, player_id: PlayerId) {
        self.players.remove(&player_id);
    }

    /// §4.7 "halve the counter every 10s" while auths sit interrupted.
    pub fn decay_interrupted(&mut self, config: &BillingConfig, now: u32) {
        if now.saturating_sub(self.last_decay_tick) >= config.interrupted_decay_interval_ticks {
            self.interrupted_auths /= 2;
            self.last_decay_tick = now;
        }
    }

    /// §4.7 keepalive: true at most once per `ping_interval_ticks` while
    /// `LoggedIn`.
    pub fn ping_due(&mut self, config: &BillingConfig, now: u32) -> bool {
        if !self.state.is_logged_in() {
            return false;
        }
        if now.saturating_sub(self.last_ping_tick) >= config.ping_interval_ticks {
            self.last_ping_tick = now;
            true
        } else {
            false
        }
    }

    /// §4.7 score persistence: snapshot on arena leave, forwarded at logoff.
    pub fn save_score(&mut self, player_id: PlayerId, score: ScoreBlock) {
        self.record_mut(player_id).saved_score = Some(score);
    }

    /// §4.7 logoff: `None` if the player was never known to the biller.
    pub fn logoff(&mut self, config: &BillingConfig, player_id: PlayerId, is_public_arena: bool) -> Option<ServerLogoff> {
        let record = self.players.get(&player_id)?;
        if !record.known_to_biller {
            return None;
        }
        let score = if is_public_arena && config.save_public_player_scores {
            record.saved_score
        } else {
            None
        };
        Some(ServerLogoff { user_id: record.user_id, score })
    }
}

impl Default for BillingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(name: &str) -> ServerLogin {
        ServerLogin {
            name: name.to_string(),
            password: "pw".to_string(),
            ip: 0,
            mac_id: 0,
            timezone_bias: 0,
            client_version: 1,
            extra: Vec::new(),
        }
    }

    #[test]
    fn login_forwards_when_logged_in_and_under_caps() {
        let mut session = BillingSession::new();
        session.state = BillingState::LoggedIn;
        let config = BillingConfig::default();
        let decision = session.gate_login(&config, 1, login("neon"), true);
        assert_eq!(decision, GateDecision::Forward(login("neon")));
        assert_eq!(session.pending_auths(), 1);
    }

    #[test]
    fn login_falls_back_when_biller_unreachable_and_fallback_registered() {
        let mut session = BillingSession::new();
        let config = BillingConfig::default();
        let decision = session.gate_login(&config, 1, login("neon"), true);
        assert_eq!(decision, GateDecision::Fallback);
    }

    #[test]
    fn login_is_not_found_when_biller_unreachable_and_no_fallback_registered() {
        let mut session = BillingSession::new();
        let config = BillingConfig::default();
        let decision = session.gate_login(&config, 1, login("neon"), false);
        assert_eq!(decision, GateDecision::NotFound);
    }

    #[test]
    fn login_is_server_busy_once_pending_cap_is_hit() {
        let mut session = BillingSession::new();
        session.state = BillingState::LoggedIn;
        let mut config = BillingConfig::default();
        config.pending_auth_cap = 1;
        assert_eq!(session.gate_login(&config, 1, login("a"), true), GateDecision::Forward(login("a")));
        assert_eq!(session.gate_login(&config, 2, login("b"), true), GateDecision::ServerBusy);
    }

    #[test]
    fn disconnect_during_auth_moves_pending_to_interrupted() {
        let mut session = BillingSession::new();
        session.state = BillingState::LoggedIn;
        let config = BillingConfig::default();
        session.gate_login(&config, 1, login("neon"), true);
        session.player_disconnected_during_auth(1);
        assert_eq!(session.pending_auths(), 0);
        assert_eq!(session.interrupted_auths(), 1);
    }

    #[test]
    fn interrupted_counter_halves_on_schedule() {
        let mut session = BillingSession::new();
        session.interrupted_auths = 9;
        let config = BillingConfig::default();
        session.decay_interrupted(&config, 500);
        assert_eq!(session.interrupted_auths(), 9);
        session.decay_interrupted(&config, 1000);
        assert_eq!(session.interrupted_auths(), 4);
    }

    #[test]
    fn complete_auth_ok_marks_player_known_and_loads_score() {
        let mut session = BillingSession::new();
        session.state = BillingState::LoggedIn;
        let config = BillingConfig::default();
        session.gate_login(&config, 1, login("neon"), true);
        let response = UserLoginResponse {
            result_code: 0,
            user_id: 42,
            first_login: 1000,
            usage_seconds: 0,
            authenticated_name: "neon".to_string(),
            squad: "void".to_string(),
            banner: None,
            score: Some(ScoreBlock { kills: 3, ..Default::default() }),
        };
        let completion = session.complete_auth(1, response);
        assert_eq!(completion.code, LoginResultCode::Ok);
        assert_eq!(session.pending_auths(), 0);
        assert!(session.record(1).unwrap().known_to_biller);
        assert_eq!(session.record(1).unwrap().user_id, 42);
    }

    #[test]
    fn logoff_carries_score_only_for_public_arenas_with_persistence_enabled() {
        let mut session = BillingSession::new();
        session.state = BillingState::LoggedIn;
        let config = BillingConfig::default();
        session.gate_login(&config, 1, login("neon"), true);
        session.complete_auth(
            1,
            UserLoginResponse {
                result_code: 0,
                user_id: 7,
                first_login: 0,
                usage_seconds: 0,
                authenticated_name: "neon".to_string(),
                squad: String::new(),
                banner: None,
                score: None,
            },
        );
        session.save_score(1, ScoreBlock { kills: 5, ..Default::default() });

        let public = session.logoff(&config, 1, true).unwrap();
        assert_eq!(public.score.unwrap().kills, 5);

        let private = session.logoff(&config, 1, false).unwrap();
        assert!(private.score.is_none());
    }

    #[test]
    fn logoff_is_none_for_a_player_never_known_to_the_biller() {
        let mut session = BillingSession::new();
        let config = BillingConfig::default();
        assert!(session.logoff(&config, 99, true).is_none());
    }

    #[test]
    fn ping_is_due_only_while_logged_in_and_on_schedule() {
        let mut session = BillingSession::new();
        let config = BillingConfig::default();
        assert!(!session.ping_due(&config, 0));
        session.state = BillingState::LoggedIn;
        assert!(session.ping_due(&config, 0));
        assert!(!session.ping_due(&config, 100));
        assert!(session.ping_due(&config, config.ping_interval_ticks));
    }
}
