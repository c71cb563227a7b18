//! The security/seed cycle, §4.4: 60s switch schedule, per-player
//! send/check bookkeeping, response validation, and the seed override
//! path used by replays/recorders.

use crate::checksum::vie_exe_checksum;
use crate::scrty::ScrtyTable;
use rand::Rng;
use wire::security::{SecurityRequest, SecurityResponse};

/// The current global seed/key state, refreshed every switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedState {
    pub green_seed: u32,
    pub door_seed: u32,
    pub timestamp: u32,
    pub key: u32,
}

impl SeedState {
    pub fn request(&self) -> SecurityRequest {
        SecurityRequest { green_seed: self.green_seed, door_seed: self.door_seed, timestamp: self.timestamp, key: self.key }
    }
}

/// A per-arena override installed by a replay/recorder, §4.4. Arenas with
/// an override are excluded from the request/response cycle and only ever
/// receive an informational, key-0 sync packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOverride {
    pub green_seed: u32,
    pub door_seed: u32,
    pub timestamp: u32,
}

impl SeedOverride {
    pub fn informational_request(&self) -> SecurityRequest {
        SecurityRequest { green_seed: self.green_seed, door_seed: self.door_seed, timestamp: self.timestamp, key: 0 }
    }
}

/// Drives one 60s switch: draws new seeds, picks a `(key, exe checksum)`
/// pair from the scrty table (or a random key with a zero exe checksum if
/// the table is empty/missing, §7 degraded mode).
pub fn switch(rng: &mut impl Rng, scrty: &ScrtyTable, now: u32) -> (SeedState, u32) {
    let seeds = SeedState { green_seed: rng.gen(), door_seed: rng.gen(), timestamp: now, key: 0 };
    if scrty.is_empty() {
        let key: u32 = rng.gen();
        return (SeedState { key, ..seeds }, 0);
    }
    let index = rng.gen_range(0..scrty.len());
    let pair = scrty.get(index).expect("index within scrty table bounds");
    (SeedState { key: pair.key, ..seeds }, pair.continuum_exe_checksum)
}

/// Per-player bookkeeping for one outstanding security request, §4.4.
#[derive(Debug, Clone, Copy)]
pub struct PendingCheck {
    pub sent: bool,
    pub cancelled: bool,
    pub sent_at_tick: u32,
    pub expected_map_checksum: u32,
    pub expected_settings_checksum: u32,
    pub expected_exe_checksum: u32,
}

impl PendingCheck {
    pub fn new(now: u32, map_checksum: u32, settings_checksum: u32, exe_checksum: u32) -> Self {
        PendingCheck {
            sent: true,
            cancelled: false,
            sent_at_tick: now,
            expected_map_checksum: map_checksum,
            expected_settings_checksum: settings_checksum,
            expected_exe_checksum: exe_checksum,
        }
    }

    pub fn due_for_check(&self, now: u32, check_delay_ticks: u32) -> bool {
        self.sent && !self.cancelled && now >= self.sent_at_tick + check_delay_ticks
    }
}

/// What the check phase (15s after send) decided for one still-outstanding
/// player, §4.4/S3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The player responded (or is otherwise not actionable); nothing to do.
    NoAction,
    /// Logged as malicious but not kicked (either `SuppressSecurity` is
    /// set, or kickoff/bypass policy says not to kick).
    LoggedOnly,
    Kick,
}

/// §4.4 check phase + §7's "gated by a capability check and config flag to
/// preserve administrative overrides." `suppress_security` silences the
/// malicious-input log; `bypass_security` blocks the kick even when
/// `security_kickoff` is on.
pub fn check_phase(pending: &PendingCheck, now: u32, check_delay_ticks: u32, suppress_security: bool, security_kickoff: bool, bypass_security: bool) -> CheckOutcome {
    if !pending.due_for_check(now, check_delay_ticks) {
        return CheckOutcome::NoAction;
    }
    if suppress_security {
        return CheckOutcome::LoggedOnly;
    }
    if security_kickoff && !bypass_security {
        CheckOutcome::Kick
    } else {
        CheckOutcome::LoggedOnly
    }
}

/// A response arrived with no outstanding request: malicious unless
/// suppressed, §4.4/§7. Returns `None` when a request genuinely was
/// outstanding, i.e. this response is not actually unexpected.
pub fn unexpected_response(pending: Option<&PendingCheck>, suppress_security: bool) -> Option<CheckOutcome> {
    let was_outstanding = matches!(pending, Some(p) if p.sent && !p.cancelled);
    if was_outstanding {
        return None;
    }
    Some(if suppress_security { CheckOutcome::NoAction } else { CheckOutcome::LoggedOnly })
}

/// The exe checksum a response is validated against depends on client
/// kind: VIE clients are checked against the pure `vie_exe_checksum`
/// function; Continuum clients are checked against the scrty-derived sum
/// if the seed cycle computed one, else accepted unconditionally.
pub enum ExeExpectation {
    Vie { key: u32 },
    Continuum { scrty_checksum: Option<u32> },
}

/// §4.4 response handling: compares map, settings, and exe checksums.
/// Returns `Ok(())` on a full match, `Err(reason)` on the first mismatch
/// found (map, then settings, then exe).
pub fn validate_response(pending: &PendingCheck, response: &SecurityResponse, exe_expectation: ExeExpectation) -> Result<(), &'static str> {
    if response.map_checksum != pending.expected_map_checksum {
        return Err("map checksum mismatch");
    }
    if response.setting_checksum != pending.expected_settings_checksum {
        return Err("settings checksum mismatch");
    }
    let exe_ok = match exe_expectation {
        ExeExpectation::Vie { key } => response.exe_checksum == vie_exe_checksum(key),
        ExeExpectation::Continuum { scrty_checksum: Some(expected) } => response.exe_checksum == expected,
        ExeExpectation::Continuum { scrty_checksum: None } => true,
    };
    if !exe_ok {
        return Err("exe checksum mismatch");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrty::ScrtyPair;

    fn table_with(pairs: &[(u32, u32)]) -> ScrtyTable {
        use byteorder::{LittleEndian, WriteBytesExt};
        let mut buf = Vec::new();
        for &(k, c) in pairs {
            buf.write_u32::<LittleEndian>(k).unwrap();
            buf.write_u32::<LittleEndian>(c).unwrap();
        }
        ScrtyTable::load(std::io::Cursor::new(buf)).unwrap()
    }

    #[test]
    fn switch_falls_back_to_random_key_and_zero_checksum_when_table_missing() {
        let table = ScrtyTable::default();
        let mut rng = rand::thread_rng();
        let (_, exe_checksum) = switch(&mut rng, &table, 100);
        assert_eq!(exe_checksum, 0);
    }

    #[test]
    fn switch_draws_from_the_scrty_table_when_present() {
        let table = table_with(&[(0, 111), (42, 222)]);
        let mut rng = rand::thread_rng();
        let (seeds, exe_checksum) = switch(&mut rng, &table, 50);
        assert_eq!(seeds.timestamp, 50);
        assert!(exe_checksum == 111 || exe_checksum == 222);
    }

    /// S3: `SecurityKickoff=true`; a non-responding player without
    /// `SuppressSecurity`/`BypassSecurity` is kicked at the 15s mark.
    #[test]
    fn s3_non_responder_is_kicked_unless_bypass() {
        let pending = PendingCheck::new(2500, 1, 2, 3);
        let outcome = check_phase(&pending, 4000, 1500, false, true, false);
        assert_eq!(outcome, CheckOutcome::Kick);

        let bypassed = check_phase(&pending, 4000, 1500, false, true, true);
        assert_eq!(bypassed, CheckOutcome::LoggedOnly);
    }

    #[test]
    fn check_before_the_delay_elapses_takes_no_action() {
        let pending = PendingCheck::new(2500, 1, 2, 3);
        assert_eq!(check_phase(&pending, 3000, 1500, false, true, false), CheckOutcome::NoAction);
    }

    #[test]
    fn cancelled_pending_check_never_triggers_a_kick() {
        let mut pending = PendingCheck::new(2500, 1, 2, 3);
        pending.cancelled = true;
        assert_eq!(check_phase(&pending, 9999, 1500, false, true, false), CheckOutcome::NoAction);
    }

    #[test]
    fn validate_response_checks_map_then_settings_then_exe() {
        let pending = PendingCheck::new(0, 10, 20, 30);
        let mut response = SecurityResponse { map_checksum: 11, setting_checksum: 20, exe_checksum: 30, ..Default::default() };
        assert_eq!(validate_response(&pending, &response, ExeExpectation::Continuum { scrty_checksum: None }), Err("map checksum mismatch"));

        response.map_checksum = 10;
        response.setting_checksum = 21;
        assert_eq!(validate_response(&pending, &response, ExeExpectation::Continuum { scrty_checksum: None }), Err("settings checksum mismatch"));

        response.setting_checksum = 20;
        response.exe_checksum = 999;
        assert_eq!(
            validate_response(&pending, &response, ExeExpectation::Continuum { scrty_checksum: Some(30) }),
            Err("exe checksum mismatch")
        );

        assert_eq!(validate_response(&pending, &response, ExeExpectation::Continuum { scrty_checksum: None }), Ok(()));
    }

    #[test]
    fn response_with_no_outstanding_request_is_unexpected() {
        assert_eq!(unexpected_response(None, false), Some(CheckOutcome::LoggedOnly));
        assert_eq!(unexpected_response(None, true), Some(CheckOutcome::NoAction));
        let pending = PendingCheck::new(0, 1, 2, 3);
        assert_eq!(unexpected_response(Some(&pending), false), None);
    }

    #[test]
    fn validate_response_vie_uses_the_pure_checksum_function() {
        let pending = PendingCheck::new(0, 10, 20, 0);
        let key = 0xdead_beef;
        let response = SecurityResponse { map_checksum: 10, setting_checksum: 20, exe_checksum: vie_exe_checksum(key), ..Default::default() };
        assert_eq!(validate_response(&pending, &response, ExeExpectation::Vie { key }), Ok(()));
    }
}
