//! The connection state machine, §4.7:
//!
//! ```text
//! NoSocket --connect--> Connecting --socket-up--> WaitLogin
//! WaitLogin --first inbound packet or timeout--> LoggedIn
//! LoggedIn --disconnect--> Retry --cfg.RetryInterval--> NoSocket
//! any --admin drop--> Disabled (no auto-retry)
//! fatal config error --> Disabled
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingState {
    NoSocket,
    Connecting,
    WaitLogin { entered_at: u32 },
    LoggedIn,
    Retry { entered_at: u32 },
    Disabled,
}

impl BillingState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, BillingState::LoggedIn)
    }

    pub fn connect(&mut self) {
        if *self == BillingState::NoSocket {
            *self = BillingState::Connecting;
        }
    }

    pub fn socket_up(&mut self, now: u32) {
        if *self == BillingState::Connecting {
            *self = BillingState::WaitLogin { entered_at: now };
        }
    }

    /// An inbound packet arrived while waiting for the first response, or
    /// the wait timed out: either way, promote to `LoggedIn` (§4.7).
    pub fn advance_past_wait_login(&mut self, now: u32, timeout_ticks: u32) {
        if let BillingState::WaitLogin { entered_at } = *self {
            if now.saturating_sub(entered_at) >= timeout_ticks {
                *self = BillingState::LoggedIn;
            }
        }
    }

    pub fn inbound_packet_received(&mut self) {
        if matches!(self, BillingState::WaitLogin { .. }) {
            *self = BillingState::LoggedIn;
        }
    }

    pub fn disconnect(&mut self, now: u32) {
        if !matches!(self, BillingState::Disabled) {
            *self = BillingState::Retry { entered_at: now };
        }
    }

    pub fn retry_elapsed(&mut self, now: u32, retry_interval_ticks: u32) {
        if let BillingState::Retry { entered_at } = *self {
            if now.saturating_sub(entered_at) >= retry_interval_ticks {
                *self = BillingState::NoSocket;
            }
        }
    }

    pub fn admin_drop(&mut self) {
        *self = BillingState::Disabled;
    }

    pub fn fatal_config_error(&mut self) {
        *self = BillingState::Disabled;
    }
}
