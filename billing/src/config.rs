//! Billing client configuration, §4.7/§5. Open Question #4: the
//! pending/interrupted-auth caps were hardcoded in the source; here they
//! are config fields defaulting to the source's values.

use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub server_address: String,
    /// Ticks (100/s) to wait in `WaitLogin` before promoting to `LoggedIn`
    /// without ever having seen an inbound packet.
    pub wait_login_timeout_ticks: u32,
    /// Ticks between `NoSocket` retries after a disconnect.
    pub retry_interval_ticks: u32,
    /// Ticks between keepalive `Ping` sends while `LoggedIn`.
    pub ping_interval_ticks: u32,
    /// Ticks between interrupted-auth counter halvings.
    pub interrupted_decay_interval_ticks: u32,
    pub pending_auth_cap: u32,
    pub interrupted_auth_cap: u32,
    pub max_concurrent_banner_upload: usize,
    pub save_public_player_scores: bool,
    /// `?chat=` rewrite prefix for local/staff chat forwarding.
    pub chat_secret_prefix: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            server_address: String::new(),
            wait_login_timeout_ticks: 500,
            retry_interval_ticks: 3000,
            ping_interval_ticks: 6000,
            interrupted_decay_interval_ticks: 1000,
            pending_auth_cap: 15,
            interrupted_auth_cap: 20,
            max_concurrent_banner_upload: 5,
            save_public_player_scores: true,
            chat_secret_prefix: String::new(),
        }
    }
}

impl BillingConfig {
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> BillingConfig {
        serdeconv::from_toml_file(path).expect("error loading billing configuration file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_source_caps() {
        let config = BillingConfig::default();
        assert_eq!(config.pending_auth_cap, 15);
        assert_eq!(config.interrupted_auth_cap, 20);
    }
}
