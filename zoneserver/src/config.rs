//! Aggregate zone-server configuration, ambient stack §0: one TOML file,
//! one `serde`-derived struct per subsystem, loaded the way `TeamConfig`
//! and friends already do it.

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub name: String,
    pub spec_freq: u16,
    pub idle_timeout_secs: u32,
    pub is_public: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            name: "default".to_string(),
            spec_freq: 9999,
            idle_timeout_secs: 300,
            is_public: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ZoneServerConfig {
    pub arena: ArenaConfig,
    pub team: teams::TeamConfig,
    pub soccer: balls::SoccerConfig,
    pub brick: bricks::BrickConfig,
    pub security: security::SecurityConfig,
    pub billing: billing::BillingConfig,
}

impl ZoneServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ZoneServerConfig {
        serdeconv::from_toml_file(path).expect("error loading zone server configuration file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_carries_every_subsystem_default() {
        let config = ZoneServerConfig::default();
        assert_eq!(config.arena.name, "default");
        assert_eq!(config.security.switch_interval_ticks, 6000);
        assert_eq!(config.billing.pending_auth_cap, 15);
    }
}
