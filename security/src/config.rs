//! `Security:*` settings, §4.4.

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Whether a detected mismatch/non-response actually triggers a kick
    /// (administrative override, §7); `BypassSecurity` always wins over it.
    pub security_kickoff: bool,
    /// 60s switch schedule, in ticks.
    pub switch_interval_ticks: u32,
    /// 15s send-to-check delay, in ticks.
    pub check_delay_ticks: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            security_kickoff: true,
            switch_interval_ticks: 6000,
            check_delay_ticks: 1500,
        }
    }
}

impl SecurityConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> SecurityConfig {
        serdeconv::from_toml_file(path).expect("error loading security configuration file")
    }
}
