//! Per-arena `Team:*` settings, §4.1. Loaded the way `game::core::config`
//! loads `GameConfig`: a plain `serde`-derived struct with a hand-written
//! `Default` mirroring the documented defaults, parsed from TOML via
//! `serdeconv`.

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    pub max_frequency: u16,
    pub desired_teams: u16,
    pub required_teams: u16,
    pub remembered_teams: u16,
    pub priv_freq_start: u16,
    pub balanced_against_start: u16,
    pub balanced_against_end: u16,
    pub disallow_team_spectators: bool,
    pub initial_spec: bool,
    pub max_playing: u32,
    pub max_per_team: u32,
    pub max_per_private_team: u32,
    pub include_spectators: bool,
    pub max_xres: u16,
    pub max_yres: u16,
    pub max_res_area: u32,
    pub force_even_teams: bool,
    pub max_team_difference: u32,
}

impl Default for TeamConfig {
    fn default() -> Self {
        TeamConfig {
            max_frequency: 10000,
            desired_teams: 2,
            required_teams: 0,
            remembered_teams: 0,
            priv_freq_start: 100,
            balanced_against_start: 0,
            balanced_against_end: 0,
            disallow_team_spectators: false,
            initial_spec: false,
            max_playing: 0,
            max_per_team: 0,
            max_per_private_team: 0,
            include_spectators: false,
            max_xres: 0,
            max_yres: 0,
            max_res_area: 0,
            force_even_teams: false,
            max_team_difference: 1,
        }
    }
}

impl TeamConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> TeamConfig {
        serdeconv::from_toml_file(path).expect("error loading team configuration file")
    }

    pub fn is_private_freq(&self, freq: u16) -> bool {
        self.priv_freq_start != 0 && freq >= self.priv_freq_start
    }

    /// Per-freq member cap, depending on whether `freq` is a private freq,
    /// §4.1 balancer contract. `0` means unbounded.
    pub fn max_metric_for(&self, freq: u16) -> u32 {
        if self.is_private_freq(freq) {
            self.max_per_private_team
        } else {
            self.max_per_team
        }
    }

    pub fn maximum_difference(&self) -> u32 {
        if self.force_even_teams {
            self.max_team_difference
        } else {
            u32::MAX
        }
    }

    pub fn is_balanced_against(&self, freq: u16) -> bool {
        self.balanced_against_end > self.balanced_against_start
            && freq >= self.balanced_against_start
            && freq < self.balanced_against_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_freq_uses_private_cap() {
        let mut cfg = TeamConfig::default();
        cfg.priv_freq_start = 100;
        cfg.max_per_team = 10;
        cfg.max_per_private_team = 2;
        assert_eq!(cfg.max_metric_for(5), 10);
        assert_eq!(cfg.max_metric_for(100), 2);
    }

    #[test]
    fn maximum_difference_is_unbounded_unless_forced() {
        let mut cfg = TeamConfig::default();
        cfg.max_team_difference = 1;
        assert_eq!(cfg.maximum_difference(), u32::MAX);
        cfg.force_even_teams = true;
        assert_eq!(cfg.maximum_difference(), 1);
    }
}
