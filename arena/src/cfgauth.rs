//! Config-Authorization Advisor, §4.8: CRC-32-gated reload of
//! `conf/cfgauthg.conf` (global) and `conf/cfgautha.conf` (arena),
//! double-buffered atomic swap into the active restriction set, and a
//! case-insensitive `IsRestricted` lookup that never allocates in the fast
//! path. `arc_swap::ArcSwap` gives a lock-free atomic pointer swap without
//! unsafe raw-pointer duplication.

use arc_swap::ArcSwap;
use corelib::crc::crc32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct RestrictionEntry {
    section: String,
    key: Option<String>,
}

/// One-per-line entries of either `"Section"` (matches any key in that
/// section) or `"Section:Key"`.
#[derive(Default)]
pub struct RestrictionSet {
    entries: Vec<RestrictionEntry>,
}

impl RestrictionSet {
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.split_once(':') {
                Some((section, key)) => RestrictionEntry {
                    section: section.to_string(),
                    key: Some(key.to_string()),
                },
                None => RestrictionEntry {
                    section: line.to_string(),
                    key: None,
                },
            })
            .collect();
        RestrictionSet { entries }
    }

    /// Case-insensitive, allocation-free in the fast path: both sides are
    /// compared via `eq_ignore_ascii_case` against borrowed `&str`s.
    pub fn is_restricted(&self, section: &str, key: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry.section.eq_ignore_ascii_case(section)
                && match &entry.key {
                    None => true,
                    Some(k) => k.eq_ignore_ascii_case(key),
                }
        })
    }
}

pub struct ConfigAuthAdvisor {
    global: ArcSwap<RestrictionSet>,
    arena: ArcSwap<RestrictionSet>,
    global_crc: AtomicU32,
    arena_crc: AtomicU32,
}

impl ConfigAuthAdvisor {
    pub fn new() -> Self {
        ConfigAuthAdvisor {
            global: ArcSwap::from_pointee(RestrictionSet::default()),
            arena: ArcSwap::from_pointee(RestrictionSet::default()),
            global_crc: AtomicU32::new(0),
            arena_crc: AtomicU32::new(0),
        }
    }

    /// Reparses and swaps in the global restriction set if `contents`'
    /// CRC-32 differs from the last load. Returns whether it swapped.
    pub fn reload_global(&self, contents: &[u8]) -> bool {
        Self::reload(&self.global, &self.global_crc, contents)
    }

    pub fn reload_arena(&self, contents: &[u8]) -> bool {
        Self::reload(&self.arena, &self.arena_crc, contents)
    }

    fn reload(slot: &ArcSwap<RestrictionSet>, last_crc: &AtomicU32, contents: &[u8]) -> bool {
        let crc = crc32(contents);
        if last_crc.load(Ordering::Acquire) == crc {
            return false;
        }
        let text = String::from_utf8_lossy(contents);
        slot.store(Arc::new(RestrictionSet::parse(&text)));
        last_crc.store(crc, Ordering::Release);
        true
    }

    /// True if either the global or the arena-local set restricts
    /// `section`/`key`.
    pub fn is_restricted(&self, section: &str, key: &str) -> bool {
        self.global.load().is_restricted(section, key) || self.arena.load().is_restricted(section, key)
    }
}

impl Default for ConfigAuthAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_only_entry_matches_any_key() {
        let set = RestrictionSet::parse("Security\n");
        assert!(set.is_restricted("security", "SeedKey"));
        assert!(set.is_restricted("SECURITY", "anything"));
    }

    #[test]
    fn section_key_entry_is_specific() {
        let set = RestrictionSet::parse("Team:MaxFrequency\n");
        assert!(set.is_restricted("team", "maxfrequency"));
        assert!(!set.is_restricted("team", "maximumdifference"));
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let set = RestrictionSet::parse("\n# comment\nTeam:MaxFrequency\n\n");
        assert_eq!(set.entries.len(), 1);
    }

    #[test]
    fn unchanged_contents_do_not_reswap() {
        let advisor = ConfigAuthAdvisor::new();
        assert!(advisor.reload_global(b"Security\n"));
        assert!(!advisor.reload_global(b"Security\n"));
        assert!(advisor.reload_global(b"Security\nTeam\n"));
    }

    #[test]
    fn global_and_arena_sets_are_independent_but_both_consulted() {
        let advisor = ConfigAuthAdvisor::new();
        advisor.reload_global(b"Security\n");
        advisor.reload_arena(b"Team:MaxFrequency\n");
        assert!(advisor.is_restricted("security", "seedkey"));
        assert!(advisor.is_restricted("team", "maxfrequency"));
        assert!(!advisor.is_restricted("brick", "maxactivebricks"));
    }
}
