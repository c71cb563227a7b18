//! Goal-scorable policy, §4.2. Open Question #2: the source's
//! `SidesDefend3` branch assigned `scorableFreq=3` on both halves of the
//! map, which cannot be right since it means neither half is actually
//! contestable by freq 3 itself and the two halves are indistinguishable.
//! Decided here (and pinned by a regression test): left half defends freq
//! 3 (only freq 2 can score there), right half defends freq 2 (only freq
//! 3 can score there) — the same "opposite-half scores" shape as
//! `SidesDefend1`, just offset to freqs 2/3 instead of 0/1.

use arena::FreqNum;
use crate::config::Mode;

const MAP_CENTER: i16 = 512;

/// `None` means any freq may score (mode `All`).
pub fn scorable_freq(mode: Mode, x: i16, y: i16) -> Option<FreqNum> {
    let left = x < MAP_CENTER;
    let top = y < MAP_CENTER;
    match mode {
        Mode::All => None,
        Mode::LeftRight => Some(if left { 1 } else { 0 }),
        Mode::TopBottom => Some(if top { 1 } else { 0 }),
        Mode::SidesDefend1 => Some(if left { 1 } else { 0 }),
        Mode::SidesDefend3 => Some(if left { 3 } else { 2 }),
        Mode::QuadrantsDefend1 => Some(quadrant_index(left, top)),
        Mode::QuadrantsDefend3 => Some(quadrant_index(left, top) + 4),
    }
}

fn quadrant_index(left: bool, top: bool) -> FreqNum {
    match (left, top) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

pub fn is_scorable(mode: Mode, x: i16, y: i16, player_freq: FreqNum) -> bool {
    scorable_freq(mode, x, y).map_or(true, |f| f == player_freq)
}
