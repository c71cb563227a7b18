//! Time helpers: monotonic game ticks plus wall-clock timestamps for
//! anything persisted or shown to an operator.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Server "ticks" run at 100 per second, matching the classic SubSpace
/// timestamp granularity used throughout the wire protocol (security
/// packets, brick start times, ball map-entry times).
pub const TICKS_PER_SECOND: u64 = 100;

/// Returns the current UNIX timestamp in whole seconds.
#[inline]
pub fn timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// A monotonic tick clock anchored at construction time, used by arenas to
/// stamp ball/brick/security state without touching the wall clock on every
/// mutation.
#[derive(Clone)]
pub struct TickClock {
    origin: Instant,
}

impl TickClock {
    pub fn new() -> Self {
        TickClock { origin: Instant::now() }
    }

    /// Current tick count (100ths of a second) since this clock started.
    #[inline]
    pub fn now(&self) -> u32 {
        let elapsed = self.origin.elapsed();
        (elapsed.as_millis() / 10) as u32
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_clock_is_monotonic_nondecreasing() {
        let clock = TickClock::new();
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(15));
        let second = clock.now();
        assert!(second >= first);
    }
}
