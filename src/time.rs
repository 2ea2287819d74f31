//! Wall-clock access and interval accounting.
//!
//! Every timed rule in Flowify (mixing countdown, royalty payouts) works on
//! epoch milliseconds. Game logic takes `now` as a plain argument so it stays
//! deterministic; the session reads it from a [`Clock`].

use std::cell::Cell;
use std::rc::Rc;

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_HOUR: u64 = 3_600_000;

/// Source of epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Real wall time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    // SystemTime::now() panics on wasm32-unknown-unknown.
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Hand-driven clock for tests and offline simulation.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Whole intervals elapsed between `since` and `now`, accumulator style.
///
/// Returns `(count, consumed_ms)`. The remainder (`now - since - consumed_ms`)
/// is left for the next call. `count` is clamped to `max_intervals` so a long
/// absence does not pay out unbounded; the clamped-away time is consumed too.
pub fn whole_intervals(since: u64, now: u64, interval_ms: u64, max_intervals: u32) -> (u32, u64) {
    if interval_ms == 0 || now <= since {
        return (0, 0);
    }
    let elapsed = now - since;
    let raw = elapsed / interval_ms;
    if raw > max_intervals as u64 {
        // Drop the excess but keep the phase of the partial interval.
        let consumed = elapsed - elapsed % interval_ms;
        (max_intervals, consumed)
    } else {
        (raw as u32, raw * interval_ms)
    }
}

/// Countdown text like `1h 05m 09s`.
pub fn format_remaining(ms: u64) -> String {
    let total_secs = ms.div_ceil(MS_PER_SECOND);
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn clock_through_reference_and_rc() {
        let clock = Rc::new(ManualClock::new(7));
        let by_ref: &ManualClock = &clock;
        assert_eq!(by_ref.now_ms(), 7);
        assert_eq!(Clock::now_ms(&clock), 7);
        clock.advance(3);
        assert_eq!(Clock::now_ms(&clock), 10);
    }

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn no_intervals_before_first_boundary() {
        assert_eq!(whole_intervals(0, MS_PER_HOUR - 1, MS_PER_HOUR, 48), (0, 0));
    }

    #[test]
    fn remainder_carried_over() {
        // 2.5 hours → 2 intervals, half an hour left over
        let (n, consumed) = whole_intervals(0, 5 * MS_PER_HOUR / 2, MS_PER_HOUR, 48);
        assert_eq!(n, 2);
        assert_eq!(consumed, 2 * MS_PER_HOUR);
    }

    #[test]
    fn clamp_long_absence() {
        // 100 hours away → capped to 48 payouts, all 100 whole hours consumed
        let (n, consumed) = whole_intervals(0, 100 * MS_PER_HOUR + 10, MS_PER_HOUR, 48);
        assert_eq!(n, 48);
        assert_eq!(consumed, 100 * MS_PER_HOUR);
    }

    #[test]
    fn clock_going_backwards_pays_nothing() {
        assert_eq!(whole_intervals(5_000, 1_000, 100, 48), (0, 0));
    }

    #[test]
    fn zero_interval_is_inert() {
        assert_eq!(whole_intervals(0, 5_000, 0, 48), (0, 0));
    }

    #[test]
    fn format_remaining_units() {
        assert_eq!(format_remaining(0), "0s");
        assert_eq!(format_remaining(999), "1s");
        assert_eq!(format_remaining(65_000), "1m 05s");
        assert_eq!(format_remaining(2 * MS_PER_HOUR), "2h 00m 00s");
        assert_eq!(format_remaining(MS_PER_HOUR + 5 * 60_000 + 9_000), "1h 05m 09s");
    }
}
