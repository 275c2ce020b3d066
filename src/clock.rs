//! Time sources.  The protocol itself only ever needs "now" in milliseconds;
//! everything else (skew, offsets) is arithmetic on top.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time, injected wherever Hawk needs a timestamp so
/// that hosts and tests control the clock.
pub trait Clock: Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The operating-system clock.  Used whenever no other clock is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock pinned to a fixed instant, for tests and for hosts that already
/// track time themselves.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Apply a signed millisecond offset to a clock reading, saturating at zero.
pub(crate) fn offset_now_ms(clock: Option<&dyn Clock>, offset_ms: i64) -> u64 {
    let now = clock.unwrap_or(&SystemClock).now_ms();
    if offset_ms >= 0 {
        now.saturating_add(offset_ms as u64)
    } else {
        now.saturating_sub(offset_ms.unsigned_abs())
    }
}
