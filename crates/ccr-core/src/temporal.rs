//! # Ledger Time
//!
//! The registry never schedules anything. It evaluates "has this window
//! elapsed?" only when a later call arrives, against a [`Clock`] supplied
//! by the host. Times are `u64` ledger ticks (block heights or seconds,
//! whichever the host ledger uses).
//!
//! ## Boundary Rule
//!
//! A deadline *has passed* once `deadline <= now`. A deadline equal to the
//! current tick counts as elapsed; this is what lets a zero-timeout
//! set-state be progressed in the same call. The one exception is
//! `u64::MAX`: it is what saturated deadlines collapse to, and it never
//! passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

/// Source of the current ledger tick. Must be monotonic.
pub trait Clock: Send + Sync {
    /// The current ledger tick.
    fn now(&self) -> u64;
}

/// Whether `deadline` has elapsed at tick `now`.
///
/// `u64::MAX` marks a saturated deadline and never elapses.
pub fn has_passed(deadline: u64, now: u64) -> bool {
    deadline != u64::MAX && deadline <= now
}

/// Compute `now + timeout`, saturating at `u64::MAX`.
///
/// A saturated deadline never elapses.
pub fn deadline_after(now: u64, timeout: u64) -> u64 {
    now.saturating_add(timeout)
}

/// Wall-clock ticks: seconds since the Unix epoch (UTC).
///
/// Clamps pre-epoch system time to zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A manually driven clock.
///
/// Clones share the same tick, so a test can keep a handle while the
/// engine owns another.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    tick: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at `tick`.
    pub fn new(tick: u64) -> Self {
        Self {
            tick: Arc::new(AtomicU64::new(tick)),
        }
    }

    /// Move the clock to `tick`. Refuses to go backwards.
    pub fn set(&self, tick: u64) {
        self.tick.fetch_max(tick, Ordering::SeqCst);
    }

    /// Advance the clock by `ticks`, saturating at `u64::MAX`.
    pub fn advance(&self, ticks: u64) {
        let _ = self
            .tick
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(ticks))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }
}
