//! Epoch time model and injectable clocks.
//!
//! # Design
//!
//! All schedule arithmetic happens in whole Unix seconds wrapped in [`Epoch`].
//! Integer seconds keep window comparisons exact: a scan at exactly
//! `expected ± window` is inside the window, one second further is not.
//!
//! Wall-clock reads go through the [`Clock`] trait so the monitor can be driven
//! by a [`ManualClock`] in tests and by [`SystemClock`] in production.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ── Epoch ─────────────────────────────────────────────────────────────────────

/// Seconds since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Epoch(pub i64);

impl Epoch {
    /// Return the instant `secs` seconds after `self`.
    #[inline]
    pub fn offset(self, secs: u32) -> Epoch {
        Epoch(self.0.saturating_add(secs as i64))
    }

    /// `true` if `self` lies in `[expected - window, expected + window]`.
    #[inline]
    pub fn within(self, expected: Epoch, window_secs: u32) -> bool {
        let w = window_secs as i64;
        self.0 >= expected.0.saturating_sub(w) && self.0 <= expected.0.saturating_add(w)
    }

    /// `true` once `self` is strictly past `expected + window`.
    #[inline]
    pub fn is_past_window(self, expected: Epoch, window_secs: u32) -> bool {
        self.0 > expected.0.saturating_add(window_secs as i64)
    }

    /// `true` while `self` is strictly before `expected - window`.
    #[inline]
    pub fn is_before_window(self, expected: Epoch, window_secs: u32) -> bool {
        self.0 < expected.0.saturating_sub(window_secs as i64)
    }
}

impl std::ops::Sub for Epoch {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Epoch) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

// ── ShiftWindow ───────────────────────────────────────────────────────────────

/// Start and end of one patrol shift.  `end` is exclusive for route building:
/// a sentry keeps walking while its accumulated time is `< end`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start: Epoch,
    pub end:   Epoch,
}

impl ShiftWindow {
    pub fn new(start: Epoch, duration_secs: u32) -> Self {
        Self { start, end: start.offset(duration_secs) }
    }

    /// Duration in seconds from hours and minutes, as entered on the shift form.
    pub fn duration_from_hm(hours: u32, minutes: u32) -> u32 {
        hours.saturating_mul(3_600).saturating_add(minutes.saturating_mul(60))
    }

    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains(&self, t: Epoch) -> bool {
        t >= self.start && t < self.end
    }
}

// ── Clocks ────────────────────────────────────────────────────────────────────

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Epoch;
}

/// Reads the operating-system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Epoch {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Epoch(secs)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start: Epoch) -> Self {
        Self(AtomicI64::new(start.0))
    }

    pub fn set(&self, t: Epoch) {
        self.0.store(t.0, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Epoch {
        Epoch(self.0.load(Ordering::SeqCst))
    }
}
