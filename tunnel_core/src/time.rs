// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event timestamps and the visible time window.
//!
//! [`Timestamp`] is a point on the tunnel's depth axis, expressed as seconds
//! since the Unix epoch. Event trees arrive from upstream with timestamps in
//! this unit; fractional seconds are preserved.
//!
//! [`TimeWindow`] is the `[far, near]` interval currently visible in the
//! tunnel. The near end is the more recent one, so a well-formed window always
//! has `near > far`.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as seconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(pub f64);

impl Timestamp {
    /// Returns the raw number of seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }

    /// Returns the number of seconds between `self` and an older time, or zero
    /// if `older` is actually more recent.
    #[inline]
    #[must_use]
    pub fn saturating_seconds_since(self, older: Self) -> f64 {
        (self.0 - older.0).max(0.0)
    }
}

impl Add<f64> for Timestamp {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self(self.0 + rhs)
    }
}

impl Sub<f64> for Timestamp {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: f64) -> Self {
        Self(self.0 - rhs)
    }
}

impl Sub for Timestamp {
    type Output = f64;

    #[inline]
    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}s)", self.0)
    }
}

/// The visible slice of the depth axis.
///
/// `near` is the most recent visible time (the mouth of the tunnel), `far` the
/// oldest. Callers are responsible for keeping `near > far`; this type only
/// checks it in debug builds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    /// Most recent visible time.
    pub near: Timestamp,
    /// Oldest visible time.
    pub far: Timestamp,
}

impl TimeWindow {
    /// Creates a window from its near and far bounds.
    #[inline]
    #[must_use]
    pub fn new(near: Timestamp, far: Timestamp) -> Self {
        debug_assert!(near > far, "time window must have near > far");
        Self { near, far }
    }

    /// Creates a window ending at `near` and reaching `span` seconds back.
    #[inline]
    #[must_use]
    pub fn ending_at(near: Timestamp, span: f64) -> Self {
        Self::new(near, near - span)
    }

    /// Length of the window in seconds.
    #[inline]
    #[must_use]
    pub fn span(self) -> f64 {
        self.near - self.far
    }

    /// Whether `t` lies inside `[far, near]` (both ends inclusive).
    #[inline]
    #[must_use]
    pub fn contains(self, t: Timestamp) -> bool {
        t >= self.far && t <= self.near
    }

    /// Returns the window moved by `seconds` (positive is toward the future).
    #[inline]
    #[must_use]
    pub fn shifted(self, seconds: f64) -> Self {
        Self {
            near: self.near + seconds,
            far: self.far + seconds,
        }
    }

    /// Whether the two windows share at least one instant.
    #[inline]
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.far <= other.near && other.far <= self.near
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_arithmetic() {
        let t = Timestamp(1_000.0);
        assert_eq!(t + 5.0, Timestamp(1_005.0));
        assert_eq!(t - 5.0, Timestamp(995.0));
        assert_eq!(Timestamp(1_010.0) - t, 10.0);
        assert_eq!(t.saturating_seconds_since(Timestamp(1_010.0)), 0.0);
    }

    #[test]
    fn window_contains_is_inclusive() {
        let w = TimeWindow::new(Timestamp(100.0), Timestamp(40.0));
        assert_eq!(w.span(), 60.0);
        assert!(w.contains(Timestamp(100.0)));
        assert!(w.contains(Timestamp(40.0)));
        assert!(!w.contains(Timestamp(39.9)));
        assert!(!w.contains(Timestamp(100.1)));
    }

    #[test]
    fn shifted_window_keeps_span() {
        let w = TimeWindow::ending_at(Timestamp(3_600.0), 600.0);
        let moved = w.shifted(-120.0);
        assert_eq!(moved.near, Timestamp(3_480.0));
        assert_eq!(moved.span(), 600.0);
        assert!(w.overlaps(moved));
        assert!(!w.overlaps(w.shifted(1_000.0)));
    }
}
