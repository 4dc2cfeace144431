// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Start/end interpolation state and the timelines that drive it.
//!
//! Every animatable value in the tunnel (node positions, node alphas, ring
//! radii) is a [`Tween`]: a `start`, an `end`, and the `current` value
//! interpolated between them. A transition cycle looks like this:
//!
//! ```text
//!   retarget(end)          start := current, end := new target
//!       │
//!       ▼
//!   interpolate(delta)     current := start + (end - start) * delta   (per tick)
//!       │
//!       ▼
//!   settle()               start := end, current := end               (delta >= 1)
//! ```
//!
//! [`Timeline`] turns elapsed wall time into the eased `delta` that drives
//! `interpolate`. The tunnel runs one timeline for the positional transition
//! and one per node for secondary alpha fades; they advance independently.

use core::time::Duration;

use crate::polar::Polar;

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Easing curve applied to normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Quadratic, slow start.
    QuadIn,
    /// Quadratic, slow end.
    QuadOut,
    /// Quadratic, slow start and end.
    QuadInOut,
    /// Cubic, slow start and end.
    CubicInOut,
    /// Quartic, slow start and end.
    QuartInOut,
}

impl Easing {
    /// Maps `t` in `[0, 1]` to eased progress in `[0, 1]`.
    ///
    /// Inputs outside `[0, 1]` are clamped first, so `apply(0) == 0` and
    /// `apply(1) == 1` for every curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u * u / 2.0
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Lerp / Tween
// ---------------------------------------------------------------------------

/// Values that can be linearly interpolated.
///
/// Implementations must return `self` exactly for `delta <= 0` and `to`
/// exactly for `delta >= 1`.
pub trait Lerp: Copy {
    /// Interpolates from `self` toward `to`.
    #[must_use]
    fn lerp(self, to: Self, delta: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, to: Self, delta: f64) -> Self {
        if delta <= 0.0 {
            self
        } else if delta >= 1.0 {
            to
        } else {
            self + (to - self) * delta
        }
    }
}

impl Lerp for Polar {
    #[inline]
    fn lerp(self, to: Self, delta: f64) -> Self {
        self.interpolate(to, delta)
    }
}

/// One of the three interpolation slots of a [`Tween`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The value shown right now.
    Current,
    /// The value a running cycle started from.
    Start,
    /// The value a running cycle is heading to.
    End,
}

/// A value with a start, an end, and the current interpolation between them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tween<T> {
    /// Value at `delta = 0`.
    pub start: T,
    /// Value at `delta = 1`.
    pub end: T,
    /// Most recently interpolated value.
    pub current: T,
}

impl<T: Lerp> Tween<T> {
    /// Creates a settled tween holding `value` in all three slots.
    #[inline]
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            start: value,
            end: value,
            current: value,
        }
    }

    /// Reads one slot.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: Slot) -> T {
        match slot {
            Slot::Current => self.current,
            Slot::Start => self.start,
            Slot::End => self.end,
        }
    }

    /// Overwrites one slot.
    #[inline]
    pub fn set(&mut self, slot: Slot, value: T) {
        match slot {
            Slot::Current => self.current = value,
            Slot::Start => self.start = value,
            Slot::End => self.end = value,
        }
    }

    /// Sets all three slots to `value`, ending any transition.
    #[inline]
    pub fn jump(&mut self, value: T) {
        *self = Self::new(value);
    }

    /// Begins a new cycle from wherever `current` is toward `end`.
    ///
    /// Retargeting mid-flight snaps the start to the current value; there is
    /// no blending between the old and new targets.
    #[inline]
    pub fn retarget(&mut self, end: T) {
        self.start = self.current;
        self.end = end;
    }

    /// Writes `start + (end - start) * delta` into `current`.
    #[inline]
    pub fn interpolate(&mut self, delta: f64) {
        self.current = self.start.lerp(self.end, delta);
    }

    /// Collapses the cycle onto its end value.
    #[inline]
    pub fn settle(&mut self) {
        self.start = self.end;
        self.current = self.end;
    }
}

impl<T: Lerp + PartialEq> Tween<T> {
    /// Whether start, end and current all agree.
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.start == self.end && self.current == self.end
    }
}

// ---------------------------------------------------------------------------
// Animatable
// ---------------------------------------------------------------------------

/// Anything that holds start/end state and can be driven by a `delta`.
pub trait Animatable {
    /// Updates current state for progress `delta` in `[0, 1]`.
    fn interpolate(&mut self, delta: f64);

    /// Collapses start onto end once a cycle completes.
    fn settle(&mut self);
}

impl<T: Lerp> Animatable for Tween<T> {
    #[inline]
    fn interpolate(&mut self, delta: f64) {
        Self::interpolate(self, delta);
    }

    #[inline]
    fn settle(&mut self) {
        Self::settle(self);
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Converts elapsed time into eased progress.
///
/// Elapsed time is accumulated as a [`Duration`] so repeated ticks do not
/// drift. A zero-length timeline is complete immediately.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Timeline {
    /// Creates a timeline at progress zero.
    #[inline]
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Advances by `dt` and returns the eased progress.
    #[inline]
    pub fn advance(&mut self, dt: Duration) -> f64 {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        self.delta()
    }

    /// Eased progress in `[0, 1]`.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.easing.apply(self.progress())
    }

    /// Linear (un-eased) progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Whether the full duration has elapsed.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Time accumulated so far.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicInOut,
        Easing::QuartInOut,
    ];

    #[test]
    fn easing_endpoints() {
        for easing in CURVES {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?} clamps below");
            assert_eq!(easing.apply(7.0), 1.0, "{easing:?} clamps above");
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in CURVES {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(f64::from(i) / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn tween_endpoints_are_exact() {
        let mut t = Tween::new(3.0);
        t.retarget(11.0);
        t.interpolate(0.0);
        assert_eq!(t.current, 3.0);
        t.interpolate(0.25);
        assert_eq!(t.current, 5.0);
        t.interpolate(1.0);
        assert_eq!(t.current, 11.0);
        t.settle();
        assert!(t.is_settled());
        assert_eq!(t.start, 11.0);
    }

    #[test]
    fn retarget_mid_flight_starts_from_current() {
        let mut t = Tween::new(0.0);
        t.retarget(10.0);
        t.interpolate(0.5);
        t.retarget(20.0);
        assert_eq!(t.start, 5.0);
        assert_eq!(t.end, 20.0);
    }

    #[test]
    fn timeline_accumulates_and_completes() {
        let mut tl = Timeline::new(Duration::from_millis(100), Easing::Linear);
        let delta = tl.advance(Duration::from_millis(25));
        assert!((delta - 0.25).abs() < 1e-12, "got {delta}");
        assert!(!tl.is_complete());
        assert_eq!(tl.advance(Duration::from_millis(500)), 1.0);
        assert!(tl.is_complete());
        assert_eq!(tl.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn zero_length_timeline_is_complete() {
        let tl = Timeline::new(Duration::ZERO, Easing::QuartInOut);
        assert!(tl.is_complete());
        assert_eq!(tl.delta(), 1.0);
    }
}
