// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polar positions on the tunnel plane.
//!
//! Layout works in polar form: `theta` carries the tree structure and `rho`
//! carries the age of the event. Renderers want Cartesian points, so
//! [`Polar`] converts to and from [`kurbo::Point`] around the origin.

use core::f64::consts::{PI, TAU};

use kurbo::{Point, Vec2};

/// A polar coordinate: angle in radians and distance from the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Polar {
    /// Angle in radians, measured counter-clockwise from the positive x axis.
    pub theta: f64,
    /// Distance from the origin.
    pub rho: f64,
}

impl Polar {
    /// The origin. Its angle is meaningless and kept at zero.
    pub const ORIGIN: Self = Self {
        theta: 0.0,
        rho: 0.0,
    };

    /// Creates a polar coordinate.
    #[inline]
    #[must_use]
    pub const fn new(theta: f64, rho: f64) -> Self {
        Self { theta, rho }
    }

    /// Converts a Cartesian point (relative to the origin) to polar form.
    ///
    /// The angle is normalized to `[0, 2π)`.
    #[inline]
    #[must_use]
    pub fn from_point(p: Point) -> Self {
        let v = p.to_vec2();
        Self {
            theta: normalize_angle(v.angle()),
            rho: v.hypot(),
        }
    }

    /// Converts to a Cartesian point around the origin.
    #[inline]
    #[must_use]
    pub fn to_point(self) -> Point {
        Point::ORIGIN + Vec2::from_angle(self.theta) * self.rho
    }

    /// Returns this coordinate rotated by `delta` radians, normalized.
    #[inline]
    #[must_use]
    pub fn rotated(self, delta: f64) -> Self {
        Self {
            theta: normalize_angle(self.theta + delta),
            rho: self.rho,
        }
    }

    /// Returns this coordinate with its angle normalized to `[0, 2π)`.
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            theta: normalize_angle(self.theta),
            rho: self.rho,
        }
    }

    /// Whether this coordinate sits exactly on the origin.
    #[inline]
    #[must_use]
    pub fn is_origin(self) -> bool {
        self.rho == 0.0
    }

    /// Interpolates toward `to` along the shorter arc.
    ///
    /// `delta <= 0` returns `self` and `delta >= 1` returns `to`, both
    /// bit-for-bit.
    #[must_use]
    pub fn interpolate(self, to: Self, delta: f64) -> Self {
        if delta <= 0.0 {
            return self;
        }
        if delta >= 1.0 {
            return to;
        }
        let mut diff = normalize_angle(to.theta - self.theta);
        if diff > PI {
            diff -= TAU;
        }
        Self {
            theta: normalize_angle(self.theta + diff * delta),
            rho: self.rho + (to.rho - self.rho) * delta,
        }
    }
}

/// Normalizes an angle to `[0, 2π)`.
#[inline]
#[must_use]
pub fn normalize_angle(theta: f64) -> f64 {
    let a = theta % TAU;
    let a = if a < 0.0 { a + TAU } else { a };
    // `-tiny + TAU` rounds to TAU.
    if a >= TAU { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn point_round_trip_quadrants() {
        for (x, y) in [(3.0, 4.0), (-3.0, 4.0), (-3.0, -4.0), (3.0, -4.0)] {
            let polar = Polar::from_point(Point::new(x, y));
            assert!(approx(polar.rho, 5.0), "rho was {}", polar.rho);
            assert!((0.0..TAU).contains(&polar.theta), "theta was {}", polar.theta);
            let back = polar.to_point();
            assert!(approx(back.x, x) && approx(back.y, y), "got {back:?}");
        }
    }

    #[test]
    fn normalize_wraps_both_directions() {
        assert!(approx(normalize_angle(TAU + 0.5), 0.5));
        assert!(approx(normalize_angle(-0.5), TAU - 0.5));
        assert_eq!(normalize_angle(-1e-18), 0.0);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn interpolate_endpoints_are_exact() {
        let a = Polar::new(0.3, 10.0);
        let b = Polar::new(5.9, 200.0);
        assert_eq!(a.interpolate(b, 0.0), a);
        assert_eq!(a.interpolate(b, 1.0), b);
    }

    #[test]
    fn interpolate_takes_the_short_way_around() {
        let a = Polar::new(0.1, 10.0);
        let b = Polar::new(TAU - 0.1, 10.0);
        let mid = a.interpolate(b, 0.5);
        // Halfway across the 0 seam, not through PI.
        assert!(approx(mid.theta, 0.0) || approx(mid.theta, TAU), "got {}", mid.theta);
        assert!(approx(mid.rho, 10.0));
    }

    #[test]
    fn rotated_normalizes() {
        let p = Polar::new(6.0, 1.0).rotated(1.0);
        assert!(approx(p.theta, 7.0 - TAU));
    }
}
