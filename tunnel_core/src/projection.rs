// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perspective projection of timestamps onto radii.
//!
//! The tunnel is modelled as a pinhole camera looking down the time axis. A
//! timestamp `t` sits `near - t + distance_from_camera` away from the camera
//! and projects to
//!
//! ```text
//! rho(t) = reference_radius * focal_length / (near - t + distance_from_camera)
//! ```
//!
//! The camera distance and focal length are solved from the configured ring
//! radii so that `rho(far) == min` and `rho(near) == max`:
//!
//! ```text
//! distance_from_camera = min * span / (max - min)
//! focal_length         = distance_from_camera * max / reference_radius
//! ```
//!
//! Both are derived values. [`ProjectionState`] is rebuilt from scratch
//! whenever the window or the reference radius changes.

use kurbo::Point;

use crate::config::RingRadii;
use crate::time::{TimeWindow, Timestamp};

/// Immutable snapshot of the projection for one time window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionState {
    window: TimeWindow,
    reference_radius: f64,
    focal_length: f64,
    distance_from_camera: f64,
}

impl ProjectionState {
    /// Derives the projection for `window` from the calibration radii.
    ///
    /// `radii.min < radii.max` and `window.near > window.far` are unchecked
    /// preconditions (asserted in debug builds only).
    #[must_use]
    pub fn new(window: TimeWindow, radii: &RingRadii) -> Self {
        debug_assert!(radii.min < radii.max, "min ring radius must be below max");
        debug_assert!(window.near > window.far, "time window must have near > far");
        let distance_from_camera = radii.min * window.span() / (radii.max - radii.min);
        let focal_length = distance_from_camera * radii.max / radii.reference;
        Self {
            window,
            reference_radius: radii.reference,
            focal_length,
            distance_from_camera,
        }
    }

    /// The window this projection was derived for.
    #[inline]
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Most recent visible time.
    #[inline]
    #[must_use]
    pub fn near(&self) -> Timestamp {
        self.window.near
    }

    /// Oldest visible time.
    #[inline]
    #[must_use]
    pub fn far(&self) -> Timestamp {
        self.window.far
    }

    /// Reference radius of the camera model.
    #[inline]
    #[must_use]
    pub fn reference_radius(&self) -> f64 {
        self.reference_radius
    }

    /// Derived focal length.
    #[inline]
    #[must_use]
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Derived distance between the camera and the near plane, in seconds.
    #[inline]
    #[must_use]
    pub fn distance_from_camera(&self) -> f64 {
        self.distance_from_camera
    }

    /// Projects a timestamp to its radius.
    ///
    /// Timestamps at or beyond the camera (non-positive depth) are clamped to
    /// a depth of `focal_length / 5`, so the result is always finite and
    /// non-negative.
    #[must_use]
    pub fn project(&self, t: Timestamp) -> f64 {
        let mut time_diff = (self.window.near - t) + self.distance_from_camera;
        if time_diff <= 0.0 {
            time_diff = self.focal_length / 5.0;
        }
        self.reference_radius * self.focal_length / time_diff
    }

    /// Inverse of [`project`](Self::project): the timestamp drawn at `radius`.
    ///
    /// Non-positive radii are floored to `f64::EPSILON`.
    #[must_use]
    pub fn time_at_radius(&self, radius: f64) -> Timestamp {
        let radius = radius.max(f64::EPSILON);
        self.window.near + self.distance_from_camera
            - self.focal_length * self.reference_radius / radius
    }

    /// The timestamp drawn under `point`, measured from the origin.
    #[must_use]
    pub fn time_at_point(&self, point: Point) -> Timestamp {
        self.time_at_radius(point.to_vec2().hypot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectionState {
        let window = TimeWindow::ending_at(Timestamp(100_000.0), 18_000.0);
        ProjectionState::new(window, &RingRadii::DEFAULT)
    }

    #[test]
    fn calibration_hits_configured_radii() {
        let p = sample();
        assert!((p.project(p.far()) - 25.0).abs() < 1e-9, "far -> {}", p.project(p.far()));
        assert!((p.project(p.near()) - 300.0).abs() < 1e-9, "near -> {}", p.project(p.near()));
    }

    #[test]
    fn derived_values() {
        let p = sample();
        // 25 * 18000 / 275
        assert!((p.distance_from_camera() - 1_636.363_636_363_636_4).abs() < 1e-6);
        assert!((p.focal_length() - p.distance_from_camera() * 300.0 / 600.0).abs() < 1e-9);
    }

    #[test]
    fn older_projects_smaller() {
        let p = sample();
        let a = p.project(Timestamp(99_000.0));
        let b = p.project(Timestamp(90_000.0));
        assert!(a > b, "{a} should exceed {b}");
    }

    #[test]
    fn beyond_camera_is_clamped() {
        let p = sample();
        let beyond = p.near() + p.distance_from_camera() + 10.0;
        let rho = p.project(beyond);
        let expected = p.reference_radius() * p.focal_length() / (p.focal_length() / 5.0);
        assert!(rho.is_finite());
        assert!((rho - expected).abs() < 1e-9);
    }

    #[test]
    fn at_the_camera_is_clamped() {
        // 25 * 11264 / 275 is exactly 1024, so the depth at the camera is 0.
        let p = ProjectionState::new(
            TimeWindow::ending_at(Timestamp(100_000.0), 11_264.0),
            &RingRadii::DEFAULT,
        );
        assert_eq!(p.distance_from_camera(), 1_024.0);
        let at = p.project(Timestamp(101_024.0));
        let expected = p.reference_radius() * p.focal_length() / (p.focal_length() / 5.0);
        assert!(at.is_finite());
        assert!((at - expected).abs() < 1e-9, "{at} vs {expected}");
    }

    #[test]
    fn inverse_round_trips() {
        let p = sample();
        for t in [p.far(), Timestamp(95_000.0), p.near()] {
            let back = p.time_at_radius(p.project(t));
            assert!((back - t).abs() < 1e-6, "{t:?} came back as {back:?}");
        }
        let at_point = p.time_at_point(Point::new(0.0, 300.0));
        assert!((at_point - p.near()).abs() < 1e-6);
    }

    #[test]
    fn zero_radius_is_floored() {
        let p = sample();
        assert!(p.time_at_radius(0.0).seconds().is_finite());
    }
}
