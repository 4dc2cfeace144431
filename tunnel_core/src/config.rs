// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunnel configuration.
//!
//! [`TunnelConfig`] collects the operator-facing knobs. It is read-only once a
//! [`Tunnel`](crate::tunnel::Tunnel) has been built: everything derived from
//! it (focal length, camera distance) lives in
//! [`ProjectionState`](crate::projection::ProjectionState) and is recomputed
//! rather than mutated.

use core::f64::consts::PI;
use core::time::Duration;

use crate::transition::Easing;

/// The ring radii an operator actually cares about.
///
/// The innermost ring (the far end of the window) projects to `min`, the
/// outermost (the near end) to `max`. `reference` scales the perspective
/// model; changing it alone does not move the calibrated rings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingRadii {
    /// Radius of the far edge of the window.
    pub min: f64,
    /// Radius of the near edge of the window.
    pub max: f64,
    /// Reference radius of the camera model.
    pub reference: f64,
}

impl RingRadii {
    /// Default radii: 25 / 300 with a reference radius of 600.
    pub const DEFAULT: Self = Self {
        min: 25.0,
        max: 300.0,
        reference: 600.0,
    };
}

impl Default for RingRadii {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Duration and easing of one kind of transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Total length of the transition.
    pub duration: Duration,
    /// Easing applied to the normalized progress.
    pub easing: Easing,
}

/// Configuration for a [`Tunnel`](crate::tunnel::Tunnel).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnelConfig {
    /// Calibration radii of the projection.
    pub ring_radii: RingRadii,
    /// Seconds between two consecutive background rings.
    pub level_distance: f64,
    /// Exclusive angular room (radians) guaranteed to childless siblings
    /// under angular pressure.
    pub min_angle_for_node: f64,
    /// Visual radius given to nodes created without an explicit size.
    pub default_node_radius: f64,
    /// Positional transitions (recenter, window scroll, relayout).
    pub transition: TransitionConfig,
    /// Secondary alpha fades when nodes cross the visible boundary.
    pub fade: TransitionConfig,
}

impl TunnelConfig {
    /// Default configuration: hourly rings, 5° minimum node angle, 2.5 s
    /// quartic transitions and 0.5 s linear fades.
    pub const DEFAULT: Self = Self {
        ring_radii: RingRadii::DEFAULT,
        level_distance: 3_600.0,
        min_angle_for_node: 5.0 * PI / 180.0,
        default_node_radius: 4.0,
        transition: TransitionConfig {
            duration: Duration::from_millis(2_500),
            easing: Easing::QuartInOut,
        },
        fade: TransitionConfig {
            duration: Duration::from_millis(500),
            easing: Easing::Linear,
        },
    };

    /// Sets the calibration radii.
    #[must_use]
    pub const fn with_ring_radii(mut self, min: f64, max: f64, reference: f64) -> Self {
        self.ring_radii = RingRadii { min, max, reference };
        self
    }

    /// Sets the time between consecutive rings, in seconds.
    #[must_use]
    pub const fn with_level_distance(mut self, seconds: f64) -> Self {
        self.level_distance = seconds;
        self
    }

    /// Sets the minimum angle (radians) reserved for childless siblings.
    #[must_use]
    pub const fn with_min_angle_for_node(mut self, radians: f64) -> Self {
        self.min_angle_for_node = radians;
        self
    }

    /// Sets the default visual node radius.
    #[must_use]
    pub const fn with_default_node_radius(mut self, radius: f64) -> Self {
        self.default_node_radius = radius;
        self
    }

    /// Sets the positional transition.
    #[must_use]
    pub const fn with_transition(mut self, duration: Duration, easing: Easing) -> Self {
        self.transition = TransitionConfig { duration, easing };
        self
    }

    /// Sets the secondary fade transition.
    #[must_use]
    pub const fn with_fade(mut self, duration: Duration, easing: Easing) -> Self {
        self.fade = TransitionConfig { duration, easing };
        self
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_const() {
        assert_eq!(TunnelConfig::default(), TunnelConfig::DEFAULT);
        assert!(TunnelConfig::DEFAULT.ring_radii.min < TunnelConfig::DEFAULT.ring_radii.max);
    }

    #[test]
    fn builders_override_fields() {
        let config = TunnelConfig::DEFAULT
            .with_ring_radii(10.0, 100.0, 200.0)
            .with_level_distance(60.0)
            .with_fade(Duration::from_millis(100), Easing::QuadOut);
        assert_eq!(config.ring_radii.max, 100.0);
        assert_eq!(config.level_distance, 60.0);
        assert_eq!(config.fade.duration, Duration::from_millis(100));
        assert_eq!(config.fade.easing, Easing::QuadOut);
        // Untouched fields keep their defaults.
        assert_eq!(config.transition, TunnelConfig::DEFAULT.transition);
    }
}
