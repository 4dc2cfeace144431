// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background depth rings.
//!
//! A [`Ring`] marks a fixed timestamp on the depth axis. Ring times sit on a
//! lattice anchored at the time of the last [`reset`](RingSet::reset):
//!
//! ```text
//! time(level) = origin + level * level_distance
//! ```
//!
//! so consecutive rings are always exactly one level apart. The set keeps
//! rings nearest first, and grows or shrinks at both ends as the window
//! scrolls:
//!
//! ```text
//!   augment(new)          push Provisional rings at either end, seeded at
//!       │                 their neighbor's radius snapshot
//!       ▼
//!   retarget(new)         every ring heads for its radius under `new`
//!       │
//!       ▼
//!   interpolate(delta)... per tick
//!       │
//!       ▼
//!   prune(new)            drop rings outside the window, survivors Active
//! ```

use alloc::collections::VecDeque;
use alloc::collections::vec_deque;

use crate::projection::ProjectionState;
use crate::time::{TimeWindow, Timestamp};
use crate::transition::{Animatable, Tween};

/// Lifecycle state of a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingState {
    /// Created at a window edge; not yet confirmed by a completed transition.
    Provisional,
    /// Inside the window at the end of the last completed transition.
    Active,
}

/// A depth marker at a fixed timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    level: i64,
    time: Timestamp,
    radius: Tween<f64>,
    snapshot: ProjectionState,
    state: RingState,
}

impl Ring {
    fn seeded(level: i64, time: Timestamp, seed: &ProjectionState, state: RingState) -> Self {
        Self {
            level,
            time,
            radius: Tween::new(seed.project(time)),
            snapshot: *seed,
            state,
        }
    }

    /// Lattice index of the ring.
    #[inline]
    #[must_use]
    pub fn level(&self) -> i64 {
        self.level
    }

    /// The ring's timestamp. Never changes.
    #[inline]
    #[must_use]
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// Radius interpolation state.
    #[inline]
    #[must_use]
    pub fn radius(&self) -> Tween<f64> {
        self.radius
    }

    /// The projection the ring's target radius was computed against.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &ProjectionState {
        &self.snapshot
    }

    /// Lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> RingState {
        self.state
    }

    fn retarget(&mut self, projection: &ProjectionState) {
        self.radius.retarget(projection.project(self.time));
        self.snapshot = *projection;
    }
}

impl Animatable for Ring {
    fn interpolate(&mut self, delta: f64) {
        self.radius.interpolate(delta);
    }

    fn settle(&mut self) {
        self.radius.settle();
    }
}

/// Rings added or removed at each end by one operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RingDelta {
    /// Count at the near (recent) end.
    pub near: usize,
    /// Count at the far (old) end.
    pub far: usize,
}

/// The ordered set of rings visible in the window.
#[derive(Clone, Debug)]
pub struct RingSet {
    level_distance: f64,
    origin: Timestamp,
    rings: VecDeque<Ring>,
}

impl RingSet {
    /// Creates a set and fills it for `projection`'s window.
    ///
    /// A `level_distance` that is not positive leaves the set empty.
    #[must_use]
    pub fn new(level_distance: f64, projection: &ProjectionState) -> Self {
        let mut set = Self {
            level_distance,
            origin: projection.near(),
            rings: VecDeque::new(),
        };
        set.reset(projection);
        set
    }

    /// Seconds between consecutive rings.
    #[inline]
    #[must_use]
    pub fn level_distance(&self) -> f64 {
        self.level_distance
    }

    /// Number of rings.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Whether the set holds no rings.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Rings, nearest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Ring> {
        self.rings.iter()
    }

    /// The nearest ring.
    #[must_use]
    pub fn front(&self) -> Option<&Ring> {
        self.rings.front()
    }

    /// The oldest ring.
    #[must_use]
    pub fn back(&self) -> Option<&Ring> {
        self.rings.back()
    }

    /// Discards every ring and rebuilds the ladder from the near edge inward,
    /// re-anchoring the lattice at `near`. Rings start settled and
    /// [`Active`](RingState::Active).
    ///
    /// Returns the number of rings built.
    pub fn reset(&mut self, projection: &ProjectionState) -> usize {
        let window = projection.window();
        self.origin = window.near;
        self.rings.clear();
        if !self.has_lattice() {
            return 0;
        }
        let mut level = 0;
        loop {
            let time = self.time_of(level);
            if time < window.far {
                break;
            }
            let ring = Ring::seeded(level, time, projection, RingState::Active);
            self.rings.push_back(ring);
            level -= 1;
        }
        self.rings.len()
    }

    /// Adds [`Provisional`](RingState::Provisional) rings at both ends until
    /// every lattice time in `projection`'s window has a ring.
    ///
    /// New rings are seeded at the radius their neighbor's snapshot gives
    /// them, so they ease in from where they would have been drawn. If the
    /// new window shares no lattice range with the current rings, they are
    /// replaced by a fresh ladder seeded from the nearest end's snapshot.
    pub fn augment(&mut self, projection: &ProjectionState) -> RingDelta {
        if !self.has_lattice() {
            return RingDelta::default();
        }
        let window = projection.window();
        let hi = self.floor_level(window.near);
        let lo = self.ceil_level(window.far);
        if hi < lo {
            // No lattice time inside the window.
            return RingDelta::default();
        }

        let (Some(front), Some(back)) = (self.rings.front(), self.rings.back()) else {
            return RingDelta {
                near: self.fill(hi, lo, projection),
                far: 0,
            };
        };
        let (front, back) = (*front, *back);

        if lo > front.level + 1 || hi < back.level - 1 {
            let seed = if lo > front.level {
                front.snapshot
            } else {
                back.snapshot
            };
            self.rings.clear();
            return if lo > front.level {
                RingDelta {
                    near: self.fill(hi, lo, &seed),
                    far: 0,
                }
            } else {
                RingDelta {
                    near: 0,
                    far: self.fill(hi, lo, &seed),
                }
            };
        }

        let mut delta = RingDelta::default();
        for level in front.level + 1..=hi {
            let time = self.time_of(level);
            let ring = Ring::seeded(level, time, &front.snapshot, RingState::Provisional);
            self.rings.push_front(ring);
            delta.near += 1;
        }
        for level in (lo..back.level).rev() {
            let time = self.time_of(level);
            let ring = Ring::seeded(level, time, &back.snapshot, RingState::Provisional);
            self.rings.push_back(ring);
            delta.far += 1;
        }
        delta
    }

    /// Removes rings whose time lies outside `projection`'s window and marks
    /// the survivors [`Active`](RingState::Active).
    ///
    /// Pruning an empty set is a no-op.
    pub fn prune(&mut self, projection: &ProjectionState) -> RingDelta {
        let window = projection.window();
        let mut delta = RingDelta::default();
        while self.rings.front().is_some_and(|r| r.time > window.near) {
            self.rings.pop_front();
            delta.near += 1;
        }
        while self.rings.back().is_some_and(|r| r.time < window.far) {
            self.rings.pop_back();
            delta.far += 1;
        }
        for ring in &mut self.rings {
            ring.state = RingState::Active;
        }
        delta
    }

    /// Moves every ring to its radius under `projection` immediately.
    pub fn recompute_radii(&mut self, projection: &ProjectionState) {
        for ring in &mut self.rings {
            ring.radius.jump(projection.project(ring.time));
            ring.snapshot = *projection;
        }
    }

    /// Starts a transition of every ring toward its radius under
    /// `projection`.
    pub fn retarget(&mut self, projection: &ProjectionState) {
        for ring in &mut self.rings {
            ring.retarget(projection);
        }
    }

    /// Whether every lattice time inside `window` has a ring, with no gaps.
    #[must_use]
    pub fn covers(&self, window: TimeWindow) -> bool {
        if !self.has_lattice() {
            return self.rings.is_empty();
        }
        let hi = self.floor_level(window.near);
        let lo = self.ceil_level(window.far);
        if hi < lo {
            return true;
        }
        match (self.rings.front(), self.rings.back()) {
            (Some(front), Some(back)) => {
                front.level >= hi
                    && back.level <= lo
                    && front.level - back.level + 1 == self.rings.len() as i64
            }
            _ => false,
        }
    }

    fn has_lattice(&self) -> bool {
        self.level_distance > 0.0
    }

    fn time_of(&self, level: i64) -> Timestamp {
        self.origin + level as f64 * self.level_distance
    }

    /// Largest level whose time is at or before `t`.
    fn floor_level(&self, t: Timestamp) -> i64 {
        let x = (t - self.origin) / self.level_distance;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "rounds toward zero; corrected to the floor below"
        )]
        let mut level = x as i64;
        if level as f64 > x {
            level -= 1;
        }
        // Guard against the division landing just below an exact multiple.
        if self.time_of(level + 1) <= t {
            level += 1;
        }
        level
    }

    /// Smallest level whose time is at or after `t`.
    fn ceil_level(&self, t: Timestamp) -> i64 {
        let level = self.floor_level(t);
        if self.time_of(level) < t {
            level + 1
        } else {
            level
        }
    }

    /// Pushes levels `hi` down to `lo` onto the back, seeded from `seed`.
    fn fill(&mut self, hi: i64, lo: i64, seed: &ProjectionState) -> usize {
        let mut count = 0;
        let mut level = hi;
        while level >= lo {
            self.rings.push_back(Ring::seeded(
                level,
                self.time_of(level),
                seed,
                RingState::Provisional,
            ));
            count += 1;
            level -= 1;
        }
        count
    }
}

impl Animatable for RingSet {
    fn interpolate(&mut self, delta: f64) {
        for ring in &mut self.rings {
            ring.interpolate(delta);
        }
    }

    fn settle(&mut self) {
        for ring in &mut self.rings {
            ring.settle();
        }
    }
}

impl<'a> IntoIterator for &'a RingSet {
    type Item = &'a Ring;
    type IntoIter = vec_deque::Iter<'a, Ring>;

    fn into_iter(self) -> Self::IntoIter {
        self.rings.iter()
    }
}
