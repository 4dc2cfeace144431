// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transitions: window scrolls, recentering, relayout, and alpha fades.

use alloc::vec::Vec;
use core::time::Duration;

use super::{ActiveTransition, IgnoreReason, Request, Tunnel};
use crate::polar::normalize_angle;
use crate::projection::ProjectionState;
use crate::time::TimeWindow;
use crate::trace::{
    RequestIgnoredEvent, RingChange, RingEvent, TransitionBeginEvent, TransitionEndEvent,
    TransitionKind, Tracer, WindowEvent,
};
use crate::transition::{Animatable, Slot, Timeline};
use crate::tree::{NodeId, neighbors};

impl Tunnel {
    /// Scrolls to `window` with a transition.
    ///
    /// The projection switches at once; rings are added at the edges first so
    /// nothing pops in, and rings left outside the window are pruned when the
    /// transition completes.
    pub fn animate_time(&mut self, window: TimeWindow) -> Request {
        self.animate_time_traced(window, &mut Tracer::none())
    }

    /// Like [`animate_time`](Self::animate_time), with tracing.
    pub fn animate_time_traced(&mut self, window: TimeWindow, tracer: &mut Tracer<'_>) -> Request {
        const KIND: TransitionKind = TransitionKind::Window;
        if self.is_busy() {
            return ignore(KIND, IgnoreReason::Busy, tracer);
        }
        if window == self.projection.window() {
            return ignore(KIND, IgnoreReason::NoChange, tracer);
        }

        self.projection = ProjectionState::new(window, &self.config.ring_radii);
        tracer.window(&WindowEvent {
            near: window.near,
            far: window.far,
            animated: true,
        });

        let added = self.rings.augment(&self.projection);
        self.rings.retarget(&self.projection);
        self.rings_changed = true;
        tracer.rings(&RingEvent {
            change: RingChange::Augment,
            near_delta: added.near,
            far_delta: added.far,
            len: self.rings.len(),
        });

        self.compute_into(Slot::End, tracer);
        self.begin(KIND, tracer);
        Request::Started
    }

    /// Focuses `target`: it becomes the layout root and the tree rotates
    /// around it.
    ///
    /// The direction from `target` to its current layout parent is kept, so
    /// the old parent ends up on the same screen angle it was seen from. The
    /// old parent's other neighbors are ranked to keep their cyclic order
    /// starting after `target`.
    pub fn recenter(&mut self, target: NodeId) -> Request {
        self.recenter_traced(target, &mut Tracer::none())
    }

    /// Like [`recenter`](Self::recenter), with tracing.
    pub fn recenter_traced(&mut self, target: NodeId, tracer: &mut Tracer<'_>) -> Request {
        const KIND: TransitionKind = TransitionKind::Recenter;
        if self.is_busy() {
            return ignore(KIND, IgnoreReason::Busy, tracer);
        }
        if !self.store.is_alive(target) {
            return ignore(KIND, IgnoreReason::UnknownNode, tracer);
        }
        let Some(tree) = self.layout.tree() else {
            return ignore(KIND, IgnoreReason::UnknownNode, tracer);
        };
        if tree.root() == target.index() {
            return ignore(KIND, IgnoreReason::AlreadyCentered, tracer);
        }
        let Some(parent) = tree.parent_of(target.index()) else {
            return ignore(KIND, IgnoreReason::UnknownNode, tracer);
        };

        // Screen direction from the target toward its parent.
        let from = self.store.position_at(target.index()).current.to_point();
        let to = self.store.position_at(parent).current.to_point();
        let theta = normalize_angle((to - from).angle());

        self.rank_around(parent, target.index());
        self.root = Some(target);
        self.compute_into(Slot::End, tracer);

        let rotation = theta - self.store.position_at(parent).end.theta;
        if let Some(tree) = self.layout.tree() {
            for &idx in tree.order() {
                let end = &mut self.store.position[idx as usize].end;
                if !end.is_origin() {
                    *end = end.rotated(rotation);
                }
            }
        }

        self.begin(KIND, tracer);
        Request::Started
    }

    /// Recomputes the layout and transitions to it. Used after graph edits.
    pub fn animate_layout(&mut self) -> Request {
        self.animate_layout_traced(&mut Tracer::none())
    }

    /// Like [`animate_layout`](Self::animate_layout), with tracing.
    pub fn animate_layout_traced(&mut self, tracer: &mut Tracer<'_>) -> Request {
        const KIND: TransitionKind = TransitionKind::Layout;
        if self.is_busy() {
            return ignore(KIND, IgnoreReason::Busy, tracer);
        }
        if !self.store.needs_layout() && self.layout.tree().is_some() {
            return ignore(KIND, IgnoreReason::NoChange, tracer);
        }
        if !self.compute_into(Slot::End, tracer) {
            return ignore(KIND, IgnoreReason::NoChange, tracer);
        }
        self.begin(KIND, tracer);
        Request::Started
    }

    /// Advances the top-level transition and every alpha fade by `dt`.
    ///
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.tick_traced(dt, &mut Tracer::none())
    }

    /// Like [`tick`](Self::tick), with tracing.
    pub fn tick_traced(&mut self, dt: Duration, tracer: &mut Tracer<'_>) -> bool {
        if let Some(active) = &mut self.transition {
            let delta = active.timeline.advance(dt);
            let done = active.timeline.is_complete();
            self.step(delta);
            if done {
                self.complete_traced(tracer);
            }
        }
        self.advance_fades(dt);
        self.is_animating()
    }

    /// Interpolates every laid-out node and ring at progress `delta`.
    ///
    /// For callers that drive the transition from their own clock; `tick`
    /// calls this with the eased progress of the configured timeline.
    pub fn step(&mut self, delta: f64) {
        if let Some(active) = &mut self.transition {
            active.ticks += 1;
        }
        if let Some(tree) = self.layout.tree() {
            for &idx in tree.order() {
                let position = &mut self.store.position[idx as usize];
                let before = position.current;
                position.interpolate(delta);
                if position.current != before {
                    self.store.mark_position(idx);
                }
            }
        }
        self.rings.interpolate(delta);
        self.rings_changed = true;
        self.update_visibility(true);
    }

    /// Settles the top-level transition at its end state.
    ///
    /// A window transition prunes the rings left outside the window. Does
    /// nothing when no transition is running.
    pub fn complete(&mut self) {
        self.complete_traced(&mut Tracer::none());
    }

    /// Like [`complete`](Self::complete), with tracing.
    pub fn complete_traced(&mut self, tracer: &mut Tracer<'_>) {
        let Some(active) = self.transition.take() else {
            return;
        };

        if let Some(tree) = self.layout.tree() {
            for &idx in tree.order() {
                let position = &mut self.store.position[idx as usize];
                let before = position.current;
                position.settle();
                if position.current != before {
                    self.store.mark_position(idx);
                }
            }
        }
        self.rings.settle();
        if active.kind == TransitionKind::Window {
            let removed = self.rings.prune(&self.projection);
            tracer.rings(&RingEvent {
                change: RingChange::Prune,
                near_delta: removed.near,
                far_delta: removed.far,
                len: self.rings.len(),
            });
        }
        self.rings_changed = true;
        self.update_visibility(true);

        self.finished = Some(active.kind);
        tracer.transition_end(&TransitionEndEvent {
            kind: active.kind,
            ticks: active.ticks,
        });
    }

    /// Starts a top-level transition from every node's current position
    /// toward the end slot written by the last layout pass.
    fn begin(&mut self, kind: TransitionKind, tracer: &mut Tracer<'_>) {
        let mut nodes = 0;
        if let Some(tree) = self.layout.tree() {
            for &idx in tree.order() {
                let position = &mut self.store.position[idx as usize];
                position.retarget(position.end);
            }
            nodes = tree.len();
        }
        let transition = self.config.transition;
        self.transition = Some(ActiveTransition {
            kind,
            timeline: Timeline::new(self.transition_duration(), transition.easing),
            ticks: 0,
        });
        tracer.transition_begin(&TransitionBeginEvent {
            kind,
            nodes,
            rings: self.rings.len(),
        });
    }

    /// Writes `dist` ranks to the neighbors of `center`, in cyclic link order
    /// starting after `after`. `after` itself is left unranked.
    fn rank_around(&mut self, center: u32, after: u32) {
        let mut ring = Vec::new();
        neighbors(&self.store, center, &mut ring);
        let Some(pos) = ring.iter().position(|&n| n == after) else {
            return;
        };
        let len = ring.len();
        for (rank, k) in (1..len).enumerate() {
            let n = ring[(pos + k) % len];
            self.store.dist[n as usize] = u32::try_from(rank).ok();
        }
        self.store.dist[after as usize] = None;
    }

    /// Applies the visibility policy to every laid-out node.
    ///
    /// Nodes on the origin are faux and transparent. Nodes outside the
    /// visible square or inside the innermost ring head for alpha 0, the
    /// rest for alpha 1: through a fade when `fade` is set, at once
    /// otherwise.
    pub(super) fn update_visibility(&mut self, fade: bool) {
        let Some(tree) = self.layout.tree() else {
            return;
        };
        let radii = self.config.ring_radii;
        let fade_config = self.config.fade;
        for &idx in tree.order() {
            let i = idx as usize;
            let position = self.store.position[i].current;
            let alpha = &mut self.store.alpha[i];
            let before = alpha.current;

            if position.is_origin() {
                self.store.flags[i].faux = true;
                self.store.fade[i] = None;
                alpha.jump(0.0);
            } else {
                self.store.flags[i].faux = false;
                let p = position.to_point();
                let hidden =
                    p.x.abs() > radii.max || p.y.abs() > radii.max || position.rho < radii.min;
                let target = if hidden { 0.0 } else { 1.0 };
                if !fade {
                    self.store.fade[i] = None;
                    alpha.jump(target);
                } else if alpha.end != target {
                    alpha.retarget(target);
                    let timeline = Timeline::new(fade_config.duration, fade_config.easing);
                    self.store.fade[i] = Some(timeline);
                }
            }

            if self.store.alpha[i].current != before {
                self.store.mark_alpha(idx);
            }
        }
    }

    /// Advances every running alpha fade by `dt`.
    fn advance_fades(&mut self, dt: Duration) {
        for idx in 0..self.store.len {
            let i = idx as usize;
            let Some(timeline) = &mut self.store.fade[i] else {
                continue;
            };
            let delta = timeline.advance(dt);
            let done = timeline.is_complete();
            let alpha = &mut self.store.alpha[i];
            let before = alpha.current;
            alpha.interpolate(delta);
            if done {
                alpha.settle();
                self.store.fade[i] = None;
            }
            if self.store.alpha[i].current != before {
                self.store.mark_alpha(idx);
            }
        }
    }
}

fn ignore(kind: TransitionKind, reason: IgnoreReason, tracer: &mut Tracer<'_>) -> Request {
    tracer.request_ignored(&RequestIgnoredEvent { kind, reason });
    Request::Ignored(reason)
}
