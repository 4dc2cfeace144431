// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tunnel facade.
//!
//! [`Tunnel`] owns every piece of layout and animation state: the node
//! store, the current [`ProjectionState`], the [`TemporalLayout`] and the
//! [`RingSet`]. It is driven from a single thread, one tick at a time:
//!
//! ```text
//!   set_window / animate_time / recenter / animate_layout
//!       │
//!       ▼
//!   compute: projection + angular allocation ──► End slot
//!       │
//!       ▼
//!   tick(dt) ──► step(delta) per tick ──► complete() on settle
//!       │
//!       ▼
//!   present(renderer): evaluate() ──► TunnelChanges ──► Frame
//! ```
//!
//! At most one top-level transition runs at a time. Secondary alpha fades
//! run on their own timelines alongside it.

mod animate;
mod request;

use core::time::Duration;

use kurbo::{Circle, Point, Shape};

pub use request::{IgnoreReason, Request};

use crate::config::TunnelConfig;
use crate::layout::{AngularAllocator, Layoutable, TemporalLayout};
use crate::projection::ProjectionState;
use crate::render::{Frame, Renderer};
use crate::rings::RingSet;
use crate::time::{TimeWindow, Timestamp};
use crate::trace::{LayoutEvent, RingChange, RingEvent, Tracer, TransitionKind, WindowEvent};
use crate::transition::{Slot, Timeline};
use crate::tree::{LayoutTree, NodeChanges, NodeId, NodeStore};

/// Everything that changed since the previous [`Tunnel::evaluate`].
#[derive(Clone, Debug, Default)]
pub struct TunnelChanges {
    /// Node-level changes, as raw slot indices.
    pub nodes: NodeChanges,
    /// Whether any ring was added, removed or moved.
    pub rings_changed: bool,
    /// The top-level transition that settled, if one did.
    pub finished: Option<TransitionKind>,
}

impl TunnelChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.rings_changed = false;
        self.finished = None;
    }
}

/// The running top-level transition.
#[derive(Clone, Copy, Debug)]
struct ActiveTransition {
    kind: TransitionKind,
    timeline: Timeline,
    ticks: u64,
}

/// A temporal radial layout of an event tree, with its rings and transitions.
#[derive(Debug)]
pub struct Tunnel {
    config: TunnelConfig,
    projection: ProjectionState,
    store: NodeStore,
    layout: TemporalLayout,
    rings: RingSet,
    root: Option<NodeId>,
    transition: Option<ActiveTransition>,
    rings_changed: bool,
    finished: Option<TransitionKind>,
}

impl Tunnel {
    /// Creates an empty tunnel showing `window`.
    ///
    /// `window.near > window.far` and `min < max` ring radii are unchecked
    /// preconditions (asserted in debug builds only).
    #[must_use]
    pub fn new(config: TunnelConfig, window: TimeWindow) -> Self {
        let projection = ProjectionState::new(window, &config.ring_radii);
        Self {
            rings: RingSet::new(config.level_distance, &projection),
            layout: TemporalLayout::new(AngularAllocator::new(config.min_angle_for_node)),
            store: NodeStore::new(),
            projection,
            config,
            root: None,
            transition: None,
            rings_changed: true,
            finished: None,
        }
    }

    /// The configuration the tunnel was built with.
    #[must_use]
    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    /// The current projection.
    #[must_use]
    pub fn projection(&self) -> &ProjectionState {
        &self.projection
    }

    /// The visible window.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.projection.window()
    }

    /// Read access to the node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// The ring set.
    #[must_use]
    pub fn rings(&self) -> &RingSet {
        &self.rings
    }

    /// The layout, including the angular intervals of its last pass.
    #[must_use]
    pub fn layout(&self) -> &TemporalLayout {
        &self.layout
    }

    /// The tree as of the last layout pass, if any.
    #[must_use]
    pub fn layout_tree(&self) -> Option<&LayoutTree> {
        self.layout.tree()
    }

    /// Whether a top-level transition is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether anything is still moving: the top-level transition or any
    /// alpha fade.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.is_busy() || self.store.nodes().any(|id| self.store.is_fading(id))
    }

    // -- Node editing --

    /// Creates a detached node with the configured default size.
    pub fn create_node(&mut self, timestamp: Timestamp) -> NodeId {
        self.store
            .create_node(timestamp, self.config.default_node_radius)
    }

    /// Creates a detached node with an explicit visual radius.
    pub fn create_node_with_size(&mut self, timestamp: Timestamp, size: f64) -> NodeId {
        self.store.create_node(timestamp, size)
    }

    /// Destroys a childless node.
    ///
    /// If it was part of the last layout, the layout is dropped until the
    /// next [`compute_layout`](Self::compute_layout).
    ///
    /// # Panics
    ///
    /// Panics if the node has children or the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.store.destroy_node(id);
        if self.root == Some(id) {
            self.root = None;
        }
        if self.layout.tree().is_some_and(|t| t.contains(id.index())) {
            self.layout.clear();
        }
    }

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// See [`NodeStore::add_child`].
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.store.add_child(parent, child);
    }

    /// Inserts `child` before `sibling`.
    ///
    /// # Panics
    ///
    /// See [`NodeStore::insert_before`].
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        self.store.insert_before(child, sibling);
    }

    /// Detaches `child` from its parent.
    ///
    /// # Panics
    ///
    /// See [`NodeStore::remove_from_parent`].
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.store.remove_from_parent(child);
    }

    /// Sets a node's timestamp.
    pub fn set_timestamp(&mut self, id: NodeId, timestamp: Timestamp) {
        self.store.set_timestamp(id, timestamp);
    }

    /// Sets a node's visual radius.
    pub fn set_size(&mut self, id: NodeId, size: f64) {
        self.store.set_size(id, size);
    }

    /// Sets or clears a node's sibling ordering rank.
    pub fn set_dist(&mut self, id: NodeId, dist: Option<u32>) {
        self.store.set_dist(id, dist);
    }

    /// Makes `id` the layout root. Takes effect on the next layout pass.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_root(&mut self, id: NodeId) {
        self.store.validate(id);
        self.root = Some(id);
        self.store.layout_stale = true;
    }

    /// The node layout is rooted at: the explicit root if set, otherwise the
    /// first parentless node.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
            .filter(|&id| self.store.is_alive(id))
            .or_else(|| self.store.nodes().find(|&id| self.store.parent(id).is_none()))
    }

    // -- Compute --

    /// Recomputes every node's end position for the current window.
    ///
    /// Without a transition in flight the nodes move there immediately.
    /// During a transition only the end state is overwritten, and the
    /// running interpolation heads for the new target from where it is.
    pub fn compute_layout(&mut self) {
        self.compute_layout_traced(&mut Tracer::none());
    }

    /// Like [`compute_layout`](Self::compute_layout), with tracing.
    pub fn compute_layout_traced(&mut self, tracer: &mut Tracer<'_>) {
        self.compute_into(Slot::End, tracer);
        if !self.is_busy() {
            self.snap_to_end();
        }
    }

    /// Shows `window` immediately: new projection, rebuilt rings, and a
    /// fresh layout.
    ///
    /// Allowed while busy; see [`compute_layout`](Self::compute_layout).
    pub fn set_window(&mut self, window: TimeWindow) -> Request {
        self.set_window_traced(window, &mut Tracer::none())
    }

    /// Like [`set_window`](Self::set_window), with tracing.
    pub fn set_window_traced(&mut self, window: TimeWindow, tracer: &mut Tracer<'_>) -> Request {
        if window == self.projection.window() && !self.store.needs_layout() {
            return Request::Ignored(IgnoreReason::NoChange);
        }
        self.projection = ProjectionState::new(window, &self.config.ring_radii);
        tracer.window(&WindowEvent {
            near: window.near,
            far: window.far,
            animated: false,
        });

        let built = self.rings.reset(&self.projection);
        self.rings_changed = true;
        tracer.rings(&RingEvent {
            change: RingChange::Reset,
            near_delta: built,
            far_delta: 0,
            len: self.rings.len(),
        });

        self.compute_layout_traced(tracer);
        Request::Applied
    }

    /// Moves every ring to its radius under the current projection at once.
    pub fn recompute_ring_radii(&mut self) {
        self.recompute_ring_radii_traced(&mut Tracer::none());
    }

    /// Like [`recompute_ring_radii`](Self::recompute_ring_radii), with
    /// tracing.
    pub fn recompute_ring_radii_traced(&mut self, tracer: &mut Tracer<'_>) {
        self.rings.recompute_radii(&self.projection);
        self.rings_changed = true;
        tracer.rings(&RingEvent {
            change: RingChange::Recompute,
            near_delta: 0,
            far_delta: 0,
            len: self.rings.len(),
        });
    }

    // -- Queries --

    /// Projected radius of `t` under the current window.
    #[must_use]
    pub fn projected_radius(&self, t: Timestamp) -> f64 {
        self.projection.project(t)
    }

    /// Timestamp drawn at `radius`.
    #[must_use]
    pub fn time_at_radius(&self, radius: f64) -> Timestamp {
        self.projection.time_at_radius(radius)
    }

    /// Timestamp drawn under `point`, relative to the tunnel's center.
    #[must_use]
    pub fn time_at_point(&self, point: Point) -> Timestamp {
        self.projection.time_at_point(point)
    }

    /// The topmost visible node whose circle contains `point`.
    ///
    /// Faux and fully transparent nodes are never hit.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        let tree = self.layout.tree()?;
        // Later nodes draw on top.
        tree.order().iter().rev().find_map(|&idx| {
            let id = self.store.id_at(idx)?;
            if self.store.flags_at(idx).faux || self.store.alpha_at(idx).current <= 0.0 {
                return None;
            }
            let center = self.store.position_at(idx).current.to_point();
            Circle::new(center, self.store.size_at(idx))
                .contains(point)
                .then_some(id)
        })
    }

    /// Opacity of the edge between `a` and `b`.
    ///
    /// Zero if either end sits on the origin or is fading out (or faded
    /// out); otherwise the square of the mean of the two current alphas.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn edge_alpha(&self, a: NodeId, b: NodeId) -> f64 {
        self.store.validate(a);
        self.store.validate(b);
        self.edge_alpha_at(a.index(), b.index())
    }

    pub(crate) fn edge_alpha_at(&self, a: u32, b: u32) -> f64 {
        let (pa, pb) = (self.store.position_at(a), self.store.position_at(b));
        if pa.current.is_origin() || pb.current.is_origin() {
            return 0.0;
        }
        let (aa, ab) = (self.store.alpha_at(a), self.store.alpha_at(b));
        if aa.end < 1.0 || ab.end < 1.0 {
            return 0.0;
        }
        let mean = (aa.current + ab.current) / 2.0;
        mean * mean
    }

    // -- Output --

    /// Drains everything that changed since the previous call.
    pub fn evaluate(&mut self) -> TunnelChanges {
        let mut changes = TunnelChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), reusing a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut TunnelChanges) {
        changes.clear();
        self.store.evaluate_into(&mut changes.nodes);
        changes.rings_changed = core::mem::take(&mut self.rings_changed);
        changes.finished = self.finished.take();
    }

    /// Evaluates and hands the current state to `renderer`.
    pub fn present<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let changes = self.evaluate();
        renderer.render(&Frame::new(self, &changes));
    }

    // -- Internals --

    /// Runs one layout pass into `slot`. Returns `false` if there is nothing
    /// to lay out.
    fn compute_into(&mut self, slot: Slot, tracer: &mut Tracer<'_>) -> bool {
        let Some(root) = self.root() else {
            self.layout.clear();
            let _ = self.store.take_layout_invalidation();
            return false;
        };
        let invalidated = self.store.take_layout_invalidation().len();
        let stats = self
            .layout
            .compute(&mut self.store, root, &self.projection, slot);
        tracer.layout(&LayoutEvent {
            root: root.index(),
            nodes: stats.nodes,
            invalidated,
            contracted: stats.allocation.contracted,
            overcommitted: stats.allocation.overcommitted,
        });
        true
    }

    /// Moves every laid-out node to its end position, without fades.
    fn snap_to_end(&mut self) {
        let Some(tree) = self.layout.tree() else {
            return;
        };
        for &idx in tree.order() {
            let i = idx as usize;
            let before = self.store.position[i].current;
            self.store.position[i].settle();
            if self.store.position[i].current != before {
                self.store.mark_position(idx);
            }
        }
        self.update_visibility(false);
    }

    /// Duration of the configured positional transition.
    fn transition_duration(&self) -> Duration {
        self.config.transition.duration
    }
}
