// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporal radial layout.
//!
//! Layout combines the two halves of "compute": the
//! [`ProjectionState`] turns each node's timestamp into a radius, and the
//! [`AngularAllocator`] turns the tree structure into angles. The result is
//! written into one [`Slot`] of every node's position tween, usually
//! [`Slot::End`] so a transition can carry the nodes there.
//!
//! The layout root itself is pinned to the origin.

mod allocator;

use alloc::vec::Vec;

pub use allocator::{AllocationStats, AngleSpan, AngularAllocator};
pub(crate) use allocator::Interval;

use crate::polar::Polar;
use crate::projection::ProjectionState;
use crate::transition::Slot;
use crate::tree::{LayoutTree, NodeId, NodeStore};

/// Summary of one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Nodes laid out (the component containing the root).
    pub nodes: usize,
    /// Allocation counters.
    pub allocation: AllocationStats,
}

/// Something that can compute positions for the nodes of a store.
pub trait Layoutable {
    /// Lays out the component of `root`, writing positions into `slot`.
    fn compute(
        &mut self,
        store: &mut NodeStore,
        root: NodeId,
        projection: &ProjectionState,
        slot: Slot,
    ) -> LayoutStats;
}

/// The tunnel's layout: perspective radii plus recursive angular allocation.
///
/// Keeps the [`LayoutTree`] of its last pass so callers can walk the tree
/// exactly as it was laid out.
#[derive(Clone, Debug)]
pub struct TemporalLayout {
    allocator: AngularAllocator,
    tree: Option<LayoutTree>,
    rho: Vec<f64>,
    angles: Vec<f64>,
    intervals: Vec<Interval>,
}

impl TemporalLayout {
    /// Creates a layout with the given allocator.
    #[must_use]
    pub fn new(allocator: AngularAllocator) -> Self {
        Self {
            allocator,
            tree: None,
            rho: Vec::new(),
            angles: Vec::new(),
            intervals: Vec::new(),
        }
    }

    /// The allocator in use.
    #[must_use]
    pub fn allocator(&self) -> &AngularAllocator {
        &self.allocator
    }

    /// The tree of the last pass, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&LayoutTree> {
        self.tree.as_ref()
    }

    /// Forgets the last pass. Used when the tree it describes is gone.
    pub fn clear(&mut self) {
        self.tree = None;
    }

    /// Start and end angle given to a node in the last pass.
    #[must_use]
    pub fn interval_of(&self, idx: u32) -> Option<(f64, f64)> {
        let tree = self.tree.as_ref()?;
        tree.contains(idx).then(|| {
            let iv = self.intervals[idx as usize];
            (iv.start, iv.end)
        })
    }
}

impl Layoutable for TemporalLayout {
    fn compute(
        &mut self,
        store: &mut NodeStore,
        root: NodeId,
        projection: &ProjectionState,
        slot: Slot,
    ) -> LayoutStats {
        let tree = LayoutTree::build(store, root);
        let slots = store.slot_count();
        self.rho.clear();
        self.rho.resize(slots, 0.0);
        self.angles.clear();
        self.angles.resize(slots, 0.0);
        self.intervals.clear();
        self.intervals.resize(slots, Interval::default());

        for &idx in tree.order() {
            if idx != tree.root() {
                self.rho[idx as usize] = projection.project(store.timestamp[idx as usize]);
            }
        }

        self.allocator
            .aggregate_spans(&tree, &self.rho, &store.size, &mut store.angle_span);
        let allocation = self.allocator.assign_angles(
            &tree,
            &store.angle_span,
            &mut self.angles,
            &mut self.intervals,
        );

        for &idx in tree.order() {
            let i = idx as usize;
            let target = if idx == tree.root() {
                Polar::ORIGIN
            } else {
                Polar::new(self.angles[i], self.rho[i])
            };
            store.position[i].set(slot, target);
            if slot == Slot::Current {
                store.mark_position(idx);
            }
        }

        let stats = LayoutStats {
            nodes: tree.len(),
            allocation,
        };
        self.tree = Some(tree);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RingRadii;
    use crate::time::{TimeWindow, Timestamp};

    #[test]
    fn older_children_sit_farther_out() {
        let now = Timestamp(10_000.0);
        let window = TimeWindow::ending_at(now, 3_600.0);
        let projection = ProjectionState::new(window, &RingRadii::DEFAULT);
        let mut store = NodeStore::new();
        let r = store.create_node(now, 4.0);
        let a = store.create_node(now - 100.0, 4.0);
        let b = store.create_node(now - 50.0, 4.0);
        store.add_child(r, a);
        store.add_child(r, b);

        let mut layout = TemporalLayout::new(AngularAllocator::new(0.1));
        let stats = layout.compute(&mut store, r, &projection, Slot::End);
        assert_eq!(stats.nodes, 3);

        let pa = store.position(a).end;
        let pb = store.position(b).end;
        assert_eq!(store.position(r).end, Polar::ORIGIN);
        assert!(pa.rho < pb.rho, "{pa:?} vs {pb:?}");
        assert_ne!(pa.theta, pb.theta);
        // Current is untouched when writing End.
        assert_eq!(store.position(a).current, Polar::ORIGIN);

        let (a0, a1) = layout.interval_of(a.index()).unwrap();
        let (b0, b1) = layout.interval_of(b.index()).unwrap();
        assert!(a1 <= b0 || b1 <= a0, "[{a0}, {a1}) overlaps [{b0}, {b1})");
    }
}
