// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive angular space allocation.

use core::f64::consts::TAU;

use kurbo::Vec2;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::tree::LayoutTree;

/// Angular extent reserved for a node's subtree, relative to the node's own
/// start angle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AngleSpan {
    /// Offset of the subtree's first angle.
    pub begin: f64,
    /// Offset one past the subtree's last angle.
    pub end: f64,
}

impl AngleSpan {
    /// The zero-width span of a leaf.
    pub const EMPTY: Self = Self {
        begin: 0.0,
        end: 0.0,
    };

    /// Width of the span.
    #[inline]
    #[must_use]
    pub fn width(self) -> f64 {
        self.end - self.begin
    }

    /// Whether the subtree needs no angular room of its own.
    #[inline]
    #[must_use]
    pub fn is_simple(self) -> bool {
        self.end == 0.0
    }
}

/// Angle range handed to a node during top-down assignment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Interval {
    pub(crate) start: f64,
    pub(crate) end: f64,
}

/// Counters describing one allocation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// Parents whose children were placed in contraction mode.
    pub contracted: usize,
    /// Parents whose children needed more room than available.
    pub overcommitted: usize,
}

/// Assigns angular spans and start angles to a rooted tree.
///
/// Allocation runs in two passes over a [`LayoutTree`]:
///
/// 1. [`aggregate_spans`](Self::aggregate_spans), bottom-up: a leaf needs no
///    room; a parent needs the sum of its children's spans. When a parent sits
///    so close to its first child along the radius that their circles would
///    collide, the first child is pushed forward by the parent's footprint.
/// 2. [`assign_angles`](Self::assign_angles), top-down from `[0, 2π)`: each
///    node is placed at the start of its interval, and the interval's unused
///    room is split evenly among the children. Under angular pressure,
///    childless siblings are guaranteed [`min_angle`](Self::min_angle) each
///    and the remainder is shared by the others.
///
/// Negative leftover room is not an error: children simply overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularAllocator {
    /// Exclusive room (radians) for simple children under contraction.
    pub min_angle: f64,
}

impl AngularAllocator {
    /// Creates an allocator with the given minimum node angle.
    #[must_use]
    pub const fn new(min_angle: f64) -> Self {
        Self { min_angle }
    }

    /// Full angle subtended by a circle of radius `size` at distance `rho`.
    ///
    /// Returns `2 * asin(size / rho)`, or zero when that is undefined (the
    /// circle contains the origin, or `rho <= 0`).
    #[must_use]
    pub fn footprint(size: f64, rho: f64) -> f64 {
        if rho.is_nan() || rho <= 0.0 || size.abs() > rho {
            return 0.0;
        }
        // asin(size / rho) as the angle of the tangent triangle.
        let half = Vec2::new((rho * rho - size * size).sqrt(), size).angle();
        2.0 * half
    }

    /// Bottom-up pass: fills `spans` (slot-indexed) for every node of `tree`.
    ///
    /// `rho` and `size` are slot-indexed radii and visual sizes.
    pub fn aggregate_spans(
        &self,
        tree: &LayoutTree,
        rho: &[f64],
        size: &[f64],
        spans: &mut [AngleSpan],
    ) {
        for &idx in tree.order().iter().rev() {
            let i = idx as usize;
            let children = tree.children_of(idx);
            let Some(&first) = children.first() else {
                spans[i] = AngleSpan::EMPTY;
                continue;
            };

            if (rho[i] - rho[first as usize]).abs() < 2.0 * size[i] {
                let fp = Self::footprint(size[i], rho[i]);
                let span = &mut spans[first as usize];
                span.begin += fp;
                span.end += fp;
            }

            let total = children.iter().map(|&c| spans[c as usize].end).sum();
            spans[i] = AngleSpan {
                begin: 0.0,
                end: total,
            };
        }
    }

    /// Top-down pass: fills `angles` (slot-indexed) with each node's start
    /// angle and `intervals` with the room it was given.
    ///
    /// The root is given `[0, 2π)` and its own angle is left at zero.
    pub(crate) fn assign_angles(
        &self,
        tree: &LayoutTree,
        spans: &[AngleSpan],
        angles: &mut [f64],
        intervals: &mut [Interval],
    ) -> AllocationStats {
        let mut stats = AllocationStats::default();
        let root = tree.root();
        intervals[root as usize] = Interval {
            start: 0.0,
            end: TAU,
        };
        angles[root as usize] = 0.0;

        for &idx in tree.order() {
            let Interval { start, end } = intervals[idx as usize];
            if idx != root {
                angles[idx as usize] = start;
            }
            let children = tree.children_of(idx);
            if children.is_empty() {
                continue;
            }

            let total: f64 = children.iter().map(|&c| spans[c as usize].end).sum();
            let leftover = (end - start) - total;
            let extra = leftover / children.len() as f64;
            if leftover < 0.0 {
                stats.overcommitted += 1;
            }

            let num_simple = children
                .iter()
                .filter(|&&c| spans[c as usize].is_simple())
                .count();
            let contract = extra < self.min_angle && num_simple > 0;
            let contraction = if contract {
                stats.contracted += 1;
                let num_complex = children.len() - num_simple;
                (leftover - self.min_angle * num_simple as f64) / num_complex.max(1) as f64
            } else {
                0.0
            };

            let mut offset = 0.0;
            for &c in children {
                let span = spans[c as usize];
                let base = start + offset + span.begin;
                let child = if !contract {
                    let s = base + extra / 2.0;
                    Interval {
                        start: s,
                        end: s + span.width() + extra / 2.0,
                    }
                } else if span.is_simple() {
                    let s = base + self.min_angle / 2.0;
                    Interval {
                        start: s,
                        end: s + self.min_angle / 2.0,
                    }
                } else {
                    let s = base + contraction / 2.0;
                    Interval {
                        start: s,
                        end: s + span.width() + contraction / 2.0,
                    }
                };
                intervals[c as usize] = child;
                offset = child.end - start;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use core::f64::consts::PI;

    use super::*;
    use crate::tree::{NodeId, NodeStore};
    use crate::time::Timestamp;

    const MIN_ANGLE: f64 = 5.0 * PI / 180.0;

    struct Run {
        spans: Vec<AngleSpan>,
        angles: Vec<f64>,
        intervals: Vec<Interval>,
        stats: AllocationStats,
    }

    fn run(store: &NodeStore, root: NodeId, rho: &[f64]) -> Run {
        let tree = LayoutTree::build(store, root);
        let n = store.slot_count();
        let size: Vec<f64> = (0..n as u32).map(|i| store.size_at(i)).collect();
        let alloc = AngularAllocator::new(MIN_ANGLE);
        let mut spans = vec![AngleSpan::EMPTY; n];
        let mut angles = vec![0.0; n];
        let mut intervals = vec![Interval::default(); n];
        alloc.aggregate_spans(&tree, rho, &size, &mut spans);
        let stats = alloc.assign_angles(&tree, &spans, &mut angles, &mut intervals);
        Run {
            spans,
            angles,
            intervals,
            stats,
        }
    }

    fn star(leaves: usize) -> (NodeStore, NodeId, Vec<NodeId>) {
        let mut store = NodeStore::new();
        let root = store.create_node(Timestamp(0.0), 4.0);
        let kids = (0..leaves)
            .map(|_| {
                let k = store.create_node(Timestamp(0.0), 4.0);
                store.add_child(root, k);
                k
            })
            .collect();
        (store, root, kids)
    }

    #[test]
    fn footprint_matches_asin() {
        let fp = AngularAllocator::footprint(4.0, 100.0);
        assert!((fp - 2.0 * 0.04_f64.asin()).abs() < 1e-12, "{fp}");
        assert_eq!(AngularAllocator::footprint(5.0, 4.0), 0.0);
        assert_eq!(AngularAllocator::footprint(4.0, 0.0), 0.0);
        assert!((AngularAllocator::footprint(4.0, 4.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn leaves_split_the_circle_evenly() {
        let (store, root, kids) = star(4);
        let rho = vec![0.0, 100.0, 100.0, 100.0, 100.0];
        let r = run(&store, root, &rho);
        assert_eq!(r.stats, AllocationStats::default());
        for (i, k) in kids.iter().enumerate() {
            let iv = r.intervals[k.index() as usize];
            assert!((iv.end - iv.start - PI / 4.0).abs() < 1e-12);
            let expected = PI / 4.0 + i as f64 * PI / 2.0;
            assert!((r.angles[k.index() as usize] - expected).abs() < 1e-12);
        }
        // Full coverage: the last child ends at 2π.
        let last = r.intervals[kids[3].index() as usize];
        assert!((last.end - TAU).abs() < 1e-12);
    }

    #[test]
    fn parent_span_sums_children() {
        let mut store = NodeStore::new();
        let root = store.create_node(Timestamp(0.0), 4.0);
        let a = store.create_node(Timestamp(0.0), 4.0);
        let a1 = store.create_node(Timestamp(0.0), 4.0);
        let a2 = store.create_node(Timestamp(0.0), 4.0);
        store.add_child(root, a);
        store.add_child(a, a1);
        store.add_child(a, a2);
        // a and a1 collide radially; a2 does not matter.
        let rho = vec![0.0, 100.0, 103.0, 200.0];
        let r = run(&store, root, &rho);

        let fp = AngularAllocator::footprint(4.0, 100.0);
        assert_eq!(r.spans[a1.index() as usize], AngleSpan { begin: fp, end: fp });
        assert_eq!(r.spans[a2.index() as usize], AngleSpan::EMPTY);
        assert!((r.spans[a.index() as usize].end - fp).abs() < 1e-15);
    }

    #[test]
    fn contraction_guarantees_min_angle() {
        // 100 leaves cannot all get 5 degrees; one complex child absorbs it.
        let (mut store, root, kids) = star(100);
        let deep = store.create_node(Timestamp(0.0), 4.0);
        store.add_child(kids[0], deep);
        let mut rho = vec![50.0; store.slot_count()];
        rho[root.index() as usize] = 0.0;
        rho[deep.index() as usize] = 200.0;
        // Give the complex child a real span.
        store.set_size(kids[0], 30.0);
        rho[kids[0].index() as usize] = 190.0;
        let r = run(&store, root, &rho);

        assert!(r.stats.contracted >= 1);
        for k in &kids[1..] {
            let iv = r.intervals[k.index() as usize];
            // Exclusive room: the half before the start plus the half after.
            let room = (iv.end - iv.start) + MIN_ANGLE / 2.0;
            assert!(room >= MIN_ANGLE - 1e-12);
        }
        // The complex child soaks up the rest, so the circle is still covered.
        let last = r.intervals[kids[99].index() as usize];
        assert!((last.end - TAU).abs() < 1e-9, "last child ends at {}", last.end);
    }

    #[test]
    fn childless_root_touches_nothing() {
        let mut store = NodeStore::new();
        let root = store.create_node(Timestamp(0.0), 4.0);
        let r = run(&store, root, &[0.0]);
        assert_eq!(r.angles, [0.0]);
        assert_eq!(r.stats, AllocationStats::default());
    }
}
