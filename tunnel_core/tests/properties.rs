// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for projection, allocation and rings.
//!
//! 1. Projection is monotonic inside the window and hits the calibration radii.
//! 2. Projection and its inverse agree.
//! 3. Unpressured parents hand out exactly their own interval.
//! 4. Unpressured siblings never overlap.
//! 5. Under pressure, every childless sibling gets exactly `min_angle`, and a
//!    complex sibling absorbs the rest of the parent's interval.
//! 6. Scrolling (augment, then prune) keeps one ring per lattice time.
//! 7. Tweens return their endpoints exactly at 0 and 1.

use core::f64::consts::TAU;

use proptest::prelude::*;
use tunnel_core::config::RingRadii;
use tunnel_core::layout::{AngularAllocator, Layoutable, TemporalLayout};
use tunnel_core::projection::ProjectionState;
use tunnel_core::rings::RingSet;
use tunnel_core::time::{TimeWindow, Timestamp};
use tunnel_core::transition::{Slot, Tween};
use tunnel_core::tree::{NodeId, NodeStore};

const EPS: f64 = 1e-9;
const NOW: f64 = 1_000_000.0;

// ── Helpers ─────────────────────────────────────────────────────────────

fn projection(near: f64, span: f64) -> ProjectionState {
    ProjectionState::new(
        TimeWindow::ending_at(Timestamp(near), span),
        &RingRadii::DEFAULT,
    )
}

/// A random tree as `(parent pick, age in seconds, size)` per non-root node.
/// Node `i` hangs under node `pick % i`.
fn tree_strategy() -> impl Strategy<Value = Vec<(usize, f64, f64)>> {
    prop::collection::vec((any::<usize>(), 1.0..7_000.0f64, 1.0..8.0f64), 1..40)
}

struct Laid {
    store: NodeStore,
    layout: TemporalLayout,
    ids: Vec<NodeId>,
}

fn lay_out(nodes: &[(usize, f64, f64)], min_angle: f64) -> Laid {
    let mut store = NodeStore::new();
    let mut ids = vec![store.create_node(Timestamp(NOW), 4.0)];
    for (i, &(pick, age, size)) in nodes.iter().enumerate() {
        let id = store.create_node(Timestamp(NOW - age), size);
        store.add_child(ids[pick % (i + 1)], id);
        ids.push(id);
    }
    let mut layout = TemporalLayout::new(AngularAllocator::new(min_angle));
    let proj = projection(NOW, 7_200.0);
    layout.compute(&mut store, ids[0], &proj, Slot::End);
    Laid { store, layout, ids }
}

/// Per-parent view: its interval, its children's intervals, and whether the
/// parent was under pressure.
struct Family {
    interval: (f64, f64),
    children: Vec<((f64, f64), bool)>,
    leftover: f64,
    contracted: bool,
}

fn families(laid: &Laid, min_angle: f64) -> Vec<Family> {
    let tree = laid.layout.tree().expect("laid out");
    let mut out = Vec::new();
    for &id in &laid.ids {
        let kids = tree.children_of(id.index());
        if kids.is_empty() {
            continue;
        }
        let interval = laid.layout.interval_of(id.index()).unwrap();
        let total: f64 = laid
            .store
            .children(id)
            .map(|c| laid.store.angle_span(c).end)
            .sum();
        let leftover = (interval.1 - interval.0) - total;
        let children: Vec<_> = laid
            .store
            .children(id)
            .map(|c| {
                let iv = laid.layout.interval_of(c.index()).unwrap();
                (iv, laid.store.angle_span(c).is_simple())
            })
            .collect();
        let any_simple = children.iter().any(|&(_, simple)| simple);
        let contracted = leftover / (children.len() as f64) < min_angle && any_simple;
        out.push(Family {
            interval,
            children,
            leftover,
            contracted,
        });
    }
    out
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Projection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn projection_is_monotonic(
        span in 60.0..1_000_000.0f64,
        a in 0.0..1.0f64,
        b in 0.0..1.0f64,
    ) {
        let proj = projection(NOW, span);
        let (older, newer) = if a < b { (a, b) } else { (b, a) };
        let t_old = Timestamp(NOW - span + older * span);
        let t_new = Timestamp(NOW - span + newer * span);
        prop_assert!(proj.project(t_old) <= proj.project(t_new));
    }

    #[test]
    fn projection_hits_calibration(span in 60.0..1_000_000.0f64) {
        let proj = projection(NOW, span);
        let radii = RingRadii::DEFAULT;
        prop_assert!((proj.project(Timestamp(NOW)) - radii.max).abs() < 1e-6);
        prop_assert!((proj.project(Timestamp(NOW - span)) - radii.min).abs() < 1e-6);
    }

    #[test]
    fn inverse_recovers_time(span in 60.0..100_000.0f64, frac in 0.0..1.0f64) {
        let proj = projection(NOW, span);
        let t = Timestamp(NOW - frac * span);
        let back = proj.time_at_radius(proj.project(t));
        prop_assert!((back - t).abs() < 1e-6 * span, "{t:?} came back as {back:?}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-5. Angular allocation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unpressured_children_fill_the_parent(
        nodes in tree_strategy(),
        min_angle in 0.0..0.2f64,
    ) {
        let laid = lay_out(&nodes, min_angle);
        for family in families(&laid, min_angle) {
            if family.contracted {
                continue;
            }
            let last = family.children.last().unwrap().0;
            prop_assert!(
                (last.1 - family.interval.1).abs() < EPS,
                "last child ends at {} but the parent's interval ends at {}",
                last.1,
                family.interval.1,
            );
        }
        let root = laid.layout.interval_of(laid.ids[0].index()).unwrap();
        prop_assert_eq!(root, (0.0, TAU));
    }

    #[test]
    fn unpressured_siblings_do_not_overlap(
        nodes in tree_strategy(),
        min_angle in 0.0..0.2f64,
    ) {
        let laid = lay_out(&nodes, min_angle);
        for family in families(&laid, min_angle) {
            if family.contracted || family.leftover < 0.0 {
                continue;
            }
            for pair in family.children.windows(2) {
                let (prev, next) = (pair[0].0, pair[1].0);
                prop_assert!(next.0 >= prev.1 - EPS, "{prev:?} overlaps {next:?}");
            }
        }
    }

    #[test]
    fn contraction_reserves_min_angle_for_leaves(
        fanout in 2usize..120,
        min_angle in 0.05..0.3f64,
    ) {
        // A wide star: the root is under pressure as soon as TAU / fanout
        // drops below `min_angle`.
        let nodes: Vec<_> = (0..fanout).map(|i| (0, 100.0 + i as f64, 4.0)).collect();
        let laid = lay_out(&nodes, min_angle);
        for family in families(&laid, min_angle) {
            if !family.contracted {
                continue;
            }
            let mut prev_end = family.interval.0;
            for &((_, end), simple) in &family.children {
                if simple {
                    prop_assert!(
                        (end - prev_end - min_angle).abs() < EPS,
                        "leaf got {} instead of {min_angle}",
                        end - prev_end,
                    );
                }
                prev_end = end;
            }
        }
    }

    #[test]
    fn contraction_with_a_complex_child_covers_the_parent(
        fanout in 60usize..150,
        min_angle in 0.11..0.3f64,
        size in 4.0..8.0f64,
    ) {
        // Node 1 has a child of nearly the same age, so its span is not
        // empty; the remaining root children are leaves.
        let mut nodes = vec![(0, 100.0, size), (1, 100.5, 4.0)];
        nodes.extend((0..fanout).map(|i| (0, 200.0 + i as f64, 4.0)));
        let laid = lay_out(&nodes, min_angle);

        let root = families(&laid, min_angle)
            .into_iter()
            .next()
            .expect("the root has children");
        prop_assert!(root.contracted, "{fanout} leaves at {min_angle} should contract");
        prop_assert!(root.children.iter().any(|&(_, simple)| !simple));
        let last = root.children.last().unwrap().0;
        prop_assert!(
            (last.1 - TAU).abs() < EPS,
            "last child ends at {} instead of 2π",
            last.1,
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Rings
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scrolling_keeps_one_ring_per_level(
        span in 1u32..40,
        shifts in prop::collection::vec(-30i32..30, 1..12),
    ) {
        let level = 3_600.0;
        let span = f64::from(span) * 900.0;
        let mut near = NOW;
        let mut rings = RingSet::new(level, &projection(near, span));
        for shift in shifts {
            near += f64::from(shift) * 900.0;
            let proj = projection(near, span);
            let _ = rings.augment(&proj);
            let _ = rings.prune(&proj);

            let window = proj.window();
            prop_assert!(rings.covers(window));
            for ring in &rings {
                prop_assert!(window.contains(ring.time()), "{:?} outside {window:?}", ring.time());
            }
            for pair in rings.iter().collect::<Vec<_>>().windows(2) {
                prop_assert_eq!(pair[0].level() - 1, pair[1].level());
                prop_assert!((pair[0].time() - pair[1].time() - level).abs() < EPS);
            }
            if let (Some(front), Some(back)) = (rings.front(), rings.back()) {
                prop_assert!(front.time() + level > window.near);
                prop_assert!(back.time() - level < window.far);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Tweens
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tween_endpoints_are_exact(start in -1e6..1e6f64, end in -1e6..1e6f64) {
        let mut tween = Tween::new(start);
        tween.retarget(end);
        tween.interpolate(0.0);
        prop_assert_eq!(tween.current, start);
        tween.interpolate(1.0);
        prop_assert_eq!(tween.current, end);
    }
}
