// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rooted spanning view of the event tree.
//!
//! The store keeps the event tree as the caller built it, but the tunnel can
//! be centered on any node. A [`LayoutTree`] re-roots the tree at the layout
//! root by treating every link as undirected: a node's layout children are
//! its stored children followed by its stored parent, minus the node it was
//! reached from.
//!
//! ```text
//!   stored:      R             layout root = A:      A
//!               / \                                 / \
//!              A   B                              A1   R
//!              |                                       |
//!              A1                                      B
//! ```
//!
//! Children that carry a [`dist`](super::NodeStore::dist) rank are ordered
//! by it (stable, lowest first); unranked children follow in link order.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// A breadth-first spanning view rooted at the layout root.
#[derive(Clone, Debug)]
pub struct LayoutTree {
    root: u32,
    /// Breadth-first order: every node appears after its layout parent.
    order: Vec<u32>,
    /// Slot-indexed layout parent (`INVALID` for the root and unreached slots).
    parent: Vec<u32>,
    /// Slot-indexed range into `links`.
    range: Vec<Range<u32>>,
    links: Vec<u32>,
}

impl LayoutTree {
    /// Builds the view of the component containing `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale.
    #[must_use]
    pub fn build(store: &NodeStore, root: NodeId) -> Self {
        store.validate(root);
        let slots = store.slot_count();
        let mut tree = Self {
            root: root.idx,
            order: Vec::new(),
            parent: vec![INVALID; slots],
            range: vec![0..0; slots],
            links: Vec::new(),
        };

        let mut seen = vec![false; slots];
        let mut queue = VecDeque::new();
        seen[root.idx as usize] = true;
        queue.push_back(root.idx);

        let mut scratch = Vec::new();
        while let Some(idx) = queue.pop_front() {
            tree.order.push(idx);

            scratch.clear();
            neighbors(store, idx, &mut scratch);
            scratch.retain(|&n| !seen[n as usize]);
            // Stable: ranked first by rank, unranked keep link order.
            scratch.sort_by_key(|&n| store.dist[n as usize].map_or((1, 0), |d| (0, d)));

            #[expect(
                clippy::cast_possible_truncation,
                reason = "a spanning tree has fewer links than the store has u32 slots"
            )]
            let range = tree.links.len() as u32..(tree.links.len() + scratch.len()) as u32;
            for &n in &scratch {
                seen[n as usize] = true;
                tree.parent[n as usize] = idx;
                tree.links.push(n);
                queue.push_back(n);
            }
            tree.range[idx as usize] = range;
        }

        tree
    }

    /// Raw slot index of the layout root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> u32 {
        self.root
    }

    /// Breadth-first order of every node in the view.
    ///
    /// Iterating it in reverse visits children before their parents.
    #[inline]
    #[must_use]
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// Number of nodes in the view.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the view is empty. Never true for a built tree.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the slot was reached from the root.
    #[must_use]
    pub fn contains(&self, idx: u32) -> bool {
        idx == self.root || self.parent.get(idx as usize).is_some_and(|&p| p != INVALID)
    }

    /// Layout parent of a slot.
    #[must_use]
    pub fn parent_of(&self, idx: u32) -> Option<u32> {
        self.parent
            .get(idx as usize)
            .copied()
            .filter(|&p| p != INVALID)
    }

    /// Layout children of a slot, in allocation order.
    #[must_use]
    pub fn children_of(&self, idx: u32) -> &[u32] {
        match self.range.get(idx as usize) {
            Some(r) => &self.links[r.start as usize..r.end as usize],
            None => &[],
        }
    }

    /// Every `(parent, child)` link of the view, in breadth-first order.
    pub fn links(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.order
            .iter()
            .flat_map(move |&p| self.children_of(p).iter().map(move |&c| (p, c)))
    }
}

/// Pushes the undirected neighbors of `idx`: stored children, then the stored
/// parent. This is also the cyclic order used when ranking siblings.
pub(crate) fn neighbors(store: &NodeStore, idx: u32, out: &mut Vec<u32>) {
    let mut child = store.first_child[idx as usize];
    while child != INVALID {
        out.push(child);
        child = store.next_sibling[child as usize];
    }
    let parent = store.parent[idx as usize];
    if parent != INVALID {
        out.push(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    struct Fixture {
        store: NodeStore,
        r: NodeId,
        a: NodeId,
        b: NodeId,
        a1: NodeId,
    }

    fn fixture() -> Fixture {
        let mut store = NodeStore::new();
        let r = store.create_node(Timestamp(0.0), 4.0);
        let a = store.create_node(Timestamp(0.0), 4.0);
        let b = store.create_node(Timestamp(0.0), 4.0);
        let a1 = store.create_node(Timestamp(0.0), 4.0);
        store.add_child(r, a);
        store.add_child(r, b);
        store.add_child(a, a1);
        Fixture { store, r, a, b, a1 }
    }

    #[test]
    fn rooted_at_stored_root() {
        let f = fixture();
        let tree = LayoutTree::build(&f.store, f.r);
        assert_eq!(tree.order(), [f.r.idx, f.a.idx, f.b.idx, f.a1.idx]);
        assert_eq!(tree.children_of(f.r.idx), [f.a.idx, f.b.idx]);
        assert_eq!(tree.parent_of(f.a1.idx), Some(f.a.idx));
        assert_eq!(tree.parent_of(f.r.idx), None);
    }

    #[test]
    fn rerooting_flips_the_path_to_the_old_root() {
        let f = fixture();
        let tree = LayoutTree::build(&f.store, f.a);
        assert_eq!(tree.children_of(f.a.idx), [f.a1.idx, f.r.idx]);
        assert_eq!(tree.children_of(f.r.idx), [f.b.idx]);
        assert_eq!(tree.parent_of(f.r.idx), Some(f.a.idx));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn ranked_children_come_first() {
        let mut f = fixture();
        let c = f.store.create_node(Timestamp(0.0), 4.0);
        f.store.add_child(f.r, c);
        f.store.set_dist(c, Some(0));
        f.store.set_dist(f.a, Some(1));
        let tree = LayoutTree::build(&f.store, f.r);
        assert_eq!(tree.children_of(f.r.idx), [c.idx, f.a.idx, f.b.idx]);
    }

    #[test]
    fn other_components_are_excluded() {
        let mut f = fixture();
        let lone = f.store.create_node(Timestamp(0.0), 4.0);
        let tree = LayoutTree::build(&f.store, f.r);
        assert!(!tree.contains(lone.idx));
        assert!(tree.contains(f.a1.idx));
        assert_eq!(tree.links().count(), 3);
    }
}
