// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for incremental renderers.
//!
//! Interpolation marks the [`POSITION`](crate::dirty::POSITION) and
//! [`ALPHA`](crate::dirty::ALPHA) channels for every node whose current value
//! moved. [`NodeStore::evaluate_into`] drains those channels together with
//! [`TOPOLOGY`](crate::dirty::TOPOLOGY) and the lifecycle lists.
//!
//! [`NodeChanges`] uses raw slot indices (`u32`) rather than
//! [`NodeId`](super::NodeId) handles so that renderers can index directly
//! into the store via the `*_at()` accessors (e.g.
//! [`position_at`](super::NodeStore::position_at)) without paying for
//! generation checks on every access.

use alloc::vec::Vec;

use super::store::NodeStore;
use crate::dirty;

/// Node-level changes since the previous evaluation.
#[derive(Clone, Debug, Default)]
pub struct NodeChanges {
    /// Nodes whose current position moved.
    pub positions: Vec<u32>,
    /// Nodes whose current alpha changed.
    pub alphas: Vec<u32>,
    /// Nodes created since the last evaluation.
    pub added: Vec<u32>,
    /// Nodes destroyed since the last evaluation.
    pub removed: Vec<u32>,
    /// Whether any link was added or removed.
    pub topology_changed: bool,
}

impl NodeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.alphas.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            && self.alphas.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl NodeStore {
    /// Drains the per-frame change channels into `changes`, reusing its
    /// buffers.
    pub fn evaluate_into(&mut self, changes: &mut NodeChanges) {
        changes.clear();

        changes.positions = self
            .dirty
            .drain(dirty::POSITION)
            .deterministic()
            .run()
            .collect();

        changes.alphas = self
            .dirty
            .drain(dirty::ALPHA)
            .deterministic()
            .run()
            .collect();

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        // Slots destroyed this frame can still carry stale marks.
        changes.positions.retain(|&idx| self.alive[idx as usize]);
        changes.alphas.retain(|&idx| self.alive[idx as usize]);

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Like [`evaluate_into`](Self::evaluate_into), allocating a fresh buffer.
    pub fn evaluate(&mut self) -> NodeChanges {
        let mut changes = NodeChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar::Polar;
    use crate::time::Timestamp;

    #[test]
    fn creation_is_reported_once() {
        let mut store = NodeStore::new();
        let a = store.create_node(Timestamp(0.0), 4.0);
        let b = store.create_node(Timestamp(1.0), 4.0);
        store.add_child(a, b);

        let changes = store.evaluate();
        assert_eq!(changes.added, [a.index(), b.index()]);
        assert!(changes.topology_changed);

        let again = store.evaluate();
        assert!(again.is_empty(), "{again:?}");
    }

    #[test]
    fn interpolation_marks_are_collected() {
        let mut store = NodeStore::new();
        let a = store.create_node(Timestamp(0.0), 4.0);
        let _ = store.evaluate();

        store.position[a.index() as usize].retarget(Polar::new(1.0, 10.0));
        store.position[a.index() as usize].interpolate(0.5);
        store.mark_position(a.index());
        store.mark_alpha(a.index());

        let changes = store.evaluate();
        assert_eq!(changes.positions, [a.index()]);
        assert_eq!(changes.alphas, [a.index()]);
        assert!(!changes.topology_changed);
    }

    #[test]
    fn removal_drops_pending_marks() {
        let mut store = NodeStore::new();
        let a = store.create_node(Timestamp(0.0), 4.0);
        let _ = store.evaluate();

        store.mark_position(a.index());
        store.destroy_node(a);

        let changes = store.evaluate();
        assert!(changes.positions.is_empty());
        assert_eq!(changes.removed, [a.index()]);
    }
}
