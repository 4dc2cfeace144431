// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId};
use super::traverse::{BreadthFirst, Children, Descendants};
use crate::dirty;
use crate::layout::AngleSpan;
use crate::polar::Polar;
use crate::time::Timestamp;
use crate::transition::{Timeline, Tween};

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// The node sits on the origin: it is drawn fully transparent and does
    /// not take part in hit testing.
    pub faux: bool,
}

/// Struct-of-arrays storage for the event tree.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Event data (timestamp, size, ordering hint) is set by callers. Layout and
/// animation state (angular span, position and alpha tweens, fades) is written
/// by the tunnel.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Event data (set by callers) --
    pub(crate) timestamp: Vec<Timestamp>,
    pub(crate) size: Vec<f64>,
    pub(crate) dist: Vec<Option<u32>>,

    // -- Layout and animation state (written by the tunnel) --
    pub(crate) angle_span: Vec<AngleSpan>,
    pub(crate) position: Vec<Tween<Polar>>,
    pub(crate) alpha: Vec<Tween<f64>>,
    pub(crate) fade: Vec<Option<Timeline>>,
    pub(crate) flags: Vec<NodeFlags>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) layout_stale: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty node store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            timestamp: Vec::new(),
            size: Vec::new(),
            dist: Vec::new(),
            angle_span: Vec::new(),
            position: Vec::new(),
            alpha: Vec::new(),
            fade: Vec::new(),
            flags: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            layout_stale: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached node for an event at `timestamp` drawn with visual
    /// radius `size`, and returns its handle.
    ///
    /// The node starts on the origin, fully opaque, with an empty span.
    pub fn create_node(&mut self, timestamp: Timestamp, size: f64) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.timestamp[i] = timestamp;
            self.size[i] = size;
            self.dist[i] = None;
            self.angle_span[i] = AngleSpan::EMPTY;
            self.position[i] = Tween::new(Polar::ORIGIN);
            self.alpha[i] = Tween::new(1.0);
            self.fade[i] = None;
            self.flags[i] = NodeFlags::default();
            self.alive[i] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.timestamp.push(timestamp);
            self.size.push(size);
            self.dist.push(None);
            self.angle_span.push(AngleSpan::EMPTY);
            self.position.push(Tween::new(Polar::ORIGIN));
            self.alpha.push(Tween::new(1.0));
            self.fade.push(None);
            self.flags.push(NodeFlags::default());
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.pending_added.push(idx);
        self.mark_topology(idx);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        if self.parent[idx as usize] != INVALID {
            let p = self.parent[idx as usize];
            self.unlink_from_parent(idx);
            self.mark_topology(p);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.alive[idx as usize] = false;
        self.fade[idx as usize] = None;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.layout_stale = true;
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.alive[id.idx as usize]
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Number of slots, live or free. Slot-indexed buffers use this length.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.len as usize
    }

    /// Returns the live handle at raw slot `idx`, if the slot is in use.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<NodeId> {
        (idx < self.len && self.alive[idx as usize]).then(|| NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Iterates over every live node in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.len).filter_map(|idx| self.id_at(idx))
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        self.link_last(parent.idx, c);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "node has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.remove_dependency(p, c, dirty::LAYOUT);
        self.mark_layout(p);
        self.mark_topology(p);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        self.validate(child);
        self.validate(new_parent);

        let c = child.idx;
        if self.parent[c as usize] != INVALID {
            let old_p = self.parent[c as usize];
            self.unlink_from_parent(c);
            self.dirty.remove_dependency(old_p, c, dirty::LAYOUT);
            self.mark_layout(old_p);
            self.mark_topology(old_p);
        }
        self.link_last(new_parent.idx, c);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// Sibling order is the order the allocator lays children out in.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        let _ = self.dirty.add_dependency(p, c, dirty::LAYOUT);
        self.mark_layout(c);
        self.mark_topology(p);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.id_at(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a node, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns an iterator over `id` and its descendants in depth-first
    /// pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Returns an iterator over `id` and its descendants in breadth-first
    /// order.
    #[must_use]
    pub fn bfs(&self, id: NodeId) -> BreadthFirst<'_> {
        self.validate(id);
        BreadthFirst::new(self, id.idx)
    }

    /// Returns the nodes that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|id| self.parent[id.idx as usize] == INVALID)
            .collect()
    }

    // -- Event data --

    /// Returns the event timestamp of a node.
    #[must_use]
    pub fn timestamp(&self, id: NodeId) -> Timestamp {
        self.validate(id);
        self.timestamp[id.idx as usize]
    }

    /// Returns the visual radius of a node.
    #[must_use]
    pub fn size(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.size[id.idx as usize]
    }

    /// Returns the sibling ordering hint of a node.
    #[must_use]
    pub fn dist(&self, id: NodeId) -> Option<u32> {
        self.validate(id);
        self.dist[id.idx as usize]
    }

    /// Sets the event timestamp of a node.
    ///
    /// Marks the LAYOUT channel with eager propagation to ancestors.
    pub fn set_timestamp(&mut self, id: NodeId, timestamp: Timestamp) {
        self.validate(id);
        self.timestamp[id.idx as usize] = timestamp;
        self.mark_layout(id.idx);
    }

    /// Sets the visual radius of a node.
    ///
    /// Marks the LAYOUT channel with eager propagation to ancestors.
    pub fn set_size(&mut self, id: NodeId, size: f64) {
        self.validate(id);
        self.size[id.idx as usize] = size;
        self.mark_layout(id.idx);
    }

    /// Sets or clears the sibling ordering hint of a node.
    pub fn set_dist(&mut self, id: NodeId, dist: Option<u32>) {
        self.validate(id);
        self.dist[id.idx as usize] = dist;
        self.mark_layout(id.idx);
    }

    // -- Layout and animation state --

    /// Returns the angular span reserved for a node's subtree.
    ///
    /// Only meaningful after a layout pass.
    #[must_use]
    pub fn angle_span(&self, id: NodeId) -> AngleSpan {
        self.validate(id);
        self.angle_span[id.idx as usize]
    }

    /// Returns the position tween of a node.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Tween<Polar> {
        self.validate(id);
        self.position[id.idx as usize]
    }

    /// Returns the alpha tween of a node.
    #[must_use]
    pub fn alpha(&self, id: NodeId) -> Tween<f64> {
        self.validate(id);
        self.alpha[id.idx as usize]
    }

    /// Whether a secondary alpha fade is running for this node.
    #[must_use]
    pub fn is_fading(&self, id: NodeId) -> bool {
        self.validate(id);
        self.fade[id.idx as usize].is_some()
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Whether any timestamp, size or topology edit happened since the last
    /// layout pass.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.layout_stale
    }

    /// Drains the LAYOUT and TOPOLOGY invalidation and returns the raw slot
    /// indices whose spans were invalidated.
    pub fn take_layout_invalidation(&mut self) -> Vec<u32> {
        self.layout_stale = false;
        self.dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .collect()
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices rather than `NodeId` handles, skipping
    // generation validation. Only use with indices that came from
    // `TunnelChanges`, `nodes()` or a `LayoutTree`.

    /// Returns the position tween at raw slot `idx`.
    #[must_use]
    pub fn position_at(&self, idx: u32) -> Tween<Polar> {
        self.check_slot(idx);
        self.position[idx as usize]
    }

    /// Returns the alpha tween at raw slot `idx`.
    #[must_use]
    pub fn alpha_at(&self, idx: u32) -> Tween<f64> {
        self.check_slot(idx);
        self.alpha[idx as usize]
    }

    /// Returns the flags at raw slot `idx`.
    #[must_use]
    pub fn flags_at(&self, idx: u32) -> NodeFlags {
        self.check_slot(idx);
        self.flags[idx as usize]
    }

    /// Returns the visual radius at raw slot `idx`.
    #[must_use]
    pub fn size_at(&self, idx: u32) -> f64 {
        self.check_slot(idx);
        self.size[idx as usize]
    }

    // -- Crate-internal mutation used by layout and animation --

    pub(crate) fn mark_position(&mut self, idx: u32) {
        self.dirty.mark(idx, dirty::POSITION);
    }

    pub(crate) fn mark_alpha(&mut self, idx: u32) {
        self.dirty.mark(idx, dirty::ALPHA);
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Appends `c` to `p`'s child list and wires the LAYOUT dependency.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Parent's span aggregates the child's.
        let _ = self.dirty.add_dependency(p, c, dirty::LAYOUT);
        self.mark_layout(c);
        self.mark_topology(p);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    fn mark_layout(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
        self.layout_stale = true;
    }

    fn mark_topology(&mut self, idx: u32) {
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.layout_stale = true;
    }
}
