// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// An iterator over the direct children of a node.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

/// Depth-first pre-order walk of a subtree, starting with its root.
///
/// Created by [`NodeStore::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a NodeStore,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a NodeStore, root: u32) -> Self {
        let mut stack = Vec::new();
        stack.push(root);
        Self { store, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push children in reverse so the first child pops first.
        let mark = self.stack.len();
        let mut child = self.store.first_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.store.next_sibling[child as usize];
        }
        self.stack[mark..].reverse();
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

/// Breadth-first walk of a subtree, starting with its root.
///
/// Created by [`NodeStore::bfs`].
#[derive(Debug)]
pub struct BreadthFirst<'a> {
    store: &'a NodeStore,
    queue: VecDeque<u32>,
}

impl<'a> BreadthFirst<'a> {
    pub(crate) fn new(store: &'a NodeStore, root: u32) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(root);
        Self { store, queue }
    }
}

impl Iterator for BreadthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.queue.pop_front()?;
        let mut child = self.store.first_child[idx as usize];
        while child != INVALID {
            self.queue.push_back(child);
            child = self.store.next_sibling[child as usize];
        }
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}
