// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event tree data model.
//!
//! A *node* is one event in the tree. Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - **Event data** set by the caller: [`timestamp`](NodeStore::set_timestamp),
//!   [`size`](NodeStore::set_size) and the sibling ordering hint
//!   [`dist`](NodeStore::set_dist).
//! - **Layout and animation state** written by the tunnel: the angular span
//!   of the node's subtree, position and alpha tweens, and an optional fade
//!   timeline.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Mutations mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)):
//!
//! - **LAYOUT**: timestamp and size edits propagate to every ancestor, since
//!   spans aggregate bottom-up.
//! - **TOPOLOGY**: link changes and node creation/destruction.
//! - **POSITION** / **ALPHA**: local, marked by interpolation.

mod evaluate;
mod id;
mod layout_tree;
mod store;
mod traverse;

pub use evaluate::NodeChanges;
pub use id::{INVALID, NodeId};
pub use layout_tree::LayoutTree;
pub(crate) use layout_tree::neighbors;
pub use store::{NodeFlags, NodeStore};
pub use traverse::{BreadthFirst, Children, Descendants};
