// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The node store uses multi-channel dirty tracking (via [`understory_dirty`])
//! to know which parts of the tunnel are stale. Each channel represents an
//! independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`LAYOUT`] has dependency edges from parent to child:
//!   a parent's angular span is the sum of its children's, so changing a
//!   node's timestamp or size invalidates every ancestor. Marking uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy).
//!
//! - **Local-only**: [`POSITION`] and [`ALPHA`] are marked by interpolation
//!   for exactly the nodes whose current value moved.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on node creation, destruction and
//!   re-linking. Any topology change forces a full relayout.
//!
//! # Consumption
//!
//! [`Tunnel::compute_layout`](crate::tunnel::Tunnel::compute_layout) drains
//! `LAYOUT`. [`Tunnel::evaluate`](crate::tunnel::Tunnel::evaluate) drains
//! `POSITION`, `ALPHA` and `TOPOLOGY` and surfaces the results as
//! [`TunnelChanges`](crate::tunnel::TunnelChanges) for incremental renderers.

use understory_dirty::Channel;

/// Timestamp or size changed; the node's ancestors need new spans.
pub const LAYOUT: Channel = Channel::new(0);

/// Current position was interpolated to a new value.
pub const POSITION: Channel = Channel::new(1);

/// Current alpha changed.
pub const ALPHA: Channel = Channel::new(2);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(3);
