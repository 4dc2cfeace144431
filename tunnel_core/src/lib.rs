// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporal radial layout of event trees.
//!
//! `tunnel_core` lays out a tree of time-stamped events as a "tunnel": a
//! perspective-projected radial graph where a node's distance from the
//! center encodes its age and its angle encodes tree structure. Background
//! rings mark fixed times on the depth axis. It is `no_std` compatible (with
//! `alloc`) and stores nodes in struct-of-arrays layout with index handles.
//!
//! # Architecture
//!
//! The crate splits into "compute" (projection and angular allocation) and
//! "animate" (rings and transitions), tied together by the [`Tunnel`]
//! facade:
//!
//! ```text
//!   set_window / animate_time / recenter
//!       │
//!       ▼
//!   ProjectionState::project ──► AngularAllocator ──► End positions
//!                                                          │
//!                 ┌────────────────────────────────────────┘
//!                 ▼
//!   RingSet::augment ──► tick(dt) ──► step(delta)* ──► complete() ──► RingSet::prune
//!                                          │
//!                                          ▼
//!                              Tunnel::present() ──► Renderer::render(Frame)
//! ```
//!
//! **[`projection`]**: Perspective projection of timestamps onto radii, and
//! its inverse.
//!
//! **[`layout`]**: Recursive angular allocation with a minimum-angle floor,
//! behind the [`Layoutable`](layout::Layoutable) seam.
//!
//! **[`tree`]**: Struct-of-arrays node store with generational handles,
//! traversal iterators and the re-rooted [`LayoutTree`](tree::LayoutTree).
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//!
//! **[`rings`]**: The ordered ring set, grown and pruned as the window
//! scrolls.
//!
//! **[`transition`]**: Tweens, easing and timelines, behind the
//! [`Animatable`](transition::Animatable) seam.
//!
//! **[`tunnel`]**: The [`Tunnel`] facade owning all state and the public
//! operations.
//!
//! **[`render`]**: The [`Renderer`](render::Renderer) trait and the
//! [`Frame`](render::Frame) it receives.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (enabled by default): Enables `std` support in dependencies.
//!   Without it, float math goes through `libm`.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod dirty;
pub mod layout;
pub mod polar;
pub mod projection;
pub mod render;
pub mod rings;
pub mod time;
pub mod trace;
pub mod transition;
pub mod tree;
pub mod tunnel;

pub use config::TunnelConfig;
pub use time::{TimeWindow, Timestamp};
pub use tunnel::Tunnel;
