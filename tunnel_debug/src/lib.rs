// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON snapshots for tunnel diagnostics.
//!
//! This crate provides [`TraceSink`](tunnel_core::trace::TraceSink) and
//! [`Renderer`](tunnel_core::render::Renderer) implementations for
//! development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`snapshot::SnapshotRenderer`]: JSON snapshots of presented frames, with
//!   [`snapshot::export`] for writing them out.

pub mod pretty;
pub mod recorder;
pub mod snapshot;
