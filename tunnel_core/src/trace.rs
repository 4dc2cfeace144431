// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the compute/animate loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tunnel calls as it accepts requests, lays out the tree, edits the ring set
//! and runs transitions. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Every public tunnel operation that emits events has a `*_traced` twin
//! taking a `&mut Tracer<'_>`; the plain form passes [`Tracer::none`].
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::time::Timestamp;
use crate::tunnel::IgnoreReason;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which top-level transition is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Click-to-focus rotation around a new root.
    Recenter,
    /// Window scroll.
    Window,
    /// Relayout after graph edits.
    Layout,
}

/// Which ring-set operation ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingChange {
    /// Full rebuild.
    Reset,
    /// Rings added at the window edges.
    Augment,
    /// Rings dropped outside the window.
    Prune,
    /// Radii moved without animation.
    Recompute,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a window change is accepted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowEvent {
    /// New near bound.
    pub near: Timestamp,
    /// New far bound.
    pub far: Timestamp,
    /// Whether the change is transitioned.
    pub animated: bool,
}

/// Emitted after a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutEvent {
    /// Raw slot index of the layout root.
    pub root: u32,
    /// Nodes laid out.
    pub nodes: usize,
    /// Spans invalidated by edits since the previous pass.
    pub invalidated: usize,
    /// Parents that used contraction mode.
    pub contracted: usize,
    /// Parents whose children needed more room than available.
    pub overcommitted: usize,
}

/// Emitted after the ring set changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingEvent {
    /// Operation.
    pub change: RingChange,
    /// Rings added or removed at the near end.
    pub near_delta: usize,
    /// Rings added or removed at the far end.
    pub far_delta: usize,
    /// Ring count afterwards.
    pub len: usize,
}

/// Emitted when a top-level transition starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionBeginEvent {
    /// Which transition.
    pub kind: TransitionKind,
    /// Nodes taking part.
    pub nodes: usize,
    /// Rings taking part.
    pub rings: usize,
}

/// Emitted when a top-level transition settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEndEvent {
    /// Which transition.
    pub kind: TransitionKind,
    /// Steps taken, including the final one.
    pub ticks: u64,
}

/// Emitted when a public request is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestIgnoredEvent {
    /// The transition that was requested.
    pub kind: TransitionKind,
    /// Why nothing happened.
    pub reason: IgnoreReason,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tunnel.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a window change is accepted.
    fn on_window(&mut self, e: &WindowEvent) {
        _ = e;
    }

    /// Called after each layout pass.
    fn on_layout(&mut self, e: &LayoutEvent) {
        _ = e;
    }

    /// Called after each ring-set change.
    fn on_rings(&mut self, e: &RingEvent) {
        _ = e;
    }

    /// Called when a transition starts.
    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        _ = e;
    }

    /// Called when a transition settles.
    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        _ = e;
    }

    /// Called when a request is ignored.
    fn on_request_ignored(&mut self, e: &RequestIgnoredEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`WindowEvent`].
    #[inline]
    pub fn window(&mut self, e: &WindowEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_window(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutEvent`].
    #[inline]
    pub fn layout(&mut self, e: &LayoutEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RingEvent`].
    #[inline]
    pub fn rings(&mut self, e: &RingEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rings(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionBeginEvent`].
    #[inline]
    pub fn transition_begin(&mut self, e: &TransitionBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEndEvent`].
    #[inline]
    pub fn transition_end(&mut self, e: &TransitionEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RequestIgnoredEvent`].
    #[inline]
    pub fn request_ignored(&mut self, e: &RequestIgnoredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_request_ignored(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
