// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed as seconds since the epoch.

use std::io::Write;

use tunnel_core::trace::{
    LayoutEvent, RequestIgnoredEvent, RingChange, RingEvent, TraceSink, TransitionBeginEvent,
    TransitionEndEvent, TransitionKind, WindowEvent,
};
use tunnel_core::tunnel::IgnoreReason;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn kind_name(kind: TransitionKind) -> &'static str {
    match kind {
        TransitionKind::Recenter => "recenter",
        TransitionKind::Window => "window",
        TransitionKind::Layout => "layout",
    }
}

fn change_name(change: RingChange) -> &'static str {
    match change {
        RingChange::Reset => "reset",
        RingChange::Augment => "augment",
        RingChange::Prune => "prune",
        RingChange::Recompute => "recompute",
    }
}

fn reason_name(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::Busy => "busy",
        IgnoreReason::UnknownNode => "unknown-node",
        IgnoreReason::AlreadyCentered => "already-centered",
        IgnoreReason::NoChange => "no-change",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_window(&mut self, e: &WindowEvent) {
        let _ = writeln!(
            self.writer,
            "[window] near={:.1}s far={:.1}s span={:.1}s animated={}",
            e.near.seconds(),
            e.far.seconds(),
            e.near.seconds() - e.far.seconds(),
            e.animated,
        );
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        let _ = writeln!(
            self.writer,
            "[layout] root={} nodes={} invalidated={} contracted={} overcommitted={}",
            e.root, e.nodes, e.invalidated, e.contracted, e.overcommitted,
        );
    }

    fn on_rings(&mut self, e: &RingEvent) {
        let _ = writeln!(
            self.writer,
            "[rings:{}] near={} far={} len={}",
            change_name(e.change),
            e.near_delta,
            e.far_delta,
            e.len,
        );
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[transition:begin] {} nodes={} rings={}",
            kind_name(e.kind),
            e.nodes,
            e.rings,
        );
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        let _ = writeln!(
            self.writer,
            "[transition:end] {} ticks={}",
            kind_name(e.kind),
            e.ticks,
        );
    }

    fn on_request_ignored(&mut self, e: &RequestIgnoredEvent) {
        let _ = writeln!(
            self.writer,
            "[ignored] {} reason={}",
            kind_name(e.kind),
            reason_name(e.reason),
        );
    }
}
