// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Counts are stored as `u32`, saturating.

use tunnel_core::time::Timestamp;
use tunnel_core::trace::{
    LayoutEvent, RequestIgnoredEvent, RingChange, RingEvent, TraceSink, TransitionBeginEvent,
    TransitionEndEvent, TransitionKind, WindowEvent,
};
use tunnel_core::tunnel::IgnoreReason;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_WINDOW: u8 = 1;
const TAG_LAYOUT: u8 = 2;
const TAG_RINGS: u8 = 3;
const TAG_TRANSITION_BEGIN: u8 = 4;
const TAG_TRANSITION_END: u8 = 5;
const TAG_REQUEST_IGNORED: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_count(&mut self, n: usize) {
        self.write_u32(u32::try_from(n).unwrap_or(u32::MAX));
    }

    fn write_kind(&mut self, kind: TransitionKind) {
        self.write_u8(match kind {
            TransitionKind::Recenter => 0,
            TransitionKind::Window => 1,
            TransitionKind::Layout => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_window(&mut self, e: &WindowEvent) {
        self.write_u8(TAG_WINDOW);
        self.write_f64(e.near.seconds());
        self.write_f64(e.far.seconds());
        self.write_u8(u8::from(e.animated));
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.write_u8(TAG_LAYOUT);
        self.write_u32(e.root);
        self.write_count(e.nodes);
        self.write_count(e.invalidated);
        self.write_count(e.contracted);
        self.write_count(e.overcommitted);
    }

    fn on_rings(&mut self, e: &RingEvent) {
        self.write_u8(TAG_RINGS);
        self.write_u8(match e.change {
            RingChange::Reset => 0,
            RingChange::Augment => 1,
            RingChange::Prune => 2,
            RingChange::Recompute => 3,
        });
        self.write_count(e.near_delta);
        self.write_count(e.far_delta);
        self.write_count(e.len);
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        self.write_u8(TAG_TRANSITION_BEGIN);
        self.write_kind(e.kind);
        self.write_count(e.nodes);
        self.write_count(e.rings);
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        self.write_u8(TAG_TRANSITION_END);
        self.write_kind(e.kind);
        self.write_u64(e.ticks);
    }

    fn on_request_ignored(&mut self, e: &RequestIgnoredEvent) {
        self.write_u8(TAG_REQUEST_IGNORED);
        self.write_kind(e.kind);
        self.write_u8(match e.reason {
            IgnoreReason::Busy => 0,
            IgnoreReason::UnknownNode => 1,
            IgnoreReason::AlreadyCentered => 2,
            IgnoreReason::NoChange => 3,
        });
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`WindowEvent`].
    Window(WindowEvent),
    /// A [`LayoutEvent`].
    Layout(LayoutEvent),
    /// A [`RingEvent`].
    Rings(RingEvent),
    /// A [`TransitionBeginEvent`].
    TransitionBegin(TransitionBeginEvent),
    /// A [`TransitionEndEvent`].
    TransitionEnd(TransitionEndEvent),
    /// A [`RequestIgnoredEvent`].
    RequestIgnored(RequestIgnoredEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_count(&mut self) -> Option<usize> {
        self.read_u32().map(|n| n as usize)
    }

    fn read_kind(&mut self) -> Option<TransitionKind> {
        Some(match self.read_u8()? {
            0 => TransitionKind::Recenter,
            1 => TransitionKind::Window,
            _ => TransitionKind::Layout,
        })
    }

    fn decode_window(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Window(WindowEvent {
            near: Timestamp(self.read_f64()?),
            far: Timestamp(self.read_f64()?),
            animated: self.read_u8()? != 0,
        }))
    }

    fn decode_layout(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Layout(LayoutEvent {
            root: self.read_u32()?,
            nodes: self.read_count()?,
            invalidated: self.read_count()?,
            contracted: self.read_count()?,
            overcommitted: self.read_count()?,
        }))
    }

    fn decode_rings(&mut self) -> Option<RecordedEvent> {
        let change = match self.read_u8()? {
            0 => RingChange::Reset,
            1 => RingChange::Augment,
            2 => RingChange::Prune,
            _ => RingChange::Recompute,
        };
        Some(RecordedEvent::Rings(RingEvent {
            change,
            near_delta: self.read_count()?,
            far_delta: self.read_count()?,
            len: self.read_count()?,
        }))
    }

    fn decode_transition_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionBegin(TransitionBeginEvent {
            kind: self.read_kind()?,
            nodes: self.read_count()?,
            rings: self.read_count()?,
        }))
    }

    fn decode_transition_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionEnd(TransitionEndEvent {
            kind: self.read_kind()?,
            ticks: self.read_u64()?,
        }))
    }

    fn decode_request_ignored(&mut self) -> Option<RecordedEvent> {
        let kind = self.read_kind()?;
        let reason = match self.read_u8()? {
            0 => IgnoreReason::Busy,
            1 => IgnoreReason::UnknownNode,
            2 => IgnoreReason::AlreadyCentered,
            _ => IgnoreReason::NoChange,
        };
        Some(RecordedEvent::RequestIgnored(RequestIgnoredEvent { kind, reason }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_WINDOW => self.decode_window(),
            TAG_LAYOUT => self.decode_layout(),
            TAG_RINGS => self.decode_rings(),
            TAG_TRANSITION_BEGIN => self.decode_transition_begin(),
            TAG_TRANSITION_END => self.decode_transition_end(),
            TAG_REQUEST_IGNORED => self.decode_request_ignored(),
            _ => None, // unknown tag: stop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;
    use tunnel_core::config::TunnelConfig;
    use tunnel_core::time::TimeWindow;
    use tunnel_core::trace::Tracer;
    use tunnel_core::transition::Easing;
    use tunnel_core::tunnel::Tunnel;

    #[test]
    fn window_keeps_fractional_seconds() {
        let mut rec = RecorderSink::new();
        let orig = WindowEvent {
            near: Timestamp(1_700_000_000.25),
            far: Timestamp(1_699_992_800.5),
            animated: true,
        };
        rec.on_window(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, [RecordedEvent::Window(orig)]);
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_transition_end(&TransitionEndEvent {
            kind: TransitionKind::Recenter,
            ticks: 9,
        });
        rec.on_transition_end(&TransitionEndEvent {
            kind: TransitionKind::Layout,
            ticks: 4,
        });
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            RecordedEvent::TransitionEnd(TransitionEndEvent {
                kind: TransitionKind::Recenter,
                ticks: 9
            })
        ));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn records_a_window_scroll() {
        let now = Timestamp(100_000.0);
        let config =
            TunnelConfig::DEFAULT.with_transition(Duration::from_millis(48), Easing::Linear);
        let mut tunnel = Tunnel::new(config, TimeWindow::ending_at(now, 7_200.0));
        let root = tunnel.create_node(now);
        let child = tunnel.create_node(now - 600.0);
        tunnel.add_child(root, child);

        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            let _ = tunnel.set_window_traced(TimeWindow::ending_at(now, 7_200.0), &mut tracer);
            let _ = tunnel
                .animate_time_traced(TimeWindow::ending_at(now + 3_600.0, 7_200.0), &mut tracer);
            let _ = tunnel.recenter_traced(child, &mut tracer);
            while tunnel.tick_traced(Duration::from_millis(16), &mut tracer) {}
        }

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let tags: Vec<_> = events
            .iter()
            .map(|e| match e {
                RecordedEvent::Window(_) => "window",
                RecordedEvent::Layout(_) => "layout",
                RecordedEvent::Rings(_) => "rings",
                RecordedEvent::TransitionBegin(_) => "begin",
                RecordedEvent::TransitionEnd(_) => "end",
                RecordedEvent::RequestIgnored(_) => "ignored",
            })
            .collect();
        assert_eq!(
            tags,
            [
                "window", "rings", "layout", // set_window
                "window", "rings", "layout", "begin", // animate_time
                "ignored", // recenter while busy
                "rings", "end", // prune on completion
            ]
        );
        match events.last() {
            Some(RecordedEvent::TransitionEnd(e)) => {
                assert_eq!(e.kind, TransitionKind::Window);
                assert_eq!(e.ticks, 3);
            }
            other => panic!("expected TransitionEnd, got {other:?}"),
        }
    }
}
