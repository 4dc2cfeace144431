// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON frame snapshots.
//!
//! [`snapshot`] turns a presented [`Frame`] into a [`serde_json::Value`]
//! holding the window, every node, edge and ring as drawn. [`export`] writes
//! it out. [`SnapshotRenderer`] is a [`Renderer`] that keeps one snapshot
//! per presented frame, which is handy for golden files and bug reports.

use std::io::{self, Write};

use serde_json::{Value, json};

use tunnel_core::render::{Frame, Renderer};
use tunnel_core::rings::RingState;

/// Builds a JSON description of `frame`.
pub fn snapshot(frame: &Frame<'_>) -> Value {
    let window = frame.window();
    let nodes: Vec<Value> = frame
        .nodes()
        .map(|n| {
            json!({
                "id": n.id.index(),
                "generation": n.id.generation(),
                "timestamp": n.timestamp.seconds(),
                "rho": n.polar.rho,
                "theta": n.polar.theta,
                "x": n.circle.center.x,
                "y": n.circle.center.y,
                "radius": n.circle.radius,
                "alpha": n.alpha,
                "faux": n.faux,
            })
        })
        .collect();
    let edges: Vec<Value> = frame
        .edges()
        .map(|e| {
            json!({
                "from": e.from.index(),
                "to": e.to.index(),
                "alpha": e.alpha,
            })
        })
        .collect();
    let rings: Vec<Value> = frame
        .rings()
        .map(|r| {
            json!({
                "time": r.time.seconds(),
                "radius": r.radius,
                "state": match r.state {
                    RingState::Provisional => "provisional",
                    RingState::Active => "active",
                },
            })
        })
        .collect();
    let changes = frame.changes();

    json!({
        "window": {
            "near": window.near.seconds(),
            "far": window.far.seconds(),
        },
        "changes": {
            "positions": changes.nodes.positions.len(),
            "alphas": changes.nodes.alphas.len(),
            "added": changes.nodes.added.len(),
            "removed": changes.nodes.removed.len(),
            "rings": changes.rings_changed,
            "finished": changes.finished.map(|k| format!("{k:?}")),
        },
        "nodes": nodes,
        "edges": edges,
        "rings": rings,
    })
}

/// Writes a pretty-printed snapshot of `frame` to `writer`.
pub fn export(frame: &Frame<'_>, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &snapshot(frame))?;
    writeln!(writer)
}

/// A [`Renderer`] that records a snapshot of every frame it is given.
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    frames: Vec<Value>,
}

impl SnapshotRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots taken so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Value] {
        &self.frames
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.frames.last()
    }
}

impl Renderer for SnapshotRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames.push(snapshot(frame));
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;
    use tunnel_core::config::TunnelConfig;
    use tunnel_core::time::{TimeWindow, Timestamp};
    use tunnel_core::transition::Easing;
    use tunnel_core::tunnel::Tunnel;

    fn small_tunnel() -> Tunnel {
        let now = Timestamp(10_000.0);
        let config =
            TunnelConfig::DEFAULT.with_transition(Duration::from_millis(32), Easing::Linear);
        let mut tunnel = Tunnel::new(config, TimeWindow::ending_at(now, 7_200.0));
        let root = tunnel.create_node(now);
        let a = tunnel.create_node(now - 900.0);
        let b = tunnel.create_node(now - 1_800.0);
        tunnel.add_child(root, a);
        tunnel.add_child(root, b);
        tunnel.compute_layout();
        tunnel
    }

    #[test]
    fn snapshot_lists_everything_drawn() {
        let mut tunnel = small_tunnel();
        let mut renderer = SnapshotRenderer::new();
        tunnel.present(&mut renderer);

        let frame = renderer.last().unwrap();
        assert_eq!(frame["window"]["near"], 10_000.0);
        assert_eq!(frame["window"]["far"], 2_800.0);
        assert_eq!(frame["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(frame["nodes"][0]["faux"], true);
        assert_eq!(frame["nodes"][0]["rho"], 0.0);
        assert_eq!(frame["edges"].as_array().unwrap().len(), 2);
        assert_eq!(frame["rings"].as_array().unwrap().len(), 3);
        assert_eq!(frame["rings"][0]["state"], "active");
        assert_eq!(frame["changes"]["added"], 3);
    }

    #[test]
    fn renderer_keeps_one_snapshot_per_frame() {
        let mut tunnel = small_tunnel();
        let mut renderer = SnapshotRenderer::new();
        tunnel.present(&mut renderer);
        let _ = tunnel.animate_time(TimeWindow::ending_at(Timestamp(13_600.0), 7_200.0));
        while tunnel.is_busy() {
            tunnel.tick(Duration::from_millis(16));
            tunnel.present(&mut renderer);
        }

        let frames = renderer.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2]["changes"]["finished"], "Window");
        assert_eq!(frames[2]["window"]["near"], 13_600.0);
    }

    #[test]
    fn export_writes_json() {
        let mut tunnel = small_tunnel();
        let mut out = Vec::<u8>::new();
        struct Export<'w>(&'w mut Vec<u8>);
        impl Renderer for Export<'_> {
            fn render(&mut self, frame: &Frame<'_>) {
                export(frame, &mut *self.0).unwrap();
            }
        }
        tunnel.present(&mut Export(&mut out));

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 3);
    }
}
