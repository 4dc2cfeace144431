// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer contract.
//!
//! The tunnel does not draw. Once per tick the application calls
//! [`Tunnel::present`], which evaluates pending changes and hands a
//! [`Frame`] to a [`Renderer`]. A frame is a read-only view of the
//! interpolated state: node circles, edges with their policy alpha, and
//! ring radii, all in tunnel coordinates centered on the origin.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(dt: Duration) {
//!     // Animate: advance the transition and any fades.
//!     tunnel.tick(dt);
//!
//!     // Present: evaluate and draw.
//!     tunnel.present(&mut renderer);
//! }
//! ```
//!
//! Retained-mode renderers can use [`Frame::changes`] to update only the
//! nodes that moved; immediate-mode renderers just walk everything.

use kurbo::{Circle, Point};

use crate::polar::Polar;
use crate::rings::{Ring, RingState};
use crate::time::{TimeWindow, Timestamp};
use crate::tree::NodeId;
use crate::tunnel::{Tunnel, TunnelChanges};

/// Draws frames of a tunnel.
pub trait Renderer {
    /// Draws one frame.
    fn render(&mut self, frame: &Frame<'_>);
}

/// A node as it should be drawn now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeView {
    /// Node handle.
    pub id: NodeId,
    /// Event time.
    pub timestamp: Timestamp,
    /// Current polar position.
    pub polar: Polar,
    /// Current alpha.
    pub alpha: f64,
    /// Whether the node sits on the origin and takes no interaction.
    pub faux: bool,
    /// Circle to draw, centered at the current position.
    pub circle: Circle,
}

/// An edge as it should be drawn now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView {
    /// Layout parent.
    pub from: NodeId,
    /// Layout child.
    pub to: NodeId,
    /// Parent position.
    pub from_point: Point,
    /// Child position.
    pub to_point: Point,
    /// Opacity after the edge policy.
    pub alpha: f64,
}

/// A ring as it should be drawn now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingView {
    /// The ring's timestamp.
    pub time: Timestamp,
    /// Current radius.
    pub radius: f64,
    /// Lifecycle state.
    pub state: RingState,
}

impl From<&Ring> for RingView {
    fn from(ring: &Ring) -> Self {
        Self {
            time: ring.time(),
            radius: ring.radius().current,
            state: ring.state(),
        }
    }
}

/// Read-only view of one presented frame.
#[derive(Debug)]
pub struct Frame<'a> {
    tunnel: &'a Tunnel,
    changes: &'a TunnelChanges,
}

impl<'a> Frame<'a> {
    /// Creates a frame over `tunnel`'s current state.
    #[must_use]
    pub fn new(tunnel: &'a Tunnel, changes: &'a TunnelChanges) -> Self {
        Self { tunnel, changes }
    }

    /// What changed since the previous frame.
    #[must_use]
    pub fn changes(&self) -> &TunnelChanges {
        self.changes
    }

    /// The visible window.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.tunnel.window()
    }

    /// Laid-out nodes, parents before children.
    pub fn nodes(&self) -> impl Iterator<Item = NodeView> + '_ {
        let store = self.tunnel.store();
        self.tunnel
            .layout_tree()
            .into_iter()
            .flat_map(|tree| tree.order().iter().copied())
            .filter_map(move |idx| {
                let id = store.id_at(idx)?;
                let polar = store.position_at(idx).current;
                Some(NodeView {
                    id,
                    timestamp: store.timestamp(id),
                    polar,
                    alpha: store.alpha_at(idx).current,
                    faux: store.flags_at(idx).faux,
                    circle: Circle::new(polar.to_point(), store.size_at(idx)),
                })
            })
    }

    /// Edges of the layout tree, including suppressed ones (alpha zero).
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        let tunnel = self.tunnel;
        let store = tunnel.store();
        tunnel
            .layout_tree()
            .into_iter()
            .flat_map(|tree| tree.links())
            .filter_map(move |(p, c)| {
                Some(EdgeView {
                    from: store.id_at(p)?,
                    to: store.id_at(c)?,
                    from_point: store.position_at(p).current.to_point(),
                    to_point: store.position_at(c).current.to_point(),
                    alpha: tunnel.edge_alpha_at(p, c),
                })
            })
    }

    /// Rings, nearest first.
    pub fn rings(&self) -> impl Iterator<Item = RingView> + '_ {
        self.tunnel.rings().iter().map(RingView::from)
    }
}
