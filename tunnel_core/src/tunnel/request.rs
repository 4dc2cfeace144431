// Copyright 2026 the Tunnel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outcomes of public tunnel requests.

/// What a public request did.
///
/// None of the tunnel's requests can fail: a request that cannot be honored
/// right now is a no-op and says why.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Request {
    /// A transition began; drive it with [`tick`](super::Tunnel::tick).
    Started,
    /// The change took effect immediately.
    Applied,
    /// Nothing happened.
    Ignored(IgnoreReason),
}

impl Request {
    /// Whether the request changed anything.
    #[inline]
    #[must_use]
    pub fn is_accepted(self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Why a request was a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// Another top-level transition is in flight.
    Busy,
    /// The node is destroyed or not part of the displayed tree.
    UnknownNode,
    /// The node is already the layout root.
    AlreadyCentered,
    /// The request would not change anything.
    NoChange,
}
