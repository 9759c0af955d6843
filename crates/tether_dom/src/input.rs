//! Pointer input delivered to nodes.

use crate::geometry::Point;
use crate::node::NodeId;

/// A pointer event targeted at a node.
///
/// Timestamps are milliseconds on the caller's clock; they only need to be
/// monotonic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer entered the node.
    PointerEnter {
        /// Target node.
        node: NodeId,
        /// Page coordinates.
        position: Point,
        /// Event time.
        time_ms: u64,
    },
    /// Pointer left the node.
    PointerLeave {
        /// Target node.
        node: NodeId,
        /// Event time.
        time_ms: u64,
    },
    /// Pointer moved within the node.
    PointerMove {
        /// Target node.
        node: NodeId,
        /// Page coordinates.
        position: Point,
        /// Event time.
        time_ms: u64,
    },
    /// Primary button clicked on the node.
    Click {
        /// Target node.
        node: NodeId,
        /// Page coordinates.
        position: Point,
        /// Event time.
        time_ms: u64,
    },
}

impl InputEvent {
    /// Returns the target node.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        match *self {
            Self::PointerEnter { node, .. }
            | Self::PointerLeave { node, .. }
            | Self::PointerMove { node, .. }
            | Self::Click { node, .. } => node,
        }
    }

    /// Returns the event time.
    #[must_use]
    pub const fn time_ms(&self) -> u64 {
        match *self {
            Self::PointerEnter { time_ms, .. }
            | Self::PointerLeave { time_ms, .. }
            | Self::PointerMove { time_ms, .. }
            | Self::Click { time_ms, .. } => time_ms,
        }
    }

    /// Returns the pointer position, if the event carries one.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match *self {
            Self::PointerEnter { position, .. }
            | Self::PointerMove { position, .. }
            | Self::Click { position, .. } => Some(position),
            Self::PointerLeave { .. } => None,
        }
    }
}

/// Last known pointer location.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Current position, if the pointer has been seen.
    position: Option<Point>,
}

impl PointerState {
    /// Creates a state with no known position.
    #[must_use]
    pub const fn new() -> Self {
        Self { position: None }
    }

    /// Records the position carried by an event, if any.
    pub fn observe(&mut self, event: &InputEvent) {
        if let Some(position) = event.position() {
            self.position = Some(position);
        }
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        self.position
    }
}

/// Drops calls that arrive less than `interval_ms` after the last accepted
/// one. The first call always passes.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl Throttle {
    /// Creates a throttle with the given minimum interval.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns true and records `now_ms` if enough time has passed.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        let open = self
            .last_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.interval_ms);
        if open {
            self.last_ms = Some(now_ms);
        }
        open
    }

    /// Forgets the last accepted call.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
