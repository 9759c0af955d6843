//! Placement math for the floating panel.
//!
//! The panel's *edge* corner is put on a point taken from the target. For an
//! anchor the point is the anchor's *position* corner; for the pointer it is
//! the pointer itself, nudged away from the cursor hotspot. The edge is the
//! opposite of the position, so the panel's arrow points back at the target.

use tether_dom::{snap_to_edge, Corner, Edge, HorizontalEdge, Point, Rect, Size, VerticalEdge};

use crate::config::PanelMetrics;

/// Horizontal nudge when the panel's left edge faces the pointer.
pub const CURSOR_NUDGE_LEFT: f32 = 35.0;
/// Horizontal nudge when the panel's right edge faces the pointer.
pub const CURSOR_NUDGE_RIGHT: f32 = -5.0;
/// Vertical nudge when the panel's top edge faces the pointer.
pub const CURSOR_NUDGE_TOP: f32 = 35.0;
/// Vertical nudge when the panel is vertically centered on the pointer.
pub const CURSOR_NUDGE_CENTER: f32 = 15.0;

/// Position used at the anchor when the configured name does not parse.
pub const FALLBACK_POSITION: Corner = Corner::TopRight;
/// Panel edge used against an anchor when the configured name does not parse.
pub const FALLBACK_ANCHOR_EDGE: Corner = Corner::TopLeft;
/// Panel edge used against the pointer when the configured name does not parse.
pub const FALLBACK_FOLLOW_EDGE: Corner = Corner::BottomRight;

/// Immutable placement settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSpec {
    position: Option<Corner>,
    x_offset: f32,
    y_offset: f32,
    follow_pointer: bool,
}

impl PlacementSpec {
    /// Creates a spec. `None` marks a position name that did not parse.
    #[must_use]
    pub const fn new(position: Option<Corner>, x_offset: f32, y_offset: f32, follow_pointer: bool) -> Self {
        Self {
            position,
            x_offset,
            y_offset,
            follow_pointer,
        }
    }

    /// Returns the configured position, if it parsed.
    #[must_use]
    pub const fn position(&self) -> Option<Corner> {
        self.position
    }

    /// Returns the (x, y) offsets.
    #[must_use]
    pub const fn offsets(&self) -> (f32, f32) {
        (self.x_offset, self.y_offset)
    }

    /// Returns true in pointer-follow mode.
    #[must_use]
    pub const fn follows_pointer(&self) -> bool {
        self.follow_pointer
    }

    /// Corner of the anchor the panel is placed at.
    #[must_use]
    pub fn anchor_corner(&self) -> Corner {
        self.position.unwrap_or(FALLBACK_POSITION)
    }

    /// Corner of the panel placed on the anchor point.
    #[must_use]
    pub fn anchor_edge(&self) -> Corner {
        self.position.map_or(FALLBACK_ANCHOR_EDGE, Corner::opposite)
    }

    /// Corner of the panel placed on the pointer point.
    #[must_use]
    pub fn follow_edge(&self) -> Corner {
        self.position.map_or(FALLBACK_FOLLOW_EDGE, Corner::opposite)
    }

    /// Returns the panel corner used in the current mode.
    #[must_use]
    pub fn edge(&self) -> Corner {
        if self.follow_pointer {
            self.follow_edge()
        } else {
            self.anchor_edge()
        }
    }
}

/// What the panel is placed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementTarget {
    /// An anchor's bounding box.
    Anchor(Rect),
    /// The pointer location.
    Pointer(Point),
}

/// Where the panel ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Panel corner that was aligned.
    pub edge: Corner,
    /// Point the corner was aligned to.
    pub point: Point,
    /// Top-left corner of the panel.
    pub origin: Point,
}

/// Shifts a pointer point away from the cursor hotspot.
///
/// `margin_bottom` is the panel's bottom margin; a bottom edge moves down by
/// that plus one, except on the center column where the arrow would flicker.
#[must_use]
pub fn cursor_nudge(point: Point, edge: Edge, margin_bottom: f32) -> Point {
    let dx = match edge.x {
        HorizontalEdge::Left => CURSOR_NUDGE_LEFT,
        HorizontalEdge::Right => CURSOR_NUDGE_RIGHT,
        HorizontalEdge::Center => 0.0,
    };
    let dy = match edge.y {
        VerticalEdge::Top => CURSOR_NUDGE_TOP,
        VerticalEdge::Center => CURSOR_NUDGE_CENTER,
        VerticalEdge::Bottom if edge.x != HorizontalEdge::Center => margin_bottom + 1.0,
        VerticalEdge::Bottom => 0.0,
    };
    point.offset(dx, dy)
}

/// Returns the pointer point after offsets and the hotspot nudge, before the
/// panel is snapped to it.
#[must_use]
pub fn follow_point(spec: &PlacementSpec, pointer: Point, margin_bottom: f32) -> Point {
    let (dx, dy) = spec.offsets();
    cursor_nudge(pointer.offset(dx, dy), spec.follow_edge().edge(), margin_bottom)
}

/// Places a panel of `size` against the pointer.
#[must_use]
pub fn place_at_pointer(spec: &PlacementSpec, pointer: Point, size: Size, margin_bottom: f32) -> Placement {
    let edge = spec.follow_edge();
    let point = follow_point(spec, pointer, margin_bottom);
    Placement {
        edge,
        point,
        origin: snap_to_edge(point, edge.edge(), size),
    }
}

/// Places a panel of `size` against an anchor box. No cursor nudges apply.
#[must_use]
pub fn place_at_anchor(spec: &PlacementSpec, anchor: Rect, size: Size) -> Placement {
    let edge = spec.anchor_edge();
    let (dx, dy) = spec.offsets();
    let point = anchor.corner_point(spec.anchor_corner()).offset(dx, dy);
    Placement {
        edge,
        point,
        origin: snap_to_edge(point, edge.edge(), size),
    }
}

/// Places a panel against either kind of target.
#[must_use]
pub fn place(spec: &PlacementSpec, target: PlacementTarget, size: Size, margin_bottom: f32) -> Placement {
    match target {
        PlacementTarget::Anchor(rect) => place_at_anchor(spec, rect, size),
        PlacementTarget::Pointer(pointer) => place_at_pointer(spec, pointer, size, margin_bottom),
    }
}

/// Counts characters outside markup tags.
fn visible_chars(markup: &str) -> usize {
    let mut in_tag = false;
    markup
        .chars()
        .filter(|&c| match c {
            '<' => {
                in_tag = true;
                false
            }
            '>' if in_tag => {
                in_tag = false;
                false
            }
            _ => !in_tag,
        })
        .count()
}

/// Estimates the panel size for the regions that will be visible.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn measure(metrics: &PanelMetrics, title: Option<&str>, body: Option<&str>) -> Size {
    let mut width: f32 = 0.0;
    let mut height: f32 = 0.0;

    for text in [title, body].into_iter().flatten() {
        let raw_width = visible_chars(text) as f32 * metrics.char_width;
        let lines = if metrics.max_width > 0.0 {
            (raw_width / metrics.max_width).ceil().max(1.0)
        } else {
            1.0
        };
        width = width.max(raw_width.min(metrics.max_width));
        height += lines * metrics.line_height;
    }

    Size::new(width + metrics.padding * 2.0, height + metrics.padding * 2.0)
}
