//! Named corners and edge snapping.
//!
//! A [`Corner`] names one of nine points on a box: the four corners, the four
//! edge midpoints, and the center. Floating panels are placed by putting one
//! corner of the panel onto a point derived from the anchor or the pointer.

use std::fmt;

use crate::geometry::{Point, Rect, Size};

/// Horizontal component of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalEdge {
    /// Left side.
    Left,
    /// Horizontal middle.
    Center,
    /// Right side.
    Right,
}

/// Vertical component of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalEdge {
    /// Top side.
    Top,
    /// Vertical middle.
    Center,
    /// Bottom side.
    Bottom,
}

/// A corner split into its horizontal and vertical parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Horizontal part.
    pub x: HorizontalEdge,
    /// Vertical part.
    pub y: VerticalEdge,
}

impl Edge {
    /// Creates an edge from its parts.
    #[must_use]
    pub const fn new(x: HorizontalEdge, y: VerticalEdge) -> Self {
        Self { x, y }
    }
}

/// One of the nine named points on a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Top left.
    TopLeft,
    /// Top center.
    TopCenter,
    /// Top right.
    TopRight,
    /// Center left.
    CenterLeft,
    /// Center.
    Center,
    /// Center right.
    CenterRight,
    /// Bottom left.
    BottomLeft,
    /// Bottom center.
    BottomCenter,
    /// Bottom right.
    BottomRight,
}

impl Corner {
    /// Every corner, row by row.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Parses a corner name.
    ///
    /// Accepts `topRight`, `top-right` and `top_right` spellings, case
    /// insensitively. Returns `None` for anything else.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let corner = match key.as_str() {
            "topleft" => Self::TopLeft,
            "topcenter" => Self::TopCenter,
            "topright" => Self::TopRight,
            "centerleft" => Self::CenterLeft,
            "center" => Self::Center,
            "centerright" => Self::CenterRight,
            "bottomleft" => Self::BottomLeft,
            "bottomcenter" => Self::BottomCenter,
            "bottomright" => Self::BottomRight,
            _ => return None,
        };
        Some(corner)
    }

    /// Returns the corner facing this one across the box.
    ///
    /// Applying it twice yields the original corner.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopCenter => Self::BottomCenter,
            Self::TopRight => Self::BottomLeft,
            Self::CenterLeft => Self::CenterRight,
            Self::Center => Self::Center,
            Self::CenterRight => Self::CenterLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomCenter => Self::TopCenter,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// Splits the corner into its horizontal and vertical parts.
    #[must_use]
    pub const fn edge(self) -> Edge {
        use HorizontalEdge as H;
        use VerticalEdge as V;

        match self {
            Self::TopLeft => Edge::new(H::Left, V::Top),
            Self::TopCenter => Edge::new(H::Center, V::Top),
            Self::TopRight => Edge::new(H::Right, V::Top),
            Self::CenterLeft => Edge::new(H::Left, V::Center),
            Self::Center => Edge::new(H::Center, V::Center),
            Self::CenterRight => Edge::new(H::Right, V::Center),
            Self::BottomLeft => Edge::new(H::Left, V::Bottom),
            Self::BottomCenter => Edge::new(H::Center, V::Bottom),
            Self::BottomRight => Edge::new(H::Right, V::Bottom),
        }
    }

    /// Returns the camelCase name, e.g. `topRight`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "topLeft",
            Self::TopCenter => "topCenter",
            Self::TopRight => "topRight",
            Self::CenterLeft => "centerLeft",
            Self::Center => "center",
            Self::CenterRight => "centerRight",
            Self::BottomLeft => "bottomLeft",
            Self::BottomCenter => "bottomCenter",
            Self::BottomRight => "bottomRight",
        }
    }

    /// Returns the hyphenated class name, e.g. `top-right`.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Rect {
    /// Returns the point named by `corner` on this rectangle.
    #[must_use]
    pub fn corner_point(&self, corner: Corner) -> Point {
        let edge = corner.edge();
        let x = match edge.x {
            HorizontalEdge::Left => self.x,
            HorizontalEdge::Center => self.x + self.width * 0.5,
            HorizontalEdge::Right => self.right(),
        };
        let y = match edge.y {
            VerticalEdge::Top => self.y,
            VerticalEdge::Center => self.y + self.height * 0.5,
            VerticalEdge::Bottom => self.bottom(),
        };
        Point::new(x, y)
    }
}

/// Returns the top-left origin that puts the `edge` corner of a box of the
/// given size onto `point`.
#[must_use]
pub fn snap_to_edge(point: Point, edge: Edge, size: Size) -> Point {
    let x = match edge.x {
        HorizontalEdge::Left => point.x,
        HorizontalEdge::Center => point.x - size.width * 0.5,
        HorizontalEdge::Right => point.x - size.width,
    };
    let y = match edge.y {
        VerticalEdge::Top => point.y,
        VerticalEdge::Center => point.y - size.height * 0.5,
        VerticalEdge::Bottom => point.y - size.height,
    };
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for corner in Corner::ALL {
            assert_eq!(corner.opposite().opposite(), corner);
        }
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!(Corner::parse("topRight"), Some(Corner::TopRight));
        assert_eq!(Corner::parse("top-right"), Some(Corner::TopRight));
        assert_eq!(Corner::parse("BOTTOM_center"), Some(Corner::BottomCenter));
        assert_eq!(Corner::parse("center"), Some(Corner::Center));
        assert_eq!(Corner::parse("sideways"), None);
        assert_eq!(Corner::parse(""), None);
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for corner in Corner::ALL {
            assert_eq!(Corner::parse(corner.name()), Some(corner));
            assert_eq!(Corner::parse(corner.class_name()), Some(corner));
        }
    }

    #[test]
    fn test_corner_point() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);

        assert_eq!(rect.corner_point(Corner::TopLeft), Point::new(100.0, 100.0));
        assert_eq!(rect.corner_point(Corner::BottomRight), Point::new(150.0, 120.0));
        assert_eq!(rect.corner_point(Corner::Center), Point::new(125.0, 110.0));
    }

    #[test]
    fn test_snap_to_edge() {
        let size = Size::new(40.0, 10.0);
        let point = Point::new(200.0, 300.0);

        assert_eq!(snap_to_edge(point, Corner::TopLeft.edge(), size), point);
        assert_eq!(
            snap_to_edge(point, Corner::BottomRight.edge(), size),
            Point::new(160.0, 290.0)
        );
        assert_eq!(
            snap_to_edge(point, Corner::Center.edge(), size),
            Point::new(180.0, 295.0)
        );
    }
}
