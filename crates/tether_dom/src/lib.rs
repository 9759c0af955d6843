//! # TETHER Document Model
//!
//! A small in-memory stand-in for a browser document, sized for floating
//! panels:
//! - Node tree with classes, attributes and inner markup
//! - Bounding boxes, margins and visibility
//! - Compound selector queries
//! - Template markup instantiation
//! - Named corners and edge snapping
//! - Pointer events and throttling
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    DOCUMENT MODEL                       │
//! ├────────────────────────────────────────────────────────┤
//! │  Template → NodeTree ← Selector queries                │
//! │                ↑                                        │
//! │  InputEvent → controller → Rect / Corner geometry      │
//! └────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod geometry;
pub mod input;
pub mod node;
pub mod position;
pub mod selector;
pub mod template;
pub mod tree;

pub use error::{DomError, DomResult};
pub use geometry::{Edges, Point, Rect, Size};
pub use input::{InputEvent, PointerState, Throttle};
pub use node::{Node, NodeFlags, NodeId};
pub use position::{snap_to_edge, Corner, Edge, HorizontalEdge, VerticalEdge};
pub use selector::{is_reference, Selector};
pub use tree::NodeTree;
