//! Core node types.

use std::collections::BTreeMap;

use crate::geometry::{Edges, Rect};

/// Unique identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates a new node ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Node state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags(u32);

impl NodeFlags {
    /// Node is visible.
    pub const VISIBLE: u32 = 1 << 0;
    /// Node is enabled (can receive input).
    pub const ENABLED: u32 = 1 << 1;
    /// Pointer is over the node.
    pub const HOVERED: u32 = 1 << 2;

    /// Default flags for a new node.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::ENABLED);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An element in the document.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Lowercase tag name.
    pub tag: String,
    /// Class list, in insertion order without duplicates.
    pub classes: Vec<String>,
    /// Attributes other than `class`.
    pub attributes: BTreeMap<String, String>,
    /// Inner markup.
    pub html: String,
    /// Bounding box in page coordinates.
    pub rect: Rect,
    /// Outer margins.
    pub margin: Edges,
    /// State flags.
    pub flags: NodeFlags,
    /// Parent node ID (None for roots).
    pub parent: Option<NodeId>,
}

impl Node {
    /// Creates a detached node with the given tag.
    #[must_use]
    pub fn new(id: NodeId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            html: String::new(),
            rect: Rect::ZERO,
            margin: Edges::ZERO,
            flags: NodeFlags::DEFAULT,
            parent: None,
        }
    }

    /// Returns true if the node is visible.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.has(NodeFlags::VISIBLE)
    }

    /// Returns true if the node accepts input.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flags.has(NodeFlags::ENABLED)
    }

    /// Returns true if the pointer is over the node.
    #[inline]
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.flags.has(NodeFlags::HOVERED)
    }

    /// Returns true if the node carries the class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Returns the `id` attribute, if any.
    #[must_use]
    pub fn element_id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    /// Returns an attribute value.
    ///
    /// `class` is answered from the class list.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            if self.classes.is_empty() {
                return None;
            }
            return Some(self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }
}
