//! # Capability Traits
//!
//! Widgets expose what they can do through small traits instead of a class
//! hierarchy. The registry and embedding applications drive controllers only
//! through these.
//!
//! ```text
//! Openable      open(anchor, content?, title?)
//! Closeable     close(), dispose()
//! Positionable  reposition(target)
//! ```

use tether_dom::{NodeId, NodeTree};

use crate::error::TooltipResult;
use crate::placement::{Placement, PlacementTarget};

/// Why an `open` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No content resolved from the arguments or the anchor.
    EmptyContent,
}

/// Result of a successful `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The panel is positioned and visible.
    Shown,
    /// The panel is positioned; it becomes visible at the first tick at or
    /// after `reveal_at_ms`.
    Scheduled {
        /// Reveal deadline on the controller's clock.
        reveal_at_ms: u64,
    },
    /// The panel follows the pointer. It is visible once a pointer position
    /// is known.
    Following,
    /// Content is being fetched; the panel is untouched until the answer is
    /// picked up.
    Pending,
    /// Nothing happened.
    Skipped(SkipReason),
}

/// Arguments to [`Openable::open`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenRequest {
    /// Triggering element.
    pub anchor: Option<NodeId>,
    /// Literal content, used instead of the anchor's content attribute.
    pub content: Option<String>,
    /// Literal title, used instead of the anchor's title attribute.
    pub title: Option<String>,
}

impl OpenRequest {
    /// Opens for an anchor, reading content and title from its attributes.
    #[must_use]
    pub fn anchor(anchor: NodeId) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::default()
        }
    }

    /// Opens with literal content and no anchor.
    #[must_use]
    pub fn literal(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Overrides the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Overrides the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Something that can be opened for an anchor.
pub trait Openable {
    /// Resolves content, positions the panel and reveals it.
    ///
    /// # Errors
    ///
    /// Implementations fail with `InvalidState` once disposed and with
    /// `FetchFailure` when content cannot be requested.
    fn open(&mut self, tree: &mut NodeTree, request: OpenRequest) -> TooltipResult<OpenOutcome>;

    /// Returns true while the panel is visible.
    fn is_open(&self, tree: &NodeTree) -> bool;
}

/// Something that can be hidden and torn down.
pub trait Closeable {
    /// Hides the panel. Idempotent and infallible.
    fn close(&mut self, tree: &mut NodeTree);

    /// Releases the panel and all listeners. Idempotent.
    fn dispose(&mut self, tree: &mut NodeTree);
}

/// Something that can be placed against a target.
pub trait Positionable {
    /// Places the panel against `target` without changing its visibility.
    ///
    /// # Errors
    ///
    /// Implementations fail with `InvalidState` once disposed.
    fn reposition(&mut self, tree: &mut NodeTree, target: PlacementTarget) -> TooltipResult<Placement>;
}
