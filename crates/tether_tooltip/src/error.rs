//! # Tooltip Error Types
//!
//! Empty content is not an error: `open` reports it as
//! [`OpenOutcome::Skipped`](crate::OpenOutcome::Skipped) and leaves the panel
//! alone. Malformed corner names are not errors either; they fall back to a
//! default corner.

use tether_dom::{DomError, NodeId};
use thiserror::Error;

/// Errors that can occur while driving a floating panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TooltipError {
    /// Operation on a disposed controller.
    #[error("controller has been disposed")]
    InvalidState,

    /// A deferred content fetch failed. The panel stays hidden and the
    /// request is not retried.
    #[error("fetch for {key:?} failed: {reason}")]
    FetchFailure {
        /// Content key that was requested.
        key: String,
        /// Failure reported by the fetcher.
        reason: String,
    },

    /// `open` was called without an anchor and without literal content.
    #[error("open needs an anchor or literal content")]
    MissingAnchor,

    /// The anchor is not in the document.
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The panel template is unusable.
    #[error("invalid panel template: {0}")]
    Template(String),

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The document rejected an operation.
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type for tooltip operations.
pub type TooltipResult<T> = Result<T, TooltipError>;
