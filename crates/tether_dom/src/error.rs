//! # Document Error Types

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by the document model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// Template markup could not be parsed.
    #[error("malformed markup at byte {offset}: {reason}")]
    Markup {
        /// Byte offset where parsing failed.
        offset: usize,
        /// What went wrong.
        reason: String,
    },

    /// A selector string could not be parsed.
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),

    /// The node does not exist in the tree.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;
