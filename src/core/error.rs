//! Error types for the lowering stage.
//!
//! Using thiserror for more idiomatic error handling. Failing to fold an
//! address expression is ordinary control flow and stays `Option`-shaped; the
//! error type below covers the driver-level case where neither the dispatcher
//! nor the generic pattern tables could select a node.

use crate::dag::NodeId;
use thiserror::Error;

/// Main error type for instruction selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("no instruction pattern matched {kind} node {node:?}")]
    CannotSelect { node: NodeId, kind: String },
}

/// Result type alias for selection operations.
pub type SelectResult<T> = Result<T, SelectError>;
