//! Error types for the vectorized-execution overlay.

use thiserror::Error;

use crate::plan::NodeId;
use crate::types::PlaceholderTypeId;

/// Result type alias using [`VexecError`].
pub type Result<T> = std::result::Result<T, VexecError>;

/// Error types for the vectorized-execution overlay.
#[derive(Debug, Error)]
pub enum VexecError {
    /// Batch or state allocation failed during node initialization.
    ///
    /// Fatal: node construction is aborted and never retried.
    #[error("Allocation failure: {requested} bytes requested, {outstanding} outstanding, limit is {limit} bytes")]
    AllocationFailure {
        requested: usize,
        outstanding: usize,
        limit: usize,
    },

    /// No native type registered for a placeholder type.
    ///
    /// Fatal: the scan's result shape is undefined without the mapping.
    #[error("No native type registered for placeholder type {0}")]
    TypeMappingNotFound(PlaceholderTypeId),

    /// Lifecycle call arrived in the wrong node phase.
    #[error("State error: {0}")]
    StateError(String),

    /// A vectorized scan was produced with no bound row source.
    #[error("No row source bound for scan node {0}")]
    MissingRowSource(NodeId),

    /// General execution errors.
    #[error("Execution error: {0}")]
    ExecutionError(String),
}
