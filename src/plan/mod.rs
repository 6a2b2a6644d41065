//! Plan-tree representation shared with the host engine.
//!
//! Nodes live in a contiguous arena and refer to each other by index, so
//! parent back-references in the executor are plain indices with no
//! ownership of their own.

mod classifier;
mod tree;

pub use classifier::{is_vectorizable, mark_vectorizable};
pub use tree::{NodeId, NodeKind, PlanNode, PlanTree};
