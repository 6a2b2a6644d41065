//! Arena-backed plan tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TupleDescriptor;

/// Index of a node in its [`PlanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind tag of a plan node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Heap table scan.
    TableScan,
    /// Append-only table scan.
    AppendOnlyScan,
    /// Parquet file scan.
    ParquetScan,
    /// Index scan.
    IndexScan,
    /// Nested-loop join.
    NestedLoopJoin,
    /// Hash join.
    HashJoin,
    /// Aggregation.
    Agg,
    /// Sort.
    Sort,
    /// Limit.
    Limit,
    /// Materialize.
    Materialize,
}

/// One node of the execution plan.
///
/// Created once per query by the planner; the overlay only reads it.
#[derive(Debug, Clone)]
pub struct PlanNode {
    /// Node kind tag.
    pub kind: NodeKind,
    /// Inner child, if any.
    pub inner: Option<NodeId>,
    /// Outer child, if any.
    pub outer: Option<NodeId>,
    /// Result shape as planned (placeholder-tagged for vectorized scans).
    pub descriptor: TupleDescriptor,
    /// The planner's static eligibility marker, trusted as the default
    /// vectorization intent at init.
    pub vectorize_hint: bool,
}

impl PlanNode {
    /// Creates a leaf node with no children and no hint.
    #[must_use]
    pub fn leaf(kind: NodeKind, descriptor: TupleDescriptor) -> Self {
        PlanNode {
            kind,
            inner: None,
            outer: None,
            descriptor,
            vectorize_hint: false,
        }
    }

    /// Sets the outer child.
    #[must_use]
    pub fn with_outer(mut self, outer: NodeId) -> Self {
        self.outer = Some(outer);
        self
    }

    /// Sets the inner child.
    #[must_use]
    pub fn with_inner(mut self, inner: NodeId) -> Self {
        self.inner = Some(inner);
        self
    }
}

/// Contiguous arena of plan nodes.
#[derive(Debug, Clone, Default)]
pub struct PlanTree {
    nodes: Vec<PlanNode>,
}

impl PlanTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its id.
    pub fn push(&mut self, node: PlanNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a node by id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds; ids are only ever minted by
    /// [`PlanTree::push`].
    #[must_use]
    pub fn node(&self, id: NodeId) -> &PlanNode {
        &self.nodes[id.0]
    }

    /// Mutable access to a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut PlanNode {
        &mut self.nodes[id.0]
    }

    /// Both children of a node, outer first.
    #[must_use]
    pub fn children(&self, id: NodeId) -> [Option<NodeId>; 2] {
        let node = self.node(id);
        [node.outer, node.inner]
    }

    /// Iterates over `(id, node)` pairs in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PlanNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
