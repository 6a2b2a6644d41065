//! Which node kinds have a batch-capable implementation.

use crate::plan::{NodeKind, PlanTree};

/// Returns true when a node kind has a batch-capable scan implementation.
///
/// Pure over a fixed set of scan kinds. The same predicate backs both the
/// plan-eligibility hook and lifecycle dispatch; the two must never diverge.
#[must_use]
pub fn is_vectorizable(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::TableScan | NodeKind::AppendOnlyScan | NodeKind::ParquetScan
    )
}

/// Plan-marking pass: sets every node's static eligibility marker from the
/// classifier. Returns the number of nodes marked eligible.
pub fn mark_vectorizable(tree: &mut PlanTree) -> usize {
    let ids: Vec<_> = tree.iter().map(|(id, _)| id).collect();
    let mut marked = 0;
    for id in ids {
        let node = tree.node_mut(id);
        node.vectorize_hint = is_vectorizable(node.kind);
        if node.vectorize_hint {
            marked += 1;
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanNode;
    use crate::types::TupleDescriptor;

    #[test]
    fn test_scan_kinds_are_vectorizable() {
        assert!(is_vectorizable(NodeKind::TableScan));
        assert!(is_vectorizable(NodeKind::AppendOnlyScan));
        assert!(is_vectorizable(NodeKind::ParquetScan));
    }

    #[test]
    fn test_non_scan_kinds_are_not() {
        for kind in [
            NodeKind::IndexScan,
            NodeKind::NestedLoopJoin,
            NodeKind::HashJoin,
            NodeKind::Agg,
            NodeKind::Sort,
            NodeKind::Limit,
            NodeKind::Materialize,
        ] {
            assert!(!is_vectorizable(kind), "{kind:?} must not be vectorizable");
        }
    }

    #[test]
    fn test_mark_vectorizable_sets_hints() {
        let mut tree = PlanTree::new();
        let scan = tree.push(PlanNode::leaf(NodeKind::AppendOnlyScan, TupleDescriptor::default()));
        let sort = tree.push(
            PlanNode::leaf(NodeKind::Sort, TupleDescriptor::default()).with_outer(scan),
        );

        let marked = mark_vectorizable(&mut tree);
        assert_eq!(marked, 1);
        assert!(tree.node(scan).vectorize_hint);
        assert!(!tree.node(sort).vectorize_hint);
    }
}
