//! Contract tests for the public API: classifier agreement, hook-table
//! semantics, backport idempotence, and batch-bound properties.

use std::sync::Arc;

use vexec::executor::{
    overlay_hooks, ExecutionContext, ExecutionRole, HookRegistry, MemRowSource,
    NodeLifecycleDispatcher, ProduceResult, ScopedAllocationRegion,
};
use vexec::plan::{is_vectorizable, mark_vectorizable, NodeKind, PlanNode, PlanTree};
use vexec::types::{
    AttributeMeta, NativeTypeId, PhysicalLayout, PlaceholderTypeId, TupleDescriptor, TypeRegistry,
    Value,
};
use vexec::{VexecConfig, MAX_BATCH_CAPACITY, MIN_BATCH_CAPACITY};

const ALL_KINDS: [NodeKind; 10] = [
    NodeKind::TableScan,
    NodeKind::AppendOnlyScan,
    NodeKind::ParquetScan,
    NodeKind::IndexScan,
    NodeKind::NestedLoopJoin,
    NodeKind::HashJoin,
    NodeKind::Agg,
    NodeKind::Sort,
    NodeKind::Limit,
    NodeKind::Materialize,
];

fn registry() -> Arc<TypeRegistry> {
    let mut reg = TypeRegistry::new();
    reg.register(
        PlaceholderTypeId(700),
        NativeTypeId(23),
        PhysicalLayout::fixed(4, 4),
    );
    Arc::new(reg)
}

fn one_column_descriptor() -> TupleDescriptor {
    TupleDescriptor::new(vec![AttributeMeta::placeholder(
        "id",
        PlaceholderTypeId(700),
        PhysicalLayout::fixed(4, 4),
    )])
}

// =============================================================================
// Classifier Contracts
// =============================================================================

mod classifier_contracts {
    use super::*;

    /// The plan-eligibility hook and lifecycle dispatch must give identical
    /// answers for every node kind; any divergence is a correctness defect.
    #[test]
    fn test_check_hook_agrees_with_dispatch_for_every_kind() {
        let table = overlay_hooks();

        for kind in ALL_KINDS {
            let mut tree = PlanTree::new();
            let id = tree.push(PlanNode::leaf(kind, one_column_descriptor()));
            mark_vectorizable(&mut tree);

            let check_answer = (table.check_plan)(kind);
            assert_eq!(check_answer, is_vectorizable(kind));
            assert_eq!(check_answer, tree.node(id).vectorize_hint);

            let ctx =
                ExecutionContext::new(ExecutionRole::Worker, VexecConfig::new(), registry());
            let mut dispatcher = NodeLifecycleDispatcher::new(tree, ctx);
            dispatcher.init(id).unwrap();
            assert_eq!(
                dispatcher.state(id).unwrap().vectorized,
                check_answer,
                "dispatch diverged from plan check for {kind:?}"
            );
        }
    }

    #[test]
    fn test_supported_set_is_exactly_the_scan_kinds() {
        let supported: Vec<_> = ALL_KINDS.into_iter().filter(|k| is_vectorizable(*k)).collect();
        assert_eq!(
            supported,
            vec![
                NodeKind::TableScan,
                NodeKind::AppendOnlyScan,
                NodeKind::ParquetScan
            ]
        );
    }
}

// =============================================================================
// Hook Table Contracts
// =============================================================================

mod hook_contracts {
    use super::*;

    #[test]
    fn test_uninstalled_registry_defers_everything_to_host() {
        let registry = HookRegistry::new();
        let table = registry.table();
        for kind in ALL_KINDS {
            assert!(!(table.check_plan)(kind));
        }
    }

    #[test]
    fn test_install_uninstall_roundtrip() {
        let registry = HookRegistry::new();
        registry.install(overlay_hooks());
        assert!((registry.table().check_plan)(NodeKind::AppendOnlyScan));

        registry.uninstall();
        assert!(!(registry.table().check_plan)(NodeKind::AppendOnlyScan));

        // install is idempotent
        registry.install(overlay_hooks());
        registry.install(overlay_hooks());
        assert!((registry.table().check_plan)(NodeKind::AppendOnlyScan));
    }

    #[test]
    fn test_scoped_install_reverts_on_drop() {
        let registry = HookRegistry::new();
        {
            let _guard = registry.install_scoped(overlay_hooks());
            assert!((registry.table().check_plan)(NodeKind::TableScan));
        }
        assert!(!(registry.table().check_plan)(NodeKind::TableScan));
    }

    #[test]
    fn test_installed_hooks_run_a_scan_end_to_end() {
        let hook_registry = HookRegistry::new();
        let _guard = hook_registry.install_scoped(overlay_hooks());
        let table = hook_registry.table();

        let mut tree = PlanTree::new();
        let id = tree.push(PlanNode::leaf(NodeKind::TableScan, one_column_descriptor()));
        mark_vectorizable(&mut tree);
        let ctx = ExecutionContext::new(
            ExecutionRole::Worker,
            VexecConfig::new().with_batch_capacity(2),
            registry(),
        );
        let mut dispatcher = NodeLifecycleDispatcher::new(tree, ctx);

        (table.init)(&mut dispatcher, id).unwrap();
        dispatcher.bind_source(
            id,
            Box::new(MemRowSource::new(vec![
                vec![Value::Int32(1)],
                vec![Value::Int32(2)],
                vec![Value::Int32(3)],
            ])),
        );

        assert_eq!(
            (table.produce)(&mut dispatcher, id).unwrap(),
            ProduceResult::Rows(2)
        );
        assert_eq!(
            (table.produce)(&mut dispatcher, id).unwrap(),
            ProduceResult::Rows(1)
        );
        assert_eq!(
            (table.produce)(&mut dispatcher, id).unwrap(),
            ProduceResult::Exhausted
        );
        assert!((table.end)(&mut dispatcher, id).unwrap());
        assert_eq!(dispatcher.outstanding_bytes(id), 0);
    }
}

// =============================================================================
// Backport Contracts
// =============================================================================

mod backport_contracts {
    use super::*;

    #[test]
    fn test_backport_applied_twice_equals_once() {
        let reg = registry();
        let mut once = one_column_descriptor();
        reg.backport_descriptor(&mut once).unwrap();
        let mut twice = once.clone();
        reg.backport_descriptor(&mut twice).unwrap();
        assert_eq!(once, twice);
        assert!(once.is_backported());
    }

    #[test]
    fn test_backported_descriptor_carries_native_layouts() {
        let mut reg = TypeRegistry::new();
        // placeholder claims width 8, native truth is width 4
        reg.register(
            PlaceholderTypeId(800),
            NativeTypeId(23),
            PhysicalLayout::fixed(4, 4),
        );
        let mut desc = TupleDescriptor::new(vec![AttributeMeta::placeholder(
            "x",
            PlaceholderTypeId(800),
            PhysicalLayout::fixed(8, 8),
        )]);
        reg.backport_descriptor(&mut desc).unwrap();
        assert_eq!(desc.attrs()[0].layout.byte_width, Some(4));
    }
}

// =============================================================================
// Property Tests
// =============================================================================

mod batch_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// A batch never holds more rows than its configured capacity, for
        /// any in-range capacity and any source size.
        #[test]
        fn prop_batch_never_exceeds_capacity(
            capacity in MIN_BATCH_CAPACITY..=MAX_BATCH_CAPACITY,
            source_len in 0usize..6000,
        ) {
            let region = ScopedAllocationRegion::enter("prop", 0);
            let mut batch = region
                .create_batch(&[PhysicalLayout::fixed(8, 8)], capacity)
                .unwrap();
            let mut source = MemRowSource::new(
                (0..source_len).map(|i| vec![Value::Int64(i as i64)]).collect(),
            );

            let rows = vexec::executor::fill_batch(&mut source, &mut batch).unwrap();
            prop_assert!(rows <= capacity);
            prop_assert!(batch.rows() <= batch.capacity());
            prop_assert_eq!(rows, source_len.min(capacity));
        }

        /// Any requested capacity configures to a value within bounds, and
        /// in-range requests are kept exactly.
        #[test]
        fn prop_capacity_always_clamped(requested in 0usize..100_000) {
            let config = VexecConfig::new().with_batch_capacity(requested);
            let got = config.batch_capacity();
            prop_assert!((MIN_BATCH_CAPACITY..=MAX_BATCH_CAPACITY).contains(&got));
            if (MIN_BATCH_CAPACITY..=MAX_BATCH_CAPACITY).contains(&requested) {
                prop_assert_eq!(got, requested);
            }
        }
    }
}
