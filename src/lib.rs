//! vexec - pluggable vectorized-execution overlay
//!
//! Intercepts init/produce/end lifecycle calls of a pull-based, row-oriented
//! execution tree and substitutes columnar batch production for the scan
//! kinds that have a batch implementation. Every other node kind declines
//! through a handled/unhandled seam so the host's per-row path runs
//! unchanged. Result descriptors are backported from internal placeholder
//! type tags to native types exactly once, before any non-vectorized
//! consumer can see them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use vexec::executor::{
//!     ExecutionContext, ExecutionRole, MemRowSource, NodeLifecycleDispatcher, ProduceResult,
//! };
//! use vexec::plan::{mark_vectorizable, NodeKind, PlanNode, PlanTree};
//! use vexec::types::{
//!     AttributeMeta, NativeTypeId, PhysicalLayout, PlaceholderTypeId, TupleDescriptor,
//!     TypeRegistry, Value,
//! };
//! use vexec::VexecConfig;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     PlaceholderTypeId(700),
//!     NativeTypeId(23),
//!     PhysicalLayout::fixed(4, 4),
//! );
//!
//! let mut tree = PlanTree::new();
//! let scan = tree.push(PlanNode::leaf(
//!     NodeKind::TableScan,
//!     TupleDescriptor::new(vec![AttributeMeta::placeholder(
//!         "id",
//!         PlaceholderTypeId(700),
//!         PhysicalLayout::fixed(4, 4),
//!     )]),
//! ));
//! mark_vectorizable(&mut tree);
//!
//! let ctx = ExecutionContext::new(
//!     ExecutionRole::Worker,
//!     VexecConfig::new().with_batch_capacity(2),
//!     Arc::new(registry),
//! );
//! let mut dispatcher = NodeLifecycleDispatcher::new(tree, ctx);
//! dispatcher.init(scan)?;
//! dispatcher.bind_source(
//!     scan,
//!     Box::new(MemRowSource::new(vec![
//!         vec![Value::Int32(1)],
//!         vec![Value::Int32(2)],
//!         vec![Value::Int32(3)],
//!     ])),
//! );
//!
//! assert_eq!(dispatcher.produce(scan)?, ProduceResult::Rows(2));
//! assert_eq!(dispatcher.produce(scan)?, ProduceResult::Rows(1));
//! assert_eq!(dispatcher.produce(scan)?, ProduceResult::Exhausted);
//! assert!(dispatcher.end(scan)?);
//! # Ok::<(), vexec::VexecError>(())
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod plan;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::{VexecConfig, DEFAULT_BATCH_CAPACITY, MAX_BATCH_CAPACITY, MIN_BATCH_CAPACITY};
pub use error::{Result, VexecError};
pub use executor::{
    overlay_hooks, ExecutionContext, ExecutionRole, HookRegistry, HookTable,
    NodeLifecycleDispatcher, ProduceResult, ScopedAllocationRegion, TupleBatch,
};
pub use plan::{is_vectorizable, NodeId, NodeKind, PlanNode, PlanTree};
pub use types::{TupleDescriptor, TypeRegistry, Value};
