//! Node lifecycle dispatch: Init / Produce / End with row-at-a-time fallback.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::VexecConfig;
use crate::error::{Result, VexecError};
use crate::executor::batch::TupleBatch;
use crate::executor::region::{AllocationAccount, ScopedAllocationRegion};
use crate::executor::scan::{fill_batch, RowSource};
use crate::plan::{is_vectorizable, NodeId, NodeKind, PlanTree};
use crate::types::{TupleDescriptor, TypeRegistry};

/// Role of the executing process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionRole {
    /// Plans and distributes work; never executes scans locally.
    Coordinating,
    /// Executes scans.
    Worker,
}

/// Per-query execution context threaded through the dispatcher.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Role of this process.
    pub role: ExecutionRole,
    /// Overlay configuration.
    pub config: VexecConfig,
    /// Placeholder-to-native type mappings.
    pub registry: Arc<TypeRegistry>,
}

impl ExecutionContext {
    /// Creates a context.
    #[must_use]
    pub fn new(role: ExecutionRole, config: VexecConfig, registry: Arc<TypeRegistry>) -> Self {
        ExecutionContext {
            role,
            config,
            registry,
        }
    }
}

/// Lifecycle phase of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    /// Init has run.
    Initialized,
    /// At least one Produce call has run.
    Producing,
    /// End has run.
    Ended,
}

/// Per-node vectorization metadata, index-parallel to the plan arena.
///
/// The parent back-reference is a plain index, read-only, never used to
/// free ancestor state.
#[derive(Debug)]
pub struct VectorizedState {
    /// Whether this node runs the batch path.
    pub vectorized: bool,
    /// Enclosing node, if any.
    pub parent: Option<NodeId>,
    phase: NodePhase,
    source_batch: Option<TupleBatch>,
    result_batch: Option<TupleBatch>,
    result_descriptor: Option<TupleDescriptor>,
    account: Option<Arc<AllocationAccount>>,
}

impl VectorizedState {
    fn row_at_a_time() -> Self {
        VectorizedState {
            vectorized: false,
            parent: None,
            phase: NodePhase::Initialized,
            source_batch: None,
            result_batch: None,
            result_descriptor: None,
            account: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> NodePhase {
        self.phase
    }

    /// Source-side batch, if the node is vectorized.
    #[must_use]
    pub fn source_batch(&self) -> Option<&TupleBatch> {
        self.source_batch.as_ref()
    }

    /// Result-side batch, if the node is vectorized.
    #[must_use]
    pub fn result_batch(&self) -> Option<&TupleBatch> {
        self.result_batch.as_ref()
    }
}

/// Outcome of one Produce call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProduceResult {
    /// The result batch now holds this many rows (at most the capacity).
    Rows(usize),
    /// The scan's source is exhausted; the result batch is empty.
    Exhausted,
    /// Not a vectorized node; the host's native per-row path applies.
    Unhandled,
}

/// Native per-row teardown seam exposed by the host engine.
///
/// The dispatcher delegates End for non-vectorized kinds here and reports
/// "handled" only when the delegation itself completed the teardown.
pub trait HostEngine {
    /// Tears down a node the native way. Returns true when teardown is
    /// complete and the host should skip its own end routine.
    fn end_node(&mut self, node: NodeId, kind: NodeKind) -> Result<bool>;
}

/// Host that never completes teardown itself, leaving it to the engine.
#[derive(Debug, Default)]
pub struct NoopHost;

impl HostEngine for NoopHost {
    fn end_node(&mut self, _node: NodeId, _kind: NodeKind) -> Result<bool> {
        Ok(false)
    }
}

/// State machine coordinating batches, type backporting, and classifier
/// decisions over one plan tree.
pub struct NodeLifecycleDispatcher {
    tree: PlanTree,
    ctx: ExecutionContext,
    states: Vec<Option<VectorizedState>>,
    sources: Vec<Option<Box<dyn RowSource>>>,
    host: Box<dyn HostEngine>,
}

impl NodeLifecycleDispatcher {
    /// Creates a dispatcher over a plan tree.
    #[must_use]
    pub fn new(tree: PlanTree, ctx: ExecutionContext) -> Self {
        let len = tree.len();
        NodeLifecycleDispatcher {
            tree,
            ctx,
            states: (0..len).map(|_| None).collect(),
            sources: (0..len).map(|_| None).collect(),
            host: Box::new(NoopHost),
        }
    }

    /// Replaces the host-engine teardown seam.
    #[must_use]
    pub fn with_host(mut self, host: Box<dyn HostEngine>) -> Self {
        self.host = host;
        self
    }

    /// Attaches the row supplier for a scan node. Last writer wins.
    pub fn bind_source(&mut self, node: NodeId, source: Box<dyn RowSource>) {
        self.sources[node.0] = Some(source);
    }

    /// The plan tree under execution.
    #[must_use]
    pub fn tree(&self) -> &PlanTree {
        &self.tree
    }

    /// The execution context.
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Vectorized state of a node, once initialized.
    #[must_use]
    pub fn state(&self, node: NodeId) -> Option<&VectorizedState> {
        self.states[node.0].as_ref()
    }

    /// The node's result-side batch, if vectorized.
    #[must_use]
    pub fn result_batch(&self, node: NodeId) -> Option<&TupleBatch> {
        self.state(node).and_then(VectorizedState::result_batch)
    }

    /// The externally visible (backported, native-typed) result descriptor.
    #[must_use]
    pub fn result_descriptor(&self, node: NodeId) -> Option<&TupleDescriptor> {
        self.state(node).and_then(|s| s.result_descriptor.as_ref())
    }

    /// Bytes still attributed to the node's batches.
    #[must_use]
    pub fn outstanding_bytes(&self, node: NodeId) -> usize {
        self.state(node)
            .and_then(|s| s.account.as_ref())
            .map_or(0, |account| account.outstanding())
    }

    /// Initializes a node.
    ///
    /// Children must already be initialized (the engine walks the tree
    /// bottom-up); their parent back-references are linked here. In
    /// coordinating role, or when the config disables vectorization, or when
    /// the planner marked the node ineligible, or when the kind has no batch
    /// implementation, the node is left in row-at-a-time configuration with
    /// zero batch allocations. Otherwise a
    /// [`ScopedAllocationRegion`] is entered, the two batches are created,
    /// and the result descriptor is backported to native types.
    ///
    /// # Errors
    ///
    /// [`VexecError::AllocationFailure`] and
    /// [`VexecError::TypeMappingNotFound`] abort node construction and
    /// propagate; [`VexecError::StateError`] on double init.
    pub fn init(&mut self, node: NodeId) -> Result<()> {
        if self.states[node.0].is_some() {
            return Err(VexecError::StateError(format!(
                "node {node} initialized twice"
            )));
        }

        let kind = self.tree.node(node).kind;
        let hint = self.tree.node(node).vectorize_hint;

        for child in self.tree.children(node).into_iter().flatten() {
            if let Some(child_state) = self.states[child.0].as_mut() {
                child_state.parent = Some(node);
            }
        }

        let mut state = VectorizedState::row_at_a_time();
        state.vectorized = hint;

        if self.ctx.role == ExecutionRole::Coordinating {
            state.vectorized = false;
            debug!(%node, ?kind, "coordinating role, node stays row-at-a-time");
        } else if state.vectorized && self.ctx.config.enabled && is_vectorizable(kind) {
            let capacity = self.ctx.config.batch_capacity();
            let region =
                ScopedAllocationRegion::enter(format!("node {node}"), self.ctx.config.memory_limit);

            // Native layouts come from backporting; both batches are sized
            // with them, never with the placeholder layouts.
            let mut descriptor = self.tree.node(node).descriptor.clone();
            self.ctx.registry.backport_descriptor(&mut descriptor)?;
            let layouts = descriptor.layouts();

            let source_batch = region.create_batch(&layouts, capacity)?;
            let result_batch = region.create_batch(&layouts, capacity)?;

            state.source_batch = Some(source_batch);
            state.result_batch = Some(result_batch);
            state.result_descriptor = Some(descriptor);
            state.account = Some(region.account());
            debug!(%node, ?kind, capacity, "vectorized node initialized");
        } else {
            // Designed degradation, not a failure.
            state.vectorized = false;
            debug!(%node, ?kind, "no batch implementation, falling back to row path");
        }

        self.states[node.0] = Some(state);
        Ok(())
    }

    /// Produces at most one batch.
    ///
    /// Vectorized scans fill the result batch from the bound [`RowSource`]
    /// up to capacity; an empty fill reports [`ProduceResult::Exhausted`].
    /// Everything else declines with [`ProduceResult::Unhandled`] and the
    /// host's per-row path runs unchanged. Pacing is entirely the caller's:
    /// one call, at most one batch.
    ///
    /// # Errors
    ///
    /// [`VexecError::StateError`] when called before init or after end;
    /// [`VexecError::MissingRowSource`] for a vectorized scan with no bound
    /// source; source errors propagate.
    pub fn produce(&mut self, node: NodeId) -> Result<ProduceResult> {
        let kind = self.tree.node(node).kind;
        let state = self.states[node.0]
            .as_mut()
            .ok_or_else(|| VexecError::StateError(format!("produce on {node} before init")))?;
        if state.phase == NodePhase::Ended {
            return Err(VexecError::StateError(format!(
                "produce on {node} after end"
            )));
        }

        if !state.vectorized || !is_vectorizable(kind) {
            return Ok(ProduceResult::Unhandled);
        }

        let batch = state
            .result_batch
            .as_mut()
            .ok_or_else(|| VexecError::StateError(format!("{node} has no result batch")))?;
        let source = self.sources[node.0]
            .as_deref_mut()
            .ok_or(VexecError::MissingRowSource(node))?;

        let rows = fill_batch(source, batch)?;
        state.phase = NodePhase::Producing;
        if rows == 0 {
            trace!(%node, "scan exhausted");
            Ok(ProduceResult::Exhausted)
        } else {
            trace!(%node, rows, "produced batch");
            Ok(ProduceResult::Rows(rows))
        }
    }

    /// Ends a node.
    ///
    /// Coordinating role declines (`false`). Vectorized nodes destroy both
    /// batches (idempotent, safe even if never filled) and report handled.
    /// Everything else delegates to the host's native end routine and
    /// reports handled only if that delegation completed the teardown.
    ///
    /// # Errors
    ///
    /// [`VexecError::StateError`] when called before init; host errors
    /// propagate.
    pub fn end(&mut self, node: NodeId) -> Result<bool> {
        if self.ctx.role == ExecutionRole::Coordinating {
            return Ok(false);
        }

        let kind = self.tree.node(node).kind;
        let state = self.states[node.0]
            .as_mut()
            .ok_or_else(|| VexecError::StateError(format!("end on {node} before init")))?;

        if state.vectorized {
            if let Some(batch) = state.result_batch.as_mut() {
                batch.destroy();
            }
            if let Some(batch) = state.source_batch.as_mut() {
                batch.destroy();
            }
            state.phase = NodePhase::Ended;
            debug!(%node, ?kind, "vectorized node ended, batches destroyed");
            Ok(true)
        } else {
            let handled = self.host.end_node(node, kind)?;
            state.phase = NodePhase::Ended;
            debug!(%node, ?kind, handled, "delegated end to host");
            Ok(handled)
        }
    }
}
