//! Executor overlay: batches, scoped allocation, lifecycle dispatch, and the
//! hook seam toward the host engine.

mod batch;
mod dispatch;
mod hooks;
mod region;
mod scan;

pub use batch::{ColumnBuffer, TupleBatch};
pub use dispatch::{
    ExecutionContext, ExecutionRole, HostEngine, NodeLifecycleDispatcher, NodePhase, NoopHost,
    ProduceResult, VectorizedState,
};
pub use hooks::{
    overlay_hooks, CheckPlanHook, EndHook, HookGuard, HookRegistry, HookTable, InitHook,
    ProduceHook,
};
pub use region::{AllocationAccount, ScopedAllocationRegion};
pub use scan::{fill_batch, MemRowSource, RowSource};
