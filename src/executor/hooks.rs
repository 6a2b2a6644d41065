//! Registration seam between the overlay and the host engine.
//!
//! The host dispatches node lifecycle calls through a table of four function
//! slots. With nothing installed every slot is a no-op and the host's
//! built-in per-row dispatch runs unchanged; installing the overlay's hooks
//! routes eligible nodes through the [`NodeLifecycleDispatcher`].

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::executor::dispatch::{NodeLifecycleDispatcher, ProduceResult};
use crate::plan::{is_vectorizable, NodeId, NodeKind};

/// Plan-eligibility check slot.
pub type CheckPlanHook = fn(NodeKind) -> bool;
/// Node-init slot.
pub type InitHook = fn(&mut NodeLifecycleDispatcher, NodeId) -> Result<()>;
/// Node-produce slot.
pub type ProduceHook = fn(&mut NodeLifecycleDispatcher, NodeId) -> Result<ProduceResult>;
/// Node-end slot.
pub type EndHook = fn(&mut NodeLifecycleDispatcher, NodeId) -> Result<bool>;

fn noop_check(_kind: NodeKind) -> bool {
    false
}

fn noop_init(_dispatcher: &mut NodeLifecycleDispatcher, _node: NodeId) -> Result<()> {
    Ok(())
}

fn noop_produce(
    _dispatcher: &mut NodeLifecycleDispatcher,
    _node: NodeId,
) -> Result<ProduceResult> {
    Ok(ProduceResult::Unhandled)
}

fn noop_end(_dispatcher: &mut NodeLifecycleDispatcher, _node: NodeId) -> Result<bool> {
    Ok(false)
}

/// The four dispatch slots.
#[derive(Clone, Copy)]
pub struct HookTable {
    /// Plan-eligibility check.
    pub check_plan: CheckPlanHook,
    /// Node initialization.
    pub init: InitHook,
    /// Batch production.
    pub produce: ProduceHook,
    /// Node termination.
    pub end: EndHook,
}

impl Default for HookTable {
    fn default() -> Self {
        HookTable {
            check_plan: noop_check,
            init: noop_init,
            produce: noop_produce,
            end: noop_end,
        }
    }
}

fn overlay_init(dispatcher: &mut NodeLifecycleDispatcher, node: NodeId) -> Result<()> {
    dispatcher.init(node)
}

fn overlay_produce(
    dispatcher: &mut NodeLifecycleDispatcher,
    node: NodeId,
) -> Result<ProduceResult> {
    dispatcher.produce(node)
}

fn overlay_end(dispatcher: &mut NodeLifecycleDispatcher, node: NodeId) -> Result<bool> {
    dispatcher.end(node)
}

/// The overlay's hook table, wired to the dispatcher and the classifier.
///
/// `check_plan` is the same predicate dispatch consults, so eligibility
/// answers can never diverge between plan time and execution time.
#[must_use]
pub fn overlay_hooks() -> HookTable {
    HookTable {
        check_plan: is_vectorizable,
        init: overlay_init,
        produce: overlay_produce,
        end: overlay_end,
    }
}

/// Registration object owning the dispatch slots for one executor session.
///
/// Install is idempotent: last writer wins, no error conditions. Uninstall
/// resets every slot to a no-op so the host reverts to its built-in per-row
/// dispatch. The host may snapshot the table from other threads, hence the
/// lock.
#[derive(Default)]
pub struct HookRegistry {
    slots: RwLock<HookTable>,
}

impl HookRegistry {
    /// Creates a registry with all slots set to no-ops.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a hook table, replacing whatever was installed before.
    pub fn install(&self, table: HookTable) {
        *self.slots.write() = table;
        debug!("executor hooks installed");
    }

    /// Resets all slots to no-ops.
    pub fn uninstall(&self) {
        *self.slots.write() = HookTable::default();
        debug!("executor hooks uninstalled");
    }

    /// Snapshot of the current table.
    #[must_use]
    pub fn table(&self) -> HookTable {
        *self.slots.read()
    }

    /// Installs a table for the lifetime of the returned guard.
    pub fn install_scoped(&self, table: HookTable) -> HookGuard<'_> {
        self.install(table);
        HookGuard { registry: self }
    }
}

/// RAII handle that uninstalls the hooks when dropped.
pub struct HookGuard<'a> {
    registry: &'a HookRegistry,
}

impl Drop for HookGuard<'_> {
    fn drop(&mut self) {
        self.registry.uninstall();
    }
}
