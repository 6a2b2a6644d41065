//! Scoped allocation accounting for node initialization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, VexecError};
use crate::executor::batch::TupleBatch;
use crate::types::PhysicalLayout;

/// Attribution counter shared between a region and every batch it creates.
///
/// Outlives the region (batches hold an `Arc` to it), so outstanding bytes
/// stay observable after init has finished and after node teardown.
#[derive(Debug)]
pub struct AllocationAccount {
    label: String,
    bytes: AtomicUsize,
}

impl AllocationAccount {
    fn new(label: String) -> Self {
        AllocationAccount {
            label,
            bytes: AtomicUsize::new(0),
        }
    }

    /// Returns the account label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bytes currently attributed and not yet released.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.bytes.load(Ordering::Acquire)
    }

    pub(crate) fn charge(&self, bytes: usize) {
        self.bytes.fetch_add(bytes, Ordering::AcqRel);
    }

    pub(crate) fn release(&self, bytes: usize) {
        self.bytes.fetch_sub(bytes, Ordering::AcqRel);
    }
}

/// Allocation context entered for the duration of node initialization.
///
/// Everything allocated through the region is attributed to its account.
/// Exiting happens on every path, including early failure: batches not yet
/// handed off release their charge when dropped, so a failed init leaves
/// nothing outstanding.
#[derive(Debug)]
pub struct ScopedAllocationRegion {
    account: Arc<AllocationAccount>,
    limit: usize,
}

impl ScopedAllocationRegion {
    /// Enters a new region with the given byte limit (0 = unlimited).
    #[must_use]
    pub fn enter(label: impl Into<String>, limit: usize) -> Self {
        ScopedAllocationRegion {
            account: Arc::new(AllocationAccount::new(label.into())),
            limit,
        }
    }

    /// Returns the shared account.
    #[must_use]
    pub fn account(&self) -> Arc<AllocationAccount> {
        Arc::clone(&self.account)
    }

    /// Bytes attributed so far.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.account.outstanding()
    }

    /// Creates a batch with one buffer per layout, reserved for `capacity`
    /// elements, charging the account.
    ///
    /// # Errors
    ///
    /// Returns [`VexecError::AllocationFailure`] when the charge would exceed
    /// the region limit. Fatal: callers abort node construction.
    pub fn create_batch(&self, layouts: &[PhysicalLayout], capacity: usize) -> Result<TupleBatch> {
        let requested: usize = layouts
            .iter()
            .map(|layout| layout.width_estimate() * capacity)
            .sum();
        let outstanding = self.account.outstanding();
        if self.limit > 0 && outstanding + requested > self.limit {
            return Err(VexecError::AllocationFailure {
                requested,
                outstanding,
                limit: self.limit,
            });
        }
        self.account.charge(requested);
        Ok(TupleBatch::allocate(
            layouts,
            capacity,
            Arc::clone(&self.account),
            requested,
        ))
    }
}

impl Drop for ScopedAllocationRegion {
    fn drop(&mut self) {
        debug!(
            label = self.account.label(),
            outstanding = self.account.outstanding(),
            "allocation region exited"
        );
    }
}
