//! Overlay configuration.

use serde::{Deserialize, Serialize};

/// Smallest accepted batch capacity.
pub const MIN_BATCH_CAPACITY: usize = 1;
/// Largest accepted batch capacity.
pub const MAX_BATCH_CAPACITY: usize = 4096;
/// Default batch capacity (rows per batch).
pub const DEFAULT_BATCH_CAPACITY: usize = 1024;

/// Configuration for the vectorized-execution overlay.
///
/// Values are threaded through the [`ExecutionContext`](crate::executor::ExecutionContext)
/// rather than held in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VexecConfig {
    /// Whether vectorized execution is active at all.
    pub enabled: bool,
    /// Number of rows per batch, always within `[MIN_BATCH_CAPACITY, MAX_BATCH_CAPACITY]`.
    batch_capacity: usize,
    /// Per-node allocation limit in bytes (0 = unlimited).
    pub memory_limit: usize,
}

impl Default for VexecConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            memory_limit: 0,
        }
    }
}

impl VexecConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch capacity, clamping to `[MIN_BATCH_CAPACITY, MAX_BATCH_CAPACITY]`.
    ///
    /// Out-of-range requests are never accepted as-is.
    #[must_use]
    pub fn with_batch_capacity(mut self, batch_capacity: usize) -> Self {
        self.batch_capacity = batch_capacity.clamp(MIN_BATCH_CAPACITY, MAX_BATCH_CAPACITY);
        self
    }

    /// Enables or disables vectorized execution.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the per-node allocation limit in bytes (0 = unlimited).
    #[must_use]
    pub fn with_memory_limit(mut self, memory_limit: usize) -> Self {
        self.memory_limit = memory_limit;
        self
    }

    /// Returns the configured batch capacity.
    #[must_use]
    pub fn batch_capacity(&self) -> usize {
        self.batch_capacity
    }
}
