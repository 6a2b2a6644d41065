//! Bounded-capacity columnar tuple batches.

use std::sync::Arc;

use crate::executor::region::AllocationAccount;
use crate::types::{PhysicalLayout, Value};

/// One column's worth of values, reserved up front for the batch capacity.
#[derive(Debug)]
pub struct ColumnBuffer {
    layout: PhysicalLayout,
    values: Vec<Value>,
}

impl ColumnBuffer {
    fn with_capacity(layout: PhysicalLayout, capacity: usize) -> Self {
        ColumnBuffer {
            layout,
            values: Vec::with_capacity(capacity),
        }
    }

    /// The native physical layout this buffer was sized with.
    #[must_use]
    pub fn layout(&self) -> PhysicalLayout {
        self.layout
    }

    /// Number of values currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the buffer holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row index.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }
}

/// Fixed-capacity columnar buffer for one execution step's worth of rows.
///
/// Exactly two batches exist per vectorized node (source side and result
/// side), both created inside a
/// [`ScopedAllocationRegion`](crate::executor::ScopedAllocationRegion) during
/// init and destroyed during end. Destruction is idempotent and safe on a
/// never-allocated batch.
#[derive(Debug, Default)]
pub struct TupleBatch {
    capacity: usize,
    row_count: usize,
    columns: Vec<ColumnBuffer>,
    account: Option<Arc<AllocationAccount>>,
    reserved_bytes: usize,
    destroyed: bool,
}

impl TupleBatch {
    /// A never-allocated batch: zero columns, zero capacity, no account.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn allocate(
        layouts: &[PhysicalLayout],
        capacity: usize,
        account: Arc<AllocationAccount>,
        reserved_bytes: usize,
    ) -> Self {
        TupleBatch {
            capacity,
            row_count: 0,
            columns: layouts
                .iter()
                .map(|layout| ColumnBuffer::with_capacity(*layout, capacity))
                .collect(),
            account: Some(account),
            reserved_bytes,
            destroyed: false,
        }
    }

    /// Maximum number of rows the batch can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of rows currently held. Always `<= capacity()`.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the batch holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns true if the batch is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.row_count >= self.capacity
    }

    /// Column buffer by index.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ColumnBuffer> {
        self.columns.get(index)
    }

    /// Value at `(row, column)`.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// Bytes attributed to this batch's allocation.
    #[must_use]
    pub fn reserved_bytes(&self) -> usize {
        self.reserved_bytes
    }

    /// Appends one row across all columns.
    ///
    /// # Panics
    ///
    /// Pushing past capacity, appending to a destroyed batch, or supplying
    /// the wrong arity is a contract violation by the caller, not a runtime
    /// condition, and panics.
    pub fn append_row(&mut self, row: &[Value]) {
        assert!(!self.destroyed, "append_row on a destroyed tuple batch");
        assert!(
            self.row_count < self.capacity,
            "tuple batch overflow: capacity {}",
            self.capacity
        );
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row arity does not match batch column count"
        );
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value.clone());
        }
        self.row_count += 1;
    }

    /// Resets `rows()` to zero without releasing buffers, so they can be
    /// reused across production calls.
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.values.clear();
        }
        self.row_count = 0;
    }

    /// Releases all column buffers and the allocation charge, exactly once.
    ///
    /// Safe to call on an already-destroyed or never-allocated batch.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.columns = Vec::new();
        self.row_count = 0;
        self.capacity = 0;
        if let Some(account) = self.account.take() {
            account.release(self.reserved_bytes);
        }
    }

    /// Returns true once the batch has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Drop for TupleBatch {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ScopedAllocationRegion;

    fn small_batch(capacity: usize) -> TupleBatch {
        let region = ScopedAllocationRegion::enter("test", 0);
        region
            .create_batch(
                &[PhysicalLayout::fixed(8, 8), PhysicalLayout::variable()],
                capacity,
            )
            .unwrap()
    }

    #[test]
    fn test_fresh_batch_is_empty() {
        let batch = small_batch(4);
        assert_eq!(batch.rows(), 0);
        assert_eq!(batch.capacity(), 4);
        assert_eq!(batch.column_count(), 2);
        assert!(batch.is_empty());
        assert!(!batch.is_full());
    }

    #[test]
    fn test_append_and_read() {
        let mut batch = small_batch(4);
        batch.append_row(&[Value::Int64(1), Value::Text("one".into())]);
        batch.append_row(&[Value::Int64(2), Value::Text("two".into())]);

        assert_eq!(batch.rows(), 2);
        assert_eq!(batch.value(0, 0), Some(&Value::Int64(1)));
        assert_eq!(batch.value(1, 1), Some(&Value::Text("two".into())));
        assert_eq!(batch.value(2, 0), None);
    }

    #[test]
    #[should_panic(expected = "tuple batch overflow")]
    fn test_append_past_capacity_panics() {
        let mut batch = small_batch(1);
        batch.append_row(&[Value::Int64(1), Value::Null]);
        batch.append_row(&[Value::Int64(2), Value::Null]);
    }

    #[test]
    #[should_panic(expected = "row arity")]
    fn test_wrong_arity_panics() {
        let mut batch = small_batch(4);
        batch.append_row(&[Value::Int64(1)]);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut batch = small_batch(2);
        batch.append_row(&[Value::Int64(1), Value::Null]);
        batch.clear();
        assert_eq!(batch.rows(), 0);
        assert_eq!(batch.capacity(), 2);
        batch.append_row(&[Value::Int64(2), Value::Null]);
        assert_eq!(batch.rows(), 1);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let region = ScopedAllocationRegion::enter("test", 0);
        let mut batch = region
            .create_batch(&[PhysicalLayout::fixed(4, 4)], 8)
            .unwrap();
        let account = region.account();

        batch.destroy();
        assert!(batch.is_destroyed());
        assert_eq!(account.outstanding(), 0);

        // second destroy must not release again
        batch.destroy();
        assert_eq!(account.outstanding(), 0);
    }

    #[test]
    fn test_destroy_never_allocated_batch() {
        let mut batch = TupleBatch::empty();
        batch.destroy();
        batch.destroy();
        assert_eq!(batch.rows(), 0);
        assert_eq!(batch.column_count(), 0);
    }

    #[test]
    fn test_drop_releases_account() {
        let region = ScopedAllocationRegion::enter("test", 0);
        let account = region.account();
        {
            let _batch = region
                .create_batch(&[PhysicalLayout::fixed(4, 4)], 8)
                .unwrap();
            assert_eq!(account.outstanding(), 32);
        }
        assert_eq!(account.outstanding(), 0);
    }
}
