//! Batch production for scan nodes.

use std::collections::VecDeque;

use crate::error::Result;
use crate::executor::batch::TupleBatch;
use crate::types::Value;

/// Pull-based row supplier for a scan node, one row per call.
///
/// Implemented by the host's storage layer; [`MemRowSource`] is the
/// in-memory implementation used by tests and demos.
pub trait RowSource {
    /// Returns the next row, or `None` once the source is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>>;
}

/// In-memory row source.
#[derive(Debug, Default)]
pub struct MemRowSource {
    rows: VecDeque<Vec<Value>>,
}

impl MemRowSource {
    /// Creates a source over the given rows.
    #[must_use]
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        MemRowSource { rows: rows.into() }
    }

    /// Rows not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemRowSource {
    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        Ok(self.rows.pop_front())
    }
}

/// Clears the batch, then appends rows from the source until the batch is
/// full or the source is exhausted. Returns the number of rows appended;
/// zero means end-of-data.
pub fn fill_batch(source: &mut dyn RowSource, batch: &mut TupleBatch) -> Result<usize> {
    batch.clear();
    while !batch.is_full() {
        match source.next_row()? {
            Some(row) => batch.append_row(&row),
            None => break,
        }
    }
    Ok(batch.rows())
}
