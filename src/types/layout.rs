//! Type identifiers and physical layout metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a placeholder (vectorized) type.
///
/// Placeholder types tag columns only while batch kernels operate on them;
/// they are never exposed past the vectorized/non-vectorized boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderTypeId(pub u32);

/// Identifier of a native (row-engine) type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeTypeId(pub u32);

impl fmt::Display for PlaceholderTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for NativeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// How values of a type are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    /// Inline, fixed-width storage.
    Plain,
    /// Out-of-line or variable-width storage.
    Extended,
}

/// Per-byte reservation estimate for variable-width values.
const VARIABLE_WIDTH_ESTIMATE: usize = 16;

/// Physical layout of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalLayout {
    /// Width in bytes, or `None` for variable-width types.
    pub byte_width: Option<usize>,
    /// Required alignment in bytes.
    pub alignment: usize,
    /// Whether values are passed by value rather than by reference.
    pub pass_by_value: bool,
    /// Storage class.
    pub storage: StorageClass,
}

impl PhysicalLayout {
    /// Creates a fixed-width, plain-storage layout.
    #[must_use]
    pub fn fixed(byte_width: usize, alignment: usize) -> Self {
        PhysicalLayout {
            byte_width: Some(byte_width),
            alignment,
            pass_by_value: byte_width <= 8,
            storage: StorageClass::Plain,
        }
    }

    /// Creates a variable-width, extended-storage layout.
    #[must_use]
    pub fn variable() -> Self {
        PhysicalLayout {
            byte_width: None,
            alignment: 8,
            pass_by_value: false,
            storage: StorageClass::Extended,
        }
    }

    /// Returns whether the layout is fixed-width.
    #[must_use]
    pub fn is_fixed_width(&self) -> bool {
        self.byte_width.is_some()
    }

    /// Bytes to reserve per element when sizing a column buffer.
    #[must_use]
    pub fn width_estimate(&self) -> usize {
        self.byte_width.unwrap_or(VARIABLE_WIDTH_ESTIMATE)
    }
}
