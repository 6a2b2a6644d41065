//! Tuple descriptors with two-phase type tags.
//!
//! A column is tagged with a placeholder type only while batch kernels
//! operate on it. The tag is converted to the native type exactly once, at
//! the backport boundary ([`TypeRegistry::backport_descriptor`]), before the
//! descriptor is visible to any non-vectorized consumer.
//!
//! [`TypeRegistry::backport_descriptor`]: crate::types::TypeRegistry::backport_descriptor

use serde::{Deserialize, Serialize};

use crate::types::{NativeTypeId, PhysicalLayout, PlaceholderTypeId};

/// Which phase a column's type tag is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// Internal kernel-selection tag; never exposed to row-engine consumers.
    Placeholder(PlaceholderTypeId),
    /// Public native tag, valid outside the vectorized boundary.
    Native(NativeTypeId),
}

impl TypeTag {
    /// Returns the placeholder id, if the tag is still in the internal phase.
    #[must_use]
    pub fn as_placeholder(&self) -> Option<PlaceholderTypeId> {
        match self {
            TypeTag::Placeholder(id) => Some(*id),
            TypeTag::Native(_) => None,
        }
    }

    /// Returns the native id, if the tag has been backported.
    #[must_use]
    pub fn as_native(&self) -> Option<NativeTypeId> {
        match self {
            TypeTag::Native(id) => Some(*id),
            TypeTag::Placeholder(_) => None,
        }
    }
}

/// Metadata for one attribute of a tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMeta {
    /// Attribute name.
    pub name: String,
    /// Current type tag (placeholder or native).
    pub tag: TypeTag,
    /// Physical layout for the current tag.
    pub layout: PhysicalLayout,
}

impl AttributeMeta {
    /// Creates an attribute still tagged with a placeholder type.
    #[must_use]
    pub fn placeholder(name: impl Into<String>, id: PlaceholderTypeId, layout: PhysicalLayout) -> Self {
        AttributeMeta {
            name: name.into(),
            tag: TypeTag::Placeholder(id),
            layout,
        }
    }

    /// Creates an attribute tagged with a native type.
    #[must_use]
    pub fn native(name: impl Into<String>, id: NativeTypeId, layout: PhysicalLayout) -> Self {
        AttributeMeta {
            name: name.into(),
            tag: TypeTag::Native(id),
            layout,
        }
    }
}

/// Ordered attribute metadata for one tuple shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleDescriptor {
    attrs: Vec<AttributeMeta>,
}

impl TupleDescriptor {
    /// Creates a descriptor from attribute metadata.
    #[must_use]
    pub fn new(attrs: Vec<AttributeMeta>) -> Self {
        TupleDescriptor { attrs }
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    /// Returns the attribute metadata.
    #[must_use]
    pub fn attrs(&self) -> &[AttributeMeta] {
        &self.attrs
    }

    /// Mutable attribute metadata, for in-place backporting.
    pub(crate) fn attrs_mut(&mut self) -> &mut [AttributeMeta] {
        &mut self.attrs
    }

    /// Returns true once every attribute carries a native tag.
    #[must_use]
    pub fn is_backported(&self) -> bool {
        self.attrs.iter().all(|a| a.tag.as_native().is_some())
    }

    /// Physical layouts of all attributes, in order.
    #[must_use]
    pub fn layouts(&self) -> Vec<PhysicalLayout> {
        self.attrs.iter().map(|a| a.layout).collect()
    }
}
