//! Placeholder-to-native type registry and descriptor backporting.

use std::collections::HashMap;

use crate::error::{Result, VexecError};
use crate::types::{NativeTypeId, PhysicalLayout, PlaceholderTypeId, TupleDescriptor, TypeTag};

/// Read-only mapping from placeholder type ids to native type ids plus
/// physical layout.
///
/// Populated once at startup and shared immutably (typically behind an
/// `Arc`) for the life of the process.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    map: HashMap<PlaceholderTypeId, (NativeTypeId, PhysicalLayout)>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a placeholder-to-native mapping. Last writer wins.
    pub fn register(
        &mut self,
        placeholder: PlaceholderTypeId,
        native: NativeTypeId,
        layout: PhysicalLayout,
    ) {
        self.map.insert(placeholder, (native, layout));
    }

    /// Returns the number of registered mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no mappings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up the native type and layout for a placeholder type.
    ///
    /// # Errors
    ///
    /// Returns [`VexecError::TypeMappingNotFound`] when the placeholder is
    /// unregistered. Fatal for callers: a scan's result shape is undefined
    /// without the mapping.
    pub fn native_type(
        &self,
        placeholder: PlaceholderTypeId,
    ) -> Result<(NativeTypeId, PhysicalLayout)> {
        self.map
            .get(&placeholder)
            .copied()
            .ok_or(VexecError::TypeMappingNotFound(placeholder))
    }

    /// Non-failing probe: the native id for a placeholder, or `None` when
    /// unregistered.
    #[must_use]
    pub fn native_type_or_invalid(&self, placeholder: PlaceholderTypeId) -> Option<NativeTypeId> {
        self.map.get(&placeholder).map(|(native, _)| *native)
    }

    /// Backports a descriptor in place: every placeholder-tagged attribute
    /// gets its native type id and native physical layout.
    ///
    /// Idempotent: attributes already carrying a native tag are untouched, so
    /// a second application is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`VexecError::TypeMappingNotFound`] for the first attribute
    /// whose placeholder type is unregistered; the descriptor may then be
    /// partially backported and must not be exposed.
    pub fn backport_descriptor(&self, descriptor: &mut TupleDescriptor) -> Result<()> {
        for attr in descriptor.attrs_mut() {
            if let TypeTag::Placeholder(placeholder) = attr.tag {
                let (native, layout) = self.native_type(placeholder)?;
                attr.tag = TypeTag::Native(native);
                attr.layout = layout;
            }
        }
        Ok(())
    }
}
