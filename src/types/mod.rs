//! Type identifiers, physical layouts, runtime values, and the
//! placeholder-to-native type registry.

mod descriptor;
mod layout;
mod registry;
mod value;

pub use descriptor::{AttributeMeta, TupleDescriptor, TypeTag};
pub use layout::{NativeTypeId, PhysicalLayout, PlaceholderTypeId, StorageClass};
pub use registry::TypeRegistry;
pub use value::Value;
