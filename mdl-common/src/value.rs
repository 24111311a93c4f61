//! Contracts of the value and type providers
//!
//! Values and types are built, owned and interpreted elsewhere. The IR only
//! holds shared references to them and asks the value factory whenever it
//! needs to order, persist or print one.

use crate::error::SerialError;
use crate::serial::{Deserializer, Serializer};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Shared reference to an immutable type
pub type TypeRef = Arc<dyn Type>;

/// Shared reference to a value
pub type ValueRef = Arc<dyn Value>;

/// An already constructed, immutable type
pub trait Type: fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Approximate size in bytes, including owned heap data
    fn memory_consumption(&self) -> usize;
}

/// An already constructed value
pub trait Value: fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Approximate size in bytes, including owned heap data
    fn memory_consumption(&self) -> usize;
}

/// The value/type system as seen by the expression factory
pub trait ValueFactory: Send + Sync {
    /// Type of a value
    fn type_of(&self, value: &dyn Value) -> TypeRef;

    /// Total order over types
    fn compare_types(&self, lhs: &dyn Type, rhs: &dyn Type) -> Ordering;

    /// Total order over values
    fn compare_values(&self, lhs: &dyn Value, rhs: &dyn Value) -> Ordering;

    fn serialize_type(&self, serializer: &mut dyn Serializer, ty: &dyn Type);

    fn deserialize_type(&self, deserializer: &mut dyn Deserializer) -> Result<TypeRef, SerialError>;

    fn serialize_value(&self, serializer: &mut dyn Serializer, value: &dyn Value);

    fn deserialize_value(&self, deserializer: &mut dyn Deserializer) -> Result<ValueRef, SerialError>;

    /// Human readable rendering of a type for dumps
    fn dump_type(&self, ty: &dyn Type) -> String {
        ty.to_string()
    }

    /// Human readable rendering of a value for dumps
    fn dump_value(&self, value: &dyn Value) -> String {
        value.to_string()
    }
}
