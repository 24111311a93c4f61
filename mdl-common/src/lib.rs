//! MDL Expression IR - Common Types and Contracts
//! 
//! This crate contains the vocabulary shared by the expression IR and its
//! tools: database tags and transactions, the error/status taxonomy, the
//! byte-stream serializer contracts, and the contracts of the external
//! value/type providers.

pub mod basic;
pub mod error;
pub mod serial;
pub mod tag;
pub mod value;

pub use error::{status, ExprError, SerialError};
pub use serial::{BufferDeserializer, BufferSerializer, Deserializer, Serializer};
pub use tag::{Tag, TagNames, Transaction};
pub use value::{Type, TypeRef, Value, ValueFactory, ValueRef};
