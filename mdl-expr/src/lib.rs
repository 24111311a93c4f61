//! MDL Expression IR
//!
//! This crate defines the intermediate representation of compiled material
//! expressions: the expression nodes, the named containers holding call
//! arguments and annotations, and the factory that creates, clones,
//! compares, serializes and dumps them.
//!
//! Nodes refer to other database objects only through `Tag`s. Values and
//! types come from an external value system, reached through the
//! `ValueFactory` the expression factory is built with.

pub mod annotation;
pub mod config;
pub mod expression;
pub mod factory;
pub mod list;
mod sync;

#[cfg(test)]
mod tests;

pub use annotation::{Annotation, AnnotationBlock, AnnotationBlockRef, AnnotationList, AnnotationRef};
pub use config::{ConfigError, FactoryConfig};
pub use expression::{
    Expression, ExpressionCall, ExpressionConstant, ExpressionDirectCall, ExpressionKind,
    ExpressionParameter, ExpressionRef, ExpressionTemporary,
};
pub use factory::{ExpressionFactory, MAX_NESTING};
pub use list::ExpressionList;
pub use mdl_common::{ExprError, SerialError, Tag, Transaction};
