//! The expression factory
//!
//! The factory is the only place nodes are constructed. Besides creation it
//! clones, orders, persists and dumps expression trees. It holds nothing
//! but the value factory and its configuration, so one instance can be used
//! from several threads at once.
//!
//! ## Layout
//!
//! - `clone` - deep copies of structure, shallow copies of values/types
//! - `compare` - structural total order
//! - `serial` - byte-stream framing
//! - `dump` - human readable rendering

mod clone;
mod compare;
mod dump;
mod serial;

pub use serial::MAX_NESTING;

use crate::annotation::{Annotation, AnnotationBlock, AnnotationList};
use crate::config::FactoryConfig;
use crate::expression::{
    Expression, ExpressionCall, ExpressionConstant, ExpressionDirectCall, ExpressionParameter,
    ExpressionRef, ExpressionTemporary,
};
use crate::list::ExpressionList;
use log::{trace, warn};
use mdl_common::{ExprError, Tag, TypeRef, ValueFactory, ValueRef};
use std::sync::Arc;

/// Creates, clones, compares, serializes and dumps expressions
pub struct ExpressionFactory {
    value_factory: Arc<dyn ValueFactory>,
    config: FactoryConfig,
}

impl ExpressionFactory {
    pub fn new(value_factory: Arc<dyn ValueFactory>) -> Self {
        Self::with_config(value_factory, FactoryConfig::default())
    }

    pub fn with_config(value_factory: Arc<dyn ValueFactory>, config: FactoryConfig) -> Self {
        Self {
            value_factory,
            config,
        }
    }

    pub fn get_value_factory(&self) -> Arc<dyn ValueFactory> {
        Arc::clone(&self.value_factory)
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Constant whose type is the type of `value`
    pub fn create_constant(&self, value: ValueRef) -> ExpressionRef {
        let ty = self.value_factory.type_of(&*value);
        trace!("create_constant: {ty} {value}");
        Arc::new(Expression::Constant(ExpressionConstant::new(ty, value)))
    }

    pub fn create_call(&self, ty: TypeRef, tag: Tag) -> Result<ExpressionRef, ExprError> {
        if !tag.is_valid() {
            warn!("create_call: rejected null tag");
            return Err(ExprError::InvalidTag);
        }
        trace!("create_call: {ty} {tag}");
        Ok(Arc::new(Expression::Call(ExpressionCall::new(ty, tag))))
    }

    pub fn create_parameter(&self, ty: TypeRef, index: usize) -> ExpressionRef {
        trace!("create_parameter: {ty} #{index}");
        Arc::new(Expression::Parameter(ExpressionParameter::new(ty, index)))
    }

    /// Direct call; `arguments` is shared, not copied
    pub fn create_direct_call(
        &self,
        ty: TypeRef,
        tag: Tag,
        arguments: Arc<ExpressionList>,
    ) -> Result<ExpressionRef, ExprError> {
        if !tag.is_valid() {
            warn!("create_direct_call: rejected null tag");
            return Err(ExprError::InvalidTag);
        }
        trace!("create_direct_call: {ty} {tag} with {} arguments", arguments.size());
        Ok(Arc::new(Expression::DirectCall(ExpressionDirectCall::new(ty, tag, arguments))))
    }

    pub fn create_temporary(&self, ty: TypeRef, index: usize) -> ExpressionRef {
        trace!("create_temporary: {ty} #{index}");
        Arc::new(Expression::Temporary(ExpressionTemporary::new(ty, index)))
    }

    pub fn create_expression_list(&self) -> Arc<ExpressionList> {
        Arc::new(ExpressionList::new())
    }

    pub fn create_annotation(&self, name: &str, arguments: Arc<ExpressionList>) -> Arc<Annotation> {
        Arc::new(Annotation::new(name, arguments))
    }

    pub fn create_annotation_block(&self) -> Arc<AnnotationBlock> {
        Arc::new(AnnotationBlock::new())
    }

    pub fn create_annotation_list(&self) -> Arc<AnnotationList> {
        Arc::new(AnnotationList::new())
    }
}
