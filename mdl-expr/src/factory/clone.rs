//! Cloning
//!
//! A clone gets fresh nodes and fresh containers, so mutating it never
//! shows through to the original. Values and types are immutable leaves
//! and are shared with the original rather than copied.

use super::ExpressionFactory;
use crate::expression::{
    Expression, ExpressionCall, ExpressionConstant, ExpressionDirectCall, ExpressionParameter,
    ExpressionRef, ExpressionTemporary,
};
use crate::list::ExpressionList;
use log::debug;
use std::sync::Arc;

impl ExpressionFactory {
    pub fn clone_expression(&self, expr: &Expression) -> ExpressionRef {
        let cloned = match expr {
            Expression::Constant(e) => {
                Expression::Constant(ExpressionConstant::new(e.get_type(), e.get_value()))
            }
            Expression::Call(e) => Expression::Call(ExpressionCall::new(e.get_type(), e.get_call())),
            Expression::Parameter(e) => {
                Expression::Parameter(ExpressionParameter::new(e.get_type(), e.get_index()))
            }
            Expression::DirectCall(e) => Expression::DirectCall(ExpressionDirectCall::new(
                e.get_type(),
                e.get_definition(),
                self.clone_list(&e.get_arguments()),
            )),
            Expression::Temporary(e) => {
                Expression::Temporary(ExpressionTemporary::new(e.get_type(), e.get_index()))
            }
        };
        Arc::new(cloned)
    }

    pub fn clone_list(&self, list: &ExpressionList) -> Arc<ExpressionList> {
        debug!("clone_list: {} entries", list.size());
        Arc::new(list.map_children(|expr| self.clone_expression(expr)))
    }
}
