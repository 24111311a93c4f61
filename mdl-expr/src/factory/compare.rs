//! Structural comparison
//!
//! A total order over expression trees, used for canonicalization and as a
//! cache key. Nodes order by kind first, then by type, then by their
//! payload fields. Lists order by size, then entry by entry (name first,
//! then the expression).

use super::ExpressionFactory;
use crate::expression::Expression;
use crate::list::ExpressionList;
use std::cmp::Ordering;

impl ExpressionFactory {
    pub fn compare(&self, lhs: &Expression, rhs: &Expression) -> Ordering {
        if std::ptr::eq(lhs, rhs) {
            return Ordering::Equal;
        }

        let by_kind = lhs.kind().cmp(&rhs.kind());
        if by_kind.is_ne() {
            return by_kind;
        }

        let by_type = self
            .value_factory
            .compare_types(&*lhs.get_type(), &*rhs.get_type());
        if by_type.is_ne() {
            return by_type;
        }

        match (lhs, rhs) {
            (Expression::Constant(a), Expression::Constant(b)) => self
                .value_factory
                .compare_values(&*a.get_value(), &*b.get_value()),
            (Expression::Call(a), Expression::Call(b)) => a.get_call().cmp(&b.get_call()),
            (Expression::Parameter(a), Expression::Parameter(b)) => a.get_index().cmp(&b.get_index()),
            (Expression::DirectCall(a), Expression::DirectCall(b)) => a
                .get_definition()
                .cmp(&b.get_definition())
                .then_with(|| self.compare_lists(&a.get_arguments(), &b.get_arguments())),
            (Expression::Temporary(a), Expression::Temporary(b)) => a.get_index().cmp(&b.get_index()),
            // kinds are equal here, so the arms above are exhaustive
            _ => by_kind,
        }
    }

    pub fn compare_lists(&self, lhs: &ExpressionList, rhs: &ExpressionList) -> Ordering {
        if std::ptr::eq(lhs, rhs) {
            return Ordering::Equal;
        }

        let lhs = lhs.entries();
        let rhs = rhs.entries();

        let by_size = lhs.len().cmp(&rhs.len());
        if by_size.is_ne() {
            return by_size;
        }

        for ((lhs_name, lhs_expr), (rhs_name, rhs_expr)) in lhs.iter().zip(rhs.iter()) {
            let by_name = lhs_name.cmp(rhs_name);
            if by_name.is_ne() {
                return by_name;
            }

            let by_expr = self.compare(lhs_expr, rhs_expr);
            if by_expr.is_ne() {
                return by_expr;
            }
        }

        Ordering::Equal
    }
}
