//! Human readable dumps
//!
//! Every line has the form `<kind> <name>: <type> = <payload>`. Tags are
//! printed by name when the transaction knows one and as `tag <n>`
//! otherwise. `depth` limits how many direct calls are expanded along any
//! path (0 = no limit); a call beyond the limit prints as `target(...)`.

use super::ExpressionFactory;
use crate::annotation::{Annotation, AnnotationBlock, AnnotationList};
use crate::expression::Expression;
use crate::list::ExpressionList;
use mdl_common::{Tag, Transaction, Type, ValueFactory};
use std::fmt::Write;

struct Dumper<'a> {
    value_factory: &'a dyn ValueFactory,
    transaction: Option<&'a dyn Transaction>,
    indent_width: usize,
    show_types: bool,
    max_depth: usize,
    out: String,
}

impl<'a> Dumper<'a> {
    fn finish(mut self) -> String {
        if self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }

    fn indent(&mut self, level: usize) {
        let width = level * self.indent_width;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    fn target(&self, tag: Tag) -> String {
        self.transaction
            .and_then(|t| t.resolve_name(tag))
            .unwrap_or_else(|| tag.to_string())
    }

    fn header(&mut self, level: usize, kind: &str, name: &str, ty: Option<&dyn Type>) {
        self.indent(level);
        let _ = write!(self.out, "{kind} {name}");
        if let (true, Some(ty)) = (self.show_types, ty) {
            let ty = self.value_factory.dump_type(ty);
            let _ = write!(self.out, ": {ty}");
        }
        self.out.push_str(" = ");
    }

    fn expression(&mut self, expr: &Expression, name: &str, level: usize, calls: usize) {
        let kind = expr.kind().to_string();
        self.header(level, &kind, name, Some(&*expr.get_type()));

        match expr {
            Expression::Constant(e) => {
                let value = self.value_factory.dump_value(&*e.get_value());
                self.out.push_str(&value);
            }
            Expression::Call(e) => {
                let target = self.target(e.get_call());
                self.out.push_str(&target);
            }
            Expression::Parameter(e) => {
                let _ = write!(self.out, "index {}", e.get_index());
            }
            Expression::Temporary(e) => {
                let _ = write!(self.out, "index {}", e.get_index());
            }
            Expression::DirectCall(e) => {
                let target = self.target(e.get_definition());
                let arguments = e.get_arguments();

                if self.max_depth != 0 && calls >= self.max_depth {
                    let _ = write!(self.out, "{target}(...)");
                } else if arguments.is_empty() {
                    let _ = write!(self.out, "{target}()");
                } else {
                    let _ = writeln!(self.out, "{target}(");
                    self.entries(&arguments, level + 1, calls + 1);
                    self.indent(level);
                    self.out.push(')');
                }
            }
        }
        self.out.push('\n');
    }

    fn entries(&mut self, list: &ExpressionList, level: usize, calls: usize) {
        for (name, expr) in list.entries() {
            self.expression(&expr, &name, level, calls);
        }
    }

    fn list(&mut self, list: &ExpressionList, name: &str, level: usize) {
        self.header(level, "expression_list", name, None);
        if list.is_empty() {
            self.out.push_str("[ ]\n");
            return;
        }

        self.out.push_str("[\n");
        self.entries(list, level + 1, 0);
        self.indent(level);
        self.out.push_str("]\n");
    }

    fn annotation(&mut self, annotation: &Annotation, name: &str, level: usize) {
        self.header(level, "annotation", name, None);

        let arguments = annotation.get_arguments();
        let anno_name = annotation.get_name();
        if arguments.is_empty() {
            let _ = writeln!(self.out, "{anno_name}()");
            return;
        }

        let _ = writeln!(self.out, "{anno_name}(");
        self.entries(&arguments, level + 1, 0);
        self.indent(level);
        self.out.push_str(")\n");
    }

    fn block(&mut self, block: &AnnotationBlock, name: &str, level: usize) {
        self.header(level, "annotation_block", name, None);

        let annotations = block.annotations();
        if annotations.is_empty() {
            self.out.push_str("[ ]\n");
            return;
        }

        self.out.push_str("[\n");
        for (i, annotation) in annotations.iter().enumerate() {
            self.annotation(annotation, &i.to_string(), level + 1);
        }
        self.indent(level);
        self.out.push_str("]\n");
    }

    fn annotation_list(&mut self, list: &AnnotationList, name: &str, level: usize) {
        self.header(level, "annotation_list", name, None);

        let entries = list.entries();
        if entries.is_empty() {
            self.out.push_str("[ ]\n");
            return;
        }

        self.out.push_str("[\n");
        for (block_name, block) in entries.iter() {
            self.block(block, block_name, level + 1);
        }
        self.indent(level);
        self.out.push_str("]\n");
    }
}

impl ExpressionFactory {
    fn dumper<'a>(&'a self, transaction: Option<&'a dyn Transaction>, depth: usize) -> Dumper<'a> {
        Dumper {
            value_factory: &*self.value_factory,
            transaction,
            indent_width: self.config.indent_width,
            show_types: self.config.show_types,
            max_depth: depth,
            out: String::new(),
        }
    }

    pub fn dump(&self, transaction: Option<&dyn Transaction>, expr: &Expression, name: &str, depth: usize) -> String {
        let mut dumper = self.dumper(transaction, depth);
        dumper.expression(expr, name, 0, 0);
        dumper.finish()
    }

    /// `dump` with the configured default depth
    pub fn dump_default(&self, transaction: Option<&dyn Transaction>, expr: &Expression, name: &str) -> String {
        self.dump(transaction, expr, name, self.config.default_dump_depth)
    }

    pub fn dump_list(
        &self,
        transaction: Option<&dyn Transaction>,
        list: &ExpressionList,
        name: &str,
        depth: usize,
    ) -> String {
        let mut dumper = self.dumper(transaction, depth);
        dumper.list(list, name, 0);
        dumper.finish()
    }

    pub fn dump_annotation(
        &self,
        transaction: Option<&dyn Transaction>,
        annotation: &Annotation,
        name: &str,
        depth: usize,
    ) -> String {
        let mut dumper = self.dumper(transaction, depth);
        dumper.annotation(annotation, name, 0);
        dumper.finish()
    }

    pub fn dump_annotation_block(
        &self,
        transaction: Option<&dyn Transaction>,
        block: &AnnotationBlock,
        name: &str,
        depth: usize,
    ) -> String {
        let mut dumper = self.dumper(transaction, depth);
        dumper.block(block, name, 0);
        dumper.finish()
    }

    pub fn dump_annotation_list(
        &self,
        transaction: Option<&dyn Transaction>,
        list: &AnnotationList,
        name: &str,
        depth: usize,
    ) -> String {
        let mut dumper = self.dumper(transaction, depth);
        dumper.annotation_list(list, name, 0);
        dumper.finish()
    }
}
