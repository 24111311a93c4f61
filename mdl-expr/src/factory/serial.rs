//! Serialization
//!
//! ```text
//! expression       := kind:u8 type payload
//!   constant       := value
//!   call           := tag
//!   parameter      := index
//!   direct_call    := tag expression_list
//!   temporary      := index
//! expression_list  := count { name expression }*
//! annotation       := name expression_list
//! annotation_block := count { annotation }*
//! annotation_list  := count { name annotation_block }*
//! ```
//!
//! Types and values are framed by the value factory. Any decoding failure
//! aborts the whole object; nothing partially decoded is handed out.
//! Streams nesting expressions more than `MAX_NESTING` levels deep are
//! rejected before they can exhaust the stack.

use super::ExpressionFactory;
use crate::annotation::{Annotation, AnnotationBlock, AnnotationList};
use crate::expression::{
    Expression, ExpressionCall, ExpressionConstant, ExpressionDirectCall, ExpressionKind,
    ExpressionParameter, ExpressionRef, ExpressionTemporary,
};
use crate::list::ExpressionList;
use log::{debug, trace};
use mdl_common::{Deserializer, ExprError, SerialError, Serializer, Tag};
use std::sync::Arc;

/// Deepest accepted nesting of expressions inside direct-call arguments
pub const MAX_NESTING: usize = 256;

fn read_tag(deserializer: &mut dyn Deserializer) -> Result<Tag, SerialError> {
    let tag = Tag::new(deserializer.read_u64()?);
    if !tag.is_valid() {
        return Err(SerialError::InvalidTag);
    }
    Ok(tag)
}

fn duplicate_to_serial(e: ExprError) -> SerialError {
    match e {
        ExprError::DuplicateName { name } => SerialError::DuplicateName { name },
        other => SerialError::InvalidValue {
            message: other.to_string(),
        },
    }
}

impl ExpressionFactory {
    pub fn serialize(&self, serializer: &mut dyn Serializer, expr: &Expression) {
        let kind = expr.kind();
        trace!("serialize: {kind}");

        serializer.write_u8(kind.discriminator());
        self.value_factory.serialize_type(serializer, &*expr.get_type());

        match expr {
            Expression::Constant(e) => {
                self.value_factory.serialize_value(serializer, &*e.get_value());
            }
            Expression::Call(e) => serializer.write_u64(e.get_call().raw()),
            Expression::Parameter(e) => serializer.write_usize(e.get_index()),
            Expression::DirectCall(e) => {
                serializer.write_u64(e.get_definition().raw());
                self.serialize_list(serializer, &e.get_arguments());
            }
            Expression::Temporary(e) => serializer.write_usize(e.get_index()),
        }
    }

    pub fn deserialize(&self, deserializer: &mut dyn Deserializer) -> Result<ExpressionRef, SerialError> {
        self.read_expression(deserializer, 0)
    }

    /// `depth` counts the expressions enclosing this one
    fn read_expression(&self, deserializer: &mut dyn Deserializer, depth: usize) -> Result<ExpressionRef, SerialError> {
        if depth > MAX_NESTING {
            return Err(SerialError::NestingTooDeep { limit: MAX_NESTING });
        }

        let byte = deserializer.read_u8()?;
        let kind = ExpressionKind::from_discriminator(byte)
            .ok_or(SerialError::InvalidKind { kind: byte })?;
        trace!("deserialize: {kind}");

        let ty = self.value_factory.deserialize_type(deserializer)?;

        let expr = match kind {
            ExpressionKind::Constant => {
                let value = self.value_factory.deserialize_value(deserializer)?;
                Expression::Constant(ExpressionConstant::new(ty, value))
            }
            ExpressionKind::Call => Expression::Call(ExpressionCall::new(ty, read_tag(deserializer)?)),
            ExpressionKind::Parameter => {
                Expression::Parameter(ExpressionParameter::new(ty, deserializer.read_usize()?))
            }
            ExpressionKind::DirectCall => {
                let tag = read_tag(deserializer)?;
                let arguments = self.read_list(deserializer, depth + 1)?;
                Expression::DirectCall(ExpressionDirectCall::new(ty, tag, arguments))
            }
            ExpressionKind::Temporary => {
                Expression::Temporary(ExpressionTemporary::new(ty, deserializer.read_usize()?))
            }
        };

        Ok(Arc::new(expr))
    }

    pub fn serialize_list(&self, serializer: &mut dyn Serializer, list: &ExpressionList) {
        let entries = list.entries();
        serializer.write_usize(entries.len());

        for (name, expr) in entries.iter() {
            serializer.write_str(name);
            self.serialize(serializer, expr);
        }
    }

    pub fn deserialize_list(&self, deserializer: &mut dyn Deserializer) -> Result<Arc<ExpressionList>, SerialError> {
        self.read_list(deserializer, 0)
    }

    fn read_list(&self, deserializer: &mut dyn Deserializer, depth: usize) -> Result<Arc<ExpressionList>, SerialError> {
        let count = deserializer.read_usize()?;
        debug!("deserialize_list: {count} entries");

        let list = ExpressionList::new();
        for _ in 0..count {
            let name = deserializer.read_string()?;
            let expr = self.read_expression(deserializer, depth)?;
            list.add_expression(&name, expr).map_err(duplicate_to_serial)?;
        }

        Ok(Arc::new(list))
    }

    pub fn serialize_annotation(&self, serializer: &mut dyn Serializer, annotation: &Annotation) {
        serializer.write_str(&annotation.get_name());
        self.serialize_list(serializer, &annotation.get_arguments());
    }

    pub fn deserialize_annotation(&self, deserializer: &mut dyn Deserializer) -> Result<Arc<Annotation>, SerialError> {
        let name = deserializer.read_string()?;
        let arguments = self.deserialize_list(deserializer)?;
        Ok(Arc::new(Annotation::new(&name, arguments)))
    }

    pub fn serialize_annotation_block(&self, serializer: &mut dyn Serializer, block: &AnnotationBlock) {
        let annotations = block.annotations();
        serializer.write_usize(annotations.len());

        for annotation in annotations.iter() {
            self.serialize_annotation(serializer, annotation);
        }
    }

    pub fn deserialize_annotation_block(
        &self,
        deserializer: &mut dyn Deserializer,
    ) -> Result<Arc<AnnotationBlock>, SerialError> {
        let count = deserializer.read_usize()?;

        let block = AnnotationBlock::new();
        for _ in 0..count {
            block.add_annotation(self.deserialize_annotation(deserializer)?);
        }

        Ok(Arc::new(block))
    }

    pub fn serialize_annotation_list(&self, serializer: &mut dyn Serializer, list: &AnnotationList) {
        let entries = list.entries();
        serializer.write_usize(entries.len());

        for (name, block) in entries.iter() {
            serializer.write_str(name);
            self.serialize_annotation_block(serializer, block);
        }
    }

    pub fn deserialize_annotation_list(
        &self,
        deserializer: &mut dyn Deserializer,
    ) -> Result<Arc<AnnotationList>, SerialError> {
        let count = deserializer.read_usize()?;
        debug!("deserialize_annotation_list: {count} blocks");

        let list = AnnotationList::new();
        for _ in 0..count {
            let name = deserializer.read_string()?;
            let block = self.deserialize_annotation_block(deserializer)?;
            list.add_block(&name, block).map_err(duplicate_to_serial)?;
        }

        Ok(Arc::new(list))
    }
}
