//! Shared fixtures: a factory over the reference value system and a few
//! graph builders.

use crate::{ExpressionFactory, ExpressionRef, Tag};
use mdl_common::basic::{BasicType, BasicValue, BasicValueFactory};
use mdl_common::{BufferDeserializer, BufferSerializer, TagNames};
use std::sync::Arc;

pub fn factory() -> ExpressionFactory {
    ExpressionFactory::new(Arc::new(BasicValueFactory::new()))
}

pub fn int(f: &ExpressionFactory, n: i32) -> ExpressionRef {
    f.create_constant(BasicValue::Int(n).shared())
}

pub fn float(f: &ExpressionFactory, x: f32) -> ExpressionRef {
    f.create_constant(BasicValue::Float(x).shared())
}

pub fn color(f: &ExpressionFactory, r: f32, g: f32, b: f32) -> ExpressionRef {
    f.create_constant(BasicValue::Color([r, g, b]).shared())
}

pub fn call(f: &ExpressionFactory, ty: BasicType, tag: u64) -> ExpressionRef {
    f.create_call(ty.shared(), Tag::new(tag)).unwrap()
}

pub fn direct_call(f: &ExpressionFactory, tag: u64, args: Vec<(&str, ExpressionRef)>) -> ExpressionRef {
    let list = f.create_expression_list();
    for (name, arg) in args {
        list.add_expression(name, arg).unwrap();
    }
    f.create_direct_call(BasicType::Bsdf.shared(), Tag::new(tag), list).unwrap()
}

/// `length` nested direct calls; the outermost has tag 1, the innermost
/// tag `length`, and the innermost argument is a constant
pub fn call_chain(f: &ExpressionFactory, length: usize) -> ExpressionRef {
    let mut inner = int(f, 0);
    for level in (1..=length).rev() {
        inner = direct_call(f, level as u64, vec![("inner", inner)]);
    }
    inner
}

/// One node of every kind, plus nested calls
pub fn assorted(f: &ExpressionFactory) -> Vec<ExpressionRef> {
    vec![
        int(f, 1),
        int(f, 2),
        float(f, 0.5),
        color(f, 0.8, 0.1, 0.1),
        call(f, BasicType::Color, 3),
        call(f, BasicType::Color, 4),
        call(f, BasicType::Bsdf, 3),
        f.create_parameter(BasicType::Float.shared(), 0),
        f.create_parameter(BasicType::Float.shared(), 1),
        direct_call(f, 7, vec![]),
        direct_call(f, 7, vec![("tint", color(f, 1.0, 1.0, 1.0))]),
        direct_call(f, 7, vec![("tint", color(f, 0.0, 1.0, 1.0))]),
        direct_call(f, 8, vec![("weight", float(f, 0.5)), ("base", call_chain(f, 2))]),
        f.create_temporary(BasicType::Color.shared(), 2),
        f.create_temporary(BasicType::Int.shared(), 2),
    ]
}

pub fn names() -> TagNames {
    let mut names = TagNames::new();
    names
        .insert(Tag::new(3), "::tex::lookup_color")
        .insert(Tag::new(7), "::df::diffuse_reflection_bsdf");
    names
}

pub fn roundtrip(f: &ExpressionFactory, expr: &ExpressionRef) -> ExpressionRef {
    let mut ser = BufferSerializer::new();
    f.serialize(&mut ser, expr);

    let bytes = ser.into_bytes();
    let mut de = BufferDeserializer::new(&bytes);
    let decoded = f.deserialize(&mut de).unwrap();
    assert!(de.is_at_end());
    decoded
}
