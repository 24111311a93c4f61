//! Sample material graph for exercising the tools
//!
//! The graph is a stack of `chain` layer calls. The innermost layer gets
//! one argument of every leaf kind.

use mdl_common::basic::{BasicType, BasicValue};
use mdl_common::{ExprError, Tag, TagNames};
use mdl_expr::{ExpressionFactory, ExpressionRef};

const LOOKUP_COLOR: Tag = Tag::new(3);
const DIFFUSE_BSDF: Tag = Tag::new(7);
const FIRST_LAYER: u64 = 100;

pub fn build_material(factory: &ExpressionFactory, chain: usize) -> Result<(ExpressionRef, TagNames), ExprError> {
    let mut names = TagNames::new();
    names
        .insert(LOOKUP_COLOR, "::tex::lookup_color")
        .insert(DIFFUSE_BSDF, "::df::diffuse_reflection_bsdf");

    let arguments = factory.create_expression_list();
    arguments.add_expression("tint", factory.create_call(BasicType::Color.shared(), LOOKUP_COLOR)?)?;
    arguments.add_expression("roughness", factory.create_constant(BasicValue::Float(0.25).shared()))?;
    arguments.add_expression("normal", factory.create_parameter(BasicType::Color.shared(), 0))?;
    arguments.add_expression("weight", factory.create_temporary(BasicType::Float.shared(), 0))?;

    let mut body = factory.create_direct_call(BasicType::Bsdf.shared(), DIFFUSE_BSDF, arguments)?;

    for level in (0..chain).rev() {
        let tag = Tag::new(FIRST_LAYER + level as u64);
        names.insert(tag, &format!("::demo::layer_{level}"));

        let arguments = factory.create_expression_list();
        arguments.add_expression("base", body)?;
        arguments.add_expression("weight", factory.create_constant(BasicValue::Float(0.5).shared()))?;
        body = factory.create_direct_call(BasicType::Bsdf.shared(), tag, arguments)?;
    }

    Ok((body, names))
}
