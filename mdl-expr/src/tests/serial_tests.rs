use super::helpers::*;
use crate::{ExpressionKind, SerialError, MAX_NESTING};
use mdl_common::basic::{BasicType, BasicValue};
use mdl_common::{BufferDeserializer, BufferSerializer};
use std::cmp::Ordering;

fn bytes_of(f: &crate::ExpressionFactory, expr: &crate::Expression) -> Vec<u8> {
    let mut ser = BufferSerializer::new();
    f.serialize(&mut ser, expr);
    ser.into_bytes()
}

#[test]
fn test_every_kind_roundtrips() {
    let f = factory();

    for expr in assorted(&f) {
        let decoded = roundtrip(&f, &expr);
        assert_eq!(decoded.kind(), expr.kind());
        assert_eq!(f.compare(&expr, &decoded), Ordering::Equal);
    }
}

#[test]
fn test_direct_call_argument_counts() {
    let f = factory();
    let calls = [
        direct_call(&f, 7, vec![]),
        direct_call(&f, 7, vec![("tint", color(&f, 1.0, 0.5, 0.0))]),
        direct_call(
            &f,
            7,
            vec![
                ("tint", call(&f, BasicType::Color, 3)),
                ("roughness", float(&f, 0.25)),
                ("normal", f.create_parameter(BasicType::Color.shared(), 1)),
                ("weight", f.create_temporary(BasicType::Float.shared(), 0)),
            ],
        ),
    ];

    for expr in calls.iter() {
        let decoded = roundtrip(&f, expr);
        let original_args = expr.as_direct_call().unwrap().get_arguments();
        let decoded_args = decoded.as_direct_call().unwrap().get_arguments();

        assert_eq!(decoded_args.size(), original_args.size());
        for i in 0..original_args.size() {
            assert_eq!(decoded_args.get_name(i), original_args.get_name(i));
        }
        assert_eq!(f.compare(expr, &decoded), Ordering::Equal);
    }
}

#[test]
fn test_constant_keeps_node_type() {
    let f = factory();
    let expr = int(&f, 1);
    expr.as_constant()
        .unwrap()
        .set_value(BasicValue::String("text".to_string()).shared());

    let decoded = roundtrip(&f, &expr);
    assert_eq!(decoded.get_type().to_string(), "int");
    assert_eq!(decoded.as_constant().unwrap().get_value().to_string(), "\"text\"");
}

#[test]
fn test_deep_chain_roundtrips() {
    let f = factory();
    let chain = call_chain(&f, 64);
    let decoded = roundtrip(&f, &chain);
    assert_eq!(f.compare(&chain, &decoded), Ordering::Equal);
}

#[test]
fn test_large_indices_roundtrip() {
    let f = factory();
    let param = f.create_parameter(BasicType::Float.shared(), usize::MAX);
    let decoded = roundtrip(&f, &param);
    assert_eq!(decoded.as_parameter().unwrap().get_index(), usize::MAX);
}

#[test]
fn test_nesting_limit_boundary() {
    let f = factory();

    let deepest = call_chain(&f, MAX_NESTING);
    let decoded = roundtrip(&f, &deepest);
    assert_eq!(f.compare(&deepest, &decoded), Ordering::Equal);

    let too_deep = bytes_of(&f, &call_chain(&f, MAX_NESTING + 1));
    let mut de = BufferDeserializer::new(&too_deep);
    assert_eq!(
        f.deserialize(&mut de).err(),
        Some(SerialError::NestingTooDeep { limit: MAX_NESTING })
    );
}

#[test]
fn test_hostile_nesting_is_rejected() {
    let f = factory();

    // direct_call: bsdf, tag 1, one argument named "", repeated
    let level = [ExpressionKind::DirectCall.discriminator(), 5, 1, 1, 0];
    let bytes: Vec<u8> = level.iter().copied().cycle().take(level.len() * 20_000).collect();

    let mut de = BufferDeserializer::new(&bytes);
    assert_eq!(
        f.deserialize(&mut de).err(),
        Some(SerialError::NestingTooDeep { limit: MAX_NESTING })
    );

    let mut de = BufferDeserializer::new(&bytes[1..]);
    assert!(f.deserialize(&mut de).is_err());
}

#[test]
fn test_unknown_kind_is_rejected() {
    let f = factory();
    let bytes = [9u8, 0, 0];
    let mut de = BufferDeserializer::new(&bytes);

    assert_eq!(f.deserialize(&mut de).err(), Some(SerialError::InvalidKind { kind: 9 }));
}

#[test]
fn test_zero_tag_is_rejected() {
    let f = factory();
    let mut bytes = bytes_of(&f, &call(&f, BasicType::Color, 3));
    assert_eq!(bytes[0], ExpressionKind::Call.discriminator());

    // the tag is the last byte of a call
    let last = bytes.len() - 1;
    assert_eq!(bytes[last], 3);
    bytes[last] = 0;

    let mut de = BufferDeserializer::new(&bytes);
    assert_eq!(f.deserialize(&mut de).err(), Some(SerialError::InvalidTag));
}

#[test]
fn test_truncated_stream_fails_cleanly() {
    let f = factory();
    let expr = direct_call(
        &f,
        7,
        vec![
            ("tint", call(&f, BasicType::Color, 3)),
            ("roughness", float(&f, 0.25)),
            ("base", call_chain(&f, 2)),
        ],
    );
    let bytes = bytes_of(&f, &expr);

    for len in 0..bytes.len() {
        let mut de = BufferDeserializer::new(&bytes[..len]);
        assert_eq!(
            f.deserialize(&mut de).err(),
            Some(SerialError::UnexpectedEof),
            "prefix of {len} bytes"
        );
    }
}

#[test]
fn test_duplicate_name_in_stream() {
    let f = factory();
    let list = f.create_expression_list();
    list.add_expression("a", int(&f, 1)).unwrap();
    list.add_expression("b", int(&f, 1)).unwrap();

    let mut ser = BufferSerializer::new();
    f.serialize_list(&mut ser, &list);
    let mut bytes = ser.into_bytes();

    let b = bytes.iter().position(|&byte| byte == b'b').unwrap();
    bytes[b] = b'a';

    let mut de = BufferDeserializer::new(&bytes);
    assert_eq!(
        f.deserialize_list(&mut de).err(),
        Some(SerialError::DuplicateName {
            name: "a".to_string()
        })
    );
}

#[test]
fn test_list_roundtrip() {
    let f = factory();
    let list = f.create_expression_list();
    list.add_expression("weight", float(&f, 0.5)).unwrap();
    list.add_expression("base", call_chain(&f, 3)).unwrap();

    let mut ser = BufferSerializer::new();
    f.serialize_list(&mut ser, &list);
    let bytes = ser.into_bytes();

    let mut de = BufferDeserializer::new(&bytes);
    let decoded = f.deserialize_list(&mut de).unwrap();
    assert!(de.is_at_end());
    assert_eq!(f.compare_lists(&list, &decoded), Ordering::Equal);
}

#[test]
fn test_annotation_list_roundtrip() {
    let f = factory();
    let range = f.create_expression_list();
    range.add_expression("min", float(&f, 0.0)).unwrap();
    range.add_expression("max", float(&f, 1.0)).unwrap();

    let block = f.create_annotation_block();
    block.add_annotation(f.create_annotation("::anno::hard_range", range));
    block.add_annotation(f.create_annotation("::anno::hidden", f.create_expression_list()));

    let list = f.create_annotation_list();
    list.add_block("roughness", block).unwrap();
    list.add_block("tint", f.create_annotation_block()).unwrap();

    let mut ser = BufferSerializer::new();
    f.serialize_annotation_list(&mut ser, &list);
    let bytes = ser.into_bytes();

    let mut de = BufferDeserializer::new(&bytes);
    let decoded = f.deserialize_annotation_list(&mut de).unwrap();
    assert!(de.is_at_end());

    assert_eq!(decoded.size(), 2);
    assert_eq!(decoded.get_name(1).as_deref(), Some("tint"));
    assert!(decoded.get_block_by_name("tint").unwrap().is_empty());

    let roughness = decoded.get_block_by_name("roughness").unwrap();
    assert_eq!(roughness.size(), 2);
    let hard_range = roughness.get_annotation(0).unwrap();
    assert_eq!(hard_range.get_name(), "::anno::hard_range");
    assert_eq!(hard_range.get_arguments().get_index("max"), Some(1));
    assert_eq!(roughness.get_annotation(1).unwrap().get_name(), "::anno::hidden");
}

#[test]
fn test_foreign_value_cannot_be_read_back() {
    #[derive(Debug)]
    struct Opaque;

    impl std::fmt::Display for Opaque {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "opaque")
        }
    }

    impl mdl_common::Value for Opaque {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn memory_consumption(&self) -> usize {
            0
        }
    }

    let f = factory();
    let expr = f.create_constant(std::sync::Arc::new(Opaque));
    let bytes = bytes_of(&f, &expr);

    let mut de = BufferDeserializer::new(&bytes);
    assert!(matches!(
        f.deserialize(&mut de),
        Err(SerialError::InvalidValue { .. })
    ));
}
