use super::helpers::*;
use crate::ExprError;
use std::sync::Arc;

#[test]
fn test_annotation_name_and_arguments() {
    let f = factory();
    let args = f.create_expression_list();
    args.add_expression("description", int(&f, 5)).unwrap();

    let anno = f.create_annotation("::anno::hard_range", Arc::clone(&args));
    assert_eq!(anno.get_name(), "::anno::hard_range");
    assert!(Arc::ptr_eq(&anno.get_arguments(), &args));

    anno.set_name("::anno::soft_range");
    assert_eq!(anno.get_name(), "::anno::soft_range");
}

#[test]
fn test_block_keeps_order() {
    let f = factory();
    let block = f.create_annotation_block();
    assert!(block.is_empty());

    block.add_annotation(f.create_annotation("::anno::hidden", f.create_expression_list()));
    block.add_annotation(f.create_annotation("::anno::unused", f.create_expression_list()));

    let names: Vec<String> = block.annotations().iter().map(|a| a.get_name()).collect();
    assert_eq!(names, vec!["::anno::hidden", "::anno::unused"]);
    assert_eq!(block.size(), 2);
    assert!(block.get_annotation(2).is_none());
}

#[test]
fn test_block_set_annotation() {
    let f = factory();
    let block = f.create_annotation_block();
    block.add_annotation(f.create_annotation("::anno::hidden", f.create_expression_list()));

    let replacement = f.create_annotation("::anno::deprecated", f.create_expression_list());
    block.set_annotation(0, Arc::clone(&replacement)).unwrap();
    assert!(Arc::ptr_eq(&block.get_annotation(0).unwrap(), &replacement));

    let result = block.set_annotation(3, replacement);
    assert_eq!(result, Err(ExprError::IndexOutOfRange { index: 3, size: 1 }));
}

#[test]
fn test_annotation_list_by_name() {
    let f = factory();
    let list = f.create_annotation_list();
    let tint = f.create_annotation_block();
    let roughness = f.create_annotation_block();

    list.add_block("tint", Arc::clone(&tint)).unwrap();
    list.add_block("roughness", Arc::clone(&roughness)).unwrap();

    assert_eq!(list.size(), 2);
    assert_eq!(list.get_index("roughness"), Some(1));
    assert_eq!(list.get_name(0).as_deref(), Some("tint"));
    assert!(Arc::ptr_eq(&list.get_block_by_name("tint").unwrap(), &tint));
    assert!(Arc::ptr_eq(&list.get_block(1).unwrap(), &roughness));
    assert!(list.get_block_by_name("normal").is_none());
}

#[test]
fn test_annotation_list_errors() {
    let f = factory();
    let list = f.create_annotation_list();
    list.add_block("tint", f.create_annotation_block()).unwrap();

    assert_eq!(
        list.add_block("tint", f.create_annotation_block()),
        Err(ExprError::DuplicateName {
            name: "tint".to_string()
        })
    );
    assert_eq!(
        list.set_block_by_name("normal", f.create_annotation_block()),
        Err(ExprError::NameNotFound {
            name: "normal".to_string()
        })
    );
    assert_eq!(
        list.set_block(1, f.create_annotation_block()),
        Err(ExprError::IndexOutOfRange { index: 1, size: 1 })
    );
    assert_eq!(list.size(), 1);
}

#[test]
fn test_annotation_memory_grows_with_content() {
    let f = factory();
    let block = f.create_annotation_block();
    let before = block.memory_consumption();

    let args = f.create_expression_list();
    args.add_expression("min", float(&f, 0.0)).unwrap();
    args.add_expression("max", float(&f, 1.0)).unwrap();
    block.add_annotation(f.create_annotation("::anno::hard_range", args));

    assert!(block.memory_consumption() > before);
}
