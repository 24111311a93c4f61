//! Annotations
//!
//! An annotation is a name with an argument list. Annotations are grouped
//! into blocks (positional only), and blocks are grouped into annotation
//! lists keyed by the name of the annotated entity.

use crate::list::{ExpressionList, NamedEntries};
use crate::sync;
use mdl_common::ExprError;
use std::sync::{Arc, RwLock};

pub type AnnotationRef = Arc<Annotation>;
pub type AnnotationBlockRef = Arc<AnnotationBlock>;

/// A single annotation, e.g. `::anno::description("...")`
#[derive(Debug)]
pub struct Annotation {
    name: RwLock<String>,
    arguments: Arc<ExpressionList>,
}

impl Annotation {
    pub(crate) fn new(name: &str, arguments: Arc<ExpressionList>) -> Self {
        Self {
            name: RwLock::new(name.to_string()),
            arguments,
        }
    }

    pub fn get_name(&self) -> String {
        sync::read(&self.name).clone()
    }

    pub fn set_name(&self, name: &str) {
        *sync::write(&self.name) = name.to_string();
    }

    pub fn get_arguments(&self) -> Arc<ExpressionList> {
        Arc::clone(&self.arguments)
    }

    pub fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>() + sync::read(&self.name).capacity() + self.arguments.memory_consumption()
    }
}

/// Ordered sequence of annotations
#[derive(Debug, Default)]
pub struct AnnotationBlock {
    annotations: RwLock<Vec<AnnotationRef>>,
}

impl AnnotationBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        sync::read(&self.annotations).len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn get_annotation(&self, index: usize) -> Option<AnnotationRef> {
        sync::read(&self.annotations).get(index).map(Arc::clone)
    }

    pub fn set_annotation(&self, index: usize, annotation: AnnotationRef) -> Result<(), ExprError> {
        let mut annotations = sync::write(&self.annotations);
        let size = annotations.len();
        match annotations.get_mut(index) {
            Some(slot) => {
                *slot = annotation;
                Ok(())
            }
            None => Err(ExprError::IndexOutOfRange { index, size }),
        }
    }

    pub fn add_annotation(&self, annotation: AnnotationRef) {
        sync::write(&self.annotations).push(annotation);
    }

    /// Consistent copy of the annotations in order
    pub fn annotations(&self) -> Vec<AnnotationRef> {
        sync::read(&self.annotations).clone()
    }

    pub fn memory_consumption(&self) -> usize {
        let annotations = sync::read(&self.annotations);
        let children: usize = annotations.iter().map(|a| a.memory_consumption()).sum();
        std::mem::size_of::<Self>() + annotations.capacity() * std::mem::size_of::<AnnotationRef>() + children
    }
}

/// Named, ordered list of annotation blocks
#[derive(Debug, Default)]
pub struct AnnotationList {
    entries: RwLock<NamedEntries<AnnotationBlockRef>>,
}

impl AnnotationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        sync::read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn get_index(&self, name: &str) -> Option<usize> {
        sync::read(&self.entries).get_index(name)
    }

    pub fn get_name(&self, index: usize) -> Option<String> {
        sync::read(&self.entries).get_name(index).map(str::to_string)
    }

    pub fn get_block(&self, index: usize) -> Option<AnnotationBlockRef> {
        sync::read(&self.entries).get(index).map(Arc::clone)
    }

    pub fn get_block_by_name(&self, name: &str) -> Option<AnnotationBlockRef> {
        sync::read(&self.entries).get_by_name(name).map(Arc::clone)
    }

    pub fn set_block(&self, index: usize, block: AnnotationBlockRef) -> Result<(), ExprError> {
        sync::write(&self.entries).set(index, block)
    }

    pub fn set_block_by_name(&self, name: &str, block: AnnotationBlockRef) -> Result<(), ExprError> {
        sync::write(&self.entries).set_by_name(name, block)
    }

    pub fn add_block(&self, name: &str, block: AnnotationBlockRef) -> Result<(), ExprError> {
        sync::write(&self.entries).add(name, block).map(|_| ())
    }

    /// Consistent copy of the (name, block) pairs in index order
    pub fn entries(&self) -> Vec<(String, AnnotationBlockRef)> {
        sync::read(&self.entries).snapshot()
    }

    pub fn memory_consumption(&self) -> usize {
        let entries = sync::read(&self.entries);
        let children: usize = (0..entries.len())
            .filter_map(|i| entries.get(i))
            .map(|b| b.memory_consumption())
            .sum();
        std::mem::size_of::<Self>() + entries.overhead() + children
    }
}
