//! Named, ordered containers
//!
//! Entries keep insertion order, which is also their index order, and a
//! name map gives direct lookup by name. Names are unique and never change
//! once added; replacing an entry swaps the child only.

use crate::expression::ExpressionRef;
use crate::sync;
use mdl_common::ExprError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Order, names and children of a named container
#[derive(Debug, Clone)]
pub(crate) struct NamedEntries<T> {
    names: Vec<String>,
    index: HashMap<String, usize>,
    children: Vec<T>,
}

impl<T> Default for NamedEntries<T> {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            index: HashMap::new(),
            children: Vec::new(),
        }
    }
}

impl<T: Clone> NamedEntries<T> {
    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn get_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn get_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.children.get(index)
    }

    pub(crate) fn get_by_name(&self, name: &str) -> Option<&T> {
        self.get_index(name).and_then(|i| self.children.get(i))
    }

    pub(crate) fn set(&mut self, index: usize, child: T) -> Result<(), ExprError> {
        let size = self.children.len();
        match self.children.get_mut(index) {
            Some(slot) => {
                *slot = child;
                Ok(())
            }
            None => Err(ExprError::IndexOutOfRange { index, size }),
        }
    }

    pub(crate) fn set_by_name(&mut self, name: &str, child: T) -> Result<(), ExprError> {
        match self.get_index(name) {
            Some(index) => self.set(index, child),
            None => Err(ExprError::NameNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Append under a new name; a duplicate leaves the entries untouched
    pub(crate) fn add(&mut self, name: &str, child: T) -> Result<usize, ExprError> {
        if self.index.contains_key(name) {
            return Err(ExprError::DuplicateName {
                name: name.to_string(),
            });
        }

        let index = self.children.len();
        self.index.insert(name.to_string(), index);
        self.names.push(name.to_string());
        self.children.push(child);
        Ok(index)
    }

    /// (name, child) pairs in index order
    pub(crate) fn snapshot(&self) -> Vec<(String, T)> {
        self.names
            .iter()
            .cloned()
            .zip(self.children.iter().cloned())
            .collect()
    }

    /// Same names and order, with every child replaced by `f(child)`
    pub(crate) fn map<U>(&self, f: impl FnMut(&T) -> U) -> NamedEntries<U> {
        NamedEntries {
            names: self.names.clone(),
            index: self.index.clone(),
            children: self.children.iter().map(f).collect(),
        }
    }

    /// Bytes used by names and bookkeeping, children excluded
    pub(crate) fn overhead(&self) -> usize {
        let names: usize = self.names.iter().map(|n| n.capacity()).sum();
        names * 2
            + self.names.capacity() * std::mem::size_of::<String>()
            + self.index.capacity() * std::mem::size_of::<(String, usize)>()
            + self.children.capacity() * std::mem::size_of::<T>()
    }
}

/// Named, ordered list of expressions (call arguments, annotation arguments)
#[derive(Debug, Default)]
pub struct ExpressionList {
    entries: RwLock<NamedEntries<ExpressionRef>>,
}

impl ExpressionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        sync::read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Index of the entry called `name`
    pub fn get_index(&self, name: &str) -> Option<usize> {
        sync::read(&self.entries).get_index(name)
    }

    pub fn get_name(&self, index: usize) -> Option<String> {
        sync::read(&self.entries).get_name(index).map(str::to_string)
    }

    pub fn get_expression(&self, index: usize) -> Option<ExpressionRef> {
        sync::read(&self.entries).get(index).map(Arc::clone)
    }

    pub fn get_expression_by_name(&self, name: &str) -> Option<ExpressionRef> {
        sync::read(&self.entries).get_by_name(name).map(Arc::clone)
    }

    pub fn set_expression(&self, index: usize, expression: ExpressionRef) -> Result<(), ExprError> {
        sync::write(&self.entries).set(index, expression)
    }

    pub fn set_expression_by_name(&self, name: &str, expression: ExpressionRef) -> Result<(), ExprError> {
        sync::write(&self.entries).set_by_name(name, expression)
    }

    /// Append `expression` as the last entry
    pub fn add_expression(&self, name: &str, expression: ExpressionRef) -> Result<(), ExprError> {
        sync::write(&self.entries).add(name, expression).map(|_| ())
    }

    /// Consistent copy of the (name, expression) pairs in index order
    pub fn entries(&self) -> Vec<(String, ExpressionRef)> {
        sync::read(&self.entries).snapshot()
    }

    /// New list with the same names and order, children mapped by `f`
    ///
    /// The entries are copied under the lock and mapped after it is released.
    pub(crate) fn map_children(&self, f: impl FnMut(&ExpressionRef) -> ExpressionRef) -> ExpressionList {
        let entries = sync::read(&self.entries).clone();
        ExpressionList {
            entries: RwLock::new(entries.map(f)),
        }
    }

    pub fn memory_consumption(&self) -> usize {
        let entries = sync::read(&self.entries);
        let children: usize = (0..entries.len())
            .filter_map(|i| entries.get(i))
            .map(|e| e.memory_consumption())
            .sum();
        std::mem::size_of::<Self>() + entries.overhead() + children
    }
}
