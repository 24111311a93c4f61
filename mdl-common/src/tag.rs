//! Database tags and name resolution
//!
//! A tag is an opaque handle to an object stored in the scene database.
//! It carries no meaning of its own; only a transaction can map it back to
//! something human readable, and the IR uses that solely for dumps.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque handle to a database object (zero is the null tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(u64);

impl Tag {
    /// The reserved invalid tag
    pub const NULL: Tag = Tag(0);

    pub const fn new(raw: u64) -> Self {
        Tag(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Check whether this tag may be referenced by an expression
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Tag {
    fn from(raw: u64) -> Self {
        Tag(raw)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag {}", self.0)
    }
}

/// Read access to the database, as far as the IR needs it
pub trait Transaction {
    /// Symbolic name of the object behind `tag`, if the database knows one
    fn resolve_name(&self, tag: Tag) -> Option<String>;
}

/// A fixed tag-to-name table
///
/// Stands in for a database transaction in tools and tests. Serialized as a
/// JSON object mapping decimal tag values to names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagNames {
    names: HashMap<u64, String>,
}

impl TagNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name; the null tag is never registered
    pub fn insert(&mut self, tag: Tag, name: &str) -> &mut Self {
        if tag.is_valid() {
            self.names.insert(tag.raw(), name.to_string());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Transaction for TagNames {
    fn resolve_name(&self, tag: Tag) -> Option<String> {
        self.names.get(&tag.raw()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_tag() {
        assert!(!Tag::NULL.is_valid());
        assert!(!Tag::default().is_valid());
        assert!(Tag::new(1).is_valid());
        assert_eq!(Tag::from(7).raw(), 7);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(format!("{}", Tag::new(42)), "tag 42");
    }

    #[test]
    fn test_tag_names() {
        let mut names = TagNames::new();
        names.insert(Tag::new(3), "::df::diffuse_reflection_bsdf");
        names.insert(Tag::NULL, "ignored");

        assert_eq!(names.len(), 1);
        assert_eq!(
            names.resolve_name(Tag::new(3)).as_deref(),
            Some("::df::diffuse_reflection_bsdf")
        );
        assert_eq!(names.resolve_name(Tag::new(4)), None);
        assert_eq!(names.resolve_name(Tag::NULL), None);
    }
}
