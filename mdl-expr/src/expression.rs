//! Expression nodes
//!
//! An expression is one of five kinds. Kind and type are fixed when the
//! node is created; only the payload (value, tag, index) can change, and
//! every mutator validates its input first. Nodes are shared through
//! `Arc`, so mutation goes through `&self` and is visible to every owner.

use crate::list::ExpressionList;
use crate::sync;
use mdl_common::{ExprError, Tag, TypeRef, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{self, AtomicU64, AtomicUsize};
use std::sync::{Arc, RwLock};

/// Shared reference to an expression node
pub type ExpressionRef = Arc<Expression>;

/// Node kind, in the order used by structural comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpressionKind {
    Constant,
    Call,
    Parameter,
    DirectCall,
    Temporary,
}

impl ExpressionKind {
    /// Discriminator byte in the serialized stream
    pub fn discriminator(self) -> u8 {
        match self {
            ExpressionKind::Constant => 0,
            ExpressionKind::Call => 1,
            ExpressionKind::Parameter => 2,
            ExpressionKind::DirectCall => 3,
            ExpressionKind::Temporary => 4,
        }
    }

    pub fn from_discriminator(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ExpressionKind::Constant),
            1 => Some(ExpressionKind::Call),
            2 => Some(ExpressionKind::Parameter),
            3 => Some(ExpressionKind::DirectCall),
            4 => Some(ExpressionKind::Temporary),
            _ => None,
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionKind::Constant => write!(f, "constant"),
            ExpressionKind::Call => write!(f, "call"),
            ExpressionKind::Parameter => write!(f, "parameter"),
            ExpressionKind::DirectCall => write!(f, "direct_call"),
            ExpressionKind::Temporary => write!(f, "temporary"),
        }
    }
}

/// A compiled, already typed expression
#[derive(Debug)]
pub enum Expression {
    Constant(ExpressionConstant),
    Call(ExpressionCall),
    Parameter(ExpressionParameter),
    DirectCall(ExpressionDirectCall),
    Temporary(ExpressionTemporary),
}

impl Expression {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Constant(_) => ExpressionKind::Constant,
            Expression::Call(_) => ExpressionKind::Call,
            Expression::Parameter(_) => ExpressionKind::Parameter,
            Expression::DirectCall(_) => ExpressionKind::DirectCall,
            Expression::Temporary(_) => ExpressionKind::Temporary,
        }
    }

    /// Type of the node, fixed at construction
    pub fn get_type(&self) -> TypeRef {
        match self {
            Expression::Constant(e) => e.get_type(),
            Expression::Call(e) => e.get_type(),
            Expression::Parameter(e) => e.get_type(),
            Expression::DirectCall(e) => e.get_type(),
            Expression::Temporary(e) => e.get_type(),
        }
    }

    pub fn as_constant(&self) -> Option<&ExpressionConstant> {
        match self {
            Expression::Constant(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&ExpressionCall> {
        match self {
            Expression::Call(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ExpressionParameter> {
        match self {
            Expression::Parameter(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_direct_call(&self) -> Option<&ExpressionDirectCall> {
        match self {
            Expression::DirectCall(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_temporary(&self) -> Option<&ExpressionTemporary> {
        match self {
            Expression::Temporary(e) => Some(e),
            _ => None,
        }
    }

    /// Approximate memory use in bytes, including owned children
    pub fn memory_consumption(&self) -> usize {
        match self {
            Expression::Constant(e) => e.memory_consumption(),
            Expression::Call(e) => e.memory_consumption(),
            Expression::Parameter(e) => e.memory_consumption(),
            Expression::DirectCall(e) => e.memory_consumption(),
            Expression::Temporary(e) => e.memory_consumption(),
        }
    }
}

/// A literal value
#[derive(Debug)]
pub struct ExpressionConstant {
    ty: TypeRef,
    value: RwLock<ValueRef>,
}

impl ExpressionConstant {
    pub(crate) fn new(ty: TypeRef, value: ValueRef) -> Self {
        Self {
            ty,
            value: RwLock::new(value),
        }
    }

    pub fn get_type(&self) -> TypeRef {
        Arc::clone(&self.ty)
    }

    pub fn get_value(&self) -> ValueRef {
        Arc::clone(&*sync::read(&self.value))
    }

    /// Replace the value
    ///
    /// The node type is not re-derived from the new value; the replacement
    /// must have the same type as the one it replaces.
    pub fn set_value(&self, value: ValueRef) {
        *sync::write(&self.value) = value;
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>() + self.ty.memory_consumption() + self.get_value().memory_consumption()
    }
}

/// A call of a function definition stored in the database
#[derive(Debug)]
pub struct ExpressionCall {
    ty: TypeRef,
    tag: AtomicU64,
}

impl ExpressionCall {
    /// `tag` must be valid; the factory checks this
    pub(crate) fn new(ty: TypeRef, tag: Tag) -> Self {
        debug_assert!(tag.is_valid());
        Self {
            ty,
            tag: AtomicU64::new(tag.raw()),
        }
    }

    pub fn get_type(&self) -> TypeRef {
        Arc::clone(&self.ty)
    }

    pub fn get_call(&self) -> Tag {
        Tag::new(self.tag.load(atomic::Ordering::Acquire))
    }

    pub fn set_call(&self, tag: Tag) -> Result<(), ExprError> {
        if !tag.is_valid() {
            return Err(ExprError::InvalidTag);
        }
        self.tag.store(tag.raw(), atomic::Ordering::Release);
        Ok(())
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>() + self.ty.memory_consumption()
    }
}

/// Reference to a parameter of the enclosing signature
#[derive(Debug)]
pub struct ExpressionParameter {
    ty: TypeRef,
    index: AtomicUsize,
}

impl ExpressionParameter {
    pub(crate) fn new(ty: TypeRef, index: usize) -> Self {
        Self {
            ty,
            index: AtomicUsize::new(index),
        }
    }

    pub fn get_type(&self) -> TypeRef {
        Arc::clone(&self.ty)
    }

    pub fn get_index(&self) -> usize {
        self.index.load(atomic::Ordering::Acquire)
    }

    pub fn set_index(&self, index: usize) {
        self.index.store(index, atomic::Ordering::Release);
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>() + self.ty.memory_consumption()
    }
}

/// A call with its arguments bound inline
#[derive(Debug)]
pub struct ExpressionDirectCall {
    ty: TypeRef,
    tag: AtomicU64,
    arguments: Arc<ExpressionList>,
}

impl ExpressionDirectCall {
    /// `tag` must be valid; the factory checks this
    pub(crate) fn new(ty: TypeRef, tag: Tag, arguments: Arc<ExpressionList>) -> Self {
        debug_assert!(tag.is_valid());
        Self {
            ty,
            tag: AtomicU64::new(tag.raw()),
            arguments,
        }
    }

    pub fn get_type(&self) -> TypeRef {
        Arc::clone(&self.ty)
    }

    pub fn get_definition(&self) -> Tag {
        Tag::new(self.tag.load(atomic::Ordering::Acquire))
    }

    pub fn set_definition(&self, tag: Tag) -> Result<(), ExprError> {
        if !tag.is_valid() {
            return Err(ExprError::InvalidTag);
        }
        self.tag.store(tag.raw(), atomic::Ordering::Release);
        Ok(())
    }

    /// The bound arguments, shared with whoever else holds the list
    pub fn get_arguments(&self) -> Arc<ExpressionList> {
        Arc::clone(&self.arguments)
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>() + self.ty.memory_consumption() + self.arguments.memory_consumption()
    }
}

/// Reference to a precomputed sub-expression of the enclosing body
#[derive(Debug)]
pub struct ExpressionTemporary {
    ty: TypeRef,
    index: AtomicUsize,
}

impl ExpressionTemporary {
    pub(crate) fn new(ty: TypeRef, index: usize) -> Self {
        Self {
            ty,
            index: AtomicUsize::new(index),
        }
    }

    pub fn get_type(&self) -> TypeRef {
        Arc::clone(&self.ty)
    }

    pub fn get_index(&self) -> usize {
        self.index.load(atomic::Ordering::Acquire)
    }

    pub fn set_index(&self, index: usize) {
        self.index.store(index, atomic::Ordering::Release);
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>() + self.ty.memory_consumption()
    }
}
