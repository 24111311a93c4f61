//! A small reference value system
//!
//! The real value and type systems live outside the IR. This one is just
//! rich enough to build material graphs for tools and tests: a handful of
//! scalar types, colors and strings, plus the opaque `bsdf` and `material`
//! types that only calls produce.

use crate::error::SerialError;
use crate::serial::{Deserializer, Serializer};
use crate::value::{Type, TypeRef, Value, ValueFactory, ValueRef};
use log::warn;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

const FOREIGN_CODE: u8 = 0xff;

/// Types of the reference value system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BasicType {
    Bool,
    Int,
    Float,
    Color,
    String,
    Bsdf,
    Material,
}

impl BasicType {
    fn code(self) -> u8 {
        match self {
            BasicType::Bool => 0,
            BasicType::Int => 1,
            BasicType::Float => 2,
            BasicType::Color => 3,
            BasicType::String => 4,
            BasicType::Bsdf => 5,
            BasicType::Material => 6,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(BasicType::Bool),
            1 => Some(BasicType::Int),
            2 => Some(BasicType::Float),
            3 => Some(BasicType::Color),
            4 => Some(BasicType::String),
            5 => Some(BasicType::Bsdf),
            6 => Some(BasicType::Material),
            _ => None,
        }
    }

    /// Shared handle, ready to be stored in an expression
    pub fn shared(self) -> TypeRef {
        Arc::new(self)
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicType::Bool => write!(f, "bool"),
            BasicType::Int => write!(f, "int"),
            BasicType::Float => write!(f, "float"),
            BasicType::Color => write!(f, "color"),
            BasicType::String => write!(f, "string"),
            BasicType::Bsdf => write!(f, "bsdf"),
            BasicType::Material => write!(f, "material"),
        }
    }
}

impl Type for BasicType {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>()
    }
}

/// Values of the reference value system
#[derive(Debug, Clone, PartialEq)]
pub enum BasicValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Color([f32; 3]),
    String(String),
}

impl BasicValue {
    pub fn get_type(&self) -> BasicType {
        match self {
            BasicValue::Bool(_) => BasicType::Bool,
            BasicValue::Int(_) => BasicType::Int,
            BasicValue::Float(_) => BasicType::Float,
            BasicValue::Color(_) => BasicType::Color,
            BasicValue::String(_) => BasicType::String,
        }
    }

    /// Shared handle, ready to be stored in a constant
    pub fn shared(self) -> ValueRef {
        Arc::new(self)
    }

    fn compare(&self, other: &BasicValue) -> Ordering {
        match (self, other) {
            (BasicValue::Bool(a), BasicValue::Bool(b)) => a.cmp(b),
            (BasicValue::Int(a), BasicValue::Int(b)) => a.cmp(b),
            (BasicValue::Float(a), BasicValue::Float(b)) => a.total_cmp(b),
            (BasicValue::Color(a), BasicValue::Color(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
            (BasicValue::String(a), BasicValue::String(b)) => a.cmp(b),
            _ => self.get_type().cmp(&other.get_type()),
        }
    }
}

impl fmt::Display for BasicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicValue::Bool(b) => write!(f, "{b}"),
            BasicValue::Int(n) => write!(f, "{n}"),
            BasicValue::Float(x) => write!(f, "{x:?}"),
            BasicValue::Color([r, g, b]) => write!(f, "color({r:?}, {g:?}, {b:?})"),
            BasicValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl Value for BasicValue {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn memory_consumption(&self) -> usize {
        let heap = match self {
            BasicValue::String(s) => s.capacity(),
            _ => 0,
        };
        std::mem::size_of::<Self>() + heap
    }
}

fn as_basic_type(ty: &dyn Type) -> Option<BasicType> {
    ty.as_any().downcast_ref::<BasicType>().copied()
}

fn as_basic_value(value: &dyn Value) -> Option<&BasicValue> {
    value.as_any().downcast_ref::<BasicValue>()
}

/// Value factory over `BasicType` / `BasicValue`
///
/// Types and values of other systems are ordered by their display text and
/// serialize to a marker that refuses to decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicValueFactory;

impl BasicValueFactory {
    pub fn new() -> Self {
        BasicValueFactory
    }
}

impl ValueFactory for BasicValueFactory {
    fn type_of(&self, value: &dyn Value) -> TypeRef {
        match as_basic_value(value) {
            Some(v) => v.get_type().shared(),
            None => {
                warn!("type_of: foreign value '{value}', reporting it as string");
                BasicType::String.shared()
            }
        }
    }

    fn compare_types(&self, lhs: &dyn Type, rhs: &dyn Type) -> Ordering {
        match (as_basic_type(lhs), as_basic_type(rhs)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => lhs.to_string().cmp(&rhs.to_string()),
        }
    }

    fn compare_values(&self, lhs: &dyn Value, rhs: &dyn Value) -> Ordering {
        match (as_basic_value(lhs), as_basic_value(rhs)) {
            (Some(a), Some(b)) => a.compare(b),
            _ => lhs.to_string().cmp(&rhs.to_string()),
        }
    }

    fn serialize_type(&self, serializer: &mut dyn Serializer, ty: &dyn Type) {
        match as_basic_type(ty) {
            Some(t) => serializer.write_u8(t.code()),
            None => {
                warn!("serialize_type: foreign type '{ty}' cannot be persisted");
                serializer.write_u8(FOREIGN_CODE);
            }
        }
    }

    fn deserialize_type(&self, deserializer: &mut dyn Deserializer) -> Result<TypeRef, SerialError> {
        let code = deserializer.read_u8()?;
        BasicType::from_code(code)
            .map(BasicType::shared)
            .ok_or_else(|| SerialError::InvalidValue {
                message: format!("unknown type code {code}"),
            })
    }

    fn serialize_value(&self, serializer: &mut dyn Serializer, value: &dyn Value) {
        let Some(value) = as_basic_value(value) else {
            warn!("serialize_value: foreign value '{value}' cannot be persisted");
            serializer.write_u8(FOREIGN_CODE);
            return;
        };

        serializer.write_u8(value.get_type().code());
        match value {
            BasicValue::Bool(b) => serializer.write_bool(*b),
            BasicValue::Int(n) => serializer.write_u64(*n as u32 as u64),
            BasicValue::Float(x) => serializer.write_u64(x.to_bits() as u64),
            BasicValue::Color(rgb) => {
                for c in rgb.iter() {
                    serializer.write_u64(c.to_bits() as u64);
                }
            }
            BasicValue::String(s) => serializer.write_str(s),
        }
    }

    fn deserialize_value(&self, deserializer: &mut dyn Deserializer) -> Result<ValueRef, SerialError> {
        let code = deserializer.read_u8()?;
        let value = match BasicType::from_code(code) {
            Some(BasicType::Bool) => BasicValue::Bool(deserializer.read_bool()?),
            Some(BasicType::Int) => BasicValue::Int(read_u32(deserializer)? as i32),
            Some(BasicType::Float) => BasicValue::Float(f32::from_bits(read_u32(deserializer)?)),
            Some(BasicType::Color) => {
                let mut rgb = [0.0f32; 3];
                for c in rgb.iter_mut() {
                    *c = f32::from_bits(read_u32(deserializer)?);
                }
                BasicValue::Color(rgb)
            }
            Some(BasicType::String) => BasicValue::String(deserializer.read_string()?),
            _ => {
                return Err(SerialError::InvalidValue {
                    message: format!("no values of type code {code}"),
                })
            }
        };
        Ok(value.shared())
    }
}

fn read_u32(deserializer: &mut dyn Deserializer) -> Result<u32, SerialError> {
    u32::try_from(deserializer.read_u64()?).map_err(|_| SerialError::Overflow)
}
