//! Error handling for the expression IR
//!
//! Two failure families exist. `ExprError` is a rejected input to a creator,
//! mutator or container operation; the object it was applied to is left
//! unchanged. `SerialError` is a hard failure of a serialized stream and
//! aborts the whole (de)serialization.

use thiserror::Error;

/// Status code reported for a successful operation
pub const STATUS_OK: i32 = 0;

/// Rejected input to a creator, mutator or container operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("invalid tag: the null tag cannot be referenced")]
    InvalidTag,

    #[error("index {index} out of range for container of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("no entry named '{name}'")]
    NameNotFound { name: String },

    #[error("an entry named '{name}' already exists")]
    DuplicateName { name: String },
}

impl ExprError {
    /// Negative status code for callers that only distinguish success from rejection
    pub fn status(&self) -> i32 {
        match self {
            ExprError::InvalidTag => -1,
            ExprError::IndexOutOfRange { .. }
            | ExprError::NameNotFound { .. }
            | ExprError::DuplicateName { .. } => -2,
        }
    }
}

/// Collapse a result into the `0` / negative status convention
pub fn status<T>(result: &Result<T, ExprError>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.status(),
    }
}

/// Unrecoverable failure while reading or writing a serialized stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerialError {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("integer overflow while decoding")]
    Overflow,

    #[error("invalid utf-8 in string")]
    InvalidUtf8,

    #[error("invalid expression kind discriminator: {kind}")]
    InvalidKind { kind: u8 },

    #[error("null tag found in stream")]
    InvalidTag,

    #[error("duplicate entry name '{name}' in stream")]
    DuplicateName { name: String },

    #[error("invalid value encoding: {message}")]
    InvalidValue { message: String },

    #[error("expressions nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("missing or corrupt file header")]
    BadHeader,

    #[error("unsupported format version {version}")]
    UnsupportedVersion { version: u8 },

    #[error("{remaining} trailing bytes after decoded object")]
    TrailingBytes { remaining: usize },
}

impl From<std::string::FromUtf8Error> for SerialError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        SerialError::InvalidUtf8
    }
}
