use alloc::string::String;

use thiserror::Error;

use crate::{MemberHandle, TagHandle, TypeHandle};

// -----------------------------------------------------------------------------
// AccessError

/// Returned by a member accessor that could not produce a value.
///
/// The [`Display`](core::fmt::Display) form is the message a walker records
/// for the failing member.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("no member named `{0}`")]
    Missing(String),

    #[error("{0}")]
    Failed(String),
}

impl AccessError {
    /// Creates an [`AccessError::Failed`] with the given message.
    #[inline]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

// -----------------------------------------------------------------------------
// SchemaError

/// Errors raised while registering types, members or tags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("{0} is not registered")]
    UnknownType(TypeHandle),

    #[error("{0} is not registered")]
    UnknownMember(MemberHandle),

    #[error("{0} is not registered")]
    UnknownTag(TagHandle),

    #[error("a type with path `{0}` is already registered")]
    DuplicatePath(String),
}
