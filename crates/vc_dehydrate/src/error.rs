use alloc::string::String;

use thiserror::Error;
use vc_introspect::{MemberHandle, Shape, TagHandle, TypeHandle};

use crate::key::DehydrationKey;
use crate::record::{Index, RecordId};

// -----------------------------------------------------------------------------
// DehydrateError

/// A fatal error of a dehydration walk.
///
/// These indicate integration mistakes, never data problems: a failing member
/// accessor is recorded in the exception table instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DehydrateError {
    #[error("key {0:?} is already claimed")]
    DuplicateKey(DehydrationKey),

    #[error("cannot finalize a record with index {0}")]
    InvalidState(Index),

    #[error("key {0:?} was never claimed")]
    KeyNotFound(DehydrationKey),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is unknown to the introspector")]
    UnknownType(TypeHandle),

    #[error("{0} is unknown to the introspector")]
    UnknownMember(MemberHandle),

    #[error("{0} is unknown to the introspector")]
    UnknownTag(TagHandle),

    #[error("a value of {ty} does not provide {expected} content")]
    ShapeMismatch { ty: TypeHandle, expected: Shape },

    #[error("walk exceeded the maximum depth of {0}")]
    DepthExceeded(usize),
}

// -----------------------------------------------------------------------------
// HydrateError

/// A fatal error of hydration: the flat table does not match the tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HydrateError {
    #[error("record {0} is not in the flat table")]
    MissingIndex(RecordId),

    #[error("record {0} is still an unfilled placeholder")]
    UnfilledPlaceholder(RecordId),

    #[error("record {index} is a {found} record, expected a {expected} record")]
    KindMismatch {
        index: RecordId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("record {0} is not a string")]
    MissingString(RecordId),

    #[error("exception {0} is not in the exception table")]
    MissingException(u32),
}

// -----------------------------------------------------------------------------
// SettingsError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("a tag allow list and a tag deny list cannot both be set")]
    ConflictingTagLists,

    #[error("{0} is unknown to the introspector")]
    UnknownMember(MemberHandle),
}
