use alloc::rc::Rc;
use alloc::string::String;

use vc_introspect::value::{Value, object_address};
use vc_introspect::{MemberHandle, TagHandle, TypeHandle};

// -----------------------------------------------------------------------------
// DehydrationKey

/// Identifies "the same logical thing" within one walk.
///
/// Descriptors are keyed by their handle, strings by value. Value nodes are
/// keyed by `(member, type, identity)`, where objects use reference identity
/// and leave `member` empty: a shared instance is expanded once no matter
/// through which member it is reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DehydrationKey {
    Value {
        member: Option<MemberKey>,
        ty: TypeHandle,
        identity: Identity,
    },
    Type(TypeHandle),
    Member(MemberHandle),
    Tag {
        tag: TagHandle,
        inherited: bool,
    },
    Str(String),
}

impl DehydrationKey {
    /// Keys `value` as seen through `member` with effective type `ty`.
    pub fn value(member: Option<&MemberKey>, ty: TypeHandle, value: &Value) -> Self {
        let identity = Identity::of(value);
        let member = match identity {
            Identity::Object(_) => None,
            _ => member.cloned(),
        };
        Self::Value {
            member,
            ty,
            identity,
        }
    }
}

// -----------------------------------------------------------------------------
// MemberKey

/// The member naming a value: a real member, or a bare name for local roots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberKey {
    Handle(MemberHandle),
    Named(String),
}

impl From<MemberHandle> for MemberKey {
    #[inline]
    fn from(member: MemberHandle) -> Self {
        Self::Handle(member)
    }
}

// -----------------------------------------------------------------------------
// Identity

/// The identity part of a value key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Null,
    /// Address of a shared object.
    Object(usize),
    Scalar(ScalarKey),
    /// A node built earlier in the same walk.
    Record(u32),
    /// A member whose access failed with the given exception index.
    Failed(u32),
}

impl Identity {
    /// Returns the identity of `value`.
    pub fn of(value: &Value) -> Self {
        let scalar = match value {
            Value::Null => return Self::Null,
            Value::Object(object) => return Self::Object(object_address(object)),
            Value::Dehydrated(index) => return Self::Record(*index),
            Value::Bool(value) => ScalarKey::Bool(*value),
            Value::Int(value) => ScalarKey::Int(*value),
            Value::UInt(value) => ScalarKey::UInt(*value),
            Value::Float(value) => ScalarKey::Float(value.to_bits()),
            Value::Char(value) => ScalarKey::Char(*value),
            Value::Str(value) => ScalarKey::Str(Rc::clone(value)),
            Value::Enum(value) => ScalarKey::Enum(value.value),
            Value::Type(ty) => ScalarKey::Type(*ty),
        };
        Self::Scalar(scalar)
    }
}

/// A scalar compared by value. Floats compare by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Char(char),
    Str(Rc<str>),
    Enum(i64),
    Type(TypeHandle),
}
