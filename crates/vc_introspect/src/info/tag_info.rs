use crate::value::Value;
use crate::{MemberHandle, TagHandle, TypeHandle};

/// One tag instance (an annotation attached to a type or member).
///
/// `data` is the instance itself, usually an object of type `ty` whose members
/// hold the tag arguments.
#[derive(Debug, Clone)]
pub struct TagInfo {
    ty: TypeHandle,
    data: Value,
}

impl TagInfo {
    #[inline]
    pub fn new(ty: TypeHandle, data: Value) -> Self {
        Self { ty, data }
    }

    /// Returns the tag type.
    #[inline]
    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    /// Returns the tag instance data.
    #[inline]
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// Where tags are queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagTarget {
    Type(TypeHandle),
    Member(MemberHandle),
}

/// A tag found on a [`TagTarget`].
///
/// `inherited` is `true` when the tag is declared on a base type of the
/// queried type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagUse {
    pub tag: TagHandle,
    pub inherited: bool,
}
