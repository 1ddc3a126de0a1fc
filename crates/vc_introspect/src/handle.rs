use core::fmt;

// -----------------------------------------------------------------------------
// Handles

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from its raw index.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw index.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_handle! {
    /// Identifies one type known to an introspector.
    TypeHandle => "type"
}

define_handle! {
    /// Identifies one data member known to an introspector.
    MemberHandle => "member"
}

define_handle! {
    /// Identifies one tag instance attached to a type or member.
    TagHandle => "tag"
}

// -----------------------------------------------------------------------------
// Builtin

/// Type handles every introspector resolves the same way.
///
/// Scalar [`Value`](crate::value::Value)s report these as their runtime type.
pub mod builtin {
    use super::TypeHandle;

    /// The universal base type. Members declared with it hold any value.
    pub const OBJECT: TypeHandle = TypeHandle::from_raw(0);
    pub const BOOL: TypeHandle = TypeHandle::from_raw(1);
    pub const INT: TypeHandle = TypeHandle::from_raw(2);
    pub const UINT: TypeHandle = TypeHandle::from_raw(3);
    pub const FLOAT: TypeHandle = TypeHandle::from_raw(4);
    pub const CHAR: TypeHandle = TypeHandle::from_raw(5);
    pub const STRING: TypeHandle = TypeHandle::from_raw(6);
    /// The type of [`Value::Type`](crate::value::Value::Type) values.
    pub const TYPE: TypeHandle = TypeHandle::from_raw(7);
    /// The type describing data members themselves.
    pub const MEMBER: TypeHandle = TypeHandle::from_raw(8);

    pub(crate) const COUNT: u32 = 9;
}
