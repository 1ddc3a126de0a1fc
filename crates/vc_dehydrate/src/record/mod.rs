//! Records of the flat table.
//!
//! ## Menu
//!
//! - [`Record`]: the tagged union stored in a [`FlatTable`] slot.
//! - [`TypeDescriptor`], [`MemberDescriptor`], [`TagDescriptor`]: interned
//!   descriptions of types, members and tag instances.
//! - [`ValueNode`] / [`NodeKind`] / [`MemberSlot`]: the dehydrated form of one
//!   visited value.
//! - [`Link`]: an edge between records, either a flat-table index or a
//!   locally owned record.
//! - [`Index`]: a record's own slot, `-1` for local records.
//! - [`RecordRef`]: a borrowed non-string record.
//!
//! Every record kind implements [`RecordKind`].

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod member;
mod node;
mod table;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::TypeDescriptor;
pub use member::MemberDescriptor;
pub use node::{MemberSlot, NodeKind, ValueNode};
pub use table::FlatTable;
pub use tag::TagDescriptor;

// -----------------------------------------------------------------------------
// Imports

use alloc::boxed::Box;
use alloc::string::String;
use core::cell::Cell;
use core::fmt;

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// RecordId

/// A slot of the flat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RecordId(u32);

impl RecordId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Index

/// The index a record claims in the flat table.
///
/// Non-negative indices locate the record in the table once the walk
/// finishes; [`Index::LOCAL`] marks a locally constructed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Index(i32);

impl Index {
    /// The index of records that never appear in the flat table.
    pub const LOCAL: Self = Self(-1);

    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_local(self) -> bool {
        self.0 < 0
    }

    /// Returns the slot, `None` for negative indices.
    #[inline]
    pub const fn record_id(self) -> Option<RecordId> {
        if self.0 < 0 {
            None
        } else {
            Some(RecordId(self.0 as u32))
        }
    }
}

impl From<RecordId> for Index {
    #[inline]
    fn from(id: RecordId) -> Self {
        Self(id.0 as i32)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Record

/// One slot of the flat table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Record {
    /// A claimed slot whose content is not known yet.
    Placeholder,
    Str(String),
    Type(TypeDescriptor),
    Member(MemberDescriptor),
    Tag(TagDescriptor),
    Node(ValueNode),
}

impl Record {
    /// Returns the kind name used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Str(_) => "string",
            Self::Type(_) => TypeDescriptor::KIND,
            Self::Member(_) => MemberDescriptor::KIND,
            Self::Tag(_) => TagDescriptor::KIND,
            Self::Node(_) => ValueNode::KIND,
        }
    }

    #[inline]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Returns the record's claimed index, `None` for placeholders and strings.
    pub fn index(&self) -> Option<Index> {
        match self {
            Self::Placeholder | Self::Str(_) => None,
            Self::Type(record) => Some(record.index()),
            Self::Member(record) => Some(record.index()),
            Self::Tag(record) => Some(record.index()),
            Self::Node(record) => Some(record.index()),
        }
    }
}

// -----------------------------------------------------------------------------
// RecordRef

/// A borrowed non-string record.
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Type(&'a TypeDescriptor),
    Member(&'a MemberDescriptor),
    Tag(&'a TagDescriptor),
    Node(&'a ValueNode),
}

impl Record {
    /// Borrows a non-string record.
    pub fn as_record_ref(&self) -> Option<RecordRef<'_>> {
        match self {
            Self::Placeholder | Self::Str(_) => None,
            Self::Type(record) => Some(RecordRef::Type(record)),
            Self::Member(record) => Some(RecordRef::Member(record)),
            Self::Tag(record) => Some(RecordRef::Tag(record)),
            Self::Node(record) => Some(RecordRef::Node(record)),
        }
    }
}

// -----------------------------------------------------------------------------
// RecordKind

/// The common surface of the four non-string record kinds.
pub trait RecordKind: Sized {
    /// Name used in error messages.
    const KIND: &'static str;

    fn from_record(record: &Record) -> Option<&Self>;

    fn into_record(self) -> Record;

    /// The claimed index, [`Index::LOCAL`] for local records.
    fn index(&self) -> Index;

    /// The hydration guard. Never serialized.
    fn hydrated(&self) -> &Cell<bool>;

    fn as_record_ref(&self) -> RecordRef<'_>;

    #[inline]
    fn is_hydrated(&self) -> bool {
        self.hydrated().get()
    }
}

macro_rules! impl_record_kind {
    ($ty:ident, $variant:ident, $kind:literal) => {
        impl $crate::record::RecordKind for $ty {
            const KIND: &'static str = $kind;

            #[inline]
            fn from_record(record: &$crate::record::Record) -> Option<&Self> {
                match record {
                    $crate::record::Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            #[inline]
            fn into_record(self) -> $crate::record::Record {
                $crate::record::Record::$variant(self)
            }

            #[inline]
            fn index(&self) -> $crate::record::Index {
                self.index
            }

            #[inline]
            fn hydrated(&self) -> &::core::cell::Cell<bool> {
                &self.hydrated
            }

            #[inline]
            fn as_record_ref(&self) -> $crate::record::RecordRef<'_> {
                $crate::record::RecordRef::$variant(self)
            }
        }

        impl From<$ty> for $crate::record::Record {
            #[inline]
            fn from(record: $ty) -> Self {
                Self::$variant(record)
            }
        }
    };
}

pub(crate) use impl_record_kind;

// -----------------------------------------------------------------------------
// Link

/// An edge to another record.
///
/// `Id` resolves through the flat table, `Local` owns a record built in
/// place (its index is [`Index::LOCAL`], or the reserved root slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Link<T> {
    Id(RecordId),
    Local(Box<T>),
}

impl<T: RecordKind> Link<T> {
    /// Wraps a locally built record.
    #[inline]
    pub fn local(record: T) -> Self {
        Self::Local(Box::new(record))
    }

    /// Returns the table slot, `None` for local records.
    #[inline]
    pub fn id(&self) -> Option<RecordId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Local(_) => None,
        }
    }

    /// Resolves the link without checking the hydration state.
    pub fn get<'a>(&'a self, table: &'a FlatTable) -> Option<&'a T> {
        match self {
            Self::Id(id) => table.get(*id).and_then(T::from_record),
            Self::Local(record) => Some(&**record),
        }
    }
}
