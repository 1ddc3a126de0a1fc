use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use serde::{Deserialize, Serialize};

use super::{Index, Link, TagDescriptor, TypeDescriptor, impl_record_kind};

/// The interned description of one data member.
///
/// Local members (the name of a top-level walk or of a local list) carry a
/// name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub(crate) index: Index,
    #[serde(skip)]
    pub(crate) hydrated: Cell<bool>,
    pub name: String,
    pub ty: Option<Link<TypeDescriptor>>,
    pub owner: Option<Link<TypeDescriptor>>,
    pub tags: Vec<Link<TagDescriptor>>,
}

impl_record_kind!(MemberDescriptor, Member, "member");

impl MemberDescriptor {
    /// Creates a local member with only a name.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            index: Index::LOCAL,
            hydrated: Cell::new(false),
            name: name.into(),
            ty: None,
            owner: None,
            tags: Vec::new(),
        }
    }

    /// Sets the declared type.
    pub fn with_type(self, ty: Link<TypeDescriptor>) -> Self {
        Self {
            ty: Some(ty),
            ..self
        }
    }
}
