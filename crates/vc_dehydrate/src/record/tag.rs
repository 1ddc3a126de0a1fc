use core::cell::Cell;

use serde::{Deserialize, Serialize};

use super::{Index, Link, TypeDescriptor, ValueNode, impl_record_kind};

/// The interned description of one tag instance on a type or member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDescriptor {
    pub(crate) index: Index,
    #[serde(skip)]
    pub(crate) hydrated: Cell<bool>,
    pub ty: Link<TypeDescriptor>,
    /// `true` when declared on a base type of the tagged type.
    pub inherited: bool,
    /// The tag instance's own data.
    pub data: Link<ValueNode>,
}

impl_record_kind!(TagDescriptor, Tag, "tag");
