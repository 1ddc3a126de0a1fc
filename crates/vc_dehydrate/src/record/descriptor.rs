use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use serde::{Deserialize, Serialize};
use vc_introspect::{EnumVariant, Shape};

use super::{Index, Link, MemberDescriptor, TagDescriptor, impl_record_kind};

/// The interned description of one type.
///
/// A nullable wrapper is described by its inner type with `nullable` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub(crate) index: Index,
    #[serde(skip)]
    pub(crate) hydrated: Cell<bool>,
    pub name: String,
    pub full_name: String,
    /// The qualified name (full name plus defining unit).
    pub qualified_name: String,
    pub namespace: Option<String>,
    pub display: String,
    pub shape: Shape,
    pub nullable: bool,
    pub numeric: bool,
    pub array: bool,
    pub default: Option<String>,
    pub base: Option<Link<TypeDescriptor>>,
    /// The element type of a collection, the entry type of a dictionary.
    pub element: Option<Link<TypeDescriptor>>,
    pub params: Vec<Link<TypeDescriptor>>,
    pub members: Vec<Link<MemberDescriptor>>,
    pub tags: Vec<Link<TagDescriptor>>,
    pub enum_values: Vec<EnumVariant>,
}

impl_record_kind!(TypeDescriptor, Type, "type");

impl TypeDescriptor {
    /// The namespace of locally constructed templates.
    pub const LOCAL_NAMESPACE: &'static str = "Dynamic";

    /// Creates a local placeholder type for a manually assembled model.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_dehydrate::record::{RecordKind, TypeDescriptor};
    ///
    /// let ty = TypeDescriptor::local("Form", []);
    /// assert!(ty.index().is_local());
    /// assert_eq!(ty.full_name, "Dynamic::Form");
    /// ```
    pub fn local(
        name: impl Into<String>,
        members: impl IntoIterator<Item = Link<MemberDescriptor>>,
    ) -> Self {
        let name = name.into();
        let full_name = format!("{}::{name}", Self::LOCAL_NAMESPACE);
        Self {
            index: Index::LOCAL,
            hydrated: Cell::new(false),
            qualified_name: full_name.clone(),
            display: full_name.clone(),
            full_name,
            name,
            namespace: Some(Self::LOCAL_NAMESPACE.into()),
            shape: Shape::Reference,
            nullable: true,
            numeric: false,
            array: false,
            default: None,
            base: None,
            element: None,
            params: Vec::new(),
            members: members.into_iter().collect(),
            tags: Vec::new(),
            enum_values: Vec::new(),
        }
    }
}
