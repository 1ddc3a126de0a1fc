use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{MemberInfo, Shape, TagInfo, TagTarget, TagUse, TypeInfo};
use crate::{MemberHandle, TagHandle, TypeHandle};

/// Read-only access to the type system a walker inspects.
///
/// Handles returned by one method are always resolvable through the others of
/// the same introspector.
pub trait TypeIntrospector {
    /// Returns the information of `ty`, `None` if it is unknown.
    fn type_info(&self, ty: TypeHandle) -> Option<&TypeInfo>;

    fn member_info(&self, member: MemberHandle) -> Option<&MemberInfo>;

    fn tag_info(&self, tag: TagHandle) -> Option<&TagInfo>;

    /// Returns the readable members of `ty` in declaration order, own members
    /// first then those declared along the base chain.
    fn members(&self, ty: TypeHandle) -> Vec<MemberHandle>;

    /// Returns the tags on `target`.
    ///
    /// For a type, tags declared on its base chain follow with
    /// `inherited = true`.
    fn tags_on(&self, target: TagTarget) -> Vec<TagUse>;

    /// Classifies `ty`, looking through nullable wrappers.
    ///
    /// Unknown types classify as [`Shape::Null`].
    fn classify_shape(&self, ty: TypeHandle) -> Shape {
        let Some(info) = self.type_info(ty) else {
            return Shape::Null;
        };
        match info.nullable_of() {
            Some(inner) if inner != ty => self.classify_shape(inner),
            _ => info.shape(),
        }
    }

    /// Returns the printable default value of `ty`.
    fn default_value(&self, ty: TypeHandle) -> Option<String> {
        self.type_info(ty)
            .and_then(TypeInfo::default_value)
            .map(ToOwned::to_owned)
    }

    /// Returns `true` if `ty` admits a null value.
    fn is_nullable(&self, ty: TypeHandle) -> bool {
        match self.type_info(ty) {
            Some(info) => {
                info.nullable_of().is_some() || !matches!(info.shape(), Shape::Value | Shape::Enum)
            }
            None => true,
        }
    }
}
