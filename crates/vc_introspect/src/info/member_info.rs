use alloc::string::String;

use crate::TypeHandle;

/// Information for one data member of a composite type.
///
/// The declaring type is filled in by the registry when the member is added to
/// a type; dynamic members have none.
///
/// # Examples
///
/// ```
/// use vc_introspect::{MemberInfo, builtin};
///
/// let info = MemberInfo::new("title", builtin::STRING);
///
/// assert_eq!(info.name(), "title");
/// assert!(info.is_readable());
/// assert!(!info.is_indexed());
/// assert_eq!(info.declaring(), None);
/// ```
#[derive(Debug, Clone)]
pub struct MemberInfo {
    name: String,
    ty: TypeHandle,
    declaring: Option<TypeHandle>,
    readable: bool,
    indexed: bool,
}

impl MemberInfo {
    /// Creates a readable, non-indexed member named `name` of type `ty`.
    #[inline]
    pub fn new(name: impl Into<String>, ty: TypeHandle) -> Self {
        Self {
            name: name.into(),
            ty,
            declaring: None,
            readable: true,
            indexed: false,
        }
    }

    /// Marks the member as having no externally readable accessor.
    pub fn write_only(self) -> Self {
        Self {
            readable: false,
            ..self
        }
    }

    /// Marks the member as an indexer (requires arguments to read).
    pub fn indexed(self) -> Self {
        Self {
            indexed: true,
            ..self
        }
    }

    #[inline]
    pub(crate) fn declared_on(self, declaring: Option<TypeHandle>) -> Self {
        Self { declaring, ..self }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type of the member.
    #[inline]
    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    /// Returns the type declaring this member, `None` for dynamic members.
    #[inline]
    pub fn declaring(&self) -> Option<TypeHandle> {
        self.declaring
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }
}
