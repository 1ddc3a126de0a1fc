use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::TypeHandle;
use crate::info::Shape;

// -----------------------------------------------------------------------------
// EnumVariant

/// One `(label, value)` pair of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumVariant {
    pub label: String,
    pub value: i64,
}

impl EnumVariant {
    #[inline]
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Runtime information of one type.
///
/// # Content
///
/// - **path**: full, unique name (e.g. `library::Book`).
/// - **name**: the path without module prefix, may be duplicated.
/// - **module**: optional module path (e.g. `library`).
/// - **unit**: the defining unit (crate), used for visibility checks and the
///   qualified name.
/// - **shape**: see [`Shape`].
/// - links to the base type, collection element type, dictionary entry type,
///   generic parameters and the wrapped type of a nullable wrapper.
///
/// # Examples
///
/// ```
/// use vc_introspect::{Shape, TypeInfo};
///
/// let info = TypeInfo::composite("library::shelf::Book").with_unit("library");
///
/// assert_eq!(info.name(), "Book");
/// assert_eq!(info.module(), Some("library::shelf"));
/// assert_eq!(info.qualified_name(), "library::shelf::Book, library");
/// assert_eq!(info.shape(), Shape::Reference);
/// ```
#[derive(Debug, Clone)]
pub struct TypeInfo {
    path: String,
    name: String,
    module: Option<String>,
    unit: Option<String>,
    display: Option<String>,
    shape: Shape,
    visible: bool,
    numeric: bool,
    array: bool,
    default: Option<String>,
    base: Option<TypeHandle>,
    element: Option<TypeHandle>,
    entry: Option<TypeHandle>,
    nullable_of: Option<TypeHandle>,
    generics: Vec<TypeHandle>,
    enum_values: Vec<EnumVariant>,
}

impl TypeInfo {
    /// Creates a [`TypeInfo`] with the given shape and full path.
    pub fn new(shape: Shape, path: impl Into<String>) -> Self {
        let path = path.into();
        let (module, name) = split_path(&path);
        Self {
            name: name.to_owned(),
            module: module.map(ToOwned::to_owned),
            path,
            unit: None,
            display: None,
            shape,
            visible: true,
            numeric: false,
            array: false,
            default: None,
            base: None,
            element: None,
            entry: None,
            nullable_of: None,
            generics: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    /// A type walked member by member.
    #[inline]
    pub fn composite(path: impl Into<String>) -> Self {
        Self::new(Shape::Reference, path)
    }

    /// A type with a printable scalar form.
    #[inline]
    pub fn scalar(path: impl Into<String>) -> Self {
        Self::new(Shape::Value, path)
    }

    /// An enum type with its `(label, value)` variants. Defaults to `"0"`.
    pub fn enumeration(path: impl Into<String>, variants: impl IntoIterator<Item = EnumVariant>) -> Self {
        Self {
            enum_values: variants.into_iter().collect(),
            default: Some("0".to_owned()),
            numeric: true,
            ..Self::new(Shape::Enum, path)
        }
    }

    /// A collection type over `element`.
    pub fn collection(path: impl Into<String>, element: TypeHandle) -> Self {
        Self {
            element: Some(element),
            generics: alloc::vec![element],
            ..Self::new(Shape::Collection, path)
        }
    }

    /// A dictionary type whose entries have type `entry`.
    pub fn dictionary(path: impl Into<String>, entry: TypeHandle) -> Self {
        Self {
            entry: Some(entry),
            ..Self::new(Shape::Dictionary, path)
        }
    }

    pub(crate) fn nullable(path: impl Into<String>, inner: TypeHandle, shape: Shape) -> Self {
        Self {
            nullable_of: Some(inner),
            generics: alloc::vec![inner],
            ..Self::new(shape, path)
        }
    }

    // -------------------------------------------------------------------------
    // Builders

    /// Sets the defining unit.
    pub fn with_unit(self, unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..self
        }
    }

    /// Marks the type as not visible outside its defining unit.
    pub fn private_to(self, unit: impl Into<String>) -> Self {
        Self {
            visible: false,
            ..self.with_unit(unit)
        }
    }

    /// Overrides the string form, which defaults to the path.
    pub fn with_display(self, display: impl Into<String>) -> Self {
        Self {
            display: Some(display.into()),
            ..self
        }
    }

    /// Sets the printable default value.
    pub fn with_default(self, default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            ..self
        }
    }

    /// Sets the base type.
    pub fn with_base(self, base: TypeHandle) -> Self {
        Self {
            base: Some(base),
            ..self
        }
    }

    /// Replaces the generic parameters.
    pub fn with_generics(self, generics: impl IntoIterator<Item = TypeHandle>) -> Self {
        Self {
            generics: generics.into_iter().collect(),
            ..self
        }
    }

    /// Marks the type as numeric.
    pub fn numeric(self) -> Self {
        Self {
            numeric: true,
            ..self
        }
    }

    /// Marks the type as a fixed-size array.
    pub fn array(self) -> Self {
        Self {
            array: true,
            ..self
        }
    }

    // -------------------------------------------------------------------------
    // Accessors

    /// Returns the full path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the name without module path.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module path, if any.
    #[inline]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Returns the defining unit, if any.
    #[inline]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns `"{path}, {unit}"`, or the path alone without a unit.
    pub fn qualified_name(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{}, {unit}", self.path),
            None => self.path.clone(),
        }
    }

    /// Returns the string form.
    #[inline]
    pub fn display(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.path)
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.array
    }

    /// Returns the printable default value, if the type has one.
    #[inline]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[inline]
    pub fn base(&self) -> Option<TypeHandle> {
        self.base
    }

    /// Returns the element type of a collection.
    #[inline]
    pub fn element(&self) -> Option<TypeHandle> {
        self.element
    }

    /// Returns the entry type of a dictionary.
    #[inline]
    pub fn entry(&self) -> Option<TypeHandle> {
        self.entry
    }

    /// Returns the wrapped type if this is a nullable wrapper.
    #[inline]
    pub fn nullable_of(&self) -> Option<TypeHandle> {
        self.nullable_of
    }

    #[inline]
    pub fn generics(&self) -> &[TypeHandle] {
        &self.generics
    }

    #[inline]
    pub fn enum_values(&self) -> &[EnumVariant] {
        &self.enum_values
    }
}

// -----------------------------------------------------------------------------
// Path utils

/// Splits `path` at its last `::` outside of generic brackets.
fn split_path(path: &str) -> (Option<&str>, &str) {
    let mut depth = 0_usize;
    let mut split = None;
    let bytes = path.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'<' | b'[' | b'(' => depth += 1,
            b'>' | b']' | b')' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
                split = Some(index);
                index += 1;
            }
            _ => {}
        }
        index += 1;
    }
    match split {
        Some(at) => (Some(&path[..at]), &path[at + 2..]),
        None => (None, path),
    }
}
