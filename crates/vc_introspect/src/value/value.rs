use alloc::rc::Rc;
use alloc::string::{String, ToString};

use crate::value::{Object, ObjectRef};
use crate::{TypeHandle, builtin};

// -----------------------------------------------------------------------------
// EnumValue

/// A live enum value: its type and underlying integral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub ty: TypeHandle,
    pub value: i64,
}

// -----------------------------------------------------------------------------
// Value

/// One live value of an object graph.
///
/// Cloning a `Value` clones scalars and shares objects.
///
/// # Examples
///
/// ```
/// use vc_introspect::builtin;
/// use vc_introspect::value::Value;
///
/// assert_eq!(Value::from(42).runtime_type(), Some(builtin::INT));
/// assert_eq!(Value::from(42).display().as_deref(), Some("42"));
/// assert_eq!(Value::Null.runtime_type(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(Rc<str>),
    Enum(EnumValue),
    /// A type used as data.
    Type(TypeHandle),
    Object(ObjectRef),
    /// The flat-table index of a node built earlier in the same walk.
    Dehydrated(u32),
}

impl Value {
    /// Wraps `object` into a new shared [`Value::Object`].
    #[inline]
    pub fn object(object: impl Object + 'static) -> Self {
        Self::Object(Rc::new(object))
    }

    /// Creates an enum value.
    #[inline]
    pub fn enumeration(ty: TypeHandle, value: i64) -> Self {
        Self::Enum(EnumValue { ty, value })
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the shared object, if this is one.
    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the runtime type.
    ///
    /// Scalars report [`builtin`] handles, `Null` and `Dehydrated` report `None`.
    pub fn runtime_type(&self) -> Option<TypeHandle> {
        match self {
            Self::Null | Self::Dehydrated(_) => None,
            Self::Bool(_) => Some(builtin::BOOL),
            Self::Int(_) => Some(builtin::INT),
            Self::UInt(_) => Some(builtin::UINT),
            Self::Float(_) => Some(builtin::FLOAT),
            Self::Char(_) => Some(builtin::CHAR),
            Self::Str(_) => Some(builtin::STRING),
            Self::Enum(value) => Some(value.ty),
            Self::Type(_) => Some(builtin::TYPE),
            Self::Object(object) => Some(object.type_handle()),
        }
    }

    /// Returns the printable form.
    ///
    /// Enums print their underlying value, objects defer to
    /// [`Object::display`]; `Null`, types and dehydrated indices have none.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Null | Self::Type(_) | Self::Dehydrated(_) => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::UInt(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Char(value) => Some(value.to_string()),
            Self::Str(value) => Some(String::from(&**value)),
            Self::Enum(value) => Some(value.value.to_string()),
            Self::Object(object) => object.display(),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
    char => Char as char,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
