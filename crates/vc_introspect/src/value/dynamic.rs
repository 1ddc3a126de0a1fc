use alloc::borrow::ToOwned;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::AccessError;
use crate::TypeHandle;
use crate::value::{Object, ObjectRef, Value};

// -----------------------------------------------------------------------------
// DynamicStruct

/// A composite object with named members.
///
/// Members can be replaced through a shared reference with
/// [`set`](DynamicStruct::set), which is how self-referencing graphs are tied.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use vc_introspect::builtin;
/// use vc_introspect::value::{DynamicStruct, Object, Value};
///
/// let node = Rc::new(DynamicStruct::new(builtin::OBJECT).with("next", Value::Null));
/// node.set("next", Value::Object(node.clone()));
///
/// let next = node.get("next").unwrap();
/// assert!(Rc::ptr_eq(next.as_object().unwrap(), &(node.clone() as Rc<dyn Object>)));
/// ```
pub struct DynamicStruct {
    ty: TypeHandle,
    members: RefCell<Vec<(String, Value)>>,
    display: Option<String>,
}

impl DynamicStruct {
    /// Creates an object of type `ty` without members.
    #[inline]
    pub fn new(ty: TypeHandle) -> Self {
        Self {
            ty,
            members: RefCell::new(Vec::new()),
            display: None,
        }
    }

    /// Adds or replaces a member, builder style.
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets the printable form.
    pub fn with_display(self, display: impl Into<String>) -> Self {
        Self {
            display: Some(display.into()),
            ..self
        }
    }

    /// Adds or replaces a member.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut members = self.members.borrow_mut();
        match members.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => members.push((name.to_owned(), value)),
        }
    }

    /// Shares this object.
    #[inline]
    pub fn into_ref(self) -> ObjectRef {
        Rc::new(self)
    }

    /// Shares this object as a [`Value`].
    #[inline]
    pub fn into_value(self) -> Value {
        Value::Object(self.into_ref())
    }
}

impl Object for DynamicStruct {
    #[inline]
    fn type_handle(&self) -> TypeHandle {
        self.ty
    }

    fn get(&self, member: &str) -> Result<Value, AccessError> {
        self.members
            .borrow()
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| AccessError::Missing(member.to_owned()))
    }

    fn display(&self) -> Option<String> {
        self.display.clone()
    }
}

impl fmt::Debug for DynamicStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.borrow();
        f.debug_struct("DynamicStruct")
            .field("ty", &self.ty)
            .field("members", &members.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DynamicList

/// A collection object.
pub struct DynamicList {
    ty: TypeHandle,
    items: RefCell<Vec<Value>>,
}

impl DynamicList {
    /// Creates a collection of type `ty` holding `items`.
    pub fn new(ty: TypeHandle, items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            ty,
            items: RefCell::new(items.into_iter().collect()),
        }
    }

    pub fn push(&self, item: impl Into<Value>) {
        self.items.borrow_mut().push(item.into());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[inline]
    pub fn into_value(self) -> Value {
        Value::Object(Rc::new(self))
    }
}

impl Object for DynamicList {
    #[inline]
    fn type_handle(&self) -> TypeHandle {
        self.ty
    }

    fn get(&self, member: &str) -> Result<Value, AccessError> {
        match member {
            "len" => Ok(Value::UInt(self.len() as u64)),
            _ => Err(AccessError::Missing(member.to_owned())),
        }
    }

    fn items(&self) -> Option<Vec<Value>> {
        Some(self.items.borrow().clone())
    }
}

impl fmt::Debug for DynamicList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicList")
            .field("ty", &self.ty)
            .field("len", &self.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DynamicMap

/// A dictionary object, entries keep insertion order.
pub struct DynamicMap {
    ty: TypeHandle,
    entries: RefCell<Vec<(Value, Value)>>,
}

impl DynamicMap {
    /// Creates a dictionary of type `ty` holding `entries`.
    pub fn new(ty: TypeHandle, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self {
            ty,
            entries: RefCell::new(entries.into_iter().collect()),
        }
    }

    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) {
        self.entries.borrow_mut().push((key.into(), value.into()));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[inline]
    pub fn into_value(self) -> Value {
        Value::Object(Rc::new(self))
    }
}

impl Object for DynamicMap {
    #[inline]
    fn type_handle(&self) -> TypeHandle {
        self.ty
    }

    fn get(&self, member: &str) -> Result<Value, AccessError> {
        match member {
            "len" => Ok(Value::UInt(self.len() as u64)),
            _ => Err(AccessError::Missing(member.to_owned())),
        }
    }

    fn entries(&self) -> Option<Vec<(Value, Value)>> {
        Some(self.entries.borrow().clone())
    }
}

impl fmt::Debug for DynamicMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicMap")
            .field("ty", &self.ty)
            .field("len", &self.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MapEntry

/// One dictionary entry, with members `key` and `value`.
///
/// Its type is the entry type of the dictionary, see
/// [`SchemaRegistry::map_of`](crate::SchemaRegistry::map_of).
#[derive(Debug)]
pub struct MapEntry {
    ty: TypeHandle,
    key: Value,
    value: Value,
}

impl MapEntry {
    #[inline]
    pub fn new(ty: TypeHandle, key: Value, value: Value) -> Self {
        Self { ty, key, value }
    }
}

impl Object for MapEntry {
    #[inline]
    fn type_handle(&self) -> TypeHandle {
        self.ty
    }

    fn get(&self, member: &str) -> Result<Value, AccessError> {
        match member {
            "key" => Ok(self.key.clone()),
            "value" => Ok(self.value.clone()),
            _ => Err(AccessError::Missing(member.to_owned())),
        }
    }
}
