use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::AccessError;
use crate::TypeHandle;
use crate::value::Value;

/// A shared, identity-compared object.
pub type ObjectRef = Rc<dyn Object>;

/// A structured live value.
///
/// Which methods matter depends on the [`Shape`](crate::Shape) of
/// [`type_handle`](Object::type_handle):
///
/// - `Reference`: [`get`](Object::get) is called for every member.
/// - `Collection`: [`items`](Object::items) must return `Some`.
/// - `Dictionary`: [`entries`](Object::entries) must return `Some`.
///
/// `Debug` implementations must not recurse into members, object graphs may be
/// cyclic.
pub trait Object: fmt::Debug {
    /// Returns the runtime type of this object.
    fn type_handle(&self) -> TypeHandle;

    /// Reads the member named `member`.
    fn get(&self, member: &str) -> Result<Value, AccessError>;

    /// Returns the elements of a collection.
    fn items(&self) -> Option<Vec<Value>> {
        None
    }

    /// Returns the `(key, value)` entries of a dictionary.
    fn entries(&self) -> Option<Vec<(Value, Value)>> {
        None
    }

    /// Returns a printable form, if the object has one.
    fn display(&self) -> Option<String> {
        None
    }
}

/// Returns the address identifying `object`.
///
/// Two [`ObjectRef`]s have the same address iff they point at the same
/// allocation, as long as both are alive.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use vc_introspect::builtin;
/// use vc_introspect::value::{DynamicStruct, ObjectRef, object_address};
///
/// let a: ObjectRef = Rc::new(DynamicStruct::new(builtin::OBJECT));
/// let b: ObjectRef = Rc::new(DynamicStruct::new(builtin::OBJECT));
///
/// assert_eq!(object_address(&a), object_address(&a.clone()));
/// assert_ne!(object_address(&a), object_address(&b));
/// ```
#[inline]
pub fn object_address(object: &ObjectRef) -> usize {
    Rc::as_ptr(object).cast::<()>() as usize
}
