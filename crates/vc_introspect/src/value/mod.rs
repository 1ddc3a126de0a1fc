//! The live value model walked by a dehydrator.
//!
//! ## Menu
//!
//! - [`Value`]: one live value: null, a scalar, an enum, a type handle, a shared
//!   [`ObjectRef`], or the index of an already dehydrated node.
//! - [`Object`]: the trait for composite, collection and dictionary values.
//! - [`DynamicStruct`], [`DynamicList`], [`DynamicMap`]: containers implementing
//!   [`Object`] with interior mutability, so aliased and cyclic graphs can be
//!   built after the objects exist.
//! - [`MapEntry`]: the key/value pair object a dictionary entry is walked as.
//!
//! Objects are shared through [`Rc`](alloc::rc::Rc) and compared by identity,
//! see [`object_address`].

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod object;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::{DynamicList, DynamicMap, DynamicStruct, MapEntry};
pub use object::{Object, ObjectRef, object_address};
pub use value::{EnumValue, Value};
