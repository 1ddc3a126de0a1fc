//! Runtime type introspection for object graph walking.
//!
//! This crate is the capability set a graph walker consumes instead of a
//! language-level reflection API:
//!
//! - [`TypeIntrospector`]: `members`, `tags_on`, `classify_shape`, `default_value`.
//! - [`SchemaRegistry`]: an explicit-registration implementation of the trait.
//! - [`info`]: [`TypeInfo`], [`MemberInfo`], [`TagInfo`] and [`Shape`].
//! - [`value`]: the live [`Value`](value::Value) model, the [`Object`](value::Object)
//!   trait and dynamic containers to build object graphs (including cyclic ones).
//!
//! Types, members and tags are addressed by small `Copy` handles
//! ([`TypeHandle`], [`MemberHandle`], [`TagHandle`]). A few handles are fixed
//! for every introspector, see [`builtin`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod handle;
mod introspector;
mod registry;

pub mod hash;
pub mod info;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{AccessError, SchemaError};
pub use handle::{MemberHandle, TagHandle, TypeHandle, builtin};
pub use info::{EnumVariant, MemberInfo, Shape, TagInfo, TagTarget, TagUse, TypeInfo};
pub use introspector::TypeIntrospector;
pub use registry::SchemaRegistry;
