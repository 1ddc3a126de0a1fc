//! Object graph dehydration and hydration.
//!
//! A [`Dehydrator`] walks a live object graph through a
//! [`TypeIntrospector`](vc_introspect::TypeIntrospector) and produces a
//! [`Dehydrated`] bundle: a root [`ValueNode`](record::ValueNode), a flat
//! table of records and an exception table. Every type, member, tag,
//! string and shared object is stored once in the flat table and linked by
//! index, so cyclic and heavily shared graphs stay finite and compact.
//!
//! [`Dehydrated::hydrate`] resolves the links again and returns a
//! [`NodeRef`] view over the tree.
//!
//! ## Menu
//!
//! - [`IdentityRegistry`]: claims flat-table slots by [`DehydrationKey`].
//! - [`record`]: the record kinds and the [`FlatTable`](record::FlatTable).
//! - [`settings`]: walk options, tag filtering, getter overrides and type
//!   substitutions.
//! - [`hydrate`]: the link resolver and the read views.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use vc_dehydrate::{Dehydrator, Settings};
//! use vc_introspect::value::{DynamicStruct, Value};
//! use vc_introspect::{MemberInfo, SchemaRegistry, TypeInfo};
//!
//! let mut schema = SchemaRegistry::new();
//! let node = schema.register(TypeInfo::composite("graph::Node")).unwrap();
//! schema.add_member(node, MemberInfo::new("next", node)).unwrap();
//!
//! // A node pointing at itself.
//! let cycle = Rc::new(DynamicStruct::new(node));
//! cycle.set("next", Value::Object(cycle.clone()));
//!
//! let settings = Settings::default();
//! let mut dehydrated = Dehydrator::new(&schema, &settings)
//!     .dehydrate(Value::Object(cycle.clone()))
//!     .unwrap();
//! let root = dehydrated.hydrate().unwrap();
//! // The shared instance is expanded once, its member links back to it.
//! let next = root.members().next().unwrap();
//! assert!(next.ptr_eq(root));
//! # cycle.set("next", Value::Null);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod dehydrated;
mod error;
mod key;
mod registry;
mod walk;

pub mod hydrate;
pub mod record;
pub mod settings;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use dehydrated::Dehydrated;
pub use error::{DehydrateError, HydrateError, SettingsError};
pub use hydrate::{Hydrator, MemberRef, NodeRef, TagRef, TypeRef};
pub use key::{DehydrationKey, Identity, MemberKey, ScalarKey};
pub use registry::IdentityRegistry;
pub use settings::Settings;
pub use walk::{Dehydrator, NodeContext};
