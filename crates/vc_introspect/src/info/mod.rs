//! Type, member and tag information served by an introspector.
//!
//! ## Menu
//!
//! - [`Shape`]: structural classification of a type, drives how a value is walked.
//! - [`TypeInfo`]: names, flags, base/element/entry links, generic parameters and
//!   enum variants of one type.
//! - [`MemberInfo`]: one readable data member, its declared type and declaring type.
//! - [`TagInfo`]: one declarative tag instance, its tag type and its own data.
//! - [`TagTarget`] / [`TagUse`]: where tags are queried and how they were found.

// -----------------------------------------------------------------------------
// Modules

mod member_info;
mod shape;
mod tag_info;
mod type_info;

// -----------------------------------------------------------------------------
// Exports

pub use member_info::MemberInfo;
pub use shape::Shape;
pub use tag_info::{TagInfo, TagTarget, TagUse};
pub use type_info::{EnumVariant, TypeInfo};
