//! The configuration bundle of a walk.
//!
//! [`Settings`] is built once, then only queried while walking. Getter
//! overrides and type substitutions are held as boxed functions, and
//! [`TagSettings`] decides which tags are kept.

// -----------------------------------------------------------------------------
// Modules

mod tags;

// -----------------------------------------------------------------------------
// Exports

pub use tags::{TagMatch, TagMode, TagSettings};

// -----------------------------------------------------------------------------
// Imports

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use vc_introspect::hash::HashMap;
use vc_introspect::value::Value;
use vc_introspect::{AccessError, MemberHandle, TypeHandle, TypeInfo, TypeIntrospector, builtin};

use crate::error::SettingsError;

/// Replaces the default accessor of one member. Receives the owning value.
pub type Getter = Box<dyn Fn(&Value) -> Result<Value, AccessError>>;

/// Rewrites a type before it is described or walked.
pub type Substitution = Box<dyn Fn(TypeHandle) -> TypeHandle>;

// -----------------------------------------------------------------------------
// Settings

/// Options consulted by a [`Dehydrator`](crate::Dehydrator).
///
/// | option | default |
/// |--------|---------|
/// | `tags` | [`TagSettings::default`] |
/// | `ignore_hidden_foreign_types` | `true` |
/// | `calling_unit` | `None` |
/// | `ignore_null_declaring_type` | `true` |
/// | `ignore_inherited_members` | `false` |
/// | `ignore_object_typed_members` | `false` |
/// | `ignore_type_valued_members` | `true` |
/// | `excluded_declaring_types` | `[builtin::TYPE, builtin::MEMBER]` |
/// | `keep_null_items` | `false` |
/// | `max_depth` | `None` |
pub struct Settings {
    pub tags: TagSettings,
    /// Skip members whose declaring type is hidden outside its defining
    /// unit, unless that unit is `calling_unit`.
    pub ignore_hidden_foreign_types: bool,
    pub calling_unit: Option<String>,
    /// Skip members without a declaring type.
    pub ignore_null_declaring_type: bool,
    /// Keep only members declared on the most derived type.
    pub ignore_inherited_members: bool,
    /// Skip members declared as [`builtin::OBJECT`].
    pub ignore_object_typed_members: bool,
    /// Skip members whose value is a [`Value::Type`].
    pub ignore_type_valued_members: bool,
    /// Members declared on these types are never walked.
    pub excluded_declaring_types: Vec<TypeHandle>,
    /// Keep null collection elements as explicit null nodes.
    pub keep_null_items: bool,
    /// Fail with [`DepthExceeded`](crate::DehydrateError::DepthExceeded)
    /// instead of nesting deeper.
    pub max_depth: Option<usize>,
    getters: HashMap<String, Getter>,
    substitutions: Vec<Substitution>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tags: TagSettings::default(),
            ignore_hidden_foreign_types: true,
            calling_unit: None,
            ignore_null_declaring_type: true,
            ignore_inherited_members: false,
            ignore_object_typed_members: false,
            ignore_type_valued_members: true,
            excluded_declaring_types: alloc::vec![builtin::TYPE, builtin::MEMBER],
            keep_null_items: false,
            max_depth: None,
            getters: HashMap::default(),
            substitutions: Vec::new(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("tags", &self.tags)
            .field("ignore_hidden_foreign_types", &self.ignore_hidden_foreign_types)
            .field("calling_unit", &self.calling_unit)
            .field("ignore_null_declaring_type", &self.ignore_null_declaring_type)
            .field("ignore_inherited_members", &self.ignore_inherited_members)
            .field("ignore_object_typed_members", &self.ignore_object_typed_members)
            .field("ignore_type_valued_members", &self.ignore_type_valued_members)
            .field("excluded_declaring_types", &self.excluded_declaring_types)
            .field("keep_null_items", &self.keep_null_items)
            .field("max_depth", &self.max_depth)
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("substitutions", &self.substitutions.len())
            .finish()
    }
}

impl Settings {
    // -------------------------------------------------------------------------
    // Builders

    pub fn with_tags(self, tags: TagSettings) -> Self {
        Self { tags, ..self }
    }

    /// Sets the unit whose hidden types stay walkable.
    pub fn with_calling_unit(self, unit: impl Into<String>) -> Self {
        Self {
            calling_unit: Some(unit.into()),
            ..self
        }
    }

    pub fn with_hidden_foreign_types(self) -> Self {
        Self {
            ignore_hidden_foreign_types: false,
            ..self
        }
    }

    pub fn with_dynamic_members(self) -> Self {
        Self {
            ignore_null_declaring_type: false,
            ..self
        }
    }

    pub fn without_inherited_members(self) -> Self {
        Self {
            ignore_inherited_members: true,
            ..self
        }
    }

    pub fn without_object_typed_members(self) -> Self {
        Self {
            ignore_object_typed_members: true,
            ..self
        }
    }

    pub fn with_type_valued_members(self) -> Self {
        Self {
            ignore_type_valued_members: false,
            ..self
        }
    }

    pub fn with_null_items(self) -> Self {
        Self {
            keep_null_items: true,
            ..self
        }
    }

    pub fn with_max_depth(self, depth: usize) -> Self {
        Self {
            max_depth: Some(depth),
            ..self
        }
    }

    /// Registers a getter override under a canonical member id, see
    /// [`canonical_member_id`].
    pub fn with_getter(
        mut self,
        id: impl Into<String>,
        getter: impl Fn(&Value) -> Result<Value, AccessError> + 'static,
    ) -> Self {
        self.getters.insert(id.into(), Box::new(getter));
        self
    }

    /// Registers a getter override for `member`.
    pub fn with_member_getter(
        self,
        introspector: &dyn TypeIntrospector,
        member: MemberHandle,
        getter: impl Fn(&Value) -> Result<Value, AccessError> + 'static,
    ) -> Result<Self, SettingsError> {
        let id = canonical_member_id(introspector, member)
            .ok_or(SettingsError::UnknownMember(member))?;
        Ok(self.with_getter(id, getter))
    }

    /// Appends a type substitution. Substitutions run in registration order,
    /// each one sees the output of the previous one.
    pub fn with_substitution(mut self, substitution: impl Fn(TypeHandle) -> TypeHandle + 'static) -> Self {
        self.substitutions.push(Box::new(substitution));
        self
    }

    // -------------------------------------------------------------------------
    // Queries

    #[inline]
    pub fn has_getters(&self) -> bool {
        !self.getters.is_empty()
    }

    /// Returns the getter override registered under `id`.
    #[inline]
    pub fn getter(&self, id: &str) -> Option<&Getter> {
        self.getters.get(id)
    }

    /// Runs the substitution chain on `ty`.
    pub fn substitute(&self, ty: TypeHandle) -> TypeHandle {
        self.substitutions.iter().fold(ty, |ty, substitution| substitution(ty))
    }

    #[inline]
    pub fn is_excluded_declaring_type(&self, ty: TypeHandle) -> bool {
        self.excluded_declaring_types.contains(&ty)
    }
}

/// Returns the canonical id of `member`: `"{declaring}.{member type}.{name}"`
/// using full type paths.
///
/// Members without a declaring type use an empty declaring part.
///
/// # Examples
///
/// ```
/// use vc_dehydrate::settings::canonical_member_id;
/// use vc_introspect::{MemberInfo, SchemaRegistry, TypeInfo, builtin};
///
/// let mut schema = SchemaRegistry::new();
/// let book = schema.register(TypeInfo::composite("library::Book")).unwrap();
/// let title = schema.add_member(book, MemberInfo::new("title", builtin::STRING)).unwrap();
///
/// assert_eq!(
///     canonical_member_id(&schema, title).as_deref(),
///     Some("library::Book.alloc::string::String.title")
/// );
/// ```
pub fn canonical_member_id(introspector: &dyn TypeIntrospector, member: MemberHandle) -> Option<String> {
    let info = introspector.member_info(member)?;
    let ty = introspector.type_info(info.ty())?.path();
    let declaring = match info.declaring() {
        Some(declaring) => introspector.type_info(declaring).map(TypeInfo::path)?,
        None => "",
    };
    Some(format!("{declaring}.{ty}.{}", info.name()))
}
