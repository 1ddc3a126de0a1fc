use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::SchemaError;
use crate::hash::HashMap;
use crate::info::{MemberInfo, Shape, TagInfo, TagTarget, TagUse, TypeInfo};
use crate::introspector::TypeIntrospector;
use crate::value::Value;
use crate::{MemberHandle, TagHandle, TypeHandle, builtin};

// -----------------------------------------------------------------------------
// SchemaRegistry

/// A [`TypeIntrospector`] filled by explicit registration.
///
/// Handles are allocated in registration order, and a type may only link to
/// types registered before it, so base chains are always finite.
///
/// # Examples
///
/// ```
/// use vc_introspect::{MemberInfo, SchemaRegistry, TypeInfo, TypeIntrospector, builtin};
///
/// let mut schema = SchemaRegistry::new();
/// let animal = schema.register(TypeInfo::composite("zoo::Animal")).unwrap();
/// let cat = schema.register(TypeInfo::composite("zoo::Cat").with_base(animal)).unwrap();
///
/// schema.add_member(animal, MemberInfo::new("name", builtin::STRING)).unwrap();
/// schema.add_member(cat, MemberInfo::new("lives", builtin::INT)).unwrap();
///
/// let names: Vec<_> = schema
///     .members(cat)
///     .into_iter()
///     .map(|m| schema.member_info(m).unwrap().name().to_owned())
///     .collect();
/// assert_eq!(names, ["lives", "name"]);
/// ```
pub struct SchemaRegistry {
    types: Vec<TypeEntry>,
    members: Vec<MemberEntry>,
    tags: Vec<TagInfo>,
    path_to_type: HashMap<String, TypeHandle>,
}

struct TypeEntry {
    info: TypeInfo,
    members: Vec<MemberHandle>,
    tags: Vec<TagHandle>,
}

struct MemberEntry {
    info: MemberInfo,
    tags: Vec<TagHandle>,
}

impl Default for SchemaRegistry {
    /// See [`SchemaRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Creates a registry holding the [`builtin`] types.
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            members: Vec::new(),
            tags: Vec::new(),
            path_to_type: HashMap::default(),
        };

        let builtins = [
            TypeInfo::new(Shape::Reference, "core::any::Any"),
            TypeInfo::scalar("bool").with_default("false"),
            TypeInfo::scalar("i64").numeric().with_default("0"),
            TypeInfo::scalar("u64").numeric().with_default("0"),
            TypeInfo::scalar("f64").numeric().with_default("0"),
            TypeInfo::scalar("char").with_default("\0"),
            TypeInfo::scalar("alloc::string::String"),
            TypeInfo::new(Shape::Reference, "vc_introspect::TypeHandle"),
            TypeInfo::new(Shape::Reference, "vc_introspect::MemberHandle"),
        ];
        for info in builtins {
            registry.push_type(info);
        }
        debug_assert_eq!(registry.types.len(), builtin::COUNT as usize);
        debug_assert_eq!(registry.get_with_path("alloc::string::String"), Some(builtin::STRING));

        registry
    }

    fn push_type(&mut self, info: TypeInfo) -> TypeHandle {
        let handle = TypeHandle::from_raw(self.types.len() as u32);
        self.path_to_type.insert(info.path().into(), handle);
        self.types.push(TypeEntry {
            info,
            members: Vec::new(),
            tags: Vec::new(),
        });
        handle
    }

    fn check_type(&self, ty: TypeHandle) -> Result<(), SchemaError> {
        if ty.index() < self.types.len() {
            Ok(())
        } else {
            Err(SchemaError::UnknownType(ty))
        }
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers a new type.
    ///
    /// Fails if the path is already taken, or if the type links to a type
    /// that is not registered yet.
    pub fn register(&mut self, info: TypeInfo) -> Result<TypeHandle, SchemaError> {
        if self.path_to_type.contains_key(info.path()) {
            return Err(SchemaError::DuplicatePath(info.path().into()));
        }
        let links = [info.base(), info.element(), info.entry(), info.nullable_of()];
        for ty in links.into_iter().flatten().chain(info.generics().iter().copied()) {
            self.check_type(ty)?;
        }
        Ok(self.push_type(info))
    }

    /// Declares `member` on `owner`.
    pub fn add_member(
        &mut self,
        owner: TypeHandle,
        member: MemberInfo,
    ) -> Result<MemberHandle, SchemaError> {
        self.insert_member(owner, member.declared_on(Some(owner)))
    }

    /// Attaches `member` to `owner` without a declaring type.
    ///
    /// Such members come from dynamic sources (property bags, scripting) and
    /// are subject to the `ignore_null_declaring` rule of a walker.
    pub fn add_dynamic_member(
        &mut self,
        owner: TypeHandle,
        member: MemberInfo,
    ) -> Result<MemberHandle, SchemaError> {
        self.insert_member(owner, member.declared_on(None))
    }

    fn insert_member(
        &mut self,
        owner: TypeHandle,
        member: MemberInfo,
    ) -> Result<MemberHandle, SchemaError> {
        self.check_type(owner)?;
        self.check_type(member.ty())?;
        let handle = MemberHandle::from_raw(self.members.len() as u32);
        self.members.push(MemberEntry {
            info: member,
            tags: Vec::new(),
        });
        self.types[owner.index()].members.push(handle);
        Ok(handle)
    }

    /// Attaches a tag of type `ty` with instance `data` to `target`.
    pub fn add_tag(
        &mut self,
        target: TagTarget,
        ty: TypeHandle,
        data: Value,
    ) -> Result<TagHandle, SchemaError> {
        self.check_type(ty)?;
        let handle = TagHandle::from_raw(self.tags.len() as u32);
        let list = match target {
            TagTarget::Type(owner) => {
                self.check_type(owner)?;
                &mut self.types[owner.index()].tags
            }
            TagTarget::Member(member) => match self.members.get_mut(member.index()) {
                Some(entry) => &mut entry.tags,
                None => return Err(SchemaError::UnknownMember(member)),
            },
        };
        list.push(handle);
        self.tags.push(TagInfo::new(ty, data));
        Ok(handle)
    }

    // -------------------------------------------------------------------------
    // Generic helpers

    fn get_or_register(
        &mut self,
        path: String,
        make: impl FnOnce(String) -> TypeInfo,
    ) -> Result<TypeHandle, SchemaError> {
        match self.get_with_path(&path) {
            Some(ty) => Ok(ty),
            None => self.register(make(path)),
        }
    }

    fn path_of(&self, ty: TypeHandle) -> Result<&str, SchemaError> {
        self.type_info(ty)
            .map(TypeInfo::path)
            .ok_or(SchemaError::UnknownType(ty))
    }

    /// Returns the `Vec` type over `element`, registering it on first use.
    pub fn list_of(&mut self, element: TypeHandle) -> Result<TypeHandle, SchemaError> {
        let path = format!("alloc::vec::Vec<{}>", self.path_of(element)?);
        self.get_or_register(path, |path| TypeInfo::collection(path, element))
    }

    /// Returns the array type `[element; len]`, registering it on first use.
    pub fn array_of(&mut self, element: TypeHandle, len: usize) -> Result<TypeHandle, SchemaError> {
        let path = format!("[{}; {len}]", self.path_of(element)?);
        self.get_or_register(path, |path| TypeInfo::collection(path, element).array())
    }

    /// Returns the map type from `key` to `value`, registering it and its
    /// entry type on first use.
    ///
    /// The entry type has the members `key` and `value`, matching
    /// [`MapEntry`](crate::value::MapEntry).
    pub fn map_of(&mut self, key: TypeHandle, value: TypeHandle) -> Result<TypeHandle, SchemaError> {
        let args = format!("{}, {}", self.path_of(key)?, self.path_of(value)?);

        let entry_path = format!("vc_introspect::value::MapEntry<{args}>");
        let entry = match self.get_with_path(&entry_path) {
            Some(entry) => entry,
            None => {
                let info = TypeInfo::composite(entry_path).with_generics([key, value]);
                let entry = self.register(info)?;
                self.add_member(entry, MemberInfo::new("key", key))?;
                self.add_member(entry, MemberInfo::new("value", value))?;
                entry
            }
        };

        let path = format!("vc_introspect::hash::HashMap<{args}>");
        self.get_or_register(path, |path| {
            TypeInfo::dictionary(path, entry).with_generics([key, value])
        })
    }

    /// Returns the nullable wrapper of `inner`, registering it on first use.
    ///
    /// The wrapper classifies like `inner` and has no default value.
    pub fn nullable_of(&mut self, inner: TypeHandle) -> Result<TypeHandle, SchemaError> {
        let path = format!("core::option::Option<{}>", self.path_of(inner)?);
        let shape = self.classify_shape(inner);
        self.get_or_register(path, |path| TypeInfo::nullable(path, inner, shape))
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// Returns the handle of the type with the given full path.
    #[inline]
    pub fn get_with_path(&self, path: &str) -> Option<TypeHandle> {
        self.path_to_type.get(path).copied()
    }

    /// Returns the number of registered types, builtins included.
    #[inline]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Returns an iterator over the base chain of `ty`, `ty` itself first.
    pub fn base_chain(&self, ty: TypeHandle) -> impl Iterator<Item = TypeHandle> + '_ {
        core::iter::successors(Some(ty), |&ty| self.type_info(ty).and_then(TypeInfo::base))
            .take_while(|&ty| ty.index() < self.types.len())
    }
}

impl TypeIntrospector for SchemaRegistry {
    #[inline]
    fn type_info(&self, ty: TypeHandle) -> Option<&TypeInfo> {
        self.types.get(ty.index()).map(|entry| &entry.info)
    }

    #[inline]
    fn member_info(&self, member: MemberHandle) -> Option<&MemberInfo> {
        self.members.get(member.index()).map(|entry| &entry.info)
    }

    #[inline]
    fn tag_info(&self, tag: TagHandle) -> Option<&TagInfo> {
        self.tags.get(tag.index())
    }

    fn members(&self, ty: TypeHandle) -> Vec<MemberHandle> {
        self.base_chain(ty)
            .flat_map(|ty| self.types[ty.index()].members.iter().copied())
            .collect()
    }

    fn tags_on(&self, target: TagTarget) -> Vec<TagUse> {
        match target {
            TagTarget::Type(ty) => self
                .base_chain(ty)
                .flat_map(|owner| {
                    let inherited = owner != ty;
                    self.types[owner.index()]
                        .tags
                        .iter()
                        .map(move |&tag| TagUse { tag, inherited })
                })
                .collect(),
            TagTarget::Member(member) => self
                .members
                .get(member.index())
                .map(|entry| {
                    entry
                        .tags
                        .iter()
                        .map(|&tag| TagUse {
                            tag,
                            inherited: false,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
