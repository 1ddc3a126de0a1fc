use alloc::vec::Vec;
use core::cell::Cell;

use vc_introspect::{Shape, TagTarget, TypeHandle};

use super::Dehydrator;
use crate::error::DehydrateError;
use crate::key::DehydrationKey;
use crate::record::{Index, Link, TypeDescriptor};

impl Dehydrator<'_> {
    /// Describes `ty` after running the substitution chain on it.
    ///
    /// A type is described once per walk, later calls link the first
    /// description.
    pub fn type_descriptor(&mut self, ty: TypeHandle) -> Result<Link<TypeDescriptor>, DehydrateError> {
        let ty = self.settings.substitute(ty);
        self.build_type(ty)
    }

    /// Describes an already substituted type.
    pub(super) fn build_type(&mut self, ty: TypeHandle) -> Result<Link<TypeDescriptor>, DehydrateError> {
        let key = DehydrationKey::Type(ty);
        if let Some(id) = self.registry.get(&key) {
            return Ok(Link::Id(id));
        }

        let introspector = self.introspector;
        let wrapper = introspector
            .type_info(ty)
            .ok_or(DehydrateError::UnknownType(ty))?;
        let (described, nullable) = match wrapper.nullable_of() {
            Some(inner) => (inner, true),
            None => (ty, introspector.is_nullable(ty)),
        };
        let info = introspector
            .type_info(described)
            .ok_or(DehydrateError::UnknownType(described))?;

        let id = self.registry.claim(key.clone())?;
        let shape = introspector.classify_shape(described);

        let base = info.base().map(|base| self.type_descriptor(base)).transpose()?;
        let element = info
            .element()
            .or(info.entry())
            .map(|element| self.type_descriptor(element))
            .transpose()?;
        let params = info
            .generics()
            .iter()
            .map(|&param| self.type_descriptor(param))
            .collect::<Result<Vec<_>, _>>()?;

        let members = match shape {
            Shape::Value => Vec::new(),
            _ => self
                .members_of(described)?
                .iter()
                .map(|&member| self.member_descriptor(member))
                .collect::<Result<Vec<_>, _>>()?,
        };
        let tags = self.tag_descriptors(TagTarget::Type(described))?;

        let descriptor = TypeDescriptor {
            index: Index::from(id),
            hydrated: Cell::new(false),
            name: info.name().into(),
            full_name: info.path().into(),
            qualified_name: info.qualified_name(),
            namespace: info.module().map(Into::into),
            display: info.display().into(),
            shape,
            nullable,
            numeric: info.is_numeric(),
            array: info.is_array(),
            default: introspector.default_value(ty),
            base,
            element,
            params,
            members,
            tags,
            enum_values: info.enum_values().to_vec(),
        };
        self.registry.update_claim(descriptor, &key)?;
        Ok(Link::Id(id))
    }
}
