use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use vc_introspect::{MemberHandle, MemberInfo, TagTarget, TypeHandle, builtin};

use super::Dehydrator;
use crate::error::DehydrateError;
use crate::key::DehydrationKey;
use crate::record::{Index, Link, MemberDescriptor};

impl Dehydrator<'_> {
    /// Returns the walkable members of `ty`, in declaration order.
    ///
    /// The list is computed once per type and walk.
    pub fn members_of(&mut self, ty: TypeHandle) -> Result<Rc<[MemberHandle]>, DehydrateError> {
        if let Some(members) = self.members.get(&ty) {
            return Ok(Rc::clone(members));
        }

        let introspector = self.introspector;
        let mut members = Vec::new();
        for member in introspector.members(ty) {
            let info = introspector
                .member_info(member)
                .ok_or(DehydrateError::UnknownMember(member))?;
            if self.is_walkable(ty, info) {
                members.push(member);
            }
        }

        let members: Rc<[MemberHandle]> = members.into();
        self.members.insert(ty, Rc::clone(&members));
        Ok(members)
    }

    fn is_walkable(&self, owner: TypeHandle, info: &MemberInfo) -> bool {
        let settings = self.settings;
        if !info.is_readable() || info.is_indexed() {
            return false;
        }
        if settings.ignore_object_typed_members && info.ty() == builtin::OBJECT {
            return false;
        }
        if settings.ignore_inherited_members && info.declaring() != Some(owner) {
            return false;
        }
        let Some(declaring) = info.declaring() else {
            return !settings.ignore_null_declaring_type;
        };
        if settings.is_excluded_declaring_type(declaring) {
            return false;
        }
        if settings.ignore_hidden_foreign_types {
            return match self.introspector.type_info(declaring) {
                Some(declaring) => {
                    declaring.is_visible() || declaring.unit() == settings.calling_unit.as_deref()
                }
                None => false,
            };
        }
        true
    }

    /// Describes `member`.
    pub fn member_descriptor(
        &mut self,
        member: MemberHandle,
    ) -> Result<Link<MemberDescriptor>, DehydrateError> {
        let key = DehydrationKey::Member(member);
        if let Some(id) = self.registry.get(&key) {
            return Ok(Link::Id(id));
        }

        let info = self
            .introspector
            .member_info(member)
            .ok_or(DehydrateError::UnknownMember(member))?;
        let id = self.registry.claim(key.clone())?;

        let ty = self.type_descriptor(info.ty())?;
        let owner = info
            .declaring()
            .map(|declaring| self.type_descriptor(declaring))
            .transpose()?;
        let tags = self.tag_descriptors(TagTarget::Member(member))?;

        let descriptor = MemberDescriptor {
            index: Index::from(id),
            hydrated: Cell::new(false),
            name: info.name().into(),
            ty: Some(ty),
            owner,
            tags,
        };
        self.registry.update_claim(descriptor, &key)?;
        Ok(Link::Id(id))
    }
}
