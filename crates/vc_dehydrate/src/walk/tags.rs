use alloc::vec::Vec;
use core::cell::Cell;

use vc_introspect::{TagTarget, TagUse};

use super::{Dehydrator, NodeContext};
use crate::error::DehydrateError;
use crate::key::DehydrationKey;
use crate::record::{Index, Link, TagDescriptor};

impl Dehydrator<'_> {
    /// Describes the tags on `target` that the tag settings admit.
    pub(super) fn tag_descriptors(
        &mut self,
        target: TagTarget,
    ) -> Result<Vec<Link<TagDescriptor>>, DehydrateError> {
        let introspector = self.introspector;
        let mut tags = Vec::new();
        for tag_use in introspector.tags_on(target) {
            let info = introspector
                .tag_info(tag_use.tag)
                .ok_or(DehydrateError::UnknownTag(tag_use.tag))?;
            if !self.settings.tags.admits(introspector, info.ty()) {
                log::trace!("skipping tag {} on {target:?}", tag_use.tag);
                continue;
            }
            tags.push(self.tag_descriptor(tag_use)?);
        }
        Ok(tags)
    }

    /// Describes one tag instance, its data dehydrated as a regular node.
    ///
    /// The same tag reached directly and through a base type yields two
    /// descriptors, one per `inherited` flag.
    pub fn tag_descriptor(&mut self, tag_use: TagUse) -> Result<Link<TagDescriptor>, DehydrateError> {
        let key = DehydrationKey::Tag {
            tag: tag_use.tag,
            inherited: tag_use.inherited,
        };
        if let Some(id) = self.registry.get(&key) {
            return Ok(Link::Id(id));
        }

        let info = self
            .introspector
            .tag_info(tag_use.tag)
            .ok_or(DehydrateError::UnknownTag(tag_use.tag))?;
        let id = self.registry.claim(key.clone())?;

        let ty = self.type_descriptor(info.ty())?;
        let data = self.node(NodeContext::new(info.data().clone()).with_type(info.ty()))?;

        let descriptor = TagDescriptor {
            index: Index::from(id),
            hydrated: Cell::new(false),
            ty,
            inherited: tag_use.inherited,
            data,
        };
        self.registry.update_claim(descriptor, &key)?;
        Ok(Link::Id(id))
    }
}
