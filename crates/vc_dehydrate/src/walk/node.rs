use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use vc_introspect::value::{MapEntry, Object, ObjectRef, Value};
use vc_introspect::{MemberInfo, Shape, TypeHandle, TypeInfo, builtin};

use super::{Dehydrator, NodeContext};
use crate::error::DehydrateError;
use crate::key::{DehydrationKey, Identity, MemberKey};
use crate::record::{
    Index, Link, MemberDescriptor, MemberSlot, NodeKind, Record, RecordId, ValueNode,
};
use crate::settings::canonical_member_id;

impl Dehydrator<'_> {
    /// Dehydrates one value.
    ///
    /// Returns a link to the existing record when the value's key was already
    /// claimed in this walk, so a `(member, type, identity)` triple is
    /// expanded at most once.
    pub fn node(&mut self, ctx: NodeContext) -> Result<Link<ValueNode>, DehydrateError> {
        self.enter()?;
        let link = self.build(ctx, false);
        self.depth -= 1;
        link
    }

    /// Claims, builds and finalizes one node. An `owner` node is returned
    /// locally and its slot left unfilled.
    pub(super) fn build(
        &mut self,
        ctx: NodeContext,
        owner: bool,
    ) -> Result<Link<ValueNode>, DehydrateError> {
        let ty = self.effective_type(&ctx)?;
        let key = match ctx.error {
            Some(error) => DehydrationKey::Value {
                member: ctx.member.clone(),
                ty,
                identity: Identity::Failed(error),
            },
            None => DehydrationKey::value(ctx.member.as_ref(), ty, &ctx.value),
        };
        if let Some(id) = self.registry.get(&key) {
            return Ok(Link::Id(id));
        }
        if let Value::Object(object) = &ctx.value {
            self.retained.push(ObjectRef::clone(object));
        }

        let id = self.registry.claim(key.clone())?;
        let node = self.build_node(ctx, ty, id)?;
        if owner {
            return Ok(Link::local(node));
        }
        self.registry.update_claim(node, &key)?;
        Ok(Link::Id(id))
    }

    /// Resolves the type a node is described with.
    fn effective_type(&self, ctx: &NodeContext) -> Result<TypeHandle, DehydrateError> {
        let declared = || {
            ctx.ty.or_else(|| match &ctx.member {
                Some(MemberKey::Handle(member)) => {
                    self.introspector.member_info(*member).map(MemberInfo::ty)
                }
                _ => None,
            })
        };
        let ty = match &ctx.value {
            Value::Dehydrated(_) => declared().unwrap_or(builtin::OBJECT),
            value => value.runtime_type().or_else(declared).ok_or_else(|| {
                DehydrateError::InvalidArgument(
                    "a null value needs a member or a type to be dehydrated".into(),
                )
            })?,
        };
        Ok(self.settings.substitute(ty))
    }

    fn build_node(
        &mut self,
        ctx: NodeContext,
        ty: TypeHandle,
        id: RecordId,
    ) -> Result<ValueNode, DehydrateError> {
        let ty_link = self.build_type(ty)?;
        let member = match &ctx.member {
            Some(MemberKey::Handle(member)) => Some(self.member_descriptor(*member)?),
            Some(MemberKey::Named(name)) => {
                let local = MemberDescriptor::local(name.as_str()).with_type(ty_link.clone());
                Some(Link::local(local))
            }
            None => None,
        };

        let kind = match &ctx.value {
            Value::Dehydrated(target) => NodeKind::Wrapped(self.dehydrated_link(*target)?),
            value => match self.classify_shape(ty) {
                Shape::Enum => {
                    let text = match value {
                        Value::Null => Some("0".to_string()),
                        value => value.display(),
                    };
                    let text = text.ok_or(DehydrateError::ShapeMismatch {
                        ty,
                        expected: Shape::Enum,
                    })?;
                    NodeKind::Enum {
                        value: Some(self.registry.intern_str(&text)),
                    }
                }
                Shape::Value => {
                    let text = value
                        .display()
                        .or_else(|| self.introspector.default_value(ty));
                    NodeKind::Scalar {
                        value: text.map(|text| self.registry.intern_str(&text)),
                    }
                }
                Shape::Collection => self.collection(&ctx, ty, id)?,
                Shape::Dictionary => self.dictionary(&ctx, ty, id)?,
                Shape::Reference | Shape::Null => self.composite(&ctx, ty, id)?,
            },
        };

        let mut node = ValueNode::new(Index::from(id), ty_link, kind);
        node.is_null = ctx.value.is_null();
        node.member = member;
        node.parent = ctx.parent;
        node.error = ctx.error;
        Ok(node)
    }

    // -------------------------------------------------------------------------
    // Structural shapes

    fn collection(
        &mut self,
        ctx: &NodeContext,
        ty: TypeHandle,
        id: RecordId,
    ) -> Result<NodeKind, DehydrateError> {
        let element = self.element_type(live_type(&ctx.value, ty))?;
        let template = NodeContext::child(Value::Null, ctx.member.clone(), Some(element), id);
        let template = self.node(template)?;

        let mut items = Vec::new();
        if let Some(values) = self.structural(&ctx.value, ty, Shape::Collection, |o| o.items())? {
            for value in values {
                if value.is_null() && !self.settings.keep_null_items {
                    continue;
                }
                // Items are named by the member holding the collection.
                let item = NodeContext::child(value, ctx.member.clone(), Some(element), id);
                items.push(self.node(item)?);
            }
        }

        Ok(NodeKind::Collection {
            value: self.intern_display(&ctx.value),
            template,
            items,
        })
    }

    fn dictionary(
        &mut self,
        ctx: &NodeContext,
        ty: TypeHandle,
        id: RecordId,
    ) -> Result<NodeKind, DehydrateError> {
        let source = self.unwrap_nullable(live_type(&ctx.value, ty));
        let entry = self
            .type_info(source)?
            .entry()
            .ok_or(DehydrateError::ShapeMismatch {
                ty: source,
                expected: Shape::Dictionary,
            })?;
        let template = NodeContext::child(Value::Null, ctx.member.clone(), Some(entry), id);
        let template = self.node(template)?;

        let mut items = Vec::new();
        if let Some(entries) = self.structural(&ctx.value, ty, Shape::Dictionary, |o| o.entries())? {
            for (key, value) in entries {
                let pair = Value::object(MapEntry::new(entry, key, value));
                let item = NodeContext::child(pair, ctx.member.clone(), Some(entry), id);
                items.push(self.node(item)?);
            }
        }

        Ok(NodeKind::Dictionary {
            value: self.intern_display(&ctx.value),
            template,
            items,
        })
    }

    fn composite(
        &mut self,
        ctx: &NodeContext,
        ty: TypeHandle,
        id: RecordId,
    ) -> Result<NodeKind, DehydrateError> {
        let value = self.intern_display(&ctx.value);
        let Some(object) = ctx.value.as_object() else {
            return Ok(NodeKind::Composite {
                value,
                members: Vec::new(),
            });
        };

        let introspector = self.introspector;
        let settings = self.settings;
        let members = self.members_of(self.unwrap_nullable(ty))?;
        let mut children = Vec::with_capacity(members.len());
        for &member in members.iter() {
            let info = introspector
                .member_info(member)
                .ok_or(DehydrateError::UnknownMember(member))?;

            let getter = match settings.has_getters() {
                true => canonical_member_id(introspector, member).and_then(|id| settings.getter(&id)),
                false => None,
            };
            let fetched = match getter {
                Some(getter) => getter(&ctx.value),
                None => object.get(info.name()),
            };

            let node = match fetched {
                Ok(Value::Type(_)) if settings.ignore_type_valued_members => continue,
                Ok(Value::Dehydrated(target)) => self.dehydrated_link(target)?,
                Ok(value) => {
                    let child = NodeContext::child(value, Some(MemberKey::Handle(member)), None, id);
                    self.node(child)?
                }
                Err(error) => {
                    log::warn!("reading `{}` of {ty} failed: {error}", info.name());
                    let index = self.record_exception(format!("{}: {error}", info.name()));
                    let mut child = NodeContext::child(Value::Null, Some(MemberKey::Handle(member)), None, id);
                    child.error = Some(index);
                    self.node(child)?
                }
            };
            let member = self.member_descriptor(member)?;
            children.push(MemberSlot { member, node });
        }

        Ok(NodeKind::Composite {
            value,
            members: children,
        })
    }

    // -------------------------------------------------------------------------
    // Helpers

    /// Returns the content of a structural value, `None` for null.
    fn structural<T>(
        &self,
        value: &Value,
        ty: TypeHandle,
        expected: Shape,
        content: impl FnOnce(&dyn Object) -> Option<T>,
    ) -> Result<Option<T>, DehydrateError> {
        match value {
            Value::Null => Ok(None),
            Value::Object(object) => content(&**object)
                .map(Some)
                .ok_or(DehydrateError::ShapeMismatch { ty, expected }),
            _ => Err(DehydrateError::ShapeMismatch { ty, expected }),
        }
    }

    fn intern_display(&mut self, value: &Value) -> Option<RecordId> {
        let text = match value {
            Value::Type(ty) => self.introspector.type_info(*ty).map(|info| info.path().into()),
            value => value.display(),
        };
        text.map(|text: String| self.registry.intern_str(&text))
    }

    /// Links a node built earlier in this walk, or one still being built.
    fn dehydrated_link(&self, target: u32) -> Result<Link<ValueNode>, DehydrateError> {
        let id = RecordId::from_raw(target);
        match self.registry.table().get(id) {
            Some(Record::Node(_) | Record::Placeholder) => Ok(Link::Id(id)),
            Some(record) => Err(DehydrateError::InvalidArgument(format!(
                "{id} holds a {} record, not a node",
                record.kind_name()
            ))),
            None => Err(DehydrateError::InvalidArgument(format!(
                "{id} was not built by this walk"
            ))),
        }
    }

    pub(super) fn type_info(&self, ty: TypeHandle) -> Result<&TypeInfo, DehydrateError> {
        self.introspector
            .type_info(ty)
            .ok_or(DehydrateError::UnknownType(ty))
    }

    /// Returns the type a nullable wrapper stands for, `ty` itself otherwise.
    pub(super) fn unwrap_nullable(&self, ty: TypeHandle) -> TypeHandle {
        match self.introspector.type_info(ty).and_then(TypeInfo::nullable_of) {
            Some(inner) => inner,
            None => ty,
        }
    }

    /// Returns the element type of a collection, [`builtin::OBJECT`] if it
    /// declares none. Nullable wrappers are looked through.
    pub(super) fn element_type(&self, ty: TypeHandle) -> Result<TypeHandle, DehydrateError> {
        let ty = self.unwrap_nullable(ty);
        Ok(self.type_info(ty)?.element().unwrap_or(builtin::OBJECT))
    }
}

/// The type structural content is read from: the live object's own type, the
/// node's type for null.
fn live_type(value: &Value, ty: TypeHandle) -> TypeHandle {
    match value {
        Value::Object(object) => object.type_handle(),
        _ => ty,
    }
}
