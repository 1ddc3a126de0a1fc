use alloc::vec::Vec;
use core::cell::Cell;

use serde::{Deserialize, Serialize};

use super::{FlatTable, Index, Link, MemberDescriptor, RecordId, TypeDescriptor, impl_record_kind};
use crate::error::DehydrateError;

// -----------------------------------------------------------------------------
// ValueNode

/// The dehydrated form of one visited value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueNode {
    pub(crate) index: Index,
    #[serde(skip)]
    pub(crate) hydrated: Cell<bool>,
    pub is_null: bool,
    pub ty: Link<TypeDescriptor>,
    /// The member that named this value in its parent.
    pub member: Option<Link<MemberDescriptor>>,
    /// The node this one was first built under. Diagnostic only, never an
    /// ownership edge.
    pub parent: Option<RecordId>,
    /// Index into the exception table when reading the member failed.
    pub error: Option<u32>,
    pub kind: NodeKind,
}

impl_record_kind!(ValueNode, Node, "node");

impl ValueNode {
    pub(crate) fn new(index: Index, ty: Link<TypeDescriptor>, kind: NodeKind) -> Self {
        Self {
            index,
            hydrated: Cell::new(false),
            is_null: false,
            ty,
            member: None,
            parent: None,
            error: None,
            kind,
        }
    }

    /// Creates a local node.
    #[inline]
    pub fn local(ty: Link<TypeDescriptor>, kind: NodeKind) -> Self {
        Self::new(Index::LOCAL, ty, kind)
    }

    /// Sets the naming member.
    pub fn with_member(self, member: Link<MemberDescriptor>) -> Self {
        Self {
            member: Some(member),
            ..self
        }
    }

    /// Returns the interned printable value, if any.
    #[inline]
    pub fn value(&self) -> Option<RecordId> {
        self.kind.value()
    }

    // -------------------------------------------------------------------------
    // Editing

    /// Appends an element to a collection or dictionary node.
    ///
    /// A local `item` is re-parented to this node.
    pub fn add_item(&mut self, mut item: Link<ValueNode>) -> Result<(), DehydrateError> {
        self.adopt(&mut item);
        match &mut self.kind {
            NodeKind::Collection { items, .. } | NodeKind::Dictionary { items, .. } => {
                items.push(item);
                self.hydrated.set(false);
                Ok(())
            }
            _ => Err(DehydrateError::InvalidArgument(
                "only collection and dictionary nodes hold items".into(),
            )),
        }
    }

    /// Removes the element at `index`, `None` if there is none.
    pub fn remove_item(&mut self, index: usize) -> Option<Link<ValueNode>> {
        let items = match &mut self.kind {
            NodeKind::Collection { items, .. } | NodeKind::Dictionary { items, .. } => items,
            _ => return None,
        };
        if index >= items.len() {
            return None;
        }
        let mut item = items.remove(index);
        orphan(&mut item);
        self.hydrated.set(false);
        Some(item)
    }

    /// Appends a member child to a composite node.
    ///
    /// A local `node` is re-parented to this node.
    pub fn add_member(
        &mut self,
        member: Link<MemberDescriptor>,
        mut node: Link<ValueNode>,
    ) -> Result<(), DehydrateError> {
        self.adopt(&mut node);
        match &mut self.kind {
            NodeKind::Composite { members, .. } => {
                members.push(MemberSlot { member, node });
                self.hydrated.set(false);
                Ok(())
            }
            _ => Err(DehydrateError::InvalidArgument(
                "only composite nodes hold members".into(),
            )),
        }
    }

    /// Removes the first member child named `name`.
    ///
    /// Member names are resolved through `table`.
    pub fn remove_member(&mut self, name: &str, table: &FlatTable) -> Option<MemberSlot> {
        let NodeKind::Composite { members, .. } = &mut self.kind else {
            return None;
        };
        let position = members.iter().position(|slot| {
            slot.member
                .get(table)
                .is_some_and(|member| member.name == name)
        })?;
        let mut slot = members.remove(position);
        orphan(&mut slot.node);
        self.hydrated.set(false);
        Some(slot)
    }

    fn adopt(&self, child: &mut Link<ValueNode>) {
        if let Link::Local(node) = child {
            node.parent = self.index.record_id();
        }
    }
}

fn orphan(child: &mut Link<ValueNode>) {
    if let Link::Local(node) = child {
        node.parent = None;
    }
}

// -----------------------------------------------------------------------------
// MemberSlot

/// One member child of a composite node.
///
/// `member` names the child as seen from this parent. A shared instance is
/// built once and carries the member that first reached it, so the slot is
/// what tells two aliases apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSlot {
    pub member: Link<MemberDescriptor>,
    pub node: Link<ValueNode>,
}

// -----------------------------------------------------------------------------
// NodeKind

/// The shape-specific part of a [`ValueNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Scalar {
        value: Option<RecordId>,
    },
    Enum {
        value: Option<RecordId>,
    },
    Collection {
        value: Option<RecordId>,
        /// Describes the element type, holds no value.
        template: Link<ValueNode>,
        items: Vec<Link<ValueNode>>,
    },
    Dictionary {
        value: Option<RecordId>,
        /// Describes the entry type, holds no value.
        template: Link<ValueNode>,
        items: Vec<Link<ValueNode>>,
    },
    Composite {
        value: Option<RecordId>,
        members: Vec<MemberSlot>,
    },
    /// A node built earlier, spliced in as the only child.
    Wrapped(Link<ValueNode>),
}

impl NodeKind {
    /// Returns the interned printable value, if any.
    pub fn value(&self) -> Option<RecordId> {
        match self {
            Self::Scalar { value }
            | Self::Enum { value }
            | Self::Collection { value, .. }
            | Self::Dictionary { value, .. }
            | Self::Composite { value, .. } => *value,
            Self::Wrapped(_) => None,
        }
    }

    /// Returns the template of a collection or dictionary.
    pub fn template(&self) -> Option<&Link<ValueNode>> {
        match self {
            Self::Collection { template, .. } | Self::Dictionary { template, .. } => Some(template),
            _ => None,
        }
    }

    /// Returns collection or dictionary elements.
    pub fn items(&self) -> &[Link<ValueNode>] {
        match self {
            Self::Collection { items, .. } | Self::Dictionary { items, .. } => items,
            _ => &[],
        }
    }

    /// Returns the member children of a composite.
    pub fn members(&self) -> &[MemberSlot] {
        match self {
            Self::Composite { members, .. } => members,
            _ => &[],
        }
    }

    /// Returns the spliced node of a wrapper.
    pub fn wrapped(&self) -> Option<&Link<ValueNode>> {
        match self {
            Self::Wrapped(inner) => Some(inner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{NodeKind, ValueNode};
    use crate::record::{FlatTable, Index, Link, MemberDescriptor, RecordId, TypeDescriptor};

    fn ty() -> Link<TypeDescriptor> {
        Link::Id(RecordId::from_raw(0))
    }

    fn scalar() -> Link<ValueNode> {
        Link::local(ValueNode::local(ty(), NodeKind::Scalar { value: None }))
    }

    #[test]
    fn items_are_reparented() {
        let kind = NodeKind::Collection {
            value: None,
            template: scalar(),
            items: Vec::new(),
        };
        let mut list = ValueNode::new(Index::new(4), ty(), kind);
        list.hydrated.set(true);

        list.add_item(scalar()).unwrap();
        assert!(!list.hydrated.get());
        assert!(matches!(
            &list.kind.items()[0],
            Link::Local(item) if item.parent == Some(RecordId::from_raw(4))
        ));

        let removed = list.remove_item(0).unwrap();
        assert!(matches!(&removed, Link::Local(item) if item.parent.is_none()));
        assert!(list.remove_item(0).is_none());

        let member = Link::local(MemberDescriptor::local("x"));
        assert!(list.add_member(member, scalar()).is_err());
    }

    #[test]
    fn members_are_removed_by_name() {
        let kind = NodeKind::Composite {
            value: None,
            members: Vec::new(),
        };
        let mut node = ValueNode::local(ty(), kind);
        node.add_member(Link::local(MemberDescriptor::local("a")), scalar())
            .unwrap();
        node.add_member(Link::local(MemberDescriptor::local("b")), scalar())
            .unwrap();

        let table = FlatTable::new();
        let removed = node.remove_member("a", &table).unwrap();
        assert!(matches!(&removed.member, Link::Local(member) if member.name == "a"));
        assert_eq!(node.kind.members().len(), 1);
        assert!(node.remove_member("a", &table).is_none());
        assert!(node.add_item(scalar()).is_err());
    }
}
