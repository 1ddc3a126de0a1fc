use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use serde::{Deserialize, Serialize};

use crate::error::HydrateError;
use crate::hydrate::{Hydrator, NodeRef};
use crate::record::{FlatTable, Link, Record, RecordId, RecordKind, ValueNode};

/// The output of one walk: a root node, the flat table it links into and the
/// messages of member reads that failed.
///
/// The bundle is plain data. It can be serialized, shipped and hydrated in
/// another process as long as the three parts travel together.
///
/// # Examples
///
/// ```
/// use vc_dehydrate::{Dehydrated, Dehydrator, Settings};
/// use vc_introspect::SchemaRegistry;
///
/// let schema = SchemaRegistry::new();
/// let settings = Settings::default();
/// let dehydrated = Dehydrator::new(&schema, &settings).dehydrate("hello").unwrap();
///
/// let json = serde_json::to_string(&dehydrated).unwrap();
/// let mut restored: Dehydrated = serde_json::from_str(&json).unwrap();
/// assert_eq!(restored.hydrate().unwrap().value(), Some("hello"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dehydrated {
    root: Link<ValueNode>,
    table: FlatTable,
    exceptions: Vec<String>,
}

impl Dehydrated {
    #[inline]
    pub fn new(root: Link<ValueNode>, table: FlatTable, exceptions: Vec<String>) -> Self {
        Self {
            root,
            table,
            exceptions,
        }
    }

    #[inline]
    pub fn root(&self) -> &Link<ValueNode> {
        &self.root
    }

    #[inline]
    pub fn table(&self) -> &FlatTable {
        &self.table
    }

    #[inline]
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }

    /// Returns the message recorded at `index`.
    #[inline]
    pub fn exception(&self, index: u32) -> Option<&str> {
        self.exceptions.get(index as usize).map(String::as_str)
    }

    /// Resolves every link reachable from the root and returns a view of it.
    ///
    /// A local root that owns a reserved slot is first moved into that slot,
    /// so nodes linking back to the root resolve to it. Hydrating twice is a
    /// no-op that returns the same view.
    pub fn hydrate(&mut self) -> Result<NodeRef<'_>, HydrateError> {
        self.install_root();
        let hydrator = Hydrator::new(&self.table, &self.exceptions);
        let root = hydrator.hydrate_node(&self.root)?;
        Ok(NodeRef::new(root, &self.table, &self.exceptions))
    }

    fn install_root(&mut self) {
        let Link::Local(node) = &self.root else {
            return;
        };
        let Some(id) = node.index().record_id() else {
            return;
        };
        let Some(slot) = self.table.get_mut(id) else {
            return;
        };
        if !slot.is_placeholder() {
            return;
        }
        if let Link::Local(node) = mem::replace(&mut self.root, Link::Id(id)) {
            log::trace!("installed root at {id}");
            *slot = Record::Node(*node);
        }
    }

    /// Returns the slot the root lives in once hydrated.
    pub fn root_id(&self) -> Option<RecordId> {
        match &self.root {
            Link::Id(id) => Some(*id),
            Link::Local(node) => node.index().record_id(),
        }
    }
}
