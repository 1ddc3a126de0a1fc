//! Hydration: resolving the links of a dehydrated tree.
//!
//! A [`Hydrator`] checks that every link reachable from a starting record
//! resolves to a record of the right kind, then hands out borrowed views
//! ([`NodeRef`], [`TypeRef`], [`MemberRef`], [`TagRef`]) that follow links on
//! demand. Records reached several times are the same record, so equality
//! of views is reference equality.
//!
//! Each record is visited once per table: the first visit sets its
//! hydration guard, which also makes cyclic trees terminate.

// -----------------------------------------------------------------------------
// Modules

mod view;

// -----------------------------------------------------------------------------
// Exports

pub use view::{MemberRef, NodeRef, TagRef, TypeRef};

// -----------------------------------------------------------------------------
// Imports

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::error::HydrateError;
use crate::record::{
    FlatTable, Link, MemberDescriptor, RecordKind, RecordRef, TagDescriptor, TypeDescriptor,
    ValueNode,
};

// -----------------------------------------------------------------------------
// Hydrator

/// Resolves links against one flat table.
///
/// Traversal uses an explicit worklist, so deep trees do not grow the call
/// stack. If a link fails to resolve, every guard set by this hydrator is
/// cleared again, so a later attempt rechecks the same records.
pub struct Hydrator<'t> {
    table: &'t FlatTable,
    exceptions: &'t [String],
    stack: RefCell<Vec<RecordRef<'t>>>,
    marked: RefCell<Vec<&'t Cell<bool>>>,
}

impl<'t> Hydrator<'t> {
    pub fn new(table: &'t FlatTable, exceptions: &'t [String]) -> Self {
        Self {
            table,
            exceptions,
            stack: RefCell::new(Vec::new()),
            marked: RefCell::new(Vec::new()),
        }
    }

    #[inline]
    pub fn table(&self) -> &'t FlatTable {
        self.table
    }

    /// Hydrates the node `link` points to and everything reachable from it.
    pub fn hydrate_node(&self, link: &'t Link<ValueNode>) -> Result<&'t ValueNode, HydrateError> {
        self.hydrate(link)
    }

    /// Wraps a node hydrated by this hydrator in a view.
    #[inline]
    pub fn view(&self, node: &'t ValueNode) -> NodeRef<'t> {
        NodeRef::new(node, self.table, self.exceptions)
    }

    /// Hydrates the record `link` points to and everything reachable from it.
    pub fn hydrate<T: RecordKind>(&self, link: &'t Link<T>) -> Result<&'t T, HydrateError> {
        let record = self.resolve(link).inspect_err(|_| self.rollback())?;
        self.finish()?;
        Ok(record)
    }

    /// Hydrates a list of links of one kind.
    pub fn hydrate_list<T: RecordKind>(
        &self,
        links: &'t [Link<T>],
    ) -> Result<Vec<&'t T>, HydrateError> {
        let records = links
            .iter()
            .map(|link| self.resolve(link))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|_| self.rollback())?;
        self.finish()?;
        Ok(records)
    }

    // -------------------------------------------------------------------------
    // Internal

    /// Resolves `link`, queueing the record on its first visit.
    fn resolve<T: RecordKind>(&self, link: &'t Link<T>) -> Result<&'t T, HydrateError> {
        let record = match link {
            Link::Id(id) => self.table.resolve::<T>(*id)?,
            Link::Local(record) => &**record,
        };
        if !record.hydrated().replace(true) {
            self.marked.borrow_mut().push(record.hydrated());
            self.stack.borrow_mut().push(record.as_record_ref());
        }
        Ok(record)
    }

    fn finish(&self) -> Result<(), HydrateError> {
        let result = self.drain();
        match result {
            Ok(()) => self.marked.borrow_mut().clear(),
            Err(_) => self.rollback(),
        }
        result
    }

    fn rollback(&self) {
        self.stack.borrow_mut().clear();
        for guard in self.marked.borrow_mut().drain(..) {
            guard.set(false);
        }
    }

    fn drain(&self) -> Result<(), HydrateError> {
        loop {
            let Some(record) = self.stack.borrow_mut().pop() else {
                return Ok(());
            };
            match record {
                RecordRef::Node(node) => self.visit_node(node)?,
                RecordRef::Type(ty) => self.visit_type(ty)?,
                RecordRef::Member(member) => self.visit_member(member)?,
                RecordRef::Tag(tag) => self.visit_tag(tag)?,
            }
        }
    }

    fn visit_node(&self, node: &'t ValueNode) -> Result<(), HydrateError> {
        self.resolve(&node.ty)?;
        if let Some(member) = &node.member {
            self.resolve(member)?;
        }
        if let Some(value) = node.value() {
            self.table.string(value)?;
        }
        if let Some(error) = node.error
            && error as usize >= self.exceptions.len()
        {
            return Err(HydrateError::MissingException(error));
        }
        if let Some(template) = node.kind.template() {
            self.resolve(template)?;
        }
        for item in node.kind.items() {
            self.resolve(item)?;
        }
        for slot in node.kind.members() {
            self.resolve(&slot.member)?;
            self.resolve(&slot.node)?;
        }
        if let Some(inner) = node.kind.wrapped() {
            self.resolve(inner)?;
        }
        Ok(())
    }

    fn visit_type(&self, ty: &'t TypeDescriptor) -> Result<(), HydrateError> {
        if let Some(base) = &ty.base {
            self.resolve(base)?;
        }
        if let Some(element) = &ty.element {
            self.resolve(element)?;
        }
        for param in &ty.params {
            self.resolve(param)?;
        }
        for member in &ty.members {
            self.resolve(member)?;
        }
        for tag in &ty.tags {
            self.resolve(tag)?;
        }
        Ok(())
    }

    fn visit_member(&self, member: &'t MemberDescriptor) -> Result<(), HydrateError> {
        if let Some(ty) = &member.ty {
            self.resolve(ty)?;
        }
        if let Some(owner) = &member.owner {
            self.resolve(owner)?;
        }
        for tag in &member.tags {
            self.resolve(tag)?;
        }
        Ok(())
    }

    fn visit_tag(&self, tag: &'t TagDescriptor) -> Result<(), HydrateError> {
        self.resolve(&tag.ty)?;
        self.resolve(&tag.data)?;
        Ok(())
    }
}
