//! The dehydration walk.
//!
//! A [`Dehydrator`] owns everything one top-level walk mutates: the
//! [`IdentityRegistry`], the exception table and the per-type member cache.
//! Builders for each record kind live in their own file:
//!
//! - `node`: value nodes, the recursive engine.
//! - `types`: type descriptors.
//! - `members`: member validation and member descriptors.
//! - `tags`: tag filtering and tag descriptors.

// -----------------------------------------------------------------------------
// Modules

mod members;
mod node;
mod tags;
mod types;

// -----------------------------------------------------------------------------
// Imports

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use vc_introspect::hash::HashMap;
use vc_introspect::value::{ObjectRef, Value};
use vc_introspect::{MemberHandle, Shape, TypeHandle, TypeIntrospector};

use crate::dehydrated::Dehydrated;
use crate::error::DehydrateError;
use crate::key::MemberKey;
use crate::record::{Link, MemberDescriptor, NodeKind, RecordId, ValueNode};
use crate::registry::IdentityRegistry;
use crate::settings::Settings;

// -----------------------------------------------------------------------------
// NodeContext

/// One value to dehydrate, with what is statically known about it.
///
/// The effective type of the node is the runtime type of the value, else
/// `ty`, else the declared type of `member`.
#[derive(Debug, Clone, Default)]
pub struct NodeContext {
    pub value: Value,
    pub member: Option<MemberKey>,
    pub ty: Option<TypeHandle>,
    parent: Option<RecordId>,
    error: Option<u32>,
}

impl NodeContext {
    #[inline]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_member(self, member: impl Into<MemberKey>) -> Self {
        Self {
            member: Some(member.into()),
            ..self
        }
    }

    pub fn with_type(self, ty: TypeHandle) -> Self {
        Self {
            ty: Some(ty),
            ..self
        }
    }

    /// A child of the node claimed at `parent`.
    fn child(value: Value, member: Option<MemberKey>, ty: Option<TypeHandle>, parent: RecordId) -> Self {
        Self {
            value,
            member,
            ty,
            parent: Some(parent),
            error: None,
        }
    }
}

// -----------------------------------------------------------------------------
// Dehydrator

/// Walks one object graph into a [`Dehydrated`] bundle.
///
/// Each walk needs its own `Dehydrator`; the settings and introspector are
/// only read.
///
/// # Examples
///
/// ```
/// use vc_dehydrate::{Dehydrator, Settings};
/// use vc_introspect::SchemaRegistry;
///
/// let schema = SchemaRegistry::new();
/// let settings = Settings::default();
///
/// let mut dehydrated = Dehydrator::new(&schema, &settings).dehydrate(42).unwrap();
/// let root = dehydrated.hydrate().unwrap();
/// assert_eq!(root.value(), Some("42"));
/// assert_eq!(root.ty().unwrap().full_name(), "i64");
/// ```
pub struct Dehydrator<'a> {
    introspector: &'a dyn TypeIntrospector,
    settings: &'a Settings,
    registry: IdentityRegistry,
    members: HashMap<TypeHandle, Rc<[MemberHandle]>>,
    exceptions: Vec<String>,
    exception_index: HashMap<String, u32>,
    // Objects keyed by address stay alive until the walk ends.
    retained: Vec<ObjectRef>,
    depth: usize,
}

impl<'a> Dehydrator<'a> {
    pub fn new(introspector: &'a dyn TypeIntrospector, settings: &'a Settings) -> Self {
        Self {
            introspector,
            settings,
            registry: IdentityRegistry::new(),
            members: HashMap::default(),
            exceptions: Vec::new(),
            exception_index: HashMap::default(),
            retained: Vec::new(),
            depth: 0,
        }
    }

    #[inline]
    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    #[inline]
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Returns the messages recorded for failed member reads, by index.
    #[inline]
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }

    /// Classifies `ty`, looking through nullable wrappers.
    #[inline]
    pub fn classify_shape(&self, ty: TypeHandle) -> Shape {
        self.introspector.classify_shape(ty)
    }

    // -------------------------------------------------------------------------
    // Top-level walks

    /// Dehydrates `value` as the root of a new bundle.
    pub fn dehydrate(mut self, value: impl Into<Value>) -> Result<Dehydrated, DehydrateError> {
        let root = self.node(NodeContext::new(value))?;
        Ok(self.finish(root))
    }

    /// Dehydrates `value` as a root named `name`.
    ///
    /// The root is kept outside the flat table as the owner of the bundle,
    /// and its slot stays a placeholder until
    /// [`Dehydrated::hydrate`] installs it.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_dehydrate::record::RecordId;
    /// use vc_dehydrate::{Dehydrator, Settings};
    /// use vc_introspect::SchemaRegistry;
    ///
    /// let schema = SchemaRegistry::new();
    /// let settings = Settings::default();
    ///
    /// let mut dehydrated = Dehydrator::new(&schema, &settings)
    ///     .dehydrate_named("answer", 42)
    ///     .unwrap();
    /// let slot = RecordId::from_raw(0);
    /// assert!(dehydrated.table().get(slot).unwrap().is_placeholder());
    ///
    /// let root = dehydrated.hydrate().unwrap();
    /// assert_eq!(root.name(), Some("answer"));
    /// assert_eq!(root.value(), Some("42"));
    /// ```
    pub fn dehydrate_named(
        mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Dehydrated, DehydrateError> {
        let ctx = NodeContext::new(value).with_member(MemberKey::Named(name.into()));
        self.enter()?;
        let root = self.build(ctx, true);
        self.depth -= 1;
        Ok(self.finish(root?))
    }

    /// Bundles `root` with the flat table and exception table built so far.
    pub fn finish(self, root: Link<ValueNode>) -> Dehydrated {
        log::debug!(
            "dehydrated {} records ({} retained objects, {} exceptions)",
            self.registry.len(),
            self.retained.len(),
            self.exceptions.len(),
        );
        Dehydrated::new(root, self.registry.into_table(), self.exceptions)
    }

    /// Builds a local collection node named `name` of collection type `ty`
    /// over `values`.
    ///
    /// The node and its member descriptor are local (never in the flat
    /// table), its items are regular nodes.
    pub fn local_list(
        &mut self,
        name: &str,
        ty: TypeHandle,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<ValueNode, DehydrateError> {
        let ty = self.settings.substitute(ty);
        let ty_link = self.build_type(ty)?;
        let element = self.element_type(ty)?;
        let member = MemberKey::Named(name.into());

        let template = self.node(NodeContext::new(Value::Null).with_member(member.clone()).with_type(element))?;
        let mut items = Vec::new();
        for value in values {
            if value.is_null() && !self.settings.keep_null_items {
                continue;
            }
            let ctx = NodeContext::new(value).with_member(member.clone()).with_type(element);
            items.push(self.node(ctx)?);
        }

        let kind = NodeKind::Collection {
            value: None,
            template,
            items,
        };
        let member = MemberDescriptor::local(name).with_type(ty_link.clone());
        Ok(ValueNode::local(ty_link, kind).with_member(Link::local(member)))
    }

    // -------------------------------------------------------------------------
    // Internal

    fn enter(&mut self) -> Result<(), DehydrateError> {
        if let Some(max) = self.settings.max_depth
            && self.depth >= max
        {
            return Err(DehydrateError::DepthExceeded(max));
        }
        self.depth += 1;
        Ok(())
    }

    /// Adds `message` to the exception table, returns its index.
    fn record_exception(&mut self, message: String) -> u32 {
        if let Some(&index) = self.exception_index.get(&message) {
            return index;
        }
        let index = self.exceptions.len() as u32;
        self.exceptions.push(message.clone());
        self.exception_index.insert(message, index);
        index
    }
}
