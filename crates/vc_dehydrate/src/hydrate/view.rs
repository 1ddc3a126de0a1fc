use alloc::string::String;
use core::fmt;
use core::ptr;

use vc_introspect::{EnumVariant, Shape};

use crate::record::{
    FlatTable, Index, Link, MemberDescriptor, RecordKind, TagDescriptor, TypeDescriptor, ValueNode,
};

// -----------------------------------------------------------------------------
// Context

#[derive(Clone, Copy)]
struct Context<'t> {
    table: &'t FlatTable,
    exceptions: &'t [String],
}

impl<'t> Context<'t> {
    #[inline]
    fn get<T: RecordKind>(self, link: &'t Link<T>) -> Option<&'t T> {
        link.get(self.table)
    }

    fn ty(self, link: &'t Link<TypeDescriptor>) -> Option<TypeRef<'t>> {
        self.get(link).map(|record| TypeRef { record, cx: self })
    }

    fn member(self, link: &'t Link<MemberDescriptor>) -> Option<MemberRef<'t>> {
        self.get(link).map(|record| MemberRef { record, cx: self })
    }

    fn tag(self, link: &'t Link<TagDescriptor>) -> Option<TagRef<'t>> {
        self.get(link).map(|record| TagRef { record, cx: self })
    }

    fn node(self, link: &'t Link<ValueNode>) -> Option<NodeRef<'t>> {
        self.get(link).map(|record| NodeRef {
            record,
            via: None,
            cx: self,
        })
    }
}

macro_rules! impl_view {
    ($view:ident, $record:ident) => {
        impl<'t> $view<'t> {
            /// Returns the underlying record.
            #[inline]
            pub fn record(self) -> &'t $record {
                self.record
            }

            /// Returns `true` if both views borrow the same record.
            #[inline]
            pub fn ptr_eq(self, other: Self) -> bool {
                ptr::eq(self.record, other.record)
            }
        }

        impl fmt::Debug for $view<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self.record, f)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// NodeRef

/// A hydrated [`ValueNode`].
///
/// # Examples
///
/// ```
/// use vc_dehydrate::{Dehydrator, Settings};
/// use vc_introspect::value::DynamicStruct;
/// use vc_introspect::{MemberInfo, SchemaRegistry, TypeInfo, builtin};
///
/// let mut schema = SchemaRegistry::new();
/// let author = schema.register(TypeInfo::composite("library::Author")).unwrap();
/// schema.add_member(author, MemberInfo::new("name", builtin::STRING)).unwrap();
/// let book = schema.register(TypeInfo::composite("library::Book")).unwrap();
/// schema.add_member(book, MemberInfo::new("author", author)).unwrap();
///
/// let herbert = DynamicStruct::new(author).with("name", "Herbert");
/// let dune = DynamicStruct::new(book).with("author", herbert.into_value());
///
/// let settings = Settings::default();
/// let mut dehydrated = Dehydrator::new(&schema, &settings)
///     .dehydrate(dune.into_value())
///     .unwrap();
/// let root = dehydrated.hydrate().unwrap();
///
/// assert!(root.has_member("author"));
/// assert_eq!(root.member("author.name").unwrap().value(), Some("Herbert"));
/// assert!(root.member("author.age").is_none());
/// ```
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    record: &'t ValueNode,
    // The member slot this view was reached through.
    via: Option<&'t Link<MemberDescriptor>>,
    cx: Context<'t>,
}

impl_view!(NodeRef, ValueNode);

impl<'t> NodeRef<'t> {
    #[inline]
    pub(crate) fn new(record: &'t ValueNode, table: &'t FlatTable, exceptions: &'t [String]) -> Self {
        Self {
            record,
            via: None,
            cx: Context { table, exceptions },
        }
    }

    #[inline]
    pub fn index(self) -> Index {
        self.record.index()
    }

    /// Returns `true` if the value was null.
    #[inline]
    pub fn is_null(self) -> bool {
        self.record.is_null
    }

    /// Returns the printable value.
    pub fn value(self) -> Option<&'t str> {
        let id = self.record.value()?;
        self.cx.table.string(id).ok()
    }

    pub fn ty(self) -> Option<TypeRef<'t>> {
        self.cx.ty(&self.record.ty)
    }

    /// Returns the member that named this value in its parent.
    ///
    /// A shared instance reached through a member slot reports that slot's
    /// member, not the one it was first built under.
    pub fn member_ref(self) -> Option<MemberRef<'t>> {
        self.cx.member(self.via.or(self.record.member.as_ref())?)
    }

    /// Returns the name of the member holding this value.
    pub fn name(self) -> Option<&'t str> {
        self.member_ref().map(MemberRef::name)
    }

    /// Returns the member children, or the spliced node of a wrapper.
    pub fn members(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let cx = self.cx;
        let slots = self.record.kind.members().iter().filter_map(move |slot| {
            let node = cx.node(&slot.node)?;
            Some(NodeRef {
                via: Some(&slot.member),
                ..node
            })
        });
        let wrapped = self.record.kind.wrapped().and_then(move |link| cx.node(link));
        slots.chain(wrapped)
    }

    /// Returns the elements of a collection or dictionary.
    pub fn items(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let cx = self.cx;
        self.record
            .kind
            .items()
            .iter()
            .filter_map(move |link| cx.node(link))
    }

    /// Returns the empty element node of a collection or dictionary.
    pub fn template(self) -> Option<NodeRef<'t>> {
        self.cx.node(self.record.kind.template()?)
    }

    /// Looks up a member child by a `.`-separated path.
    pub fn member(self, path: &str) -> Option<NodeRef<'t>> {
        path.split('.').try_fold(self, |node, name| {
            node.members().find(|child| child.name() == Some(name))
        })
    }

    /// Returns `true` if the type of this node declares a member `name`.
    pub fn has_member(self, name: &str) -> bool {
        self.ty()
            .is_some_and(|ty| ty.members().any(|member| member.name() == name))
    }

    /// Returns the message recorded when reading this member failed.
    pub fn error(self) -> Option<&'t str> {
        let index = self.record.error?;
        self.cx.exceptions.get(index as usize).map(String::as_str)
    }

    /// Returns the node this one was first built under.
    pub fn parent(self) -> Option<NodeRef<'t>> {
        let id = self.record.parent?;
        let record = self.cx.table.resolve::<ValueNode>(id).ok()?;
        Some(NodeRef {
            record,
            via: None,
            cx: self.cx,
        })
    }

    /// Returns `true` if this node appears in its own parent chain.
    pub fn is_recursive(self) -> bool {
        let mut parent = self.parent();
        // A chain longer than the table revisits a node.
        for _ in 0..self.cx.table.len() {
            let Some(node) = parent else {
                return false;
            };
            if node.ptr_eq(self) {
                return true;
            }
            parent = node.parent();
        }
        parent.is_some()
    }
}

/// Prints the member name, else the short type name, else nothing.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self
            .name()
            .or_else(|| self.ty().map(TypeRef::name))
            .unwrap_or("");
        f.pad(label)
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// A hydrated [`TypeDescriptor`].
#[derive(Clone, Copy)]
pub struct TypeRef<'t> {
    record: &'t TypeDescriptor,
    cx: Context<'t>,
}

impl_view!(TypeRef, TypeDescriptor);

impl<'t> TypeRef<'t> {
    #[inline]
    pub fn name(self) -> &'t str {
        &self.record.name
    }

    #[inline]
    pub fn full_name(self) -> &'t str {
        &self.record.full_name
    }

    #[inline]
    pub fn qualified_name(self) -> &'t str {
        &self.record.qualified_name
    }

    #[inline]
    pub fn namespace(self) -> Option<&'t str> {
        self.record.namespace.as_deref()
    }

    #[inline]
    pub fn display(self) -> &'t str {
        &self.record.display
    }

    #[inline]
    pub fn shape(self) -> Shape {
        self.record.shape
    }

    #[inline]
    pub fn is_nullable(self) -> bool {
        self.record.nullable
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        self.record.numeric
    }

    #[inline]
    pub fn is_array(self) -> bool {
        self.record.array
    }

    #[inline]
    pub fn default(self) -> Option<&'t str> {
        self.record.default.as_deref()
    }

    pub fn base(self) -> Option<TypeRef<'t>> {
        self.cx.ty(self.record.base.as_ref()?)
    }

    /// Returns the element type of a collection, the entry type of a
    /// dictionary.
    pub fn element(self) -> Option<TypeRef<'t>> {
        self.cx.ty(self.record.element.as_ref()?)
    }

    pub fn params(self) -> impl Iterator<Item = TypeRef<'t>> + 't {
        let cx = self.cx;
        self.record.params.iter().filter_map(move |link| cx.ty(link))
    }

    pub fn members(self) -> impl Iterator<Item = MemberRef<'t>> + 't {
        let cx = self.cx;
        self.record.members.iter().filter_map(move |link| cx.member(link))
    }

    pub fn tags(self) -> impl Iterator<Item = TagRef<'t>> + 't {
        let cx = self.cx;
        self.record.tags.iter().filter_map(move |link| cx.tag(link))
    }

    #[inline]
    pub fn enum_values(self) -> &'t [EnumVariant] {
        &self.record.enum_values
    }

    /// Returns `true` if this type or one of its bases has `full_name`.
    pub fn is(self, full_name: &str) -> bool {
        let mut ty = Some(self);
        // Bounded, a malformed table may link a base chain into a loop.
        for _ in 0..=self.cx.table.len() {
            match ty {
                Some(current) if current.full_name() == full_name => return true,
                Some(current) => ty = current.base(),
                None => return false,
            }
        }
        false
    }
}

// -----------------------------------------------------------------------------
// MemberRef

/// A hydrated [`MemberDescriptor`].
#[derive(Clone, Copy)]
pub struct MemberRef<'t> {
    record: &'t MemberDescriptor,
    cx: Context<'t>,
}

impl_view!(MemberRef, MemberDescriptor);

impl<'t> MemberRef<'t> {
    #[inline]
    pub fn name(self) -> &'t str {
        &self.record.name
    }

    pub fn ty(self) -> Option<TypeRef<'t>> {
        self.cx.ty(self.record.ty.as_ref()?)
    }

    /// Returns the declaring type, `None` for local members.
    pub fn owner(self) -> Option<TypeRef<'t>> {
        self.cx.ty(self.record.owner.as_ref()?)
    }

    pub fn tags(self) -> impl Iterator<Item = TagRef<'t>> + 't {
        let cx = self.cx;
        self.record.tags.iter().filter_map(move |link| cx.tag(link))
    }
}

// -----------------------------------------------------------------------------
// TagRef

/// A hydrated [`TagDescriptor`].
#[derive(Clone, Copy)]
pub struct TagRef<'t> {
    record: &'t TagDescriptor,
    cx: Context<'t>,
}

impl_view!(TagRef, TagDescriptor);

impl<'t> TagRef<'t> {
    pub fn ty(self) -> Option<TypeRef<'t>> {
        self.cx.ty(&self.record.ty)
    }

    #[inline]
    pub fn is_inherited(self) -> bool {
        self.record.inherited
    }

    /// Returns the tag instance's data node.
    pub fn data(self) -> Option<NodeRef<'t>> {
        self.cx.node(&self.record.data)
    }
}
