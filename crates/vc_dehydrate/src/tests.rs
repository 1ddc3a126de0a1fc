use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use vc_introspect::value::{DynamicList, DynamicMap, DynamicStruct, Value};
use vc_introspect::{
    AccessError, EnumVariant, MemberHandle, MemberInfo, SchemaRegistry, TagTarget, TypeHandle,
    TypeInfo, builtin,
};

use crate::record::{Index, Record, RecordKind};
use crate::settings::TagSettings;
use crate::{DehydrateError, Dehydrated, Dehydrator, MemberKey, NodeContext, NodeRef, Settings};

// -----------------------------------------------------------------------------
// Fixture

struct Library {
    schema: SchemaRegistry,
    book: TypeHandle,
    author: TypeHandle,
    title: MemberHandle,
    pages: MemberHandle,
}

fn library() -> Library {
    let mut schema = SchemaRegistry::new();

    let author = schema.register(TypeInfo::composite("library::Author")).unwrap();
    schema.add_member(author, MemberInfo::new("name", builtin::STRING)).unwrap();

    let list = schema.list_of(builtin::STRING).unwrap();
    let book = schema.register(TypeInfo::composite("library::Book")).unwrap();
    let title = schema.add_member(book, MemberInfo::new("title", builtin::STRING)).unwrap();
    let pages = schema.add_member(book, MemberInfo::new("pages", builtin::INT)).unwrap();
    schema.add_member(book, MemberInfo::new("writer", author)).unwrap();
    schema.add_member(book, MemberInfo::new("editor", author)).unwrap();
    schema.add_member(book, MemberInfo::new("Tags", list)).unwrap();

    Library {
        schema,
        book,
        author,
        title,
        pages,
    }
}

impl Library {
    fn author(&self, name: &str) -> Value {
        DynamicStruct::new(self.author).with("name", name).into_value()
    }

    fn book(&self, title: &str, author: &Value) -> DynamicStruct {
        DynamicStruct::new(self.book)
            .with("title", title)
            .with("pages", 412)
            .with("writer", author.clone())
            .with("editor", author.clone())
            .with("Tags", Value::Null)
    }
}

fn dehydrate(schema: &SchemaRegistry, settings: &Settings, value: Value) -> Dehydrated {
    Dehydrator::new(schema, settings).dehydrate(value).unwrap()
}

fn names<'t>(nodes: impl Iterator<Item = NodeRef<'t>>) -> Vec<&'t str> {
    nodes.filter_map(NodeRef::name).collect()
}

fn type_records(dehydrated: &Dehydrated, full_name: &str) -> usize {
    dehydrated
        .table()
        .iter()
        .filter(|record| matches!(record, Record::Type(ty) if ty.full_name == full_name))
        .count()
}

// -----------------------------------------------------------------------------
// Identity and cycles

#[test]
fn shared_instance_is_expanded_once() {
    let lib = library();
    let herbert = lib.author("Herbert");
    let value = lib.book("Dune", &herbert).into_value();

    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);
    assert_eq!(type_records(&dehydrated, "library::Author"), 1);

    let root = dehydrated.hydrate().unwrap();
    let children: Vec<_> = root.members().collect();
    assert_eq!(children.len(), 5);

    // writer and editor share one node, each alias keeps its own name.
    assert!(children[2].ptr_eq(children[3]));
    assert_eq!(children[2].name(), Some("writer"));
    assert_eq!(children[3].name(), Some("editor"));

    let editor = root.member("editor").unwrap();
    assert!(editor.ptr_eq(children[2]));
    assert_eq!(root.member("editor.name").unwrap().value(), Some("Herbert"));
    assert_eq!(root.member("writer.name").unwrap().value(), Some("Herbert"));
}

#[test]
fn nodes_display_their_name_or_type() {
    let lib = library();
    let value = lib.book("Dune", &lib.author("Herbert")).into_value();

    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.to_string(), "Book");
    assert_eq!(root.member("title").unwrap().to_string(), "title");
    assert_eq!(root.member("editor").unwrap().to_string(), "editor");
}

#[test]
fn equal_scalars_under_different_members_stay_apart() {
    let lib = library();
    let herbert = lib.author("Dune");
    let value = lib.book("Dune", &herbert).into_value();

    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);
    let root = dehydrated.hydrate().unwrap();

    let title = root.member("title").unwrap();
    let name = root.member("writer.name").unwrap();
    assert!(!title.ptr_eq(name));
    // The string itself is interned once.
    assert_eq!(title.record().value(), name.record().value());
}

#[test]
fn cycles_terminate() {
    let mut schema = SchemaRegistry::new();
    let node = schema.register(TypeInfo::composite("graph::Node")).unwrap();
    schema.add_member(node, MemberInfo::new("next", node)).unwrap();

    let a = Rc::new(DynamicStruct::new(node));
    let b = Rc::new(DynamicStruct::new(node).with("next", Value::Object(a.clone())));
    a.set("next", Value::Object(b.clone()));

    let settings = Settings::default();
    let mut dehydrated = dehydrate(&schema, &settings, Value::Object(a.clone()));
    assert_eq!(type_records(&dehydrated, "graph::Node"), 1);

    let root = dehydrated.hydrate().unwrap();
    let second = root.member("next").unwrap();
    let third = second.members().next().unwrap();
    assert!(!second.ptr_eq(root));
    assert!(third.ptr_eq(root));
    assert!(second.parent().unwrap().ptr_eq(root));
    assert!(!root.is_recursive());
    assert!(!second.is_recursive());

    a.set("next", Value::Null);
}

#[test]
fn self_reference_of_a_named_root() {
    let mut schema = SchemaRegistry::new();
    let node = schema.register(TypeInfo::composite("graph::Node")).unwrap();
    schema.add_member(node, MemberInfo::new("next", node)).unwrap();

    let cycle = Rc::new(DynamicStruct::new(node));
    cycle.set("next", Value::Object(cycle.clone()));

    let settings = Settings::default();
    let mut dehydrated = Dehydrator::new(&schema, &settings)
        .dehydrate_named("head", Value::Object(cycle.clone()))
        .unwrap();
    assert_eq!(dehydrated.root_id(), Some(crate::record::RecordId::from_raw(0)));
    assert!(dehydrated.root().id().is_none());
    assert!(dehydrated.table().get(crate::record::RecordId::from_raw(0)).unwrap().is_placeholder());

    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.name(), Some("head"));
    assert!(root.members().next().unwrap().ptr_eq(root));
    assert!(dehydrated.root().id().is_some());

    cycle.set("next", Value::Null);
}

// -----------------------------------------------------------------------------
// Nulls and scalars

#[test]
fn null_composite_round_trip() {
    let lib = library();
    let settings = Settings::default();

    let mut walker = Dehydrator::new(&lib.schema, &settings);
    let root = walker.node(NodeContext::new(Value::Null).with_type(lib.book)).unwrap();
    let mut dehydrated = walker.finish(root);

    let root = dehydrated.hydrate().unwrap();
    assert!(root.is_null());
    assert_eq!(root.value(), None);
    assert_eq!(root.members().count(), 0);
    let ty = root.ty().unwrap();
    assert_eq!(ty.full_name(), "library::Book");
    assert_eq!(
        ty.members().map(|member| member.name()).collect::<Vec<_>>(),
        ["title", "pages", "writer", "editor", "Tags"]
    );
}

#[test]
fn untyped_null_is_rejected() {
    let lib = library();
    let settings = Settings::default();
    let result = Dehydrator::new(&lib.schema, &settings).dehydrate(Value::Null);
    assert!(matches!(result, Err(DehydrateError::InvalidArgument(_))));
}

#[test]
fn scalars() {
    let schema = SchemaRegistry::new();
    let settings = Settings::default();

    let mut dehydrated = dehydrate(&schema, &settings, Value::from(42));
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.value(), Some("42"));
    assert_eq!(root.ty().unwrap().full_name(), "i64");
    assert!(!root.ty().unwrap().is_nullable());

    let mut dehydrated = dehydrate(&schema, &settings, Value::from('x'));
    assert_eq!(dehydrated.hydrate().unwrap().value(), Some("x"));
}

#[test]
fn null_scalars_use_the_type_default() {
    let mut schema = SchemaRegistry::new();
    let optional = schema.nullable_of(builtin::INT).unwrap();
    let settings = Settings::default();

    let mut walker = Dehydrator::new(&schema, &settings);
    let root = walker.node(NodeContext::new(Value::Null).with_type(builtin::INT)).unwrap();
    let mut dehydrated = walker.finish(root);
    assert_eq!(dehydrated.hydrate().unwrap().value(), Some("0"));

    // An unset nullable has no default.
    let mut walker = Dehydrator::new(&schema, &settings);
    let root = walker.node(NodeContext::new(Value::Null).with_type(optional)).unwrap();
    let mut dehydrated = walker.finish(root);
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.value(), None);
    assert!(root.is_null());
    let ty = root.ty().unwrap();
    assert!(ty.is_nullable());
    assert_eq!(ty.full_name(), "i64");
    assert_eq!(ty.default(), None);
}

#[test]
fn enums() {
    let mut schema = SchemaRegistry::new();
    let genre = schema
        .register(TypeInfo::enumeration(
            "library::Genre",
            [EnumVariant::new("Fiction", 0), EnumVariant::new("Poetry", 1)],
        ))
        .unwrap();
    let settings = Settings::default();

    let mut dehydrated = dehydrate(&schema, &settings, Value::enumeration(genre, 1));
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.value(), Some("1"));
    let ty = root.ty().unwrap();
    assert_eq!(ty.enum_values()[1].label, "Poetry");
    assert!(ty.is_numeric());

    let mut walker = Dehydrator::new(&schema, &settings);
    let root = walker.node(NodeContext::new(Value::Null).with_type(genre)).unwrap();
    let mut dehydrated = walker.finish(root);
    assert_eq!(dehydrated.hydrate().unwrap().value(), Some("0"));
}

// -----------------------------------------------------------------------------
// Tags

#[test]
fn tag_lists_invert() {
    let mut lib = library();
    let hidden = lib.schema.register(TypeInfo::composite("ui::Hidden")).unwrap();
    let label = lib.schema.register(TypeInfo::composite("ui::Label")).unwrap();
    let copy = lib.schema.register(TypeInfo::composite("core::marker::Copy")).unwrap();
    for ty in [hidden, label, copy] {
        let data = DynamicStruct::new(ty).into_value();
        lib.schema.add_tag(TagTarget::Type(lib.book), ty, data).unwrap();
    }
    let data = DynamicStruct::new(label).into_value();
    lib.schema.add_tag(TagTarget::Member(lib.title), label, data).unwrap();

    let book = DynamicStruct::new(lib.book).with("title", "Dune").into_value();
    let tag_names = |tags: TagSettings| {
        let settings = Settings::default().with_tags(tags);
        let mut dehydrated = dehydrate(&lib.schema, &settings, book.clone());
        let root = dehydrated.hydrate().unwrap();
        let names: Vec<String> = root
            .ty()
            .unwrap()
            .tags()
            .map(|tag| tag.ty().unwrap().name().into())
            .collect();
        let on_title = root.member("title").unwrap().member_ref().unwrap().tags().count();
        (names, on_title)
    };

    assert_eq!(tag_names(TagSettings::default()), (vec!["Hidden".into(), "Label".into()], 1));
    assert_eq!(tag_names(TagSettings::allow([hidden])), (vec!["Hidden".into()], 0));
    assert_eq!(tag_names(TagSettings::deny([hidden])), (vec!["Label".into()], 1));
    assert_eq!(tag_names(TagSettings::none()), (vec![], 0));
}

#[test]
fn inherited_tags_are_flagged() {
    let mut schema = SchemaRegistry::new();
    let marker = schema.register(TypeInfo::composite("ui::Marker")).unwrap();
    let base = schema.register(TypeInfo::composite("shapes::Shape")).unwrap();
    let circle = schema.register(TypeInfo::composite("shapes::Circle").with_base(base)).unwrap();
    let data = DynamicStruct::new(marker).into_value();
    schema.add_tag(TagTarget::Type(base), marker, data).unwrap();

    let settings = Settings::default();
    let mut dehydrated = dehydrate(&schema, &settings, DynamicStruct::new(circle).into_value());
    let root = dehydrated.hydrate().unwrap();
    let ty = root.ty().unwrap();

    let tag = ty.tags().next().unwrap();
    assert!(tag.is_inherited());
    assert_eq!(tag.data().unwrap().ty().unwrap().full_name(), "ui::Marker");
    assert!(!ty.base().unwrap().tags().next().unwrap().is_inherited());
    assert!(ty.is("shapes::Shape"));
    assert!(!ty.is("ui::Marker"));
}

// -----------------------------------------------------------------------------
// Member fetch failures

#[test]
fn fetch_failures_are_contained() {
    let lib = library();
    let value = DynamicStruct::new(lib.book).with("title", "Dune").into_value();

    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);
    assert_eq!(dehydrated.exceptions().len(), 4);
    let root = dehydrated.hydrate().unwrap();

    let title = root.member("title").unwrap();
    assert_eq!(title.value(), Some("Dune"));
    assert_eq!(title.error(), None);

    let pages = root.member("pages").unwrap();
    assert!(pages.is_null());
    assert_eq!(pages.error(), Some("pages: no member named `pages`"));
    assert_eq!(root.members().count(), 5);
}

#[test]
fn getter_overrides_take_precedence() {
    let lib = library();
    let settings = Settings::default()
        .with_member_getter(&lib.schema, lib.title, |_: &Value| Ok(Value::from("Override")))
        .unwrap()
        .with_member_getter(&lib.schema, lib.pages, |_: &Value| {
            Err(AccessError::failed("boom"))
        })
        .unwrap();
    let herbert = lib.author("Herbert");
    let value = lib.book("Dune", &herbert).into_value();

    let mut dehydrated = dehydrate(&lib.schema, &settings, value);
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.member("title").unwrap().value(), Some("Override"));
    assert_eq!(root.member("pages").unwrap().error(), Some("pages: boom"));
    assert_eq!(root.member("writer.name").unwrap().value(), Some("Herbert"));
}

// -----------------------------------------------------------------------------
// Collections and dictionaries

#[test]
fn collection_items_are_named_by_their_member() {
    let mut lib = library();
    let list = lib.schema.list_of(builtin::STRING).unwrap();
    let tags = DynamicList::new(list, [Value::from("a"), Value::from("b")]).into_value();
    let value = DynamicStruct::new(lib.book).with("Tags", tags).into_value();

    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);
    let root = dehydrated.hydrate().unwrap();
    let tags = root.member("Tags").unwrap();

    let ty = tags.ty().unwrap();
    assert_eq!(ty.full_name(), "alloc::vec::Vec<alloc::string::String>");
    assert_eq!(ty.element().unwrap().full_name(), "alloc::string::String");

    let items: Vec<_> = tags.items().collect();
    assert_eq!(items.iter().map(|item| item.value()).collect::<Vec<_>>(), [Some("a"), Some("b")]);
    assert_eq!(names(tags.items()), ["Tags", "Tags"]);

    let template = tags.template().unwrap();
    assert!(template.is_null());
    assert_eq!(template.name(), Some("Tags"));
    assert_eq!(template.ty().unwrap().full_name(), "alloc::string::String");
}

#[test]
fn null_items_are_opt_in() {
    let mut schema = SchemaRegistry::new();
    let list = schema.list_of(builtin::STRING).unwrap();
    let value = DynamicList::new(list, [Value::from("a"), Value::Null]).into_value();

    let mut dehydrated = dehydrate(&schema, &Settings::default(), value.clone());
    assert_eq!(dehydrated.hydrate().unwrap().items().count(), 1);

    let settings = Settings::default().with_null_items();
    let mut dehydrated = dehydrate(&schema, &settings, value);
    let root = dehydrated.hydrate().unwrap();
    let items: Vec<_> = root.items().collect();
    assert_eq!(items.len(), 2);
    assert!(items[1].is_null());
}

#[test]
fn dictionaries() {
    let mut schema = SchemaRegistry::new();
    let map = schema.map_of(builtin::STRING, builtin::INT).unwrap();
    let value = DynamicMap::new(map, [(Value::from("one"), Value::from(1)), (Value::from("two"), Value::from(2))])
        .into_value();

    let mut dehydrated = dehydrate(&schema, &Settings::default(), value);
    let root = dehydrated.hydrate().unwrap();

    let entries: Vec<_> = root
        .items()
        .map(|entry| {
            let key = entry.member("key").unwrap().value();
            let value = entry.member("value").unwrap().value();
            (key, value)
        })
        .collect();
    assert_eq!(entries, [(Some("one"), Some("1")), (Some("two"), Some("2"))]);

    let template = root.template().unwrap();
    assert!(template.is_null());
    assert_eq!(
        template.ty().unwrap().full_name(),
        "vc_introspect::value::MapEntry<alloc::string::String, i64>"
    );
    assert_eq!(
        root.ty().unwrap().element().unwrap().full_name(),
        template.ty().unwrap().full_name()
    );
}

#[test]
fn shape_mismatch_is_fatal() {
    let mut schema = SchemaRegistry::new();
    let list = schema.list_of(builtin::STRING).unwrap();
    let not_a_list = DynamicStruct::new(list).into_value();

    let result = Dehydrator::new(&schema, &Settings::default()).dehydrate(not_a_list);
    assert!(matches!(result, Err(DehydrateError::ShapeMismatch { .. })));
}

#[test]
fn nulls_under_nullable_wrappers() {
    let mut lib = library();
    let schema = &mut lib.schema;
    let list = schema.list_of(builtin::STRING).unwrap();
    let map = schema.map_of(builtin::STRING, builtin::INT).unwrap();
    let maybe_list = schema.nullable_of(list).unwrap();
    let maybe_map = schema.nullable_of(map).unwrap();
    let maybe_author = schema.nullable_of(lib.author).unwrap();
    let maybe_count = schema.nullable_of(builtin::INT).unwrap();

    let holder = schema.register(TypeInfo::composite("library::Holder")).unwrap();
    schema.add_member(holder, MemberInfo::new("tags", maybe_list)).unwrap();
    schema.add_member(holder, MemberInfo::new("scores", maybe_map)).unwrap();
    schema.add_member(holder, MemberInfo::new("owner", maybe_author)).unwrap();
    schema.add_member(holder, MemberInfo::new("count", maybe_count)).unwrap();

    let value = DynamicStruct::new(holder)
        .with("tags", Value::Null)
        .with("scores", Value::Null)
        .with("owner", Value::Null)
        .with("count", Value::Null)
        .into_value();
    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);
    let root = dehydrated.hydrate().unwrap();

    let tags = root.member("tags").unwrap();
    assert!(tags.is_null());
    assert!(tags.ty().unwrap().is_nullable());
    assert_eq!(tags.items().count(), 0);
    assert_eq!(tags.template().unwrap().ty().unwrap().full_name(), "alloc::string::String");

    let scores = root.member("scores").unwrap();
    assert!(scores.is_null());
    assert_eq!(scores.items().count(), 0);
    assert_eq!(
        scores.template().unwrap().ty().unwrap().full_name(),
        "vc_introspect::value::MapEntry<alloc::string::String, i64>"
    );

    let owner = root.member("owner").unwrap();
    assert!(owner.is_null());
    assert_eq!(owner.members().count(), 0);
    assert_eq!(owner.ty().unwrap().full_name(), "library::Author");
    assert!(owner.has_member("name"));

    let count = root.member("count").unwrap();
    assert!(count.is_null());
    assert_eq!(count.value(), None);
}

#[test]
fn templates_follow_the_live_type() {
    let mut schema = SchemaRegistry::new();
    let declared = schema.map_of(builtin::STRING, builtin::OBJECT).unwrap();
    let live = schema.map_of(builtin::STRING, builtin::INT).unwrap();
    let value = DynamicMap::new(live, [(Value::from("one"), Value::from(1))]).into_value();

    // Describe the live map as the declared one.
    let settings = Settings::default()
        .with_substitution(move |ty: TypeHandle| if ty == live { declared } else { ty });
    let mut dehydrated = dehydrate(&schema, &settings, value);
    let root = dehydrated.hydrate().unwrap();

    assert_eq!(
        root.ty().unwrap().full_name(),
        "vc_introspect::hash::HashMap<alloc::string::String, core::any::Any>"
    );
    assert_eq!(
        root.template().unwrap().ty().unwrap().full_name(),
        "vc_introspect::value::MapEntry<alloc::string::String, i64>"
    );
    let entry = root.items().next().unwrap();
    assert_eq!(entry.member("value").unwrap().value(), Some("1"));
}

// -----------------------------------------------------------------------------
// Hydration

#[test]
fn hydration_is_idempotent() {
    let lib = library();
    let herbert = lib.author("Herbert");
    let value = lib.book("Dune", &herbert).into_value();
    let mut dehydrated = dehydrate(&lib.schema, &Settings::default(), value);

    let first: *const _ = dehydrated.hydrate().unwrap().record();
    let second: *const _ = dehydrated.hydrate().unwrap().record();
    assert_eq!(first, second);
    assert!(dehydrated.table().iter().all(|record| match record {
        Record::Node(node) => node.is_hydrated(),
        _ => true,
    }));
}

#[test]
fn broken_tables_fail_to_hydrate() {
    let lib = library();
    let herbert = lib.author("Herbert");
    let value = lib.book("Dune", &herbert).into_value();
    let dehydrated = dehydrate(&lib.schema, &Settings::default(), value);

    let json = serde_json::to_string(&dehydrated).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["table"].as_array_mut().unwrap().truncate(1);
    let mut truncated: Dehydrated = serde_json::from_value(value).unwrap();

    assert!(truncated.hydrate().is_err());
    // Guards are cleared, a second attempt fails the same way.
    assert!(truncated.hydrate().is_err());
}

#[test]
fn json_round_trip() {
    let lib = library();
    let herbert = lib.author("Herbert");
    let value = lib.book("Dune", &herbert).into_value();
    let dehydrated = Dehydrator::new(&lib.schema, &Settings::default())
        .dehydrate_named("book", value)
        .unwrap();

    let json = serde_json::to_string(&dehydrated).unwrap();
    let mut restored: Dehydrated = serde_json::from_str(&json).unwrap();
    let root = restored.hydrate().unwrap();
    assert_eq!(root.name(), Some("book"));
    assert_eq!(root.member("writer.name").unwrap().value(), Some("Herbert"));
    assert_eq!(root.member("pages").unwrap().value(), Some("412"));
}

#[test]
fn ron_round_trip() {
    let lib = library();
    let herbert = lib.author("Herbert");
    let value = lib.book("Dune", &herbert).into_value();
    let dehydrated = dehydrate(&lib.schema, &Settings::default(), value);

    let text = ron::to_string(&dehydrated).unwrap();
    let mut restored: Dehydrated = ron::from_str(&text).unwrap();
    let root = restored.hydrate().unwrap();
    assert_eq!(root.member("title").unwrap().value(), Some("Dune"));
    assert_eq!(restored.table().len(), dehydrated.table().len());
}

// -----------------------------------------------------------------------------
// Settings

#[test]
fn substitutions_run_in_order() {
    let mut schema = SchemaRegistry::new();
    let a = schema.register(TypeInfo::composite("demo::A")).unwrap();
    let b = schema.register(TypeInfo::composite("demo::B")).unwrap();
    let c = schema.register(TypeInfo::composite("demo::C")).unwrap();
    let value = DynamicStruct::new(a).into_value();

    let a_to_b = move |ty: TypeHandle| if ty == a { b } else { ty };
    let b_to_c = move |ty: TypeHandle| if ty == b { c } else { ty };

    let settings = Settings::default().with_substitution(a_to_b).with_substitution(b_to_c);
    let mut dehydrated = dehydrate(&schema, &settings, value.clone());
    assert_eq!(dehydrated.hydrate().unwrap().ty().unwrap().full_name(), "demo::C");

    let settings = Settings::default().with_substitution(b_to_c).with_substitution(a_to_b);
    let mut dehydrated = dehydrate(&schema, &settings, value);
    assert_eq!(dehydrated.hydrate().unwrap().ty().unwrap().full_name(), "demo::B");
}

#[test]
fn member_filters() {
    let mut schema = SchemaRegistry::new();
    let base = schema.register(TypeInfo::composite("demo::Base")).unwrap();
    schema.add_member(base, MemberInfo::new("inherited", builtin::INT)).unwrap();
    let ty = schema.register(TypeInfo::composite("demo::Thing").with_base(base)).unwrap();
    schema.add_member(ty, MemberInfo::new("own", builtin::INT)).unwrap();
    schema.add_member(ty, MemberInfo::new("secret", builtin::INT).write_only()).unwrap();
    schema.add_member(ty, MemberInfo::new("item", builtin::INT).indexed()).unwrap();
    schema.add_member(ty, MemberInfo::new("any", builtin::OBJECT)).unwrap();
    schema.add_member(ty, MemberInfo::new("kind", builtin::TYPE)).unwrap();
    schema.add_dynamic_member(ty, MemberInfo::new("extra", builtin::INT)).unwrap();

    let value = DynamicStruct::new(ty)
        .with("inherited", 1)
        .with("own", 2)
        .with("any", "anything")
        .with("kind", Value::Type(base))
        .with("extra", 3)
        .into_value();
    let walk = |settings: Settings| {
        let mut dehydrated = dehydrate(&schema, &settings, value.clone());
        let root = dehydrated.hydrate().unwrap();
        names(root.members()).into_iter().map(String::from).collect::<Vec<_>>()
    };

    assert_eq!(walk(Settings::default()), ["own", "any", "inherited"]);
    assert_eq!(walk(Settings::default().without_inherited_members()), ["own", "any"]);
    assert_eq!(walk(Settings::default().without_object_typed_members()), ["own", "inherited"]);
    assert_eq!(walk(Settings::default().with_dynamic_members()), ["own", "any", "extra", "inherited"]);
    assert_eq!(
        walk(Settings::default().with_type_valued_members()),
        ["own", "any", "kind", "inherited"]
    );
}

#[test]
fn type_valued_members_print_the_type_path() {
    let mut schema = SchemaRegistry::new();
    let ty = schema.register(TypeInfo::composite("demo::Thing")).unwrap();
    schema.add_member(ty, MemberInfo::new("kind", builtin::TYPE)).unwrap();
    let value = DynamicStruct::new(ty).with("kind", Value::Type(ty)).into_value();

    let settings = Settings::default().with_type_valued_members();
    let mut dehydrated = dehydrate(&schema, &settings, value);
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.member("kind").unwrap().value(), Some("demo::Thing"));
}

#[test]
fn hidden_foreign_types() {
    let mut schema = SchemaRegistry::new();
    let vault = schema.register(TypeInfo::composite("secret::Vault").private_to("secret")).unwrap();
    schema.add_member(vault, MemberInfo::new("code", builtin::INT)).unwrap();
    let value = DynamicStruct::new(vault).with("code", 1234).into_value();

    let mut dehydrated = dehydrate(&schema, &Settings::default(), value.clone());
    assert_eq!(dehydrated.hydrate().unwrap().members().count(), 0);

    let settings = Settings::default().with_calling_unit("secret");
    let mut dehydrated = dehydrate(&schema, &settings, value.clone());
    assert_eq!(dehydrated.hydrate().unwrap().member("code").unwrap().value(), Some("1234"));

    let settings = Settings::default().with_hidden_foreign_types();
    let mut dehydrated = dehydrate(&schema, &settings, value);
    assert_eq!(dehydrated.hydrate().unwrap().members().count(), 1);
}

#[test]
fn depth_is_bounded() {
    let mut schema = SchemaRegistry::new();
    let node = schema.register(TypeInfo::composite("graph::Node")).unwrap();
    schema.add_member(node, MemberInfo::new("next", node)).unwrap();

    let tail = DynamicStruct::new(node).with("next", Value::Null).into_value();
    let middle = DynamicStruct::new(node).with("next", tail).into_value();
    let head = DynamicStruct::new(node).with("next", middle).into_value();

    let settings = Settings::default().with_max_depth(2);
    let result = Dehydrator::new(&schema, &settings).dehydrate(head.clone());
    assert_eq!(result.unwrap_err(), DehydrateError::DepthExceeded(2));

    let settings = Settings::default().with_max_depth(8);
    let mut dehydrated = dehydrate(&schema, &settings, head);
    let root = dehydrated.hydrate().unwrap();
    assert!(root.member("next.next.next").unwrap().is_null());
}

// -----------------------------------------------------------------------------
// Local records and splicing

#[test]
fn local_lists() {
    let mut schema = SchemaRegistry::new();
    let list = schema.list_of(builtin::STRING).unwrap();
    let settings = Settings::default();

    let mut walker = Dehydrator::new(&schema, &settings);
    let choices = ["red", "green", "blue"].map(Value::from);
    let mut node = walker.local_list("Choices", list, choices).unwrap();
    assert!(node.index().is_local());

    let extra = walker
        .node(NodeContext::new("cyan").with_member(MemberKey::Named("Choices".into())))
        .unwrap();
    node.add_item(extra).unwrap();
    assert!(node.remove_item(1).is_some());

    let mut dehydrated = walker.finish(crate::record::Link::local(node));
    let root = dehydrated.hydrate().unwrap();
    assert_eq!(root.name(), Some("Choices"));
    assert!(root.index().is_local());
    assert_eq!(
        root.items().map(|item| item.value()).collect::<Vec<_>>(),
        [Some("red"), Some("blue"), Some("cyan")]
    );
    assert_eq!(root.template().unwrap().ty().unwrap().full_name(), "alloc::string::String");
}

#[test]
fn dehydrated_values_are_spliced() {
    let lib = library();
    let settings = Settings::default();

    let mut walker = Dehydrator::new(&lib.schema, &settings);
    let shared = walker.node(NodeContext::new("shared")).unwrap();
    let id = shared.id().unwrap();

    let wrapper = walker
        .node(NodeContext::new(Value::Dehydrated(id.raw())).with_type(builtin::STRING))
        .unwrap();
    let book = DynamicStruct::new(lib.book).with("title", Value::Dehydrated(id.raw()));
    let book = walker.node(NodeContext::new(book.into_value())).unwrap();
    let out_of_range = walker.node(NodeContext::new(Value::Dehydrated(u32::MAX)));
    assert!(matches!(out_of_range, Err(DehydrateError::InvalidArgument(_))));

    let table = walker.registry().table().clone();
    let mut dehydrated = walker.finish(wrapper);
    let root = dehydrated.hydrate().unwrap();
    let spliced = root.members().next().unwrap();
    assert_eq!(spliced.value(), Some("shared"));
    assert_eq!(spliced.index(), Index::from(id));

    let book = book.get(&table);
    assert!(matches!(book, Some(node) if node.kind.members()[0].node.id() == Some(id)));
}

#[test]
fn only_nodes_can_be_spliced() {
    let lib = library();
    let settings = Settings::default();

    let mut walker = Dehydrator::new(&lib.schema, &settings);
    walker.node(NodeContext::new(lib.author("Herbert"))).unwrap();
    let type_slot = walker
        .registry()
        .table()
        .iter()
        .position(|record| matches!(record, Record::Type(_)))
        .unwrap();

    let spliced = walker.node(NodeContext::new(Value::Dehydrated(type_slot as u32)));
    assert!(matches!(spliced, Err(DehydrateError::InvalidArgument(_))));

    let book = DynamicStruct::new(lib.book).with("title", Value::Dehydrated(type_slot as u32));
    let spliced = walker.node(NodeContext::new(book.into_value()));
    assert!(matches!(spliced, Err(DehydrateError::InvalidArgument(_))));
}
