// tests/schema_tests.rs

mod common;

use common::{Book, Library, LibrarySchema};
use pretty_assertions::assert_eq;
use sqlface::schema::{
    BasicKind, NumericKind, ObjectProperty, Repr, ResolverContainer, ResolverError, ReturnKind,
    SchemaBuilder, SchemaDesign, Shape, Type, find_source,
};
use sqlface::value::Value;
use sqlface::{ContextBuilder, SchemaError};

fn library_dom() -> sqlface::schema::SchemaDom {
    let mut builder = SchemaBuilder::new();
    LibrarySchema.describe(&mut builder);
    builder.build()
}

fn property<'t>(ty: &'t Type, identifier: &str) -> &'t ObjectProperty {
    ty.record_properties()
        .and_then(|properties| properties.iter().find(|p| p.identifier == identifier))
        .unwrap_or_else(|| panic!("no property `{}` in {}", identifier, ty))
}

// ============================================================================
// Sources and types
// ============================================================================

#[test]
fn test_source_answers_to_singular_and_plural() {
    let dom = library_dom();
    let source = dom.find("books").unwrap();

    assert_eq!(source.identifiers, vec!["book", "books"]);
    assert_eq!(source.name(), "book");
    assert!(dom.find("book").is_some());
    assert!(dom.find("Books").is_none());
}

#[test]
fn test_shape_fields_become_typed_properties() {
    let dom = library_dom();
    let ty = &dom.find("book").unwrap().ty;

    assert_eq!(ty.to_string(), "object Book");
    let identifiers: Vec<&str> = ty
        .record_properties()
        .unwrap()
        .iter()
        .map(|p| p.identifier.as_str())
        .collect();
    assert_eq!(identifiers, vec!["bookId", "title", "price", "author"]);

    let book_id = property(ty, "bookId");
    assert_eq!(book_id.accessor, "BookId");
    assert_eq!(book_id.ty, Type::Basic(BasicKind::Number));

    let author = property(ty, "author");
    assert_eq!(property(&author.ty, "country").accessor, "Country");
}

#[test]
fn test_every_numeric_kind_is_a_number() {
    let kinds = [
        NumericKind::U8,
        NumericKind::U16,
        NumericKind::U32,
        NumericKind::U64,
        NumericKind::I8,
        NumericKind::I16,
        NumericKind::I32,
        NumericKind::I64,
        NumericKind::F32,
        NumericKind::F64,
        NumericKind::Decimal,
    ];

    for kind in kinds {
        assert_eq!(Type::from_repr(&Repr::Numeric(kind)), Type::Basic(BasicKind::Number));
    }
}

#[test]
fn test_enumerable_fields_become_arrays() {
    let shape = Shape::new("Shelf")
        .field("Tags", Repr::Enumerable(Box::new(Repr::String)))
        .field("Books", Repr::Enumerable(Box::new(Repr::of::<Book>())));
    let ty = Type::from_shape(&shape);

    assert_eq!(property(&ty, "tags").ty.to_string(), "array of string");
    assert_eq!(property(&ty, "books").ty.to_string(), "array of object Book");
    assert!(property(&ty, "books").ty.record_properties().is_some());
}

// ============================================================================
// Resolver binding
// ============================================================================

#[test]
fn test_get_member_binds_to_source() {
    let dom = library_dom();
    let binding = dom.find("books").unwrap().resolver.as_ref().unwrap();

    assert_eq!(binding.container, "Library");
    assert_eq!(binding.member, "GetBooks");
    assert_eq!(binding.returns, ReturnKind::Enumerable);
}

#[test]
fn test_async_member_binds_by_stripped_name() {
    let mut builder = SchemaBuilder::new();
    builder
        .source_shape(Shape::new("Review").field("Stars", Repr::Numeric(NumericKind::U8)))
        .resolver_container(ResolverContainer::new("Reviews").member_async(
            "getReviewsAsync",
            |_scope| async { Ok::<Vec<Value>, ResolverError>(Vec::new()) },
        ));
    let dom = builder.build();

    let binding = dom.find("reviews").unwrap().resolver.as_ref().unwrap();
    assert_eq!(binding.member, "getReviewsAsync");
    assert_eq!(binding.returns, ReturnKind::FutureOfEnumerable);
}

#[test]
fn test_members_without_get_or_enumerable_result_are_ignored() {
    let mut builder = SchemaBuilder::new();
    builder
        .source_shape(Shape::new("Publisher").field("Name", Repr::String))
        .resolver_container(
            ResolverContainer::new("Publishing")
                .member_value("GetPublishers", ReturnKind::Other, |_scope| Ok(Value::Null))
                .member("Publishers", |_scope| Ok::<Vec<Value>, ResolverError>(Vec::new())),
        );
    let dom = builder.build();

    assert!(dom.find("publishers").unwrap().resolver.is_none());
}

#[test]
fn test_first_resolver_member_wins() {
    let mut builder = SchemaBuilder::new();
    builder
        .source::<Book>()
        .resolver::<Library>()
        .resolver_container(
            ResolverContainer::new("Backup").member("get_books", |_scope| Ok::<Vec<Value>, ResolverError>(Vec::new())),
        );
    let dom = builder.build();

    assert_eq!(dom.find("books").unwrap().resolver.as_ref().unwrap().container, "Library");
}

// ============================================================================
// Identifier collisions
// ============================================================================

#[test]
fn test_colliding_identifiers_go_to_the_first_source() {
    let mut builder = SchemaBuilder::new();
    builder
        .source_shape(Shape::new("Book").field("Title", Repr::String))
        .source_shape(Shape::new("Books").field("Count", Repr::Numeric(NumericKind::I32)));
    let dom = builder.build();

    assert_eq!(dom.sources().len(), 2);
    assert_eq!(dom.find("books").unwrap().ty.to_string(), "object Book");
    assert_eq!(dom.sources()[1].identifiers, vec!["bookss"]);
}

#[test]
fn test_source_without_free_identifier_is_skipped() {
    let mut builder = SchemaBuilder::new();
    builder.source::<Book>().source::<Book>();
    let dom = builder.build();

    assert_eq!(dom.sources().len(), 1);
}

// ============================================================================
// Lookup across schemas
// ============================================================================

#[test]
fn test_find_source_across_schemas() {
    let context = ContextBuilder::new()
        .use_schema::<LibrarySchema>()
        .with_schema(|designer| {
            designer.source_shape(Shape::new("Shelf").field("Label", Repr::String));
        })
        .build();

    let shelf = find_source(context.schemas(), "shelves").err();
    assert_eq!(shelf, Some(SchemaError::UnknownSource("shelves".to_string())));

    let shelf = find_source(context.schemas(), "shelfs").unwrap();
    assert_eq!(shelf.id.schema, 1);
    assert_eq!(shelf.id.index, 0);
    assert_eq!(find_source(context.schemas(), "books").unwrap().id.schema, 0);
}

#[test]
fn test_decorated_schema_design() {
    let context = ContextBuilder::new()
        .use_schema_with::<LibrarySchema, _>(|designer| {
            designer.source_shape(Shape::new("Author").field("Name", Repr::String));
        })
        .build();

    assert!(context.find_source("books").is_ok());
    assert!(context.find_source("authors").is_ok());
    assert_eq!(context.schemas().len(), 1);
}
