// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use sqlface::compiler::QueryResult;
use sqlface::schema::{
    NumericKind, Repr, ResolverContainer, ResolverError, ResolverProvider, SchemaBuilder,
    SchemaDesign, Shape, Sourced,
};
use sqlface::value::Value;
use sqlface::{ContextBuilder, QueryContext};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Author {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub price: f64,
    pub author: Author,
}

impl Sourced for Author {
    fn shape() -> Shape {
        Shape::new("Author")
            .field("Name", Repr::String)
            .field("Country", Repr::String)
    }
}

impl Sourced for Book {
    fn shape() -> Shape {
        Shape::new("Book")
            .field("BookId", Repr::Numeric(NumericKind::I32))
            .field("Title", Repr::String)
            .field("Price", Repr::Numeric(NumericKind::F64))
            .field("Author", Repr::of::<Author>())
    }
}

fn book(book_id: i64, title: &str, price: f64, author: &str, country: &str) -> Book {
    Book {
        book_id,
        title: title.to_string(),
        price,
        author: Author {
            name: author.to_string(),
            country: country.to_string(),
        },
    }
}

/// Four books, deliberately not in title order.
pub fn books() -> Vec<Book> {
    vec![
        book(1, "Dune", 9.5, "Herbert", "US"),
        book(2, "Emma", 4.0, "Austen", "UK"),
        book(3, "Beloved", 12.25, "Morrison", "US"),
        book(4, "Atonement", 7.0, "McEwan", "UK"),
    ]
}

/// Counts resolver calls and released scopes.
#[derive(Debug, Default)]
pub struct Tally {
    pub calls: AtomicUsize,
    pub released: AtomicUsize,
}

impl Tally {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

pub struct Library;

impl ResolverProvider for Library {
    fn container() -> ResolverContainer {
        ResolverContainer::new("Library").member("GetBooks", |scope| {
            if let Some(tally) = scope.service::<Arc<Tally>>() {
                tally.calls.fetch_add(1, Ordering::SeqCst);
                let tally = Arc::clone(&tally);
                scope.on_release(move || {
                    tally.released.fetch_add(1, Ordering::SeqCst);
                });
            }
            Ok::<_, ResolverError>(books())
        })
    }
}

#[derive(Default)]
pub struct LibrarySchema;

impl SchemaDesign for LibrarySchema {
    fn describe(&self, designer: &mut SchemaBuilder) {
        designer.source::<Book>().resolver::<Library>();
    }
}

pub fn library() -> QueryContext {
    ContextBuilder::new().use_schema::<LibrarySchema>().build()
}

/// A library whose resolver reports into `tally`.
pub fn tallied_library(tally: &Arc<Tally>) -> QueryContext {
    ContextBuilder::new()
        .use_schema::<LibrarySchema>()
        .service(Arc::clone(tally))
        .build()
}

/// The string values of one column, in result order.
pub fn strings(result: &QueryResult, column: &str) -> Vec<String> {
    result
        .records()
        .iter()
        .map(|record| match record.get(column) {
            Some(Value::String(s)) => s.clone(),
            other => panic!("column `{}` is not a string: {:?}", column, other),
        })
        .collect()
}

pub fn titles(result: &QueryResult) -> Vec<String> {
    strings(result, "title")
}
