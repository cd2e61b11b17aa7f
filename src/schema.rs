//! # Schema model
//!
//! Describes which sources a context can query, the type of their records
//! and how their records are materialized.
//!
//! Hosts declare record shapes and resolver containers explicitly through a
//! [`SchemaBuilder`]. [`SchemaBuilder::build`] turns them into an immutable
//! [`SchemaDom`]:
//!
//! 1. Every enumerable member of every resolver container whose name starts
//!    with `get` becomes a candidate. `getBooks`, `GetBooksAsync` and
//!    `get_books` all yield the candidate `books`.
//! 2. Every shape `Book` is reachable under the identifiers `book` and
//!    `books`, and is bound to the first candidate matching one of them.
//! 3. Shape fields map to [`Type`]s: strings, booleans and numbers become
//!    basic types, enumerables become arrays and nested shapes objects.
//!
//! Building never fails. A source without a resolver is declared but cannot
//! be queried; that surfaces as [`SchemaError::MissingResolver`] when a
//! script reads it.
//!
//! [`SchemaError::MissingResolver`]: crate::SchemaError::MissingResolver
pub mod builder;
pub mod dom;
pub mod naming;
pub mod resolver;
pub mod scope;
pub mod shape;
pub mod types;

pub use builder::{SchemaBuilder, SchemaDesign};
pub use dom::{ResolverBinding, SchemaDom, Source, SourceId, find_source};
pub use resolver::{
    Member, Resolve, ResolveFuture, ResolverContainer, ResolverError, ResolverProvider, ReturnKind,
};
pub use scope::{ResolverScope, ScopeFactory, ServiceScopeFactory, Services};
pub use shape::{Field, NumericKind, Repr, Shape, Sourced};
pub use types::{BasicKind, ObjectProperty, Type};
