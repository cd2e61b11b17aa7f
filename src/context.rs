//! One-time assembly of schemas, pipeline cache and executor.
//!
//! ```
//! use sqlface::ContextBuilder;
//! use sqlface::schema::{NumericKind, Repr, ResolverContainer, Shape};
//! use sqlface::value::{Record, Value};
//!
//! let context = ContextBuilder::new()
//!     .with_schema(|designer| {
//!         designer
//!             .source_shape(
//!                 Shape::new("Book")
//!                     .field("bookId", Repr::Numeric(NumericKind::I64))
//!                     .field("title", Repr::String),
//!             )
//!             .resolver_container(ResolverContainer::new("Library").member("GetBooks", |_scope| {
//!                 let mut book = Record::new();
//!                 book.insert("bookId", 1);
//!                 book.insert("title", "Dune");
//!                 Ok(vec![Value::Object(book)])
//!             }));
//!     })
//!     .build();
//!
//! assert!(context.find_source("books").is_ok());
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::ast::SelectQuery;
use crate::compiler::{Pipeline, PipelineCache, QueryResult};
use crate::error::Error;
use crate::parser::Parser;
use crate::runner::{ResolverExecutor, Runner, SourceExecutor};
use crate::schema::{
    SchemaBuilder, SchemaDesign, SchemaDom, ScopeFactory, ServiceScopeFactory, Services, Source,
    find_source,
};

/// Collects schemas and services, then builds a [`QueryContext`].
#[derive(Default)]
pub struct ContextBuilder {
    schemas: Vec<SchemaDom>,
    services: Services,
    scope_factory: Option<Arc<dyn ScopeFactory>>,
    executor: Option<Arc<dyn SourceExecutor>>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema described by `describe`.
    pub fn with_schema<F>(mut self, describe: F) -> Self
    where
        F: FnOnce(&mut SchemaBuilder),
    {
        let mut builder = SchemaBuilder::for_schema(self.schemas.len());
        describe(&mut builder);
        self.schemas.push(builder.build());
        self
    }

    /// Adds the schema declared by `D`.
    pub fn use_schema<D: SchemaDesign + Default>(self) -> Self {
        self.use_schema_with::<D, _>(|_| {})
    }

    /// Adds the schema declared by `D`, then amended by `decorate`.
    pub fn use_schema_with<D, F>(self, decorate: F) -> Self
    where
        D: SchemaDesign + Default,
        F: FnOnce(&mut SchemaBuilder),
    {
        let design = D::default();
        self.with_schema(|builder| {
            design.describe(builder);
            decorate(builder);
        })
    }

    /// Registers a service resolvers can fetch from their scope.
    pub fn service<T: Any + Send + Sync>(mut self, service: T) -> Self {
        self.services.insert(service);
        self
    }

    pub fn scope_factory(mut self, factory: impl ScopeFactory + 'static) -> Self {
        self.scope_factory = Some(Arc::new(factory));
        self
    }

    /// Replaces the resolver-calling executor.
    pub fn executor(mut self, executor: impl SourceExecutor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn build(self) -> QueryContext {
        let scope_factory = self
            .scope_factory
            .unwrap_or_else(|| Arc::new(ServiceScopeFactory::new()));
        let executor = self
            .executor
            .unwrap_or_else(|| Arc::new(ResolverExecutor::new(scope_factory, self.services)));

        debug!(schemas = self.schemas.len(), "query context built");
        QueryContext {
            schemas: Arc::new(self.schemas),
            cache: Arc::new(PipelineCache::new()),
            executor,
        }
    }
}

/// Immutable schemas plus the shared pipeline cache.
#[derive(Clone)]
pub struct QueryContext {
    schemas: Arc<Vec<SchemaDom>>,
    cache: Arc<PipelineCache>,
    executor: Arc<dyn SourceExecutor>,
}

impl QueryContext {
    pub fn schemas(&self) -> &[SchemaDom] {
        &self.schemas
    }

    pub fn find_source(&self, name: &str) -> Result<&Source, Error> {
        Ok(find_source(&self.schemas, name)?)
    }

    /// The cached pipeline for `query` over `source`, compiling it on first
    /// use.
    pub fn pipeline(&self, source: &Source, query: &SelectQuery) -> Result<Arc<Pipeline>, Error> {
        self.cache.get_or_compile(source, query)
    }

    pub fn cache(&self) -> &PipelineCache {
        &self.cache
    }

    pub fn runner(&self) -> Runner {
        Runner::new(self.schemas.clone(), self.cache.clone(), self.executor.clone())
    }

    /// Parses and runs `script`.
    pub async fn execute(&self, script: &str) -> Result<BTreeMap<String, QueryResult>, Error> {
        let tree = Parser::new(script).parse()?;
        self.runner().run(&tree).await
    }
}
