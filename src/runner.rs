use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::ast::SyntaxTree;
use crate::compiler::{PipelineCache, QueryResult};
use crate::error::{Error, ExecutionError, SchemaError};
use crate::schema::{Resolve, ResolverScope, SchemaDom, ScopeFactory, Services, Source, find_source};
use crate::value::Value;

/// Records of one source together with the scope that produced them.
///
/// The scope is released when this is dropped.
#[derive(Debug)]
pub struct ScopedRecords {
    records: Vec<Value>,
    scope: Option<ResolverScope>,
}

impl ScopedRecords {
    pub fn new(records: Vec<Value>, scope: ResolverScope) -> Self {
        ScopedRecords {
            records,
            scope: Some(scope),
        }
    }

    /// Records with no scope to release.
    pub fn unscoped(records: Vec<Value>) -> Self {
        ScopedRecords {
            records,
            scope: None,
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn scope(&self) -> Option<&ResolverScope> {
        self.scope.as_ref()
    }
}

/// Materializes the records of a source.
#[async_trait]
pub trait SourceExecutor: Send + Sync {
    async fn execute_into_scope(&self, source: &Source) -> Result<ScopedRecords, Error>;
}

/// Executor calling the resolver bound to each source inside a fresh scope.
pub struct ResolverExecutor {
    scope_factory: Arc<dyn ScopeFactory>,
    services: Services,
}

impl ResolverExecutor {
    pub fn new(scope_factory: Arc<dyn ScopeFactory>, services: Services) -> Self {
        ResolverExecutor {
            scope_factory,
            services,
        }
    }
}

#[async_trait]
impl SourceExecutor for ResolverExecutor {
    async fn execute_into_scope(&self, source: &Source) -> Result<ScopedRecords, Error> {
        let name = source.name().to_string();
        let binding = source
            .resolver
            .as_ref()
            .ok_or_else(|| SchemaError::MissingResolver(name.clone()))?;

        let scope = self.scope_factory.create_scope(&self.services);
        debug!(
            source = %name,
            member = %binding.member,
            scope = scope.id(),
            "resolving source"
        );

        let resolved = match &binding.resolve {
            Resolve::Direct(resolve) => resolve(&scope),
            Resolve::Deferred(resolve) => resolve(&scope).await,
        };
        let value = resolved.map_err(|e| ExecutionError::Resolver {
            name: name.clone(),
            message: e.to_string(),
        })?;

        match value {
            Value::Array(records) => Ok(ScopedRecords::new(records, scope)),
            other => Err(ExecutionError::NotEnumerable {
                name,
                found: other.type_name(),
            }
            .into()),
        }
    }
}

/// Runs the select statements of a syntax tree.
#[derive(Clone)]
pub struct Runner {
    schemas: Arc<Vec<SchemaDom>>,
    cache: Arc<PipelineCache>,
    executor: Arc<dyn SourceExecutor>,
}

impl Runner {
    pub fn new(
        schemas: Arc<Vec<SchemaDom>>,
        cache: Arc<PipelineCache>,
        executor: Arc<dyn SourceExecutor>,
    ) -> Self {
        Runner {
            schemas,
            cache,
            executor,
        }
    }

    /// Runs every statement in order and maps each source name to its
    /// result.
    ///
    /// The first failing statement aborts the run. Each statement's resolver
    /// scope is released before the next statement starts, whether or not
    /// the statement succeeded.
    pub async fn run(&self, tree: &SyntaxTree) -> Result<BTreeMap<String, QueryResult>, Error> {
        let mut results = BTreeMap::new();

        for query in tree.selects() {
            let name = query.source.name();
            if results.contains_key(&name) {
                return Err(ExecutionError::DuplicateResult(name).into());
            }

            let source = find_source(&self.schemas, &name)?;
            let pipeline = self.cache.get_or_compile(source, query)?;

            let scoped = self.executor.execute_into_scope(source).await?;
            let result = pipeline.invoke(scoped.records());
            drop(scoped);

            let result = result?;
            debug!(source = %name, records = result.len(), "statement completed");
            results.insert(name, result);
        }

        info!(statements = results.len(), "script completed");
        Ok(results)
    }
}
