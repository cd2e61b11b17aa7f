use crate::error::SchemaError;
use crate::schema::resolver::{Resolve, ReturnKind};
use crate::schema::types::Type;

/// Identity of a source within a context: which schema and which entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId {
    pub schema: usize,
    pub index: usize,
}

/// The resolver member a source is materialized through.
#[derive(Debug, Clone)]
pub struct ResolverBinding {
    pub container: String,
    pub member: String,
    pub returns: ReturnKind,
    pub resolve: Resolve,
}

/// A queryable source.
#[derive(Debug, Clone)]
pub struct Source {
    pub id: SourceId,
    /// Names the source answers to; never empty.
    pub identifiers: Vec<String>,
    pub ty: Type,
    pub resolver: Option<ResolverBinding>,
}

impl Source {
    /// The primary identifier.
    pub fn name(&self) -> &str {
        self.identifiers.first().map(String::as_str).unwrap_or_default()
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.identifiers.iter().any(|identifier| identifier == name)
    }
}

/// Immutable registry of the sources of one schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaDom {
    sources: Vec<Source>,
}

impl SchemaDom {
    pub fn new(sources: Vec<Source>) -> Self {
        SchemaDom { sources }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The source answering to `name`, matched exactly.
    pub fn find(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.answers_to(name))
    }
}

/// Looks `name` up across schemas, earlier schemas first.
pub fn find_source<'s>(schemas: &'s [SchemaDom], name: &str) -> Result<&'s Source, SchemaError> {
    schemas
        .iter()
        .find_map(|schema| schema.find(name))
        .ok_or_else(|| SchemaError::UnknownSource(name.to_string()))
}
