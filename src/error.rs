use thiserror::Error;

use crate::evaluator::EvalError;
use crate::parser::ParseError;

/// Errors raised while parsing, compiling or running a script.
///
/// The first error aborts the whole script; no statement after it runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No schema declares the name
    #[error("unknown source `{0}`")]
    UnknownSource(String),

    /// The source's records are not objects
    #[error("source `{name}` has type {found}; only records can be queried")]
    UnsupportedSourceShape { name: String, found: String },

    #[error("source `{0}` has no resolver")]
    MissingResolver(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A name path that is not a property of the source
    #[error("unknown reference `{0}`")]
    UnknownReference(String),

    #[error("duplicate output name `{0}`")]
    DuplicateOutputName(String),

    #[error("cannot order by `{0}`; orderings must name a column or property")]
    UnsupportedOrderingExpression(String),

    #[error("invalid pagination: page {page} of size {size}; both must be at least 1")]
    InvalidPagination { page: u64, size: u64 },

    /// A construct the grammar accepts but queries cannot use yet
    #[error("not supported: {0}")]
    NotSupported(String),

    /// `one` over more than one record
    #[error("expected at most one record, found {0}")]
    MultipleResultsForOne(usize),

    #[error("wildcard cannot be aliased as `{0}`")]
    AliasedWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("resolver for `{name}` failed: {message}")]
    Resolver { name: String, message: String },

    /// The resolver returned something other than an array
    #[error("resolver for `{name}` returned {found}, expected an array of records")]
    NotEnumerable { name: String, found: &'static str },

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    /// Two statements of one script read the same source
    #[error("source `{0}` is queried more than once")]
    DuplicateResult(String),
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Execution(ExecutionError::Evaluation(e))
    }
}
