pub mod ast;
pub mod combinator;
pub mod compiler;
pub mod context;
pub mod convert;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod runner;
pub mod schema;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Expr, SelectQuery, Statement, SyntaxTree};
pub use compiler::{Pipeline, PipelineCache, QueryResult, compile};
pub use context::{ContextBuilder, QueryContext};
pub use error::{CompileError, Error, ExecutionError, SchemaError};
pub use evaluator::EvalError;
pub use parser::{ParseError, Parser};
pub use runner::{ResolverExecutor, Runner, ScopedRecords, SourceExecutor};
pub use value::{Record, Value};

/// Parses a script.
pub fn parse(script: &str) -> Result<SyntaxTree, ParseError> {
    Parser::new(script).parse()
}
