//! # Query compiler
//!
//! Turns a select query and the source it reads into a [`Pipeline`]: a pure
//! function from the source's records to a [`QueryResult`].
//!
//! ## Stages
//!
//! | Stage | Clause | Behaviour |
//! |---|---|---|
//! | project | tuple selection | one column per atom, `*` expands to every property |
//! | order | `order by` | stable sort, first key primary |
//! | reduce | top modifier | `top n` takes n, `first`/`last`/`one` keep one record |
//! | offset | `offset n` | skip n |
//! | limit | `limit n` | take n |
//! | paginate | `paginated on p by s` | skip `(p - 1) * s`, take s |
//!
//! A single-record result counts as a sequence of zero or one record for
//! the stages after it.
//!
//! ## Caching
//!
//! [`PipelineCache`] keys compiled pipelines by source and normalized query
//! text, so structurally equal queries share one pipeline instance.
mod cache;
mod pipeline;
mod projection;

pub use cache::{PipelineCache, PipelineKey};
pub use pipeline::{Pipeline, QueryResult, Reduce, SortKey, SortTarget};
pub use projection::{Column, ColumnExpr, ColumnType};

use tracing::trace;

use crate::ast::{Expr, Ordering, SelectQuery, Top};
use crate::error::{CompileError, Error, SchemaError};
use crate::schema::{ObjectProperty, Source};
use pipeline::to_usize;
use projection::{analyze, resolve_path};

/// Compiles `query` against `source`.
///
/// # Errors
///
/// * [`SchemaError::UnsupportedSourceShape`] if the source's records are not
///   objects
/// * [`CompileError`] for selections, orderings or modifiers that cannot be
///   applied to the source
pub fn compile(source: &Source, query: &SelectQuery) -> Result<Pipeline, Error> {
    let properties = source
        .ty
        .record_properties()
        .ok_or_else(|| SchemaError::UnsupportedSourceShape {
            name: source.name().to_string(),
            found: source.ty.to_string(),
        })?;

    let columns = analyze(properties, &query.selection)?;
    let sort_keys = query
        .orderings
        .iter()
        .map(|ordering| sort_key(&columns, properties, ordering))
        .collect::<Result<Vec<_>, _>>()?;
    let reduce = reduce_of(query.top)?;

    if let Some(pagination) = query.pagination
        && (pagination.page < 1 || pagination.size < 1)
    {
        return Err(CompileError::InvalidPagination {
            page: pagination.page,
            size: pagination.size,
        }
        .into());
    }

    trace!(
        source = source.name(),
        columns = columns.len(),
        sort_keys = sort_keys.len(),
        "pipeline compiled"
    );

    Ok(Pipeline {
        columns,
        sort_keys,
        reduce,
        offset: query.offset.map(|offset| to_usize(offset.quantity)),
        limit: query.limit.map(|limit| to_usize(limit.quantity)),
        pagination: query.pagination,
    })
}

/// Projected columns are matched before source properties.
fn sort_key(columns: &[Column], properties: &[ObjectProperty], ordering: &Ordering) -> Result<SortKey, CompileError> {
    let Expr::NamePath(path) = &ordering.expression else {
        return Err(CompileError::UnsupportedOrderingExpression(
            ordering.expression.to_string(),
        ));
    };

    let name = path.dotted();
    let target = if columns.iter().any(|column| column.name == name) {
        SortTarget::Column(name)
    } else {
        let (accessors, _) = resolve_path(properties, path)?;
        SortTarget::Source(accessors)
    };

    Ok(SortKey {
        target,
        direction: ordering.direction,
    })
}

fn reduce_of(top: Top) -> Result<Reduce, CompileError> {
    match top {
        Top::All => Ok(Reduce::All),
        Top::Quantity(n) => Ok(Reduce::Take(to_usize(n))),
        Top::First => Ok(Reduce::First),
        Top::Last => Ok(Reduce::Last),
        Top::One => Ok(Reduce::One),
        Top::AtPosition(_) | Top::Percentage(_) => {
            Err(CompileError::NotSupported(format!("`{}`", top)))
        }
    }
}
