use std::cmp::Ordering as CmpOrdering;

use serde::Serialize;

use crate::ast::{Direction, Pagination};
use crate::compiler::projection::Column;
use crate::error::{CompileError, Error};
use crate::evaluator::project;
use crate::value::{Record, Value};

/// Result of running one select statement.
///
/// Serializes as the record (or `null`) for single-record policies and as an
/// array otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    One(Option<Record>),
    Many(Vec<Record>),
}

impl QueryResult {
    /// The records of the result, zero or one for [`QueryResult::One`].
    pub fn records(&self) -> &[Record] {
        match self {
            QueryResult::One(Some(record)) => std::slice::from_ref(record),
            QueryResult::One(None) => &[],
            QueryResult::Many(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// What an ordering key reads.
#[derive(Debug, Clone, PartialEq)]
pub enum SortTarget {
    /// A projected column, by name
    Column(String),
    /// A source field, by accessor chain
    Source(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub target: SortTarget,
    pub direction: Direction,
}

/// Cardinality reduction applied after ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    All,
    Take(usize),
    First,
    Last,
    One,
}

impl Reduce {
    fn is_single(self) -> bool {
        matches!(self, Reduce::First | Reduce::Last | Reduce::One)
    }
}

/// A compiled select statement.
///
/// Pipelines are pure: invoking one twice over the same records yields the
/// same result, and nothing from one invocation is kept for the next.
///
/// Stages run in a fixed order: project, order, reduce, offset, limit,
/// paginate.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub(crate) columns: Vec<Column>,
    pub(crate) sort_keys: Vec<SortKey>,
    pub(crate) reduce: Reduce,
    pub(crate) offset: Option<usize>,
    pub(crate) limit: Option<usize>,
    pub(crate) pagination: Option<Pagination>,
}

impl Pipeline {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// Whether invocation yields [`QueryResult::One`].
    pub fn is_single(&self) -> bool {
        self.reduce.is_single()
    }

    /// Runs the pipeline over the records of its source.
    ///
    /// Elements that are not objects read as records without fields.
    pub fn invoke(&self, records: &[Value]) -> Result<QueryResult, Error> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let projected = project(
                self.columns
                    .iter()
                    .map(|column| (column.name.as_str(), &column.expr)),
                record,
            )?;
            let keys = self.keys_of(record, &projected);
            rows.push((projected, keys));
        }

        if !self.sort_keys.is_empty() {
            // Stable, so equal keys keep their source order
            rows.sort_by(|(_, a), (_, b)| self.compare_keys(a, b));
        }
        let rows: Vec<Record> = rows.into_iter().map(|(projected, _)| projected).collect();

        let rows = self.reduce(rows)?;
        let rows = self.window(rows);

        if self.reduce.is_single() {
            Ok(QueryResult::One(rows.into_iter().next()))
        } else {
            Ok(QueryResult::Many(rows))
        }
    }

    fn keys_of(&self, source: &Value, projected: &Record) -> Vec<Value> {
        self.sort_keys
            .iter()
            .map(|key| match &key.target {
                SortTarget::Column(name) => projected.get(name).cloned().unwrap_or(Value::Null),
                SortTarget::Source(accessors) => accessors
                    .iter()
                    .fold(source, |current, accessor| current.field(accessor))
                    .clone(),
            })
            .collect()
    }

    fn compare_keys(&self, a: &[Value], b: &[Value]) -> CmpOrdering {
        self.sort_keys
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(key, (x, y))| match key.direction {
                Direction::Ascending => x.compare(y),
                Direction::Descending => y.compare(x),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(CmpOrdering::Equal)
    }

    fn reduce(&self, mut rows: Vec<Record>) -> Result<Vec<Record>, Error> {
        match self.reduce {
            Reduce::All => Ok(rows),
            Reduce::Take(n) => {
                rows.truncate(n);
                Ok(rows)
            }
            Reduce::First => {
                rows.truncate(1);
                Ok(rows)
            }
            Reduce::Last => Ok(rows.pop().into_iter().collect()),
            Reduce::One if rows.len() > 1 => {
                Err(CompileError::MultipleResultsForOne(rows.len()).into())
            }
            Reduce::One => Ok(rows),
        }
    }

    /// Offset, then limit, then the requested page.
    fn window(&self, rows: Vec<Record>) -> Vec<Record> {
        let mut rows: Box<dyn Iterator<Item = Record>> = Box::new(rows.into_iter());
        if let Some(offset) = self.offset {
            rows = Box::new(rows.skip(offset));
        }
        if let Some(limit) = self.limit {
            rows = Box::new(rows.take(limit));
        }
        if let Some(Pagination { page, size }) = self.pagination {
            let size = to_usize(size);
            let skip = to_usize(page.saturating_sub(1)).saturating_mul(size);
            rows = Box::new(rows.skip(skip).take(size));
        }
        rows.collect()
    }
}

pub(crate) fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
