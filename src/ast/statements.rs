use crate::ast::{Limit, NamePath, Offset, Ordering, Pagination, Selection, Top};
use serde::Serialize;
use std::fmt;

/// Root of a parsed script.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SyntaxTree {
    pub statements: Vec<Statement>,
}

/// Script statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// Select query
    ///
    /// # Example
    /// ```text
    /// select title, price from books order by price desc;
    /// ```
    Select(SelectQuery),
}

/// Dotted name of the source a query reads from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceReference {
    pub path: NamePath,
}

/// A parsed `select` statement.
///
/// Unused clauses are empty or `None`; `top` is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectQuery {
    pub source: SourceReference,
    pub selection: Selection,
    pub top: Top,
    pub orderings: Vec<Ordering>,
    pub offset: Option<Offset>,
    pub limit: Option<Limit>,
    pub pagination: Option<Pagination>,
}

impl SourceReference {
    /// The name results are reported under.
    pub fn name(&self) -> String {
        self.path.dotted()
    }
}

impl SelectQuery {
    /// A copy with every assignment atom rewritten to its aliased form.
    ///
    /// `select t = title from books` and `select title as t from books`
    /// normalize to the same query.
    pub fn normalized(&self) -> SelectQuery {
        SelectQuery {
            selection: self.selection.normalized(),
            ..self.clone()
        }
    }
}

impl SyntaxTree {
    /// Select queries in script order.
    pub fn selects(&self) -> impl Iterator<Item = &SelectQuery> {
        self.statements.iter().map(|statement| match statement {
            Statement::Select(query) => query,
        })
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select ")?;
        if self.top != Top::All {
            write!(f, "{} ", self.top)?;
        }
        write!(f, "{} from {}", self.selection, self.source)?;

        if !self.orderings.is_empty() {
            write!(f, " order by ")?;
            for (i, ordering) in self.orderings.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", ordering)?;
            }
        }
        if let Some(offset) = &self.offset {
            write!(f, " {}", offset)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " {}", limit)?;
        }
        if let Some(pagination) = &self.pagination {
            write!(f, " {}", pagination)?;
        }
        write!(f, ";")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(query) => write!(f, "{}", query),
        }
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}
