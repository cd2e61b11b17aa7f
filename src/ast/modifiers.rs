use crate::ast::Expr;
use serde::Serialize;
use std::fmt;

/// Result cardinality policy of a select statement.
///
/// Exactly one policy holds for every query; [`Top::All`] when none was
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Top {
    /// Every record
    #[default]
    All,
    /// `first`: the first record, if any
    First,
    /// `last`: the last record, if any
    Last,
    /// `one`: the only record, if any; more than one is an error
    One,
    /// `at n`
    AtPosition(u64),
    /// `top n`
    Quantity(u64),
    /// `top n%`
    Percentage(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// One `order by` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ordering {
    pub expression: Expr,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Offset {
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Limit {
    pub quantity: u64,
}

/// `paginated on <page> by <size>`, pages counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
}

impl fmt::Display for Top {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Top::All => Ok(()),
            Top::First => write!(f, "first"),
            Top::Last => write!(f, "last"),
            Top::One => write!(f, "one"),
            Top::AtPosition(n) => write!(f, "at {}", n),
            Top::Quantity(n) => write!(f, "top {}", n),
            Top::Percentage(p) => write!(f, "top {}%", p),
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.expression),
            Direction::Descending => write!(f, "{} desc", self.expression),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.quantity)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "limit {}", self.quantity)
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "paginated on {} by {}", self.page, self.size)
    }
}
