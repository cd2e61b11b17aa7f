//! # SqlFace - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the SqlFace select
//! language, a small declarative language that projects, orders and pages
//! records drawn from named sources.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[statements]** - The syntax tree root, statements and select queries
//! - **[expressions]** - Expression nodes (literals, name paths, wildcards, operations)
//! - **[operators]** - Binary arithmetic operators and their precedence
//! - **[selection]** - Tuple selections and their atoms
//! - **[modifiers]** - Top, ordering, offset, limit and pagination clauses
//!
//! ## Quick Start
//!
//! ```text
//! select title, price * 2 as doubled from books order by title desc limit 10;
//! ```
//!
//! This query projects two columns out of every book, sorts by title in
//! descending order and keeps the first ten rows.
//!
//! ## Core Concepts
//!
//! ### Closed variant sets
//!
//! Every node family is a closed enum matched exhaustively. Clauses a query
//! did not use are empty (`orderings: vec![]`) or absent (`offset: None`);
//! the cardinality policy [`Top`] is always present and defaults to
//! [`Top::All`].
//!
//! ### Canonical rendering
//!
//! Every node implements [`std::fmt::Display`] with a canonical rendering
//! that parses back into a structurally equal node. Two scripts that parse to
//! equal trees render identically, which is what the pipeline cache keys on.
//!
//! ## Examples
//!
//! ### Wildcard expansion
//!
//! ```text
//! select * from books
//! ```
//!
//! ### Aliases
//!
//! ```text
//! select title as t from books
//! select t = title from books
//! ```
//!
//! ### Cardinality and paging
//!
//! ```text
//! select first * from books order by bookId
//! select * from books top 2
//! select * from books paginated on 2 by 10
//! ```
pub mod expressions;
pub mod modifiers;
pub mod operators;
pub mod selection;
pub mod statements;

pub use expressions::{Expr, Literal, NamePath, Parameter};
pub use modifiers::{Direction, Limit, Offset, Ordering, Pagination, Top};
pub use operators::BinOp;
pub use selection::{Selection, SelectionAtom, TupleSelection};
pub use statements::{SelectQuery, SourceReference, Statement, SyntaxTree};
