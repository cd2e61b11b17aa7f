//! Documentation content for sqlface CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Selection,
    Expressions,
    Modifiers,
    Sources,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "selection" | "select" | "columns" => Some(Self::Selection),
            "expressions" | "expression" | "operators" | "ops" => Some(Self::Expressions),
            "modifiers" | "modifier" | "clauses" => Some(Self::Modifiers),
            "sources" | "source" | "schema" => Some(Self::Sources),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"SQLFACE DOCUMENTATION

SqlFace is a small select language over named in-memory sources. A script is a
sequence of select statements; each one reads every record of a source, projects
columns, then orders, reduces and windows the rows.

DOCUMENTATION CATEGORIES

  syntax            Statements, names, literals, comments on whitespace and case
  selection         Column lists, aliases, assignments and wildcards
  expressions       Arithmetic, precedence, invocations and pipelines
  modifiers         top/first/last/one, order by, offset, limit, paginated
  sources           Declaring sources in a sources file for `sqlface run`
  errors            Parse, schema, compile and execution failures

QUICK REFERENCE

  select * from books;                       Every column of every book
  select title, price * 2 as double from books;
  select top 3 title from books order by price desc;
  select first title from books;
  select * from books paginated on 2 by 10;

Run 'sqlface doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Selection) => Ok(SELECTION_DOC),
        Some(DocCategory::Expressions) => Ok(EXPRESSIONS_DOC),
        Some(DocCategory::Modifiers) => Ok(MODIFIERS_DOC),
        Some(DocCategory::Sources) => Ok(SOURCES_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Statements and Tokens

STATEMENTS
  A script holds zero or more select statements. Each statement ends with `;`
  or with the end of the script.

    select <selection> from <source> [clauses...];

  Keywords are case-insensitive: SELECT, Select and select are the same.
  Whitespace (spaces, tabs, newlines) separates tokens and is otherwise ignored.

NAMES
  Identifiers start with a letter or `_` and continue with letters, digits or `_`.
  Dotted paths reach nested properties:   author.name
  Reserved words cannot be identifiers:
    select from as order by asc ascending desc descending
    top first last one at offset limit paginated true false

LITERALS
  Strings     'single quoted' or "double quoted"; the opening quote closes it
  Integers    42
  Floats      3.14   2.   .5
  Booleans    true  false

RESULTS
  Each statement produces one result keyed by the source name it selected from.
  Selecting the same source twice in one script is an error.
"#;

const SELECTION_DOC: &str = r#"SELECTION - Columns

A selection is a comma-separated list of atoms. Each atom yields one column,
except a wildcard which yields one column per source property.

WILDCARD
  select * from books;
  Expands to every property of the source, in declaration order.
  A wildcard cannot be aliased.

PROPERTY
  select title from books;          column `title`
  select author.name from books;    column `name`

ALIAS
  select price as cost from books;
  cost = price                       assignment form, same meaning

COMPUTED COLUMNS
  select price * 2 from books;
  Unnamed computed columns are called column1, column2, ... skipping any
  name already used by another column.

Column names must be unique within one statement.
"#;

const EXPRESSIONS_DOC: &str = r#"EXPRESSIONS - Arithmetic and Calls

OPERATORS
  *  /  %          multiplicative, bind tighter
  +  -             additive
  Operators of the same precedence associate to the left.
  Parentheses group:   (price + 1) * 2

  Integer arithmetic is checked; overflow is an error. Division that does not
  divide evenly yields a float. Dividing by zero is an error.
  `+` on two strings concatenates them.

INVOCATIONS AND PIPELINES
  round(price, digits: 2)           positional and named parameters
  price |> round                    pipes a value into a call target

  Invocations and pipelines are parsed and rendered but cannot be compiled yet.
"#;

const MODIFIERS_DOC: &str = r#"MODIFIERS - Ordering, Reduction and Windows

Clauses follow the source name in any order; each may appear at most once.

TOP
  select top 5 * from books;        at most five rows
  select first * from books;        the first row, or nothing
  select last * from books;         the last row, or nothing
  select one * from books;          the only row; more than one is an error
  The top modifier may also trail the source:  select * from books top 5;

ORDER BY
  select * from books order by price desc, title;
  Keys are property paths of the source or names of output columns.
  Sorting is stable; ascending is the default.

OFFSET, LIMIT, PAGINATED
  select * from books offset 10 limit 5;
  select * from books paginated on 2 by 10;   rows 11 to 20
  Page and size start at 1.

EVALUATION ORDER
  project, order, top, offset, limit, paginated
"#;

const SOURCES_DOC: &str = r#"SOURCES - The Sources File

`sqlface run --sources <file>` reads a JSON document describing sources:

  {
    "sources": [
      {
        "name": "Book",
        "fields": [
          { "accessor": "bookId", "type": "integer" },
          { "accessor": "title",  "type": "string" },
          { "accessor": "tags",   "type": ["string"] },
          { "accessor": "author", "type": { "name": "Author", "fields": [
              { "accessor": "name", "type": "string" } ] } }
        ],
        "records": [ { "bookId": 1, "title": "Dune", "tags": [], "author": { "name": "Herbert" } } ]
      }
    ]
  }

NAMING
  A source answers to its camel-cased name and plural: Book -> book, books.
  Queries name properties camel-cased: an accessor `BookId` is selected as
  `bookId`. Records are read by the accessor exactly as declared.

FIELD TYPES
  string  boolean  number  integer  decimal
  ["<type>"]                        a list of that type
  { "name": ..., "fields": [...] }  a nested shape

A source without records is known to the schema but cannot be queried.
"#;

const ERRORS_DOC: &str = r#"ERRORS - What Can Go Wrong

A script stops at its first failure; no partial results are returned.

PARSE
  Reported with line, column and what was expected.
    Parse error: expected `from`, found `books` at line 1, column 16

SCHEMA
  Unknown source        no source answers to the name
  Unsupported shape     the source is not a list of records
  Missing resolver      nothing can produce the source's records

COMPILE
  Unknown reference     a column or ordering names a missing property
  Duplicate output      two columns share a name
  Invalid pagination    page or size below 1
  Not supported         invocations, pipelines, `at`, percentages
  Multiple results      `one` found more than one row

EXECUTION
  Resolver failures, non-list resolver results, arithmetic errors and
  selecting the same source twice.
"#;
