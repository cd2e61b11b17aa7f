//! Grammar of the select language.
//!
//! Every rule consumes its own leading whitespace and nothing after itself,
//! so rules compose without caring about the spacing between tokens.

use nom_locate::position;

use crate::ast::{
    BinOp, Direction, Expr, Limit, Literal, NamePath, Offset, Ordering, Pagination, Parameter,
    SelectQuery, Selection, SelectionAtom, SourceReference, Statement, SyntaxTree, Top,
    TupleSelection,
};
use crate::combinator::{
    Cursor, Diagnostic, GrammarError, PResult, alt, char, context, cut, digit1, eof, fold_many0,
    is_identifier_char, is_identifier_start, keyword, keyword_chain, lexeme, many0, many1, map,
    map_res, multispace0, multispace1, not, opt, pair, parenthesized, preceded, recognize,
    satisfy, separated_list0, separated_list1, separated_pair, statement_termination, symbol,
    symbols, take_while, terminated, tuple, unsigned, value, verify,
};

/// A script that could not be parsed, with the position it failed at.
pub type ParseError = Diagnostic;

/// Words that can never be identifiers, compared case-insensitively.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "select",
    "from",
    "as",
    "order",
    "by",
    "limit",
    "offset",
    "paginated",
    "top",
    "first",
    "last",
    "one",
    "at",
    "true",
    "false",
    "asc",
    "ascending",
    "desc",
    "descending",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Parser entry points over one piece of text.
///
/// # Examples
///
/// ```
/// use sqlface::parser::Parser;
///
/// let tree = Parser::new("select title from books; select * from authors").parse().unwrap();
/// assert_eq!(tree.statements.len(), 2);
/// ```
pub struct Parser<'a> {
    text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Parser { text }
    }

    /// Parses a whole script: zero or more select statements.
    pub fn parse(&self) -> Result<SyntaxTree, ParseError> {
        crate::combinator::run(script, self.text)
    }

    /// Parses exactly one select statement.
    pub fn parse_select(&self) -> Result<SelectQuery, ParseError> {
        crate::combinator::run(terminated(select_statement, multispace0), self.text)
    }

    /// Parses a standalone expression.
    pub fn parse_expression(&self) -> Result<Expr, ParseError> {
        crate::combinator::run(terminated(expression, multispace0), self.text)
    }
}

// ============================================================================
// Script
// ============================================================================

fn script(input: Cursor<'_>) -> PResult<'_, SyntaxTree> {
    let (input, queries) = many0(select_statement)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = cut(context("select statement", eof))(input)?;

    let statements = queries.into_iter().map(Statement::Select).collect();
    Ok((input, SyntaxTree { statements }))
}

// ============================================================================
// Select statement
// ============================================================================

/// Trailing clause of a select statement.
#[derive(Debug, Clone)]
enum Clause {
    Order(Vec<Ordering>),
    Offset(Offset),
    Limit(Limit),
    Pagination(Pagination),
    Top(Top),
}

fn select_statement(input: Cursor<'_>) -> PResult<'_, SelectQuery> {
    let (input, _) = lexeme(keyword("select"))(input)?;
    cut(select_body)(input)
}

fn select_body(input: Cursor<'_>) -> PResult<'_, SelectQuery> {
    let (input, prefix_top) = opt(lexeme(top_modifier))(input)?;
    let (input, atoms) = context("selection", separated_list1(symbol(','), selection_atom))(input)?;
    let (input, _) = context("`from`", lexeme(keyword("from")))(input)?;
    let (input, source) = context("source name", lexeme(name_path))(input)?;
    let (input, clauses) = many0(lexeme(pair(position, clause)))(input)?;
    let (input, _) = statement_termination()(input)?;

    let mut query = SelectQuery {
        source: SourceReference { path: source },
        selection: Selection::Tuple(TupleSelection { atoms }),
        top: prefix_top.unwrap_or_default(),
        orderings: Vec::new(),
        offset: None,
        limit: None,
        pagination: None,
    };

    let mut seen_top = prefix_top.is_some();
    for (at, clause) in clauses {
        let repeated = match clause {
            Clause::Order(orderings) => {
                let repeated = !query.orderings.is_empty();
                query.orderings = orderings;
                repeated
            }
            Clause::Offset(offset) => query.offset.replace(offset).is_some(),
            Clause::Limit(limit) => query.limit.replace(limit).is_some(),
            Clause::Pagination(pagination) => query.pagination.replace(pagination).is_some(),
            Clause::Top(top) => {
                query.top = top;
                std::mem::replace(&mut seen_top, true)
            }
        };
        if repeated {
            return Err(nom::Err::Failure(GrammarError::expected(
                at,
                "clause that was not given before",
            )));
        }
    }

    Ok((input, query))
}

fn clause(input: Cursor<'_>) -> PResult<'_, Clause> {
    alt((
        map(order_by, Clause::Order),
        map(offset, Clause::Offset),
        map(limit, Clause::Limit),
        map(pagination, Clause::Pagination),
        map(top_modifier, Clause::Top),
    ))(input)
}

fn order_by(input: Cursor<'_>) -> PResult<'_, Vec<Ordering>> {
    preceded(
        keyword_chain(&["order", "by"]),
        cut(context("ordering", separated_list1(symbol(','), ordering))),
    )(input)
}

fn ordering(input: Cursor<'_>) -> PResult<'_, Ordering> {
    let (input, expression) = expression(input)?;
    let (input, direction) = opt(lexeme(direction))(input)?;
    Ok((
        input,
        Ordering {
            expression,
            direction: direction.unwrap_or_default(),
        },
    ))
}

fn direction(input: Cursor<'_>) -> PResult<'_, Direction> {
    alt((
        value(
            Direction::Ascending,
            alt((keyword("asc"), keyword("ascending"))),
        ),
        value(
            Direction::Descending,
            alt((keyword("desc"), keyword("descending"))),
        ),
    ))(input)
}

fn offset(input: Cursor<'_>) -> PResult<'_, Offset> {
    map(
        preceded(keyword("offset"), cut(context("offset quantity", lexeme(unsigned())))),
        |quantity| Offset { quantity },
    )(input)
}

fn limit(input: Cursor<'_>) -> PResult<'_, Limit> {
    map(
        preceded(keyword("limit"), cut(context("limit quantity", lexeme(unsigned())))),
        |quantity| Limit { quantity },
    )(input)
}

fn pagination(input: Cursor<'_>) -> PResult<'_, Pagination> {
    let (input, _) = keyword("paginated")(input)?;
    let (input, (_, page, _, size)) = cut(context(
        "`on <page> by <size>`",
        tuple((
            lexeme(keyword("on")),
            lexeme(unsigned()),
            lexeme(keyword("by")),
            lexeme(unsigned()),
        )),
    ))(input)?;
    Ok((input, Pagination { page, size }))
}

/// `first | last | one | top n | top n% | at n`, in that priority.
fn top_modifier(input: Cursor<'_>) -> PResult<'_, Top> {
    alt((
        value(Top::First, keyword("first")),
        value(Top::Last, keyword("last")),
        value(Top::One, keyword("one")),
        map(
            preceded(
                pair(keyword("top"), multispace1),
                terminated(unsigned(), not(char('%'))),
            ),
            Top::Quantity,
        ),
        map(
            preceded(
                pair(keyword("top"), multispace1),
                terminated(unsigned(), char('%')),
            ),
            Top::Percentage,
        ),
        map(preceded(pair(keyword("at"), multispace1), unsigned()), Top::AtPosition),
    ))(input)
}

// ============================================================================
// Tuple selection
// ============================================================================

/// Assignment is tried first so `t = title` is not read as the bare path `t`.
fn selection_atom(input: Cursor<'_>) -> PResult<'_, SelectionAtom> {
    alt((assignment_atom, expression_atom))(input)
}

fn assignment_atom(input: Cursor<'_>) -> PResult<'_, SelectionAtom> {
    map(
        separated_pair(lexeme(name_path), symbol('='), expression),
        |(output, expression)| SelectionAtom::Assignment { output, expression },
    )(input)
}

fn expression_atom(input: Cursor<'_>) -> PResult<'_, SelectionAtom> {
    let (input, expression) = expression(input)?;
    let (input, output) = opt(preceded(
        lexeme(keyword("as")),
        cut(context("alias", lexeme(name_path))),
    ))(input)?;
    Ok((input, SelectionAtom::Expression { expression, output }))
}

// ============================================================================
// Expressions
// ============================================================================

/// `value |> target`, the loosest binding operator.
pub fn expression(input: Cursor<'_>) -> PResult<'_, Expr> {
    let (input, first) = additive(input)?;
    fold_many0(
        preceded(symbols("|>"), additive),
        move || first.clone(),
        Expr::pipe,
    )(input)
}

fn additive(input: Cursor<'_>) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(lexeme(additive_operator), term),
        move || first.clone(),
        |left, (op, right)| Expr::binary(op, left, right),
    )(input)
}

fn term(input: Cursor<'_>) -> PResult<'_, Expr> {
    let (input, first) = factor(input)?;
    fold_many0(
        pair(lexeme(multiplicative_operator), factor),
        move || first.clone(),
        |left, (op, right)| Expr::binary(op, left, right),
    )(input)
}

fn additive_operator(input: Cursor<'_>) -> PResult<'_, BinOp> {
    alt((value(BinOp::Add, char('+')), value(BinOp::Subtract, char('-'))))(input)
}

fn multiplicative_operator(input: Cursor<'_>) -> PResult<'_, BinOp> {
    alt((
        value(BinOp::Multiply, char('*')),
        value(BinOp::Divide, char('/')),
        value(BinOp::Modulo, char('%')),
    ))(input)
}

fn factor(input: Cursor<'_>) -> PResult<'_, Expr> {
    lexeme(alt((
        invocation,
        map(literal, Expr::Literal),
        map(name_path, Expr::NamePath),
        wildcard,
        parenthesized(expression),
    )))(input)
}

fn wildcard(input: Cursor<'_>) -> PResult<'_, Expr> {
    map(many1(char('*')), |stars: Vec<char>| Expr::Wildcard {
        level: stars.len(),
    })(input)
}

/// `f(a)(b: 1)` folds left into nested invocations.
fn invocation(input: Cursor<'_>) -> PResult<'_, Expr> {
    let (input, target) = name_path(input)?;
    let (input, argument_lists) = many1(parenthesized(separated_list0(symbol(','), parameter)))(input)?;

    let invoked = argument_lists
        .into_iter()
        .fold(Expr::NamePath(target), Expr::invoke);
    Ok((input, invoked))
}

fn parameter(input: Cursor<'_>) -> PResult<'_, Parameter> {
    alt((
        map(
            separated_pair(lexeme(identifier), symbol(':'), expression),
            |(name, value)| Parameter::Named { name, value },
        ),
        map(expression, Parameter::Positional),
    ))(input)
}

// ============================================================================
// Names
// ============================================================================

pub fn identifier(input: Cursor<'_>) -> PResult<'_, String> {
    context(
        "identifier",
        verify(
            map(
                recognize(pair(satisfy(is_identifier_start), take_while(is_identifier_char))),
                |word: Cursor<'_>| word.fragment().to_string(),
            ),
            |word: &str| !is_reserved(word),
        ),
    )(input)
}

/// `a.b.c`, no whitespace around the dots.
pub fn name_path(input: Cursor<'_>) -> PResult<'_, NamePath> {
    map(separated_list1(char('.'), identifier), NamePath::new)(input)
}

// ============================================================================
// Literals
// ============================================================================

fn literal(input: Cursor<'_>) -> PResult<'_, Literal> {
    alt((
        map(string_literal, Literal::String),
        map(boolean_literal, Literal::Boolean),
        map(float_literal, Literal::Float),
        map(integer_literal, Literal::Integer),
    ))(input)
}

/// Single- or double-quoted, closed by the same quote. No escapes.
fn string_literal(input: Cursor<'_>) -> PResult<'_, String> {
    let quoted = |quote: char| {
        map(
            preceded(
                char(quote),
                cut(terminated(
                    take_while(move |c: char| c != quote && c != '\n'),
                    context("closing quote", char(quote)),
                )),
            ),
            |text: Cursor<'_>| text.fragment().to_string(),
        )
    };
    alt((quoted('\''), quoted('"')))(input)
}

fn boolean_literal(input: Cursor<'_>) -> PResult<'_, bool> {
    alt((value(true, keyword("true")), value(false, keyword("false"))))(input)
}

/// `5.5`, `5.` or `.5`; a number is a float only if it has a dot.
fn float_literal(input: Cursor<'_>) -> PResult<'_, f64> {
    map_res(
        recognize(alt((
            recognize(tuple((digit1, char('.'), opt(digit1)))),
            recognize(pair(char('.'), digit1)),
        ))),
        |text: Cursor<'_>| text.fragment().parse::<f64>(),
    )(input)
}

fn integer_literal(input: Cursor<'_>) -> PResult<'_, i64> {
    map_res(digit1, |digits: Cursor<'_>| digits.fragment().parse::<i64>())(input)
}
