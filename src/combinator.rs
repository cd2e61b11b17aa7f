//! # Parsing toolkit
//!
//! Generic parser-combinator building blocks over an immutable,
//! position-tracking text cursor. Nothing in this module knows about the
//! select language; the grammar in [`crate::parser`] is assembled from these
//! pieces.
//!
//! ## Contract
//!
//! A parser is a function from a [`Cursor`] to a [`PResult`]. It either
//! succeeds with a value and the unconsumed remainder, or fails. Cursors are
//! plain values, so a failed parser can never leave the caller's view of the
//! input half-consumed: alternation and repetition simply retry from the
//! cursor they already hold.
//!
//! ## Primitives
//!
//! The primitive matchers and combinators are `nom`'s and are re-exported here
//! so grammar code depends on one module:
//!
//! | Concern | Combinators |
//! |---|---|
//! | exact / case-insensitive tag | [`tag`], [`tag_no_case`] |
//! | single character | [`char`], [`satisfy`] |
//! | runs | [`digit1`], [`alphanumeric0`], [`take_while`] |
//! | whitespace (optional / mandatory) | [`multispace0`], [`multispace1`] |
//! | sequence | [`tuple`], [`pair`], [`separated_pair`] |
//! | alternation (ordered, first success wins) | [`alt`] |
//! | optional / repetition | [`opt`], [`many0`], [`many1`] |
//! | separated lists | [`separated_list0`], [`separated_list1`] |
//! | left-associative folds | [`fold_many0`], [`fold_many1`] |
//! | trimming | [`delimited`], [`preceded`], [`terminated`] |
//! | value shaping | [`map`], [`map_res`], [`value`], [`recognize`] |
//! | rejection | [`verify`], [`not`] |
//!
//! On top of those sit a handful of language-agnostic helpers: keywords with
//! word boundaries, whitespace-delimited symbols, parenthesised groups and
//! statement termination.
//!
//! ## Diagnostics
//!
//! Every failure carries the cursor it happened at. [`run`] turns the deepest
//! failure into a [`Diagnostic`] with line, column and byte offset.

use nom::error::{ContextError, ErrorKind, FromExternalError, ParseError};
use nom::{IResult, Parser};
use nom_locate::LocatedSpan;
use thiserror::Error;

pub use nom::branch::alt;
pub use nom::bytes::complete::{tag, tag_no_case, take_while};
pub use nom::character::complete::{alphanumeric0, char, digit1, multispace0, multispace1, satisfy};
pub use nom::combinator::{
    all_consuming, cut, eof, map, map_res, not, opt, peek, recognize, success, value, verify,
};
pub use nom::error::context;
pub use nom::multi::{fold_many0, fold_many1, many0, many1, separated_list0, separated_list1};
pub use nom::sequence::{delimited, pair, preceded, separated_pair, terminated, tuple};

/// Immutable text cursor that remembers its line, column and offset.
pub type Cursor<'a> = LocatedSpan<&'a str>;

/// Result of running a parser over a [`Cursor`].
pub type PResult<'a, O> = IResult<Cursor<'a>, O, GrammarError<'a>>;

/// Failure produced by toolkit parsers.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarError<'a> {
    /// Where the failing parser was looking.
    pub cursor: Cursor<'a>,
    /// Which primitive failed.
    pub kind: ErrorKind,
    /// Human-readable label of what was expected, if any parser on the
    /// failing path carried a [`context`].
    pub expected: Option<&'static str>,
}

impl<'a> GrammarError<'a> {
    /// Failure at `cursor` with an explicit expectation label.
    pub fn expected(cursor: Cursor<'a>, what: &'static str) -> Self {
        GrammarError {
            cursor,
            kind: ErrorKind::Verify,
            expected: Some(what),
        }
    }

    fn offset(&self) -> usize {
        self.cursor.location_offset()
    }
}

impl<'a> ParseError<Cursor<'a>> for GrammarError<'a> {
    fn from_error_kind(input: Cursor<'a>, kind: ErrorKind) -> Self {
        GrammarError {
            cursor: input,
            kind,
            expected: None,
        }
    }

    fn append(_input: Cursor<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    // Alternation reports whichever branch got farthest.
    fn or(self, other: Self) -> Self {
        if other.offset() >= self.offset() {
            other
        } else {
            self
        }
    }
}

impl<'a> ContextError<Cursor<'a>> for GrammarError<'a> {
    fn add_context(_input: Cursor<'a>, ctx: &'static str, mut other: Self) -> Self {
        other.expected.get_or_insert(ctx);
        other
    }
}

impl<'a, E> FromExternalError<Cursor<'a>, E> for GrammarError<'a> {
    fn from_external_error(input: Cursor<'a>, kind: ErrorKind, _e: E) -> Self {
        GrammarError::from_error_kind(input, kind)
    }
}

/// Positioned description of why a text could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct Diagnostic {
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Byte offset into the parsed text.
    pub offset: usize,
    pub message: String,
}

impl From<&GrammarError<'_>> for Diagnostic {
    fn from(error: &GrammarError<'_>) -> Self {
        let found = describe(&error.cursor);
        let message = match error.expected {
            Some(expected) => format!("expected {}, found {}", expected, found),
            None => format!("unexpected {}", found),
        };

        Diagnostic {
            line: error.cursor.location_line(),
            column: error.cursor.get_utf8_column(),
            offset: error.cursor.location_offset(),
            message,
        }
    }
}

fn describe(cursor: &Cursor<'_>) -> String {
    let rest = cursor.fragment();
    if rest.is_empty() {
        return "end of input".to_string();
    }

    let snippet: String = rest
        .chars()
        .take_while(|c| *c != '\n')
        .take(24)
        .collect();
    format!("`{}`", snippet.trim_end())
}

/// Runs `parser` over the whole of `text`.
///
/// Trailing input that the parser did not consume is a failure.
pub fn run<'a, O, P>(parser: P, text: &'a str) -> Result<O, Diagnostic>
where
    P: Parser<Cursor<'a>, O, GrammarError<'a>>,
{
    match all_consuming(parser)(Cursor::new(text)) {
        Ok((_, output)) => Ok(output),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Diagnostic::from(&e)),
        Err(nom::Err::Incomplete(_)) => {
            let end = GrammarError::expected(Cursor::new(text), "complete input");
            Err(Diagnostic::from(&end))
        }
    }
}

/// Characters that may continue an identifier-like word.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters that may start an identifier-like word.
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Case-insensitive `word` that is not immediately followed by another
/// identifier character, so `select` does not match the head of `selection`.
pub fn keyword<'a>(word: &'static str) -> impl FnMut(Cursor<'a>) -> PResult<'a, Cursor<'a>> {
    terminated(tag_no_case(word), not(satisfy(is_identifier_char)))
}

/// Keywords separated by mandatory whitespace, e.g. `order by`.
pub fn keyword_chain<'a>(words: &'static [&'static str]) -> impl FnMut(Cursor<'a>) -> PResult<'a, ()> {
    move |mut input: Cursor<'a>| {
        for (i, word) in words.iter().copied().enumerate() {
            if i > 0 {
                (input, _) = multispace1(input)?;
            }
            (input, _) = keyword(word)(input)?;
        }
        Ok((input, ()))
    }
}

/// `parser` preceded by optional whitespace.
pub fn lexeme<'a, O, P>(parser: P) -> impl FnMut(Cursor<'a>) -> PResult<'a, O>
where
    P: Parser<Cursor<'a>, O, GrammarError<'a>>,
{
    preceded(multispace0, parser)
}

/// A single punctuation character with optional whitespace on both sides.
pub fn symbol<'a>(c: char) -> impl FnMut(Cursor<'a>) -> PResult<'a, char> {
    delimited(multispace0, char(c), multispace0)
}

/// A fixed punctuation sequence (`|>`) with optional whitespace on both sides.
pub fn symbols<'a>(s: &'static str) -> impl FnMut(Cursor<'a>) -> PResult<'a, Cursor<'a>> {
    delimited(multispace0, tag(s), multispace0)
}

/// `( parser )`, whitespace allowed inside the parentheses.
pub fn parenthesized<'a, O, P>(parser: P) -> impl FnMut(Cursor<'a>) -> PResult<'a, O>
where
    P: Parser<Cursor<'a>, O, GrammarError<'a>>,
{
    delimited(symbol('('), parser, preceded(multispace0, char(')')))
}

/// Either quote character.
pub fn quote<'a>() -> impl FnMut(Cursor<'a>) -> PResult<'a, char> {
    alt((char('\''), char('"')))
}

/// A run of ASCII digits read as an unsigned quantity.
pub fn unsigned<'a>() -> impl FnMut(Cursor<'a>) -> PResult<'a, u64> {
    map_res(digit1, |digits: Cursor<'a>| digits.fragment().parse::<u64>())
}

/// Optional whitespace followed by an optional `;`.
pub fn statement_termination<'a>() -> impl FnMut(Cursor<'a>) -> PResult<'a, Option<char>> {
    preceded(multispace0, opt(char(';')))
}
