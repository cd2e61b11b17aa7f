use crate::ast::BinOp;
use serde::Serialize;
use std::fmt;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Expressions are built bottom-up by the grammar and never shared, so a tree
/// is always finite and acyclic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Literal value
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// true
    /// 42
    /// 4.5
    /// ```
    Literal(Literal),

    /// Dotted identifier sequence
    ///
    /// # Examples
    /// ```text
    /// title
    /// author.name
    /// ```
    NamePath(NamePath),

    /// One or more `*`; the count is the expansion level.
    ///
    /// Level 1 expands to the direct properties of a source.
    Wildcard { level: usize },

    /// Binary arithmetic operation
    ///
    /// # Example
    /// ```text
    /// price * 2 + 1
    /// ```
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Call of a target with positional and named parameters
    ///
    /// # Examples
    /// ```text
    /// round(price, digits: 2)
    /// curry(1)(2)
    /// ```
    Invocation {
        target: Box<Expr>,
        parameters: Vec<Parameter>,
    },

    /// `value |> target`, feeding `value` into `target`
    ///
    /// # Example
    /// ```text
    /// 2 |> square
    /// ```
    Pipeline { value: Box<Expr>, target: Box<Expr> },
}

/// Literal values. Numbers are never signed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
}

/// A `.`-separated sequence of identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamePath {
    pub segments: Vec<String>,
}

/// A single invocation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Parameter {
    /// `expression`
    Positional(Expr),
    /// `name: expression`
    Named { name: String, value: Expr },
}

impl NamePath {
    pub fn new(segments: Vec<String>) -> Self {
        NamePath { segments }
    }

    /// Splits `author.name` into its segments without validating them.
    pub fn from_dotted(path: &str) -> Self {
        NamePath::new(path.split('.').map(str::to_string).collect())
    }

    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Literal(Literal::Float(value))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal(Literal::Boolean(value))
    }

    pub fn path(dotted: &str) -> Self {
        Expr::NamePath(NamePath::from_dotted(dotted))
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn invoke(target: Expr, parameters: Vec<Parameter>) -> Self {
        Expr::Invocation {
            target: Box::new(target),
            parameters,
        }
    }

    pub fn pipe(value: Expr, target: Expr) -> Self {
        Expr::Pipeline {
            value: Box::new(value),
            target: Box::new(target),
        }
    }

    /// The bare name path, if this expression is one.
    pub fn as_name_path(&self) -> Option<&NamePath> {
        match self {
            Expr::NamePath(path) => Some(path),
            _ => None,
        }
    }

    // Pipelines bind loosest, atoms tightest.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Pipeline { .. } => 0,
            Expr::BinaryOp { op, .. } => op.precedence(),
            _ => 3,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::NamePath(path) => write!(f, "{}", path),
            Expr::Wildcard { level } => write!(f, "{}", "*".repeat(*level)),
            Expr::BinaryOp { op, left, right } => {
                let own = self.precedence();
                left.fmt_operand(f, left.precedence() < own)?;
                write!(f, " {} ", op)?;
                right.fmt_operand(f, right.precedence() <= own)
            }
            Expr::Invocation { target, parameters } => {
                target.fmt_operand(f, target.precedence() < 3)?;
                write!(f, "(")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ")")
            }
            Expr::Pipeline { value, target } => {
                write!(f, "{} |> ", value)?;
                target.fmt_operand(f, target.precedence() == 0)
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Strings cannot contain their own quote, so pick the other one.
            Literal::String(s) if s.contains('"') => write!(f, "'{}'", s),
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                let text = n.to_string();
                if text.contains('.') || !n.is_finite() {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
        }
    }
}

impl fmt::Display for NamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Positional(expr) => write!(f, "{}", expr),
            Parameter::Named { name, value } => write!(f, "{}: {}", name, value),
        }
    }
}
