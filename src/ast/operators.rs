use serde::Serialize;
use std::fmt;

/// Binary arithmetic operators.
///
/// `+` and `-` bind looser than `*`, `/` and `%`; all of them associate to
/// the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    // Additive
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,

    // Multiplicative
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,
}

impl BinOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Subtract => 1,
            BinOp::Multiply | BinOp::Divide | BinOp::Modulo => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Subtract => '-',
            BinOp::Multiply => '*',
            BinOp::Divide => '/',
            BinOp::Modulo => '%',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
