use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    ast::BinOp,
    compiler::ColumnExpr,
    value::{Record, Value},
};

/// Errors that can occur while evaluating a column expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer result does not fit in 64 bits
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

/// Evaluates a compiled column expression against one source record.
pub fn eval_column(expr: &ColumnExpr, record: &Value) -> Result<Value, EvalError> {
    match expr {
        ColumnExpr::Read(accessors) => Ok(accessors
            .iter()
            .fold(record, |current, accessor| current.field(accessor))
            .clone()),
        ColumnExpr::Literal(value) => Ok(value.clone()),
        ColumnExpr::Binary { op, left, right } => {
            let left = eval_column(left, record)?;
            let right = eval_column(right, record)?;
            apply_binop(*op, &left, &right)
        }
    }
}

/// Projects `record` through `columns`, producing a new record in column order.
pub fn project<'a, I>(columns: I, record: &Value) -> Result<Record, EvalError>
where
    I: IntoIterator<Item = (&'a str, &'a ColumnExpr)>,
{
    let mut projected = Record::new();
    for (name, expr) in columns {
        projected.insert(name, eval_column(expr, record)?);
    }
    Ok(projected)
}

/// Applies an arithmetic operator.
///
/// Integer operands stay integral. Mixed integer/float operands are combined
/// as decimals and collapse to an integer when the result is whole. `+` also
/// concatenates two strings.
pub fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer_binop(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_binop(op, *a, *b),
        (Value::Integer(a), Value::Float(b)) => {
            mixed_binop(op, *a as f64, *b, Decimal::from_i64(*a), Decimal::from_f64(*b))
        }
        (Value::Float(a), Value::Integer(b)) => {
            mixed_binop(op, *a, *b as f64, Decimal::from_f64(*a), Decimal::from_i64(*b))
        }
        (Value::String(a), Value::String(b)) if op == BinOp::Add => {
            Ok(Value::String(format!("{}{}", a, b)))
        }
        (a, b) => Err(EvalError::TypeError(mismatch(op, a, b))),
    }
}

fn mismatch(op: BinOp, a: &Value, b: &Value) -> String {
    match op {
        BinOp::Add => format!("Cannot add {} and {}", a.type_name(), b.type_name()),
        BinOp::Subtract => format!("Cannot subtract {} from {}", b.type_name(), a.type_name()),
        BinOp::Multiply => format!("Cannot multiply {} by {}", a.type_name(), b.type_name()),
        BinOp::Divide => format!("Cannot divide {} by {}", a.type_name(), b.type_name()),
        BinOp::Modulo => format!(
            "Cannot compute modulo of {} by {}",
            a.type_name(),
            b.type_name()
        ),
    }
}

fn integer_binop(op: BinOp, a: i64, b: i64) -> Result<Value, EvalError> {
    let overflow = || EvalError::Overflow(format!("{} {} {}", a, op, b));
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Integer).ok_or_else(overflow),
        BinOp::Subtract => a.checked_sub(b).map(Value::Integer).ok_or_else(overflow),
        BinOp::Multiply => a.checked_mul(b).map(Value::Integer).ok_or_else(overflow),
        BinOp::Divide => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // Exact division stays integral, otherwise fall back to a float
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b).map(Value::Integer).ok_or_else(overflow),
                Some(_) => Ok(Value::Float(a as f64 / b as f64)),
                None => Err(overflow()),
            }
        }
        BinOp::Modulo => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            a.checked_rem(b).map(Value::Integer).ok_or_else(overflow)
        }
    }
}

fn float_binop(op: BinOp, a: f64, b: f64) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => Ok(Value::Float(a + b)),
        BinOp::Subtract => Ok(Value::Float(a - b)),
        BinOp::Multiply => Ok(Value::Float(a * b)),
        BinOp::Divide | BinOp::Modulo if b == 0.0 => Err(EvalError::DivisionByZero),
        BinOp::Divide => Ok(Value::Float(a / b)),
        BinOp::Modulo => Ok(Value::Float(a % b)),
    }
}

fn mixed_binop(
    op: BinOp,
    a: f64,
    b: f64,
    ad: Option<Decimal>,
    bd: Option<Decimal>,
) -> Result<Value, EvalError> {
    if matches!(op, BinOp::Divide | BinOp::Modulo) && b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }

    if let Some(ad) = ad
        && let Some(bd) = bd
    {
        let rd = match op {
            BinOp::Add => ad.checked_add(bd),
            BinOp::Subtract => ad.checked_sub(bd),
            BinOp::Multiply => ad.checked_mul(bd),
            BinOp::Divide => ad.checked_div(bd),
            BinOp::Modulo => ad.checked_rem(bd),
        };
        if let Some(rd) = rd {
            if rd.is_integer()
                && let Some(r) = rd.to_i64()
            {
                return Ok(Value::Integer(r));
            } else if let Some(r) = rd.to_f64() {
                return Ok(Value::Float(r));
            }
        }
    }

    float_binop(op, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        assert_eq!(
            apply_binop(BinOp::Multiply, &Value::Integer(6), &Value::Integer(7)),
            Ok(Value::Integer(42))
        );
        assert_eq!(
            apply_binop(BinOp::Divide, &Value::Integer(7), &Value::Integer(2)),
            Ok(Value::Float(3.5))
        );
    }

    #[test]
    fn test_mixed_arithmetic_collapses_whole_results() {
        assert_eq!(
            apply_binop(BinOp::Add, &Value::Integer(1), &Value::Float(0.5)),
            Ok(Value::Float(1.5))
        );
        assert_eq!(
            apply_binop(BinOp::Multiply, &Value::Float(2.5), &Value::Integer(2)),
            Ok(Value::Integer(5))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply_binop(BinOp::Divide, &Value::Integer(1), &Value::Integer(0)),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            apply_binop(BinOp::Modulo, &Value::Float(1.0), &Value::Integer(0)),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_string_concatenation_and_mismatch() {
        assert_eq!(
            apply_binop(BinOp::Add, &Value::from("a"), &Value::from("b")),
            Ok(Value::from("ab"))
        );
        assert!(matches!(
            apply_binop(BinOp::Subtract, &Value::from("a"), &Value::Integer(1)),
            Err(EvalError::TypeError(_))
        ));
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            apply_binop(BinOp::Add, &Value::Integer(i64::MAX), &Value::Integer(1)),
            Err(EvalError::Overflow(_))
        ));
    }

    #[test]
    fn test_integer_division_overflow() {
        assert!(matches!(
            apply_binop(BinOp::Divide, &Value::Integer(i64::MIN), &Value::Integer(-1)),
            Err(EvalError::Overflow(_))
        ));
        assert!(matches!(
            apply_binop(BinOp::Modulo, &Value::Integer(i64::MIN), &Value::Integer(-1)),
            Err(EvalError::Overflow(_))
        ));
        assert_eq!(
            apply_binop(BinOp::Divide, &Value::Integer(i64::MIN), &Value::Integer(1)),
            Ok(Value::Integer(i64::MIN))
        );
    }
}
