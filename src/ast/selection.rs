use crate::ast::{Expr, NamePath};
use serde::Serialize;
use std::fmt;

/// What a select statement projects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Selection {
    /// Comma-separated list of projected columns
    Tuple(TupleSelection),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleSelection {
    pub atoms: Vec<SelectionAtom>,
}

/// One projected column of a tuple selection.
///
/// Both forms mean the same thing; only the position of the alias differs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectionAtom {
    /// `expression [as output]`
    Expression {
        expression: Expr,
        output: Option<NamePath>,
    },

    /// `output = expression`
    Assignment { output: NamePath, expression: Expr },
}

impl SelectionAtom {
    pub fn expression(&self) -> &Expr {
        match self {
            SelectionAtom::Expression { expression, .. } => expression,
            SelectionAtom::Assignment { expression, .. } => expression,
        }
    }

    pub fn output(&self) -> Option<&NamePath> {
        match self {
            SelectionAtom::Expression { output, .. } => output.as_ref(),
            SelectionAtom::Assignment { output, .. } => Some(output),
        }
    }

    /// The alias-last form of this atom.
    pub fn normalized(&self) -> SelectionAtom {
        SelectionAtom::Expression {
            expression: self.expression().clone(),
            output: self.output().cloned(),
        }
    }
}

impl Selection {
    pub fn atoms(&self) -> &[SelectionAtom] {
        match self {
            Selection::Tuple(tuple) => &tuple.atoms,
        }
    }

    pub fn normalized(&self) -> Selection {
        match self {
            Selection::Tuple(tuple) => Selection::Tuple(TupleSelection {
                atoms: tuple.atoms.iter().map(SelectionAtom::normalized).collect(),
            }),
        }
    }
}

impl fmt::Display for SelectionAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionAtom::Expression {
                expression,
                output: Some(output),
            } => write!(f, "{} as {}", expression, output),
            SelectionAtom::Expression {
                expression,
                output: None,
            } => write!(f, "{}", expression),
            SelectionAtom::Assignment { output, expression } => {
                write!(f, "{} = {}", output, expression)
            }
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}
