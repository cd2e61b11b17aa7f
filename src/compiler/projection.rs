use std::collections::HashSet;

use crate::ast::{Expr, Literal, NamePath, Selection};
use crate::error::CompileError;
use crate::schema::{ObjectProperty, Type};
use crate::value::Value;

/// Statically known type of a projected column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Copied from a source property
    Typed(Type),
    /// Computed; known only per value
    Dynamic,
}

/// How a column's value is computed from a source record.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnExpr {
    /// Read a (possibly nested) field by accessor
    Read(Vec<String>),
    Literal(Value),
    Binary {
        op: crate::ast::BinOp,
        left: Box<ColumnExpr>,
        right: Box<ColumnExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub expr: ColumnExpr,
}

/// Resolves a name path against `properties`, descending into nested
/// objects. Returns the accessor chain and the property found last.
pub fn resolve_path<'p>(
    properties: &'p [ObjectProperty],
    path: &NamePath,
) -> Result<(Vec<String>, &'p ObjectProperty), CompileError> {
    let unknown = || CompileError::UnknownReference(path.dotted());

    let mut scope = properties;
    let mut accessors = Vec::with_capacity(path.segments.len());
    let mut found: Option<&'p ObjectProperty> = None;
    for segment in &path.segments {
        if let Some(parent) = found {
            scope = match &parent.ty {
                Type::Object { properties, .. } => properties.as_slice(),
                _ => return Err(unknown()),
            };
        }
        let property = scope
            .iter()
            .find(|property| property.identifier == *segment)
            .ok_or_else(unknown)?;
        accessors.push(property.accessor.clone());
        found = Some(property);
    }

    found.map(|property| (accessors, property)).ok_or_else(unknown)
}

/// Turns a tuple selection into the ordered column list of a pipeline.
pub fn analyze(properties: &[ObjectProperty], selection: &Selection) -> Result<Vec<Column>, CompileError> {
    // Columns whose name is known up front; synthesized names fill the gaps.
    let mut pending: Vec<(Option<String>, ColumnType, ColumnExpr)> = Vec::new();

    for atom in selection.atoms() {
        let alias = atom.output().map(NamePath::dotted);
        match atom.expression() {
            Expr::Wildcard { level } => {
                if let Some(alias) = alias {
                    return Err(CompileError::AliasedWildcard(alias));
                }
                if *level != 1 {
                    return Err(CompileError::NotSupported(format!(
                        "wildcard of level {}",
                        level
                    )));
                }
                pending.extend(properties.iter().map(|property| {
                    (
                        Some(property.identifier.clone()),
                        ColumnType::Typed(property.ty.clone()),
                        ColumnExpr::Read(vec![property.accessor.clone()]),
                    )
                }));
            }
            Expr::NamePath(path) => {
                let (accessors, property) = resolve_path(properties, path)?;
                pending.push((
                    alias.or_else(|| Some(property.identifier.clone())),
                    ColumnType::Typed(property.ty.clone()),
                    ColumnExpr::Read(accessors),
                ));
            }
            expression => {
                pending.push((alias, ColumnType::Dynamic, lower(properties, expression)?));
            }
        }
    }

    let named: HashSet<String> = pending.iter().filter_map(|(name, ..)| name.clone()).collect();
    let mut synthesized = 0usize;
    let mut columns = Vec::with_capacity(pending.len());
    let mut seen = HashSet::new();
    for (name, ty, expr) in pending {
        let name = match name {
            Some(name) => name,
            None => loop {
                synthesized += 1;
                let candidate = format!("column{}", synthesized);
                if !named.contains(&candidate) {
                    break candidate;
                }
            },
        };
        if !seen.insert(name.clone()) {
            return Err(CompileError::DuplicateOutputName(name));
        }
        columns.push(Column { name, ty, expr });
    }

    Ok(columns)
}

/// Lowers a computed expression into a column expression.
fn lower(properties: &[ObjectProperty], expression: &Expr) -> Result<ColumnExpr, CompileError> {
    match expression {
        Expr::Literal(literal) => Ok(ColumnExpr::Literal(literal_value(literal))),
        Expr::NamePath(path) => {
            let (accessors, _) = resolve_path(properties, path)?;
            Ok(ColumnExpr::Read(accessors))
        }
        Expr::BinaryOp { op, left, right } => Ok(ColumnExpr::Binary {
            op: *op,
            left: Box::new(lower(properties, left)?),
            right: Box::new(lower(properties, right)?),
        }),
        Expr::Wildcard { .. } => Err(CompileError::NotSupported(
            "wildcard inside an expression".to_string(),
        )),
        Expr::Invocation { .. } => Err(CompileError::NotSupported(format!(
            "invocation `{}`",
            expression
        ))),
        Expr::Pipeline { .. } => Err(CompileError::NotSupported(format!(
            "pipeline `{}`",
            expression
        ))),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(n) => Value::Float(*n),
    }
}
