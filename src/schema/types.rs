use std::fmt;

use crate::schema::naming::camel_case;
use crate::schema::shape::{Repr, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
}

/// Type of a source or of one of its properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Basic(BasicKind),
    /// Record with named properties, in declaration order
    Object {
        shape: String,
        properties: Vec<ObjectProperty>,
    },
    Array(Box<Type>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    /// Name used in scripts (camelCase).
    pub identifier: String,
    /// Key the value is read under in a record.
    pub accessor: String,
    pub ty: Type,
}

impl Type {
    /// Maps a declared representation to its type.
    ///
    /// Every numeric kind is a number.
    pub fn from_repr(repr: &Repr) -> Type {
        match repr {
            Repr::String => Type::Basic(BasicKind::String),
            Repr::Boolean => Type::Basic(BasicKind::Boolean),
            Repr::Numeric(_) => Type::Basic(BasicKind::Number),
            Repr::Enumerable(element) => Type::Array(Box::new(Type::from_repr(element))),
            Repr::Shape(shape) => Type::from_shape(shape),
        }
    }

    pub fn from_shape(shape: &Shape) -> Type {
        let properties = shape
            .fields
            .iter()
            .map(|field| ObjectProperty {
                identifier: camel_case(&field.accessor),
                accessor: field.accessor.clone(),
                ty: Type::from_repr(&field.repr),
            })
            .collect();

        Type::Object {
            shape: shape.name.clone(),
            properties,
        }
    }

    /// Properties of the records this type describes: its own for an object,
    /// its element's for an array of objects.
    pub fn record_properties(&self) -> Option<&[ObjectProperty]> {
        match self {
            Type::Object { properties, .. } => Some(properties),
            Type::Array(element) => match element.as_ref() {
                Type::Object { properties, .. } => Some(properties),
                _ => None,
            },
            Type::Basic(_) => None,
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BasicKind::Undefined => "undefined",
            BasicKind::Null => "null",
            BasicKind::Boolean => "boolean",
            BasicKind::Number => "number",
            BasicKind::String => "string",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(kind) => write!(f, "{}", kind),
            Type::Object { shape, .. } => write!(f, "object {}", shape),
            Type::Array(element) => write!(f, "array of {}", element),
        }
    }
}
