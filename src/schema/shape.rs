/// Declarative description of a host record type.
///
/// # Examples
///
/// ```
/// use sqlface::schema::{NumericKind, Repr, Shape};
///
/// let book = Shape::new("Book")
///     .field("bookId", Repr::Numeric(NumericKind::I64))
///     .field("title", Repr::String)
///     .field("tags", Repr::Enumerable(Box::new(Repr::String)));
/// assert_eq!(book.fields.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub fields: Vec<Field>,
}

/// One readable field of a [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key the field is read under in a record.
    pub accessor: String,
    pub repr: Repr,
}

/// Representation of a field's values.
#[derive(Debug, Clone, PartialEq)]
pub enum Repr {
    String,
    Boolean,
    Numeric(NumericKind),
    /// A sequence of `T`
    Enumerable(Box<Repr>),
    /// A nested record
    Shape(Shape),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
}

impl Shape {
    pub fn new(name: impl Into<String>) -> Self {
        Shape {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, accessor: impl Into<String>, repr: Repr) -> Self {
        self.fields.push(Field {
            accessor: accessor.into(),
            repr,
        });
        self
    }
}

impl Repr {
    /// The representation of a nested [`Sourced`] record.
    pub fn of<T: Sourced>() -> Repr {
        Repr::Shape(T::shape())
    }
}

/// Host record types that can be declared as sources.
pub trait Sourced {
    fn shape() -> Shape;
}
