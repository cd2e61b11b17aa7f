//! Sources file: declarative shapes and records for the `run` command
//!
//! ```json
//! {
//!   "sources": [
//!     {
//!       "name": "Book",
//!       "fields": [
//!         { "accessor": "bookId", "type": "integer" },
//!         { "accessor": "title", "type": "string" },
//!         { "accessor": "tags", "type": ["string"] },
//!         { "accessor": "author", "type": { "name": "Author", "fields": [
//!           { "accessor": "name", "type": "string" }
//!         ] } }
//!       ],
//!       "records": [ { "bookId": 1, "title": "Dune", "tags": [], "author": { "name": "Herbert" } } ]
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;

use super::CliError;
use crate::ContextBuilder;
use crate::convert::from_json;
use crate::schema::{NumericKind, Repr, ResolverContainer, ReturnKind, Shape};

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub fields: Vec<FieldConfig>,
    /// Records served for this source; without them it cannot be queried.
    #[serde(default)]
    pub records: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    pub accessor: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// `"string"`, `["string"]` or a nested `{ "name", "fields" }` shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    Scalar(String),
    Enumerable(Vec<FieldType>),
    Shape(ShapeConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShapeConfig {
    pub name: String,
    pub fields: Vec<FieldConfig>,
}

impl SourcesFile {
    pub fn from_json(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    /// A context with one schema holding every declared source.
    ///
    /// Each source with records is served by a generated `get<Name>s`
    /// member.
    pub fn into_context(self) -> Result<ContextBuilder, CliError> {
        let mut shapes = Vec::with_capacity(self.sources.len());
        let mut container = ResolverContainer::new("SourcesFile");

        for source in self.sources {
            shapes.push(shape_of(&source.name, &source.fields)?);

            if let Some(records) = source.records {
                let records = from_json(serde_json::Value::Array(records));
                container = container.member_value(
                    format!("get{}s", source.name),
                    ReturnKind::Enumerable,
                    move |_scope| Ok(records.clone()),
                );
            }
        }

        Ok(ContextBuilder::new().with_schema(move |designer| {
            for shape in shapes {
                designer.source_shape(shape);
            }
            designer.resolver_container(container);
        }))
    }
}

fn shape_of(name: &str, fields: &[FieldConfig]) -> Result<Shape, CliError> {
    fields.iter().try_fold(Shape::new(name), |shape, field| {
        Ok(shape.field(field.accessor.clone(), field.ty.to_repr()?))
    })
}

impl FieldType {
    pub fn to_repr(&self) -> Result<Repr, CliError> {
        match self {
            FieldType::Scalar(name) => scalar_repr(name),
            FieldType::Enumerable(elements) => match elements.as_slice() {
                [element] => Ok(Repr::Enumerable(Box::new(element.to_repr()?))),
                _ => Err(CliError::Config(format!(
                    "an enumerable type lists exactly one element type, found {}",
                    elements.len()
                ))),
            },
            FieldType::Shape(shape) => Ok(Repr::Shape(shape_of(&shape.name, &shape.fields)?)),
        }
    }
}

fn scalar_repr(name: &str) -> Result<Repr, CliError> {
    match name.to_lowercase().as_str() {
        "string" => Ok(Repr::String),
        "boolean" | "bool" => Ok(Repr::Boolean),
        "number" | "float" | "double" => Ok(Repr::Numeric(NumericKind::F64)),
        "integer" | "int" | "long" => Ok(Repr::Numeric(NumericKind::I64)),
        "decimal" => Ok(Repr::Numeric(NumericKind::Decimal)),
        _ => Err(CliError::Config(format!("unknown field type `{}`", name))),
    }
}
