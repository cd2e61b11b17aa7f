use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::cmp::Ordering;

/// A dynamically typed value flowing through compiled pipelines.
///
/// Resolvers deliver source records as [`Value::Object`]s and pipelines
/// project them into new records of the same representation.
///
/// # Type Preservation
///
/// Integers and floats are kept apart:
/// - Arithmetic on integers stays integral
/// - Mixed operations collapse to an integer when the result is whole
/// - Mixed operations go through decimal arithmetic to avoid binary rounding
///
/// # Examples
///
/// ```
/// use sqlface::{Record, Value};
///
/// let null = Value::Null;
/// let integer = Value::Integer(42);
/// let string = Value::from("hello");
///
/// let mut book = Record::new();
/// book.insert("title", "Dune");
/// book.insert("pages", 412);
/// let object = Value::Object(book);
/// assert_eq!(object.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Record with ordered, named fields
    Object(Record),
}

/// An ordered list of named values.
///
/// Field order is the order of insertion and survives serialization, so a
/// projected record lists its columns in selection order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Record {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Sets `name`, replacing an existing field in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Value {
    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Reads `name` from an object; anything else, or a missing field, is null.
    pub fn field(&self, name: &str) -> &Value {
        self.as_record()
            .and_then(|record| record.get(name))
            .unwrap_or(&Value::Null)
    }

    // null < boolean < number < string < array < object
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    /// Total order used by `order by`.
    ///
    /// Values of different kinds order by kind; numbers compare numerically
    /// across integers and floats; arrays compare element-wise and objects
    /// field by field in insertion order.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (a, b) if a.rank() == 2 && b.rank() == 2 => {
                let (x, y) = (a.as_float().unwrap_or(0.0), b.as_float().unwrap_or(0.0));
                x.total_cmp(&y)
            }
            (Value::Array(a), Value::Array(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.compare(y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Value::Object(a), Value::Object(b)) => a
                .iter()
                .zip(b.iter())
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.compare(vb)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut record = Record::new();
        record.insert("b", 1);
        record.insert("a", 2);
        record.insert("b", 3);

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(Value::Integer(2).compare(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(Value::Float(2.0).compare(&Value::Integer(2)), Ordering::Equal);
    }

    #[test]
    fn test_compare_orders_kinds() {
        let mut values = vec![
            Value::from("a"),
            Value::Integer(1),
            Value::Null,
            Value::Boolean(false),
        ];
        values.sort_by(|a, b| a.compare(b));

        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Boolean(false),
                Value::Integer(1),
                Value::from("a"),
            ]
        );
    }

    #[test]
    fn test_compare_objects_field_by_field() {
        let mut dune = Record::new();
        dune.insert("title", "Dune");
        let mut emma = Record::new();
        emma.insert("title", "Emma");
        let mut longer = Record::new();
        longer.insert("title", "Dune");
        longer.insert("price", 9);

        let (dune, emma, longer) = (Value::Object(dune), Value::Object(emma), Value::Object(longer));
        assert_eq!(dune.compare(&emma), Ordering::Less);
        assert_eq!(emma.compare(&dune), Ordering::Greater);
        assert_eq!(dune.compare(&longer), Ordering::Less);
        assert_eq!(dune.compare(&dune.clone()), Ordering::Equal);
    }

    #[test]
    fn test_serialize_preserves_field_order() {
        let mut record = Record::new();
        record.insert("zeta", 1);
        record.insert("alpha", "x");

        let json = serde_json::to_string(&Value::Object(record)).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":"x"}"#);
    }
}
