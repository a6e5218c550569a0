//! Record shapes and decoded values.
//!
//! A [`Shape`] names the fields of one structured read/write unit in order;
//! a [`Record`] holds the decoded (or to-be-encoded) value of each field.

use crate::field::FieldType;
use bytes::Bytes;
use std::collections::BTreeMap;

/// A decoded field value.
///
/// All integer field types, including the variable-length one, decode to
/// [`Value::Int`]; string types to [`Value::Str`]; raw padding and block
/// types to [`Value::Bytes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bytes(Bytes),
}

impl Value {
    /// The kind of this value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Returns the integer value, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw byte value, if this is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! impl_value_from_int {
    ($($type:ty),*) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_value_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

/// An ordered mapping from field name to field type, defining one record.
///
/// Field order is the order of [`field`](Self::field) calls; names are
/// expected to be unique within a shape. A field may carry no type (see
/// [`field_opt`](Self::field_opt)) to model schema tables whose lookups can
/// miss; reading or writing such a field fails with
/// [`Error::MissingFieldType`](crate::Error::MissingFieldType).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    fields: Vec<(String, Option<FieldType>)>,
}

impl Shape {
    /// Creates an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field with the given type.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push((name.into(), Some(ty)));
        self
    }

    /// Appends a field whose type may be absent.
    pub fn field_opt(mut self, name: impl Into<String>, ty: Option<FieldType>) -> Self {
        self.fields.push((name.into(), ty));
        self
    }

    /// Number of fields in the shape.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the shape has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in shape order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldType>)> {
        self.fields
            .iter()
            .map(|(name, ty)| (name.as_str(), ty.as_ref()))
    }
}

/// A mapping from field name to [`Value`].
///
/// Produced by [`RecordBuffer::read_record`](crate::RecordBuffer::read_record)
/// and consumed by
/// [`RecordBuffer::write_record`](crate::RecordBuffer::write_record).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value for a field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the integer value for a field, if present and an integer.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Returns the string value for a field, if present and a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns the byte value for a field, if present and raw bytes.
    pub fn bytes(&self, name: &str) -> Option<&Bytes> {
        self.get(name).and_then(Value::as_bytes)
    }

    /// Number of field values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no field values are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates values by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, v)| (name.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
