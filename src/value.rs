//! Typed column values and the row that holds them.

use std::fmt;
use std::ops::Index;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Fixed-length character value, blank-padded or truncated to its length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharValue {
    value: String,
    length: usize,
}

impl CharValue {
    pub fn new(value: &str, length: usize) -> Self {
        let mut padded: String = value.chars().take(length).collect();
        let missing = length - padded.chars().count();
        padded.extend(std::iter::repeat(' ').take(missing));
        Self {
            value: padded,
            length,
        }
    }

    /// The value padded to exactly `length` characters.
    pub fn padded(&self) -> &str {
        &self.value
    }

    /// The value without trailing pad blanks.
    pub fn stripped(&self) -> &str {
        self.value.trim_end_matches(' ')
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Serialize for CharValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// Variable-length character value truncated to a maximum length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarcharValue {
    value: String,
    max_length: usize,
}

impl VarcharValue {
    pub fn new(value: &str, max_length: usize) -> Self {
        Self {
            value: value.chars().take(max_length).collect(),
            max_length,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Serialize for VarcharValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// A single column value. One variant per semantic type, plus `Null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    #[serde(serialize_with = "serialize_plain_decimal")]
    Decimal(BigDecimal),
    Char(CharValue),
    Varchar(VarcharValue),
    #[default]
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Short(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Double(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => write!(f, "{}", ts),
            Value::Date(d) => write!(f, "{}", d),
            Value::Decimal(d) => d.write_plain_string(f),
            Value::Char(c) => write!(f, "{}", c.padded()),
            Value::Varchar(v) => write!(f, "{}", v.as_str()),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Decimals render positionally, never in exponent form.
fn serialize_plain_decimal<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_plain_string())
}

/// One deserialized row, positionally aligned with the schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TypedRow {
    values: Vec<Value>,
}

impl TypedRow {
    /// A row of `width` nulls.
    pub fn nulls(width: usize) -> Self {
        Self {
            values: vec![Value::Null; width],
        }
    }

    /// Resize to `width` and reset every slot to null.
    pub fn reset(&mut self, width: usize) {
        self.values.clear();
        self.values.resize(width, Value::Null);
    }

    pub fn set(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Index<usize> for TypedRow {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl From<Vec<Value>> for TypedRow {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}
