//! # dynamodb-serde: DynamoDB Export Row Deserializer
//!
//! Converts the flat-text rows written by the DynamoDB export pipeline into
//! typed column values, against a schema supplied as Hive-style table
//! properties.
//!
//! ## Row format
//!
//! A row is a run of records, each `<name> ETX <fragment>` terminated by
//! STX or a line feed (the last terminator may be omitted). The fragment is
//! a one-key tagged object whose value is always quoted:
//!
//! ```text
//! string_col\u{3}{"s":"string_value"}\u{2}int_col\u{3}{"n":"1"}
//! ```
//!
//! ## Failure model
//!
//! - **Row errors**: a fragment without a `:` or a quoted value rejects the
//!   whole row.
//! - **Column nulls**: a literal that does not parse as its column's type
//!   becomes null, without affecting other columns. Booleans read anything
//!   but `true` as `false`.
//!
//! ## Example
//!
//! ```
//! use dynamodb_serde::{DynamoDbSerDe, SerDeProperties, Value};
//!
//! let serde = DynamoDbSerDe::initialize(
//!     &SerDeProperties::new("string_col,int_col", "string,int"),
//! ).unwrap();
//!
//! let row = serde
//!     .deserialize("string_col\u{3}{\"s\":\"string_value\"}\u{2}int_col\u{3}{\"n\":\"1\"}")
//!     .unwrap();
//! assert_eq!(row[0], Value::String("string_value".to_string()));
//! assert_eq!(row[1], Value::Int(1));
//! ```

// Core modules
pub mod dynamodb_serde;
pub mod error;
pub mod extraction;
pub mod schema;
pub mod serialization;
pub mod value;

// Row decomposition, coercion and assembly
pub mod runtime;

// Re-export key types
pub use dynamodb_serde::DynamoDbSerDe;
pub use error::{Result, SerDeError};
pub use extraction::extract_literal;
pub use schema::{Column, Schema, SemanticType};
pub use serialization::{JsonArrayWriter, NamedRow, NdjsonWriter};
pub use value::{CharValue, TypedRow, Value, VarcharValue};

// Re-export runtime types
pub use runtime::{
    decompose_row, AttributeMap, RowAssembler, SerDeProperties, TimestampFormat, TypeCoercer,
};
