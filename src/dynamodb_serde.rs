//! The SerDe entry point a host framework talks to.

use crate::error::{Result, SerDeError};
use crate::runtime::coercion::TypeCoercer;
use crate::runtime::config_loader::SerDeProperties;
use crate::runtime::row_assembler::RowAssembler;
use crate::runtime::timestamp_format::TimestampFormat;
use crate::schema::Schema;
use crate::value::TypedRow;

/// Read-only SerDe for DynamoDB export rows.
///
/// Initialized once per table definition; the row shape (column count,
/// order and types) is fixed from then on.
#[derive(Debug, Clone)]
pub struct DynamoDbSerDe {
    assembler: RowAssembler,
}

impl DynamoDbSerDe {
    /// Build the schema and timestamp parser from table properties.
    ///
    /// # Errors
    /// Configuration problems surface here, once: mismatched column lists,
    /// unparseable or unsupported column types, and invalid timestamp
    /// patterns.
    pub fn initialize(properties: &SerDeProperties) -> Result<Self> {
        let schema = Schema::from_lists(&properties.columns, &properties.column_types)?;
        let timestamp_format = match &properties.timestamp_format {
            Some(pattern) => TimestampFormat::from_pattern(pattern)?,
            None => TimestampFormat::Canonical,
        };

        tracing::debug!(
            "Initialized DynamoDbSerDe with {} columns: {}",
            schema.len(),
            properties.columns
        );

        Ok(Self {
            assembler: RowAssembler::new(schema, TypeCoercer::new(timestamp_format)),
        })
    }

    pub fn schema(&self) -> &Schema {
        self.assembler.schema()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema().column_names().collect()
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        self.assembler.coercer().timestamp_format()
    }

    /// Deserialize one blob into a new row.
    pub fn deserialize(&self, blob: &str) -> Result<TypedRow> {
        self.assembler.assemble(blob)
    }

    /// Deserialize one blob into `row`, which stays valid until the next call
    /// that reuses it.
    pub fn deserialize_into(&self, blob: &str, row: &mut TypedRow) -> Result<()> {
        self.assembler.assemble_into(blob, row)
    }

    /// Writing rows back to the export format is not supported.
    pub fn serialize(&self, _row: &TypedRow) -> Result<String> {
        Err(SerDeError::SerializeUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SemanticType;
    use crate::value::Value;

    #[test]
    fn test_initialize_builds_schema() {
        let serde = DynamoDbSerDe::initialize(&SerDeProperties::new(
            "id,name,price",
            "bigint,varchar(10),decimal(10,2)",
        ))
        .unwrap();

        assert_eq!(serde.column_names(), vec!["id", "name", "price"]);
        assert_eq!(
            serde.schema().columns()[1].semantic_type,
            SemanticType::Varchar { max_length: 10 }
        );
        assert_eq!(serde.timestamp_format(), &TimestampFormat::Canonical);
    }

    #[test]
    fn test_initialize_rejects_unsupported_type() {
        let err = DynamoDbSerDe::initialize(&SerDeProperties::new("a,b", "int,struct<x:int>"))
            .unwrap_err();
        assert!(matches!(err, SerDeError::UnsupportedType { index: 1, .. }));
    }

    #[test]
    fn test_initialize_rejects_bad_timestamp_pattern() {
        let props = SerDeProperties::new("ts", "timestamp").with_timestamp_format("yyyy-qq");
        let err = DynamoDbSerDe::initialize(&props).unwrap_err();
        assert!(matches!(err, SerDeError::InvalidTimestampFormat { .. }));
    }

    #[test]
    fn test_row_shape_stable_across_calls() {
        let serde = DynamoDbSerDe::initialize(&SerDeProperties::new("a,b,c", "int,int,int")).unwrap();
        for blob in ["", "a\u{3}{\"n\":\"1\"}", "zz\u{3}{\"n\":\"1\"}\u{2}c\u{3}{\"n\":\"3\"}"] {
            assert_eq!(serde.deserialize(blob).unwrap().len(), 3);
        }
    }

    #[test]
    fn test_deserialize_into_reuses_buffer() {
        let serde = DynamoDbSerDe::initialize(&SerDeProperties::new("a", "int")).unwrap();
        let mut row = TypedRow::default();

        serde.deserialize_into("a\u{3}{\"n\":\"1\"}", &mut row).unwrap();
        assert_eq!(row[0], Value::Int(1));

        serde.deserialize_into("a\u{3}{\"n\":\"2\"}", &mut row).unwrap();
        assert_eq!(row[0], Value::Int(2));
    }

    #[test]
    fn test_serialize_is_unsupported() {
        let serde = DynamoDbSerDe::initialize(&SerDeProperties::new("a", "int")).unwrap();
        let err = serde.serialize(&TypedRow::nulls(1)).unwrap_err();
        assert!(matches!(err, SerDeError::SerializeUnsupported));
    }
}
