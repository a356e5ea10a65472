//! Drives decomposition, extraction and coercion across a schema.

use crate::error::Result;
use crate::runtime::coercion::TypeCoercer;
use crate::runtime::row_decomposer::decompose_row;
use crate::schema::Schema;
use crate::value::TypedRow;

/// Builds typed rows for one schema.
///
/// Coordinates:
/// - Row decomposition (one pass per blob, all-or-nothing)
/// - Column lookup by exact name, in schema order
/// - Per-column coercion, where failures degrade to null
///
/// Holds no per-row state, so a shared reference can assemble rows from
/// any number of threads.
#[derive(Debug, Clone)]
pub struct RowAssembler {
    schema: Schema,
    coercer: TypeCoercer,
}

impl RowAssembler {
    pub fn new(schema: Schema, coercer: TypeCoercer) -> Self {
        Self { schema, coercer }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn coercer(&self) -> &TypeCoercer {
        &self.coercer
    }

    /// Assemble a freshly allocated row from `blob`.
    ///
    /// # Errors
    /// Returns the decomposition error when the blob is structurally broken.
    /// Column-level parse failures never fail the row.
    ///
    /// # Example
    /// ```
    /// use dynamodb_serde::{RowAssembler, Schema, TypeCoercer, Value};
    ///
    /// let schema = Schema::from_lists("string_col,int_col", "string,int").unwrap();
    /// let assembler = RowAssembler::new(schema, TypeCoercer::default());
    ///
    /// let blob = "string_col\u{3}{\"s\":\"string_value\"}\u{2}int_col\u{3}{\"n\":\"1\"}";
    /// let row = assembler.assemble(blob).unwrap();
    /// assert_eq!(row[0], Value::String("string_value".to_string()));
    /// assert_eq!(row[1], Value::Int(1));
    /// ```
    pub fn assemble(&self, blob: &str) -> Result<TypedRow> {
        let mut row = TypedRow::nulls(self.schema.len());
        self.assemble_into(blob, &mut row)?;
        Ok(row)
    }

    /// Assemble into a caller-owned row, overwriting its previous contents.
    ///
    /// The row is resized to the schema width first; if the blob is
    /// rejected it is left holding nulls.
    pub fn assemble_into(&self, blob: &str, row: &mut TypedRow) -> Result<()> {
        row.reset(self.schema.len());
        let attributes = decompose_row(blob)?;

        for (index, column) in self.schema.iter().enumerate() {
            let literal = attributes.get(&column.name);
            row.set(index, self.coercer.coerce(literal, column.semantic_type));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, SemanticType};
    use crate::value::Value;

    const ETX: char = '\u{3}';
    const STX: char = '\u{2}';

    fn assembler(columns: &[(&str, SemanticType)]) -> RowAssembler {
        let schema = Schema::new(
            columns
                .iter()
                .map(|(name, ty)| Column::new(*name, *ty))
                .collect(),
        );
        RowAssembler::new(schema, TypeCoercer::default())
    }

    #[test]
    fn test_assemble_in_schema_order() {
        let assembler = assembler(&[("b", SemanticType::Int), ("a", SemanticType::String)]);
        let blob = format!("a{ETX}{{\"s\":\"x\"}}{STX}b{ETX}{{\"n\":\"2\"}}");

        let row = assembler.assemble(&blob).unwrap();

        assert_eq!(row.len(), 2);
        assert_eq!(row[0], Value::Int(2));
        assert_eq!(row[1], Value::String("x".to_string()));
    }

    #[test]
    fn test_missing_column_is_null() {
        let assembler = assembler(&[("a", SemanticType::String), ("gone", SemanticType::Boolean)]);
        let blob = format!("a{ETX}{{\"s\":\"x\"}}");

        let row = assembler.assemble(&blob).unwrap();

        assert_eq!(row[1], Value::Null);
    }

    #[test]
    fn test_extra_records_ignored() {
        let assembler = assembler(&[("a", SemanticType::Long)]);
        let blob = format!("z{ETX}{{\"s\":\"q\"}}{STX}a{ETX}{{\"n\":\"5\"}}{STX}y{ETX}{{\"n\":\"6\"}}");

        let row = assembler.assemble(&blob).unwrap();

        assert_eq!(row.into_values(), vec![Value::Long(5)]);
    }

    #[test]
    fn test_bad_literal_only_nulls_its_column() {
        let assembler = assembler(&[("a", SemanticType::Int), ("b", SemanticType::Int)]);
        let blob = format!("a{ETX}{{\"n\":\"abc\"}}{STX}b{ETX}{{\"n\":\"3\"}}");

        let row = assembler.assemble(&blob).unwrap();

        assert_eq!(row[0], Value::Null);
        assert_eq!(row[1], Value::Int(3));
    }

    #[test]
    fn test_column_names_match_exactly() {
        let assembler = assembler(&[("Int_Col", SemanticType::Int)]);
        let blob = format!("int_col{ETX}{{\"n\":\"1\"}}");

        let row = assembler.assemble(&blob).unwrap();

        assert_eq!(row[0], Value::Null);
    }

    #[test]
    fn test_malformed_blob_is_row_error() {
        let assembler = assembler(&[("a", SemanticType::String)]);
        let blob = format!("a{ETX}no-colon{STX}");

        assert!(assembler.assemble(&blob).unwrap_err().is_row_error());
    }

    #[test]
    fn test_assemble_into_overwrites_buffer() {
        let assembler = assembler(&[("a", SemanticType::Int)]);
        let mut row = TypedRow::from(vec![Value::Int(9), Value::Int(9), Value::Int(9)]);

        assembler
            .assemble_into(&format!("a{ETX}{{\"n\":\"1\"}}"), &mut row)
            .unwrap();
        assert_eq!(row.into_values(), vec![Value::Int(1)]);
    }

    #[test]
    fn test_assemble_into_leaves_nulls_on_error() {
        let assembler = assembler(&[("a", SemanticType::Int)]);
        let mut row = TypedRow::from(vec![Value::Int(9)]);

        assert!(assembler
            .assemble_into(&format!("a{ETX}bad{STX}"), &mut row)
            .is_err());
        assert_eq!(row.into_values(), vec![Value::Null]);
    }

    #[test]
    fn test_empty_blob_gives_all_nulls() {
        let assembler = assembler(&[("a", SemanticType::Int), ("b", SemanticType::Date)]);
        let row = assembler.assemble("").unwrap();
        assert_eq!(row, TypedRow::nulls(2));
    }
}
