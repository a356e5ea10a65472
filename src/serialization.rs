//! JSON output for deserialized rows.

use std::io::Write;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::Result;
use crate::schema::Schema;
use crate::value::TypedRow;

/// A row paired with its schema, serialized as `{column: value, ...}` in
/// schema order.
pub struct NamedRow<'a> {
    schema: &'a Schema,
    row: &'a TypedRow,
}

impl<'a> NamedRow<'a> {
    pub fn new(schema: &'a Schema, row: &'a TypedRow) -> Self {
        Self { schema, row }
    }
}

impl Serialize for NamedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema.len()))?;
        for (column, value) in self.schema.iter().zip(self.row.iter()) {
            map.serialize_entry(&column.name, value)?;
        }
        map.end()
    }
}

/// NDJSON (Newline Delimited JSON) writer
///
/// Writes one JSON object per line.
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single value as an NDJSON line
    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn write_row(&mut self, schema: &Schema, row: &TypedRow) -> Result<()> {
        self.write(&NamedRow::new(schema, row))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// JSON array writer
///
/// Writes values as one JSON array; call [`JsonArrayWriter::finish`] to
/// close it.
pub struct JsonArrayWriter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Create a new JSON array writer and write the opening bracket
    pub fn new(mut writer: W) -> Result<Self> {
        write!(writer, "[")?;
        Ok(Self {
            writer,
            first: true,
        })
    }

    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if !self.first {
            write!(self.writer, ",")?;
        }
        self.first = false;

        let json = serde_json::to_string(value)?;
        write!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn write_row(&mut self, schema: &Schema, row: &TypedRow) -> Result<()> {
        self.write(&NamedRow::new(schema, row))
    }

    /// Finish writing the array and close the bracket
    pub fn finish(mut self) -> Result<()> {
        write!(self.writer, "]")?;
        self.writer.flush()?;
        Ok(())
    }
}
