//! Column schema and the Hive type-list grammar it is built from.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, SerDeError};

pub const MAX_CHAR_LENGTH: usize = 255;
pub const MAX_VARCHAR_LENGTH: usize = 65535;
pub const MAX_DECIMAL_PRECISION: u32 = 38;

/// Target value kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SemanticType {
    String,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Timestamp,
    Date,
    Decimal,
    Char { length: usize },
    Varchar { max_length: usize },
}

impl SemanticType {
    /// Parse a single Hive type name such as `int`, `bigint` or `varchar(20)`.
    ///
    /// Hive types outside the supported set (`binary`, `array<...>`, ...)
    /// come back as `Ok(None)` so the caller can report the column.
    pub fn parse(type_name: &str) -> Result<Option<Self>> {
        let normalized = type_name.trim().to_ascii_lowercase();
        let caps = type_pattern().captures(&normalized).ok_or_else(|| {
            SerDeError::InvalidTypeString(format!("cannot parse type '{}'", type_name))
        })?;
        let base = &caps[1];
        let params: Vec<&str> = caps
            .get(2)
            .map(|m| m.as_str().split(',').map(str::trim).collect())
            .unwrap_or_default();

        let simple = |ty: SemanticType| -> Result<Option<SemanticType>> {
            if params.is_empty() {
                Ok(Some(ty))
            } else {
                Err(SerDeError::InvalidTypeString(format!(
                    "type '{}' takes no parameters",
                    base
                )))
            }
        };

        match base {
            "string" => simple(SemanticType::String),
            "tinyint" => simple(SemanticType::Byte),
            "smallint" => simple(SemanticType::Short),
            "int" | "integer" => simple(SemanticType::Int),
            "bigint" => simple(SemanticType::Long),
            "float" => simple(SemanticType::Float),
            "double" | "double precision" => simple(SemanticType::Double),
            "boolean" => simple(SemanticType::Boolean),
            "timestamp" => simple(SemanticType::Timestamp),
            "date" => simple(SemanticType::Date),
            "decimal" => {
                validate_decimal_params(&params)?;
                Ok(Some(SemanticType::Decimal))
            }
            "char" => {
                let length = single_length(base, &params, MAX_CHAR_LENGTH)?;
                Ok(Some(SemanticType::Char { length }))
            }
            "varchar" => {
                let max_length = single_length(base, &params, MAX_VARCHAR_LENGTH)?;
                Ok(Some(SemanticType::Varchar { max_length }))
            }
            "binary" | "void" | "array" | "map" | "struct" | "uniontype"
            | "interval_year_month" | "interval_day_time" | "timestamplocaltz" => Ok(None),
            other if other.starts_with("timestamp with") => Ok(None),
            other => Err(SerDeError::InvalidTypeString(format!(
                "unknown type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::String => write!(f, "string"),
            SemanticType::Byte => write!(f, "tinyint"),
            SemanticType::Short => write!(f, "smallint"),
            SemanticType::Int => write!(f, "int"),
            SemanticType::Long => write!(f, "bigint"),
            SemanticType::Float => write!(f, "float"),
            SemanticType::Double => write!(f, "double"),
            SemanticType::Boolean => write!(f, "boolean"),
            SemanticType::Timestamp => write!(f, "timestamp"),
            SemanticType::Date => write!(f, "date"),
            SemanticType::Decimal => write!(f, "decimal"),
            SemanticType::Char { length } => write!(f, "char({})", length),
            SemanticType::Varchar { max_length } => write!(f, "varchar({})", max_length),
        }
    }
}

fn type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Nested types keep their `<...>` body; we only need the base name.
        Regex::new(r"^([a-z_]+(?: [a-z_]+)*)\s*(?:\(([^)]*)\)|<.*>)?$").expect("valid regex")
    })
}

fn single_length(base: &str, params: &[&str], max: usize) -> Result<usize> {
    let [raw] = params else {
        return Err(SerDeError::InvalidTypeString(format!(
            "{} requires exactly one length parameter",
            base
        )));
    };
    let length: usize = raw.parse().map_err(|_| {
        SerDeError::InvalidTypeString(format!("{} length '{}' is not a number", base, raw))
    })?;
    if length == 0 || length > max {
        return Err(SerDeError::InvalidTypeString(format!(
            "{} length {} out of range 1..={}",
            base, length, max
        )));
    }
    Ok(length)
}

fn validate_decimal_params(params: &[&str]) -> Result<()> {
    if params.len() > 2 {
        return Err(SerDeError::InvalidTypeString(
            "decimal takes at most precision and scale".to_string(),
        ));
    }
    let parsed: Vec<u32> = params
        .iter()
        .map(|p| {
            p.parse().map_err(|_| {
                SerDeError::InvalidTypeString(format!("decimal parameter '{}' is not a number", p))
            })
        })
        .collect::<Result<_>>()?;

    if let Some(&precision) = parsed.first() {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            return Err(SerDeError::InvalidTypeString(format!(
                "decimal precision {} out of range 1..={}",
                precision, MAX_DECIMAL_PRECISION
            )));
        }
        if let Some(&scale) = parsed.get(1) {
            if scale > precision {
                return Err(SerDeError::InvalidTypeString(format!(
                    "decimal scale {} exceeds precision {}",
                    scale, precision
                )));
            }
        }
    }
    Ok(())
}

/// Split a Hive type list on `,` `;` or `:` outside of `()` and `<>`.
pub fn split_type_list(column_types: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in column_types.char_indices() {
        match ch {
            '(' | '<' => depth += 1,
            ')' | '>' => depth = depth.saturating_sub(1),
            ',' | ';' | ':' if depth == 0 => {
                parts.push(column_types[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = column_types[start..].trim();
    if !tail.is_empty() || !parts.is_empty() {
        parts.push(tail);
    }
    parts
}

/// One named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub semantic_type: SemanticType,
}

impl Column {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}

/// Ordered, immutable list of columns. Names are matched by exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build a schema from Hive's comma-separated column-name list and
    /// type list (`columns` / `columns.types`).
    ///
    /// # Errors
    /// Fails on unparseable types, on Hive types this SerDe cannot produce,
    /// and when the two lists have different lengths.
    pub fn from_lists(column_names: &str, column_types: &str) -> Result<Self> {
        let names: Vec<&str> = if column_names.is_empty() {
            Vec::new()
        } else {
            column_names.split(',').collect()
        };
        let types = split_type_list(column_types);
        if names.len() != types.len() {
            return Err(SerDeError::ColumnCountMismatch {
                names: names.len(),
                types: types.len(),
            });
        }

        let columns = names
            .into_iter()
            .zip(types)
            .enumerate()
            .map(|(index, (name, type_name))| match SemanticType::parse(type_name)? {
                Some(semantic_type) => Ok(Column::new(name, semantic_type)),
                None => Err(SerDeError::UnsupportedType {
                    index,
                    column: name.to_string(),
                    type_name: type_name.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
