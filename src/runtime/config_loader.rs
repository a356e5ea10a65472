//! SerDe property loading.
//!
//! Properties use the host framework's key names so the same table
//! definition works whether it arrives as a property map or a YAML file:
//!
//! ```yaml
//! columns: string_col,int_col,ts_col
//! columns.types: string,int,timestamp
//! input.timestamp.format: "yyyy-MM-dd'T'HH:mm:ss.SSS"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SerDeError};

pub const LIST_COLUMNS: &str = "columns";
pub const LIST_COLUMN_TYPES: &str = "columns.types";
pub const INPUT_TIMESTAMP_FORMAT: &str = "input.timestamp.format";

/// Table properties consumed once at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerDeProperties {
    /// Comma-separated column names
    #[serde(rename = "columns")]
    pub columns: String,

    /// Hive type list, parallel to `columns`
    #[serde(rename = "columns.types")]
    pub column_types: String,

    /// Optional Joda-style timestamp pattern
    #[serde(
        rename = "input.timestamp.format",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp_format: Option<String>,
}

impl SerDeProperties {
    pub fn new(columns: impl Into<String>, column_types: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            column_types: column_types.into(),
            timestamp_format: None,
        }
    }

    pub fn with_timestamp_format(mut self, pattern: impl Into<String>) -> Self {
        self.timestamp_format = Some(pattern.into());
        self
    }

    /// Build from a host-style property map.
    ///
    /// # Errors
    /// Returns error if `columns` or `columns.types` is absent
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &'static str| {
            properties
                .get(key)
                .cloned()
                .ok_or(SerDeError::MissingProperty(key))
        };

        Ok(Self {
            columns: get(LIST_COLUMNS)?,
            column_types: get(LIST_COLUMN_TYPES)?,
            timestamp_format: properties.get(INPUT_TIMESTAMP_FORMAT).cloned(),
        })
    }

    /// Load properties from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file can't be read or lacks the required keys
    ///
    /// # Example
    /// ```ignore
    /// use dynamodb_serde::SerDeProperties;
    ///
    /// let props = SerDeProperties::load_from_file("config/serde.yaml")?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| {
            SerDeError::ConfigLoad(format!("cannot read {}: {}", path.display(), e))
        })?;

        let properties: Self = serde_yaml::from_str(&contents)?;
        Ok(properties)
    }

    /// Flatten back into a host-style property map.
    pub fn to_properties(&self) -> HashMap<String, String> {
        let mut properties = HashMap::new();
        properties.insert(LIST_COLUMNS.to_string(), self.columns.clone());
        properties.insert(LIST_COLUMN_TYPES.to_string(), self.column_types.clone());
        if let Some(pattern) = &self.timestamp_format {
            properties.insert(INPUT_TIMESTAMP_FORMAT.to_string(), pattern.clone());
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_properties() {
        let mut map = HashMap::new();
        map.insert("columns".to_string(), "a,b".to_string());
        map.insert("columns.types".to_string(), "string,int".to_string());

        let props = SerDeProperties::from_properties(&map).unwrap();

        assert_eq!(props, SerDeProperties::new("a,b", "string,int"));
        assert_eq!(props.timestamp_format, None);
    }

    #[test]
    fn test_from_properties_missing_key() {
        let mut map = HashMap::new();
        map.insert("columns".to_string(), "a".to_string());

        let err = SerDeProperties::from_properties(&map).unwrap_err();
        assert!(matches!(err, SerDeError::MissingProperty("columns.types")));
    }

    #[test]
    fn test_property_map_round_trip() {
        let props = SerDeProperties::new("ts", "timestamp").with_timestamp_format("yyyy");
        let map = props.to_properties();
        assert_eq!(map.get(INPUT_TIMESTAMP_FORMAT), Some(&"yyyy".to_string()));
        assert_eq!(SerDeProperties::from_properties(&map).unwrap(), props);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns: id,ts").unwrap();
        writeln!(file, "columns.types: bigint,timestamp").unwrap();
        writeln!(file, "input.timestamp.format: \"yyyy-MM-dd'T'HH:mm:ss\"").unwrap();

        let props = SerDeProperties::load_from_file(file.path()).unwrap();

        assert_eq!(props.columns, "id,ts");
        assert_eq!(props.column_types, "bigint,timestamp");
        assert_eq!(
            props.timestamp_format.as_deref(),
            Some("yyyy-MM-dd'T'HH:mm:ss")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = SerDeProperties::load_from_file("/nonexistent/serde.yaml").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_load_yaml_missing_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns: id").unwrap();

        let err = SerDeProperties::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, SerDeError::ConfigLoad(_)));
    }
}
