//! Error type shared by configuration and row deserialization.

use std::fmt;

/// Errors raised by the SerDe.
///
/// Configuration errors surface once, from `initialize`. Row errors surface
/// from a single `deserialize` call and invalidate only that row. Per-column
/// coercion failures never reach this type; they degrade to null.
#[derive(Debug)]
pub enum SerDeError {
    MissingProperty(&'static str),
    ColumnCountMismatch {
        names: usize,
        types: usize,
    },
    InvalidTypeString(String),
    UnsupportedType {
        index: usize,
        column: String,
        type_name: String,
    },
    InvalidTimestampFormat {
        pattern: String,
        reason: String,
    },
    ConfigLoad(String),
    MalformedFragment {
        attribute: String,
        fragment: String,
        reason: &'static str,
    },
    SerializeUnsupported,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl SerDeError {
    /// True for failures scoped to one row rather than the SerDe's configuration.
    pub fn is_row_error(&self) -> bool {
        matches!(self, SerDeError::MalformedFragment { .. })
    }
}

impl fmt::Display for SerDeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerDeError::MissingProperty(key) => write!(f, "Missing required property '{}'", key),
            SerDeError::ColumnCountMismatch { names, types } => write!(
                f,
                "Column count mismatch: {} column names but {} column types",
                names, types
            ),
            SerDeError::InvalidTypeString(msg) => write!(f, "Invalid column type string: {}", msg),
            SerDeError::UnsupportedType {
                index,
                column,
                type_name,
            } => write!(
                f,
                "DynamoDbSerDe doesn't allow column [{}] named {} with type {}",
                index, column, type_name
            ),
            SerDeError::InvalidTimestampFormat { pattern, reason } => {
                write!(f, "Invalid timestamp format '{}': {}", pattern, reason)
            }
            SerDeError::ConfigLoad(msg) => write!(f, "Failed to load config: {}", msg),
            SerDeError::MalformedFragment {
                attribute,
                fragment,
                reason,
            } => write!(
                f,
                "Malformed value for attribute '{}' ({}): {:?}",
                attribute, reason, fragment
            ),
            SerDeError::SerializeUnsupported => {
                write!(f, "DynamoDb SerDe doesn't support the serialize() method")
            }
            SerDeError::Io(e) => write!(f, "IO error: {}", e),
            SerDeError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for SerDeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerDeError::Io(e) => Some(e),
            SerDeError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SerDeError {
    fn from(err: std::io::Error) -> Self {
        SerDeError::Io(err)
    }
}

impl From<serde_json::Error> for SerDeError {
    fn from(err: serde_json::Error) -> Self {
        SerDeError::Json(err)
    }
}

impl From<serde_yaml::Error> for SerDeError {
    fn from(err: serde_yaml::Error) -> Self {
        SerDeError::ConfigLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SerDeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_classification() {
        let row_err = SerDeError::MalformedFragment {
            attribute: "a".to_string(),
            fragment: "{}".to_string(),
            reason: "missing ':'",
        };
        assert!(row_err.is_row_error());
        assert!(!SerDeError::MissingProperty("columns").is_row_error());
        assert!(!SerDeError::SerializeUnsupported.is_row_error());
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = SerDeError::UnsupportedType {
            index: 2,
            column: "tags".to_string(),
            type_name: "array<string>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "DynamoDbSerDe doesn't allow column [2] named tags with type array<string>"
        );
    }
}
