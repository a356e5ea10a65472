//! Literal extraction from DynamoDB export attribute fragments.
//!
//! Every attribute value in an export is a one-key tagged object whose value
//! is quoted text, numbers and booleans included:
//!
//! ```text
//! {"s":"string_value"}
//! {"n":"1.23"}
//! {"bool":"true"}
//! ```

use crate::error::{Result, SerDeError};

/// Pull the quoted literal out of an attribute fragment.
///
/// Takes everything after the first `:`, then returns the text strictly
/// between the first and the last `"` of that remainder. The returned slice
/// borrows from `fragment`.
///
/// A fragment without a `:`, or without two quotes after it, is a hard
/// failure for the whole row.
///
/// # Example
///
/// ```
/// use dynamodb_serde::extract_literal;
///
/// assert_eq!(extract_literal("int_col", r#"{"n":"1"}"#).unwrap(), "1");
/// ```
pub fn extract_literal<'a>(attribute: &str, fragment: &'a str) -> Result<&'a str> {
    let colon = fragment
        .find(':')
        .ok_or_else(|| malformed(attribute, fragment, "missing ':' separator"))?;
    let remainder = &fragment[colon + 1..];

    let open = remainder.find('"');
    let close = remainder.rfind('"');
    match (open, close) {
        (Some(open), Some(close)) if open < close => Ok(&remainder[open + 1..close]),
        _ => Err(malformed(attribute, fragment, "value is not quoted")),
    }
}

fn malformed(attribute: &str, fragment: &str, reason: &'static str) -> SerDeError {
    SerDeError::MalformedFragment {
        attribute: attribute.to_string(),
        fragment: fragment.to_string(),
        reason,
    }
}
