//! Splits one export blob into named attribute literals.
//!
//! A blob is a run of records with no outer envelope:
//!
//! ```text
//! <name> ETX <fragment> (STX | '\n')
//! ```
//!
//! The last record may omit its terminator.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::extraction::extract_literal;

/// Separates an attribute name from its fragment (ETX).
pub const HEADER_TERMINATOR: char = '\u{3}';
/// Ends a record (STX). A line feed ends a record too.
pub const RECORD_TERMINATOR: char = '\u{2}';

/// Attribute name to extracted literal, borrowed from the blob it came from.
///
/// When a name repeats, the later record wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct AttributeMap<'a> {
    attributes: IndexMap<&'a str, &'a str>,
}

impl<'a> AttributeMap<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.attributes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in the order their names first appeared.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.attributes.iter().map(|(k, v)| (*k, *v))
    }

    fn commit(&mut self, name: &'a str, fragment: &'a str) -> Result<()> {
        let literal = extract_literal(name, fragment)?;
        if let Some(previous) = self.attributes.insert(name, literal) {
            tracing::debug!(
                "Attribute '{}' repeated in blob, replacing {:?} with {:?}",
                name,
                previous,
                literal
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Header,
    Value,
}

/// Decompose a blob into its attribute map.
///
/// A blob with no header terminator yields an empty map. Any fragment that
/// fails literal extraction fails the whole blob.
///
/// # Example
///
/// ```
/// use dynamodb_serde::decompose_row;
///
/// let blob = "string_col\u{3}{\"s\":\"string_value\"}\u{2}int_col\u{3}{\"n\":\"1\"}";
/// let attributes = decompose_row(blob).unwrap();
/// assert_eq!(attributes.get("string_col"), Some("string_value"));
/// assert_eq!(attributes.get("int_col"), Some("1"));
/// ```
pub fn decompose_row(blob: &str) -> Result<AttributeMap<'_>> {
    let mut attributes = AttributeMap::default();
    let mut state = ScanState::Header;
    let mut name = "";
    let mut start = 0;

    for (idx, ch) in blob.char_indices() {
        match state {
            ScanState::Header if ch == HEADER_TERMINATOR => {
                name = &blob[start..idx];
                start = idx + ch.len_utf8();
                state = ScanState::Value;
            }
            ScanState::Value if ch == RECORD_TERMINATOR || ch == '\n' => {
                attributes.commit(name, &blob[start..idx])?;
                start = idx + ch.len_utf8();
                state = ScanState::Header;
            }
            _ => {}
        }
    }

    match state {
        ScanState::Value if start < blob.len() => attributes.commit(name, &blob[start..])?,
        ScanState::Header if start < blob.len() => {
            tracing::debug!(
                "Dropping trailing text without header terminator: {:?}",
                &blob[start..]
            );
        }
        _ => {}
    }

    Ok(attributes)
}
