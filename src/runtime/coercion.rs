//! Literal-to-typed-value coercion.
//!
//! Each semantic type has a fallible parse returning `Option`; the coercer
//! maps `None` to [`Value::Null`]. Booleans are the one exception and never
//! produce null from a present literal.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;

use crate::runtime::timestamp_format::TimestampFormat;
use crate::schema::{SemanticType, MAX_DECIMAL_PRECISION};
use crate::value::{CharValue, Value, VarcharValue};

/// Converts extracted literals into the value kind a column declares.
#[derive(Debug, Clone, Default)]
pub struct TypeCoercer {
    timestamp_format: TimestampFormat,
}

impl TypeCoercer {
    pub fn new(timestamp_format: TimestampFormat) -> Self {
        Self { timestamp_format }
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Coerce `literal` to `semantic_type`.
    ///
    /// A missing literal is null for every type. A literal that fails to
    /// parse is null, except for booleans where it reads as `false`.
    pub fn coerce(&self, literal: Option<&str>, semantic_type: SemanticType) -> Value {
        let Some(literal) = literal else {
            return Value::Null;
        };

        let coerced = match semantic_type {
            SemanticType::String => Some(Value::String(literal.to_string())),
            SemanticType::Byte => parse_number(literal).map(Value::Byte),
            SemanticType::Short => parse_number(literal).map(Value::Short),
            SemanticType::Int => parse_number(literal).map(Value::Int),
            SemanticType::Long => parse_number(literal).map(Value::Long),
            SemanticType::Float => parse_number(literal).map(Value::Float),
            SemanticType::Double => parse_number(literal).map(Value::Double),
            SemanticType::Boolean => Some(Value::Boolean(parse_boolean(literal))),
            SemanticType::Timestamp => self.timestamp_format.parse(literal).map(Value::Timestamp),
            SemanticType::Date => parse_date(literal).map(Value::Date),
            SemanticType::Decimal => parse_decimal(literal).map(Value::Decimal),
            SemanticType::Char { length } => Some(Value::Char(CharValue::new(literal, length))),
            SemanticType::Varchar { max_length } => {
                Some(Value::Varchar(VarcharValue::new(literal, max_length)))
            }
        };

        coerced.unwrap_or_else(|| {
            tracing::trace!("Cannot coerce {:?} to {}, using null", literal, semantic_type);
            Value::Null
        })
    }
}

fn parse_number<T: FromStr>(literal: &str) -> Option<T> {
    literal.parse().ok()
}

/// Lenient: anything other than a case-insensitive `true` is `false`.
pub fn parse_boolean(literal: &str) -> bool {
    literal.eq_ignore_ascii_case("true")
}

pub fn parse_date(literal: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(literal, "%Y-%m-%d").ok()
}

/// Parse a decimal literal, normalized and capped at 38 significant digits.
///
/// Excess fractional digits are rounded half-up; a value whose integer part
/// alone needs more than 38 digits is rejected.
pub fn parse_decimal(literal: &str) -> Option<BigDecimal> {
    let decimal = BigDecimal::from_str(literal.trim()).ok()?.normalized();
    let (_, scale) = decimal.as_bigint_and_exponent();
    let digits = decimal.digits() as i64;
    let max = i64::from(MAX_DECIMAL_PRECISION);

    // A negative scale stands for trailing integer zeros.
    let integer_digits = digits - scale;
    if integer_digits > max {
        return None;
    }
    if digits <= max {
        return Some(decimal);
    }

    // Rounding up can carry into a new integer digit.
    let rounded = decimal
        .with_scale_round(max - integer_digits, RoundingMode::HalfUp)
        .normalized();
    let (_, rounded_scale) = rounded.as_bigint_and_exponent();
    (rounded.digits() as i64 - rounded_scale <= max).then_some(rounded)
}
