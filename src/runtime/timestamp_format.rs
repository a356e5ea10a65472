//! Timestamp parsing for `input.timestamp.format`.
//!
//! Patterns use the Joda/Java letter conventions Hive users write
//! (`yyyy-MM-dd'T'HH:mm:ss.SSS`) and are compiled once into a chrono format.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{NaiveDateTime, Timelike};

use crate::error::{Result, SerDeError};

/// Canonical layout used when no pattern is configured:
/// `YYYY-MM-DD HH:MM:SS[.fraction]`.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// How literals of timestamp columns are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    #[default]
    Canonical,
    Pattern(CompiledPattern),
}

/// A user pattern translated to chrono's strftime syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source: String,
    chrono_format: String,
    fields: PatternFields,
}

/// Which time-of-day and zone fields a pattern carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PatternFields {
    hour: bool,
    half_day_hour: bool,
    am_pm: bool,
    minute: bool,
    second: bool,
    offset: bool,
}

impl TimestampFormat {
    /// Compile a Joda-style pattern.
    ///
    /// # Errors
    /// Unknown pattern letters, unterminated quotes, and fraction-of-second
    /// fields not preceded by a literal `.` are rejected.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let compiled = compile(pattern)?;
        tracing::warn!("Setting timestamp format to: {}", pattern);
        Ok(TimestampFormat::Pattern(compiled))
    }

    /// The pattern as configured, or `None` for the canonical layout.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            TimestampFormat::Canonical => None,
            TimestampFormat::Pattern(p) => Some(&p.source),
        }
    }

    /// Parse a literal into a timestamp, `None` when it does not match.
    pub fn parse(&self, literal: &str) -> Option<NaiveDateTime> {
        match self {
            TimestampFormat::Canonical => {
                NaiveDateTime::parse_from_str(literal.trim(), CANONICAL_TIMESTAMP_FORMAT).ok()
            }
            TimestampFormat::Pattern(p) => p.parse(literal),
        }
    }
}

impl CompiledPattern {
    pub fn chrono_format(&self) -> &str {
        &self.chrono_format
    }

    fn parse(&self, literal: &str) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, literal, StrftimeItems::new(&self.chrono_format)).ok()?;
        self.default_missing_time(&mut parsed).ok()?;

        let resolved = if self.fields.offset {
            parsed.to_datetime().ok()?.naive_utc()
        } else {
            parsed
                .to_naive_date()
                .ok()?
                .and_time(parsed.to_naive_time().ok()?)
        };
        // Configured patterns resolve to millisecond instants.
        resolved.with_nanosecond(resolved.nanosecond() / 1_000_000 * 1_000_000)
    }

    /// Time fields the pattern leaves out resolve to midnight.
    fn default_missing_time(&self, parsed: &mut Parsed) -> format::ParseResult<()> {
        let fields = self.fields;
        if !fields.hour {
            if fields.am_pm {
                parsed.set_hour12(12)?;
            } else {
                parsed.set_hour(0)?;
            }
        } else if fields.half_day_hour && !fields.am_pm {
            parsed.set_ampm(false)?;
        }
        if !fields.minute {
            parsed.set_minute(0)?;
        }
        if !fields.second {
            parsed.set_second(0)?;
        }
        Ok(())
    }
}

fn compile(pattern: &str) -> Result<CompiledPattern> {
    let invalid = |reason: String| SerDeError::InvalidTimestampFormat {
        pattern: pattern.to_string(),
        reason,
    };

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut fields = PatternFields::default();
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some(quoted) = chars.next() {
                if quoted == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        out.push('\'');
                        continue;
                    }
                    closed = true;
                    break;
                }
                push_literal(&mut out, quoted);
            }
            if !closed {
                return Err(invalid("unterminated quoted literal".to_string()));
            }
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            continue;
        }

        let mut count = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            count += 1;
        }

        let spec = match (ch, count) {
            ('y' | 'u', 2) => "%y",
            ('y' | 'u', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('D', _) => "%j",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('a', _) => "%p",
            ('Z', 1) => "%z",
            ('Z', 2) => "%:z",
            ('S', n) => {
                if !out.ends_with('.') {
                    return Err(invalid(
                        "fraction of second must follow a literal '.'".to_string(),
                    ));
                }
                match n {
                    3 => "%3f",
                    6 => "%6f",
                    9 => "%9f",
                    _ => {
                        out.pop();
                        "%.f"
                    }
                }
            }
            (other, n) => {
                return Err(invalid(format!(
                    "unsupported pattern field '{}'",
                    other.to_string().repeat(n)
                )))
            }
        };

        match ch {
            'H' => fields.hour = true,
            'h' => {
                fields.hour = true;
                fields.half_day_hour = true;
            }
            'a' => fields.am_pm = true,
            'm' => fields.minute = true,
            's' => fields.second = true,
            'Z' => fields.offset = true,
            _ => {}
        }
        out.push_str(spec);
    }

    Ok(CompiledPattern {
        source: pattern.to_string(),
        chrono_format: out,
        fields,
    })
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, nano: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_nano_opt(h, mi, s, nano)
            .unwrap()
    }

    #[test]
    fn test_compile_iso_pattern() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd'T'HH:mm:ss.SSS").unwrap();
        match &format {
            TimestampFormat::Pattern(p) => assert_eq!(p.chrono_format(), "%Y-%m-%dT%H:%M:%S.%3f"),
            TimestampFormat::Canonical => panic!("expected compiled pattern"),
        }
        assert_eq!(format.pattern(), Some("yyyy-MM-dd'T'HH:mm:ss.SSS"));
    }

    #[test]
    fn test_compile_quotes_and_percent() {
        let compiled = compile("yyyy''MM'%at'dd").unwrap();
        assert_eq!(compiled.chrono_format(), "%Y'%m%%at%d");
    }

    #[test]
    fn test_compile_rejects_bad_patterns() {
        assert!(TimestampFormat::from_pattern("yyyy-MM-dd'T").is_err());
        assert!(TimestampFormat::from_pattern("yyyy-MM-dd HH:mm:ssSSS").is_err());
        assert!(TimestampFormat::from_pattern("yyyy-MM-dd zzz").is_err());
        assert!(TimestampFormat::from_pattern("GG yyyy").is_err());
    }

    #[test]
    fn test_canonical_parse() {
        let format = TimestampFormat::Canonical;
        assert_eq!(
            format.parse("2015-05-28 23:59:59.9999"),
            Some(ts(2015, 5, 28, 23, 59, 59, 999_900_000))
        );
        assert_eq!(
            format.parse("2015-05-28 23:59:59"),
            Some(ts(2015, 5, 28, 23, 59, 59, 0))
        );
        assert_eq!(format.parse("2015-05-28"), None);
        assert_eq!(format.parse("2015-05-28T23:59:59"), None);
        assert_eq!(format.parse("yesterday"), None);
    }

    #[test]
    fn test_pattern_parse_truncates_to_millis() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd'T'HH:mm:ss.SSSSSS").unwrap();
        assert_eq!(
            format.parse("2015-06-28T18:10:29.123456"),
            Some(ts(2015, 6, 28, 18, 10, 29, 123_000_000))
        );
    }

    #[test]
    fn test_pattern_mismatch_is_none() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd'T'HH:mm:ss.SSS").unwrap();
        assert_eq!(format.parse("2015-05-28 23:59:59.9999"), None);
    }

    #[test]
    fn test_date_only_pattern_defaults_to_midnight() {
        let format = TimestampFormat::from_pattern("dd/MM/yyyy").unwrap();
        assert_eq!(format.parse("28/05/2015"), Some(ts(2015, 5, 28, 0, 0, 0, 0)));
    }

    #[test]
    fn test_hour_only_pattern_defaults_minutes_and_seconds() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd HH").unwrap();
        assert_eq!(format.parse("2015-05-28 08"), Some(ts(2015, 5, 28, 8, 0, 0, 0)));
    }

    #[test]
    fn test_half_day_hour_without_marker_is_morning() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd hh:mm").unwrap();
        assert_eq!(format.parse("2015-05-28 12:30"), Some(ts(2015, 5, 28, 0, 30, 0, 0)));

        let format = TimestampFormat::from_pattern("yyyy-MM-dd hh:mm a").unwrap();
        assert_eq!(format.parse("2015-05-28 12:30 PM"), Some(ts(2015, 5, 28, 12, 30, 0, 0)));
    }

    #[test]
    fn test_fixed_width_fraction_is_required() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd'T'HH:mm:ss.SSS").unwrap();
        assert_eq!(format.parse("2015-05-28T23:59:59"), None);
        assert_eq!(format.parse("2015-05-28T23:59:59.12"), None);
        assert_eq!(
            format.parse("2015-05-28T23:59:59.123"),
            Some(ts(2015, 5, 28, 23, 59, 59, 123_000_000))
        );
    }

    #[test]
    fn test_offset_pattern_converts_to_utc() {
        let format = TimestampFormat::from_pattern("yyyy-MM-dd HH:mm:ss Z").unwrap();
        assert_eq!(
            format.parse("2015-05-28 23:00:00 +0200"),
            Some(ts(2015, 5, 28, 21, 0, 0, 0))
        );
    }
}
