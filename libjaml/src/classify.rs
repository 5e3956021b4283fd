//! Phase 5: Scalar classifier
//!
//! Renders each leaf element as J scalar text under the tag, literal,
//! bool, null, number, and date policies. Classification order is part of
//! the contract: integer before float before date, so `2024-01-01` is not
//! mistaken for arithmetic, and date before the string fallback.

use crate::element::{Element, Tag};
use crate::error::{ParseError, Result};
use base64::prelude::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

/// A rendered scalar: J text, or decoded bytes for `!!binary`.
pub(crate) enum Rendered {
    Text(String),
    Bytes(Vec<u8>),
}

/// Classify one leaf element and render its J value.
pub(crate) fn classify(el: &Element, yes_no_bool: bool) -> Result<Rendered> {
    let line = el.line;
    let v = el.value.as_str();

    if el.tag == Tag::Binary {
        let clean: String = v.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64_STANDARD
            .decode(clean.as_bytes())
            .map_err(|_| ParseError::InvalidValueForTag(Tag::Binary.to_string(), line))?;
        return Ok(Rendered::Bytes(bytes));
    }
    if el.tag == Tag::Str || matches!(el.tag, Tag::Local(_)) {
        return Ok(Rendered::Text(quoted(v)));
    }
    if el.literal {
        // Quoted scalars skip all non-string classification, so no other
        // tag can be satisfied.
        if el.tag != Tag::None {
            return Err(ParseError::InvalidValueForTag(el.tag.to_string(), line));
        }
        return Ok(Rendered::Text(quoted(v)));
    }

    if v.is_empty() || v.eq_ignore_ascii_case("null") {
        return match el.tag {
            Tag::Map => Ok(Rendered::Text("{}".to_string())),
            Tag::Seq => Ok(Rendered::Text("[]".to_string())),
            Tag::None | Tag::Null => Ok(Rendered::Text("null".to_string())),
            ref tag => Err(ParseError::InvalidValueForTag(tag.to_string(), line)),
        };
    }

    if v == "true" || v == "false" || (yes_no_bool && (v == "yes" || v == "no")) {
        let text = (v == "true" || v == "yes").to_string();
        return match el.tag {
            Tag::None | Tag::Bool => Ok(Rendered::Text(text)),
            ref tag => Err(ParseError::InvalidValueForTag(tag.to_string(), line)),
        };
    }

    if let Ok(n) = v.parse::<i64>() {
        return match el.tag {
            Tag::None | Tag::Int => Ok(Rendered::Text(n.to_string())),
            // An integer parse satisfies !!float.
            Tag::Float => Ok(Rendered::Text(format_float(n as f64))),
            ref tag => Err(ParseError::InvalidValueForTag(tag.to_string(), line)),
        };
    }

    if let Some(f) = parse_float(v) {
        return match el.tag {
            Tag::None | Tag::Float => Ok(Rendered::Text(format_float(f))),
            ref tag => Err(ParseError::InvalidValueForTag(tag.to_string(), line)),
        };
    }

    if let Some(dt) = parse_timestamp(v) {
        return match el.tag {
            Tag::None | Tag::Timestamp => Ok(Rendered::Text(format!(
                "\"{}\"",
                dt.to_rfc3339_opts(SecondsFormat::Secs, true)
            ))),
            ref tag => Err(ParseError::InvalidValueForTag(tag.to_string(), line)),
        };
    }

    match el.tag {
        Tag::None => Ok(Rendered::Text(quoted(v))),
        ref tag => Err(ParseError::InvalidValueForTag(tag.to_string(), line)),
    }
}

fn quoted(v: &str) -> String {
    format!("\"{}\"", v)
}

/// Render a float in U.S. formatting. The `{:?}` form keeps a `.0` on
/// whole values, so a float never reparses as an integer.
fn format_float(f: f64) -> String {
    format!("{:?}", f)
}

/// Parse a double with `.` decimal separator and `,` thousands grouping.
/// Shape-checked first so `inf`/`nan` spellings stay strings.
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    let clean = s.replace(',', "");
    if !is_float_shaped(&clean) {
        return None;
    }
    clean.parse::<f64>().ok()
}

/// Check the float pattern: -?\d+(\.\d*)?([eE][+-]?\d+)? or -?\.\d+ ...
fn is_float_shaped(s: &str) -> bool {
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    if s.is_empty() {
        return false;
    }
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if exp.is_empty() || !exp.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    let mut digits = 0;
    let mut dots = 0;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Parse an ISO-8601 / RFC-3339 date or date-time, normalized to UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let b = s.as_bytes();
    if b.len() < 8 || !b[..4].iter().all(|c| c.is_ascii_digit()) || b[4] != b'-' {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &str) -> Element {
        Element {
            value: value.to_string(),
            line: 1,
            ..Element::default()
        }
    }

    fn text(el: &Element) -> String {
        match classify(el, false).unwrap() {
            Rendered::Text(t) => t,
            Rendered::Bytes(_) => panic!("expected text"),
        }
    }

    #[test]
    fn test_null_and_bool() {
        assert_eq!(text(&plain("null")), "null");
        assert_eq!(text(&plain("NULL")), "null");
        assert_eq!(text(&plain("true")), "true");
        assert_eq!(text(&plain("false")), "false");
        // yes/no stay strings unless the option is on
        assert_eq!(text(&plain("yes")), "\"yes\"");
        match classify(&plain("yes"), true).unwrap() {
            Rendered::Text(t) => assert_eq!(t, "true"),
            _ => panic!(),
        }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(text(&plain("42")), "42");
        assert_eq!(text(&plain("-7")), "-7");
        assert_eq!(text(&plain("1.5e2")), "150.0");
        assert_eq!(text(&plain("1,000.5")), "1000.5");
        // inf/nan spellings are strings
        assert_eq!(text(&plain("inf")), "\"inf\"");
        assert_eq!(text(&plain("nan")), "\"nan\"");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(text(&plain("2024-01-01")), "\"2024-01-01T00:00:00Z\"");
        assert_eq!(
            text(&plain("2024-06-05T12:30:00+02:00")),
            "\"2024-06-05T10:30:00Z\""
        );
    }

    #[test]
    fn test_literal_bypasses_classification() {
        let mut el = plain("42");
        el.literal = true;
        assert_eq!(text(&el), "\"42\"");
    }

    #[test]
    fn test_tag_mismatch() {
        let mut el = plain("12");
        el.literal = true;
        el.tag = Tag::Int;
        assert!(matches!(
            classify(&el, false),
            Err(ParseError::InvalidValueForTag(_, 1))
        ));
    }

    #[test]
    fn test_float_tag_accepts_integer() {
        let mut el = plain("2");
        el.tag = Tag::Float;
        assert_eq!(text(&el), "2.0");
    }

    #[test]
    fn test_binary() {
        let mut el = plain("SGVsbG8=");
        el.tag = Tag::Binary;
        match classify(&el, false).unwrap() {
            Rendered::Bytes(b) => assert_eq!(b, vec![72, 101, 108, 108, 111]),
            _ => panic!("expected bytes"),
        }
    }
}
