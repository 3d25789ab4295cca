//! Query-string parameter parsing.
//!
//! HTTP query strings are loosely typed: a key may be missing, present once, or
//! repeated. [`RawQuery`] captures the decoded pairs and hands out a
//! [`ParamValue`] per key so the rest of the crate only ever sees one of the
//! three shapes. The parsers below normalize a `ParamValue` into a typed value
//! immediately.
//!
//! Failure policy differs by parser. Numeric filters degrade to their default
//! (a malformed bound collapses to an open range), while the item-type list
//! fails loudly because silently dropping a segment would change the result
//! set without the caller noticing.

use std::num::IntErrorKind;

use crate::error::CoreError;
use crate::types::ItemTypeCode;

/// Error message returned for a malformed `itemTypes` parameter.
pub const INVALID_ITEM_TYPES: &str = "Invalid itemTypes parameter";

// ---------------------------------------------------------------------------
// Boundary types
// ---------------------------------------------------------------------------

/// A single query parameter as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Absent,
    Single(String),
    Multiple(Vec<String>),
}

impl ParamValue {
    /// The first supplied value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            ParamValue::Absent => None,
            ParamValue::Single(value) => Some(value.as_str()),
            ParamValue::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Decoded query-string pairs, preserving order and repeated keys.
#[derive(Debug, Clone, Default)]
pub struct RawQuery {
    pairs: Vec<(String, String)>,
}

impl RawQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Look up `name`, collapsing repeated keys into [`ParamValue::Multiple`].
    pub fn get(&self, name: &str) -> ParamValue {
        let mut values: Vec<String> = self
            .pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect();

        match values.len() {
            0 => ParamValue::Absent,
            1 => ParamValue::Single(values.remove(0)),
            _ => ParamValue::Multiple(values),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// First value, trimmed, or `None` when absent or blank.
fn first_non_blank(raw: &ParamValue) -> Option<&str> {
    raw.first().map(str::trim).filter(|value| !value.is_empty())
}

/// Count of leading ASCII digits in `bytes`.
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Longest prefix of `text` that reads as a decimal floating-point literal:
/// optional sign, digits with an optional fraction, optional exponent.
/// Trailing characters are ignored, so `"12abc"` reads as `"12"`.
fn float_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digit_run(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&text[..end])
}

/// Read the leading integer of `text`, ignoring anything after it.
///
/// Accepts an optional sign and either decimal digits or a `0x`-prefixed
/// hexadecimal run, so `"2.5"` reads as 2 and `"20abc"` as 20. Values
/// beyond the `i64` range saturate.
fn integer_prefix(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (digits, radix) = match unsigned.get(..2) {
        Some("0x" | "0X") => {
            let hex = &unsigned[2..];
            let len = hex.bytes().take_while(u8::is_ascii_hexdigit).count();
            (&hex[..len], 16)
        }
        _ => (&unsigned[..digit_run(unsigned.as_bytes())], 10),
    };

    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.chars().fold(0i64, |acc, c| {
        let digit = i64::from(c.to_digit(radix).unwrap_or(0));
        acc.saturating_mul(i64::from(radix)).saturating_add(digit)
    });

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a floating-point parameter, falling back to `default`.
///
/// Repeated keys use the first value. The leading numeric part is used and
/// trailing text ignored (`"5dps"` is 5). Absent, blank, non-numeric and
/// non-finite inputs all yield `default`; a literal `0` is kept.
pub fn parse_number_param(raw: &ParamValue, default: f64) -> f64 {
    first_non_blank(raw)
        .and_then(float_prefix)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(default)
}

/// Parse an integer parameter (page numbers, page sizes) with the same
/// defaulting rules as [`parse_number_param`]. Only the leading integer is
/// read, so `"2.5"` is page 2.
pub fn parse_integer_param(raw: &ParamValue, default: i64) -> i64 {
    first_non_blank(raw)
        .and_then(integer_prefix)
        .unwrap_or(default)
}

/// `true` only for a single value spelled exactly `true`.
pub fn parse_flag_param(raw: &ParamValue) -> bool {
    matches!(raw, ParamValue::Single(value) if value == "true")
}

/// Free-text parameter; repeated keys use the first value.
pub fn parse_text_param(raw: &ParamValue) -> String {
    raw.first().unwrap_or_default().to_string()
}

/// Parse the comma-separated `itemTypes` list.
///
/// Repeated keys are joined with commas first. Blank segments are ignored,
/// order and duplicates are kept. Any segment that is not a base-10 integer
/// rejects the whole parameter. Integers outside the column's range are
/// accepted (saturated to `i64`) and simply match nothing.
pub fn parse_item_types_param(raw: &ParamValue) -> Result<Vec<ItemTypeCode>, CoreError> {
    let joined = match raw {
        ParamValue::Absent => return Ok(Vec::new()),
        ParamValue::Single(value) => value.clone(),
        ParamValue::Multiple(values) => values.join(","),
    };

    joined
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_item_type_segment)
        .collect()
}

fn parse_item_type_segment(segment: &str) -> Result<ItemTypeCode, CoreError> {
    segment.parse::<ItemTypeCode>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(ItemTypeCode::MAX),
        IntErrorKind::NegOverflow => Ok(ItemTypeCode::MIN),
        _ => Err(CoreError::Validation(INVALID_ITEM_TYPES.to_string())),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- RawQuery ------------------------------------------------------------

    #[test]
    fn raw_query_distinguishes_absent_single_and_multiple() {
        let query: RawQuery = [("a", "1"), ("b", "2"), ("b", "3")].into_iter().collect();

        assert_eq!(query.get("missing"), ParamValue::Absent);
        assert_eq!(query.get("a"), ParamValue::from("1"));
        assert_eq!(query.get("b"), ParamValue::from(vec!["2", "3"]));
    }

    // -- parse_number_param --------------------------------------------------

    #[test]
    fn number_absent_returns_default() {
        assert_eq!(parse_number_param(&ParamValue::Absent, 10.0), 10.0);
    }

    #[test]
    fn number_blank_returns_default() {
        assert_eq!(parse_number_param(&"".into(), 9.0), 9.0);
        assert_eq!(parse_number_param(&"   ".into(), 9.0), 9.0);
    }

    #[test]
    fn number_keeps_zero() {
        assert_eq!(parse_number_param(&"0".into(), 5.0), 0.0);
        assert_eq!(parse_number_param(&"0.0".into(), 5.0), 0.0);
    }

    #[test]
    fn number_uses_first_of_multiple() {
        assert_eq!(parse_number_param(&vec!["15", "20"].into(), 3.0), 15.0);
    }

    #[test]
    fn number_first_of_multiple_blank_returns_default() {
        assert_eq!(parse_number_param(&vec!["", "20"].into(), 3.0), 3.0);
    }

    #[test]
    fn number_invalid_returns_default() {
        assert_eq!(parse_number_param(&"foo".into(), 7.0), 7.0);
        assert_eq!(parse_number_param(&"NaN".into(), 7.0), 7.0);
        assert_eq!(parse_number_param(&"inf".into(), 7.0), 7.0);
    }

    #[test]
    fn number_reads_leading_numeric_part() {
        assert_eq!(parse_number_param(&"12abc".into(), 0.0), 12.0);
        assert_eq!(parse_number_param(&"5dps".into(), 9999.0), 5.0);
        assert_eq!(parse_number_param(&"-3.25x".into(), 0.0), -3.25);
        assert_eq!(parse_number_param(&".5".into(), 0.0), 0.5);
        assert_eq!(parse_number_param(&"7.".into(), 0.0), 7.0);
        assert_eq!(parse_number_param(&"1e2dps".into(), 0.0), 100.0);
        assert_eq!(parse_number_param(&"4e".into(), 0.0), 4.0);
    }

    #[test]
    fn number_without_leading_digits_returns_default() {
        assert_eq!(parse_number_param(&"abc12".into(), 7.0), 7.0);
        assert_eq!(parse_number_param(&".".into(), 7.0), 7.0);
        assert_eq!(parse_number_param(&"-".into(), 7.0), 7.0);
        assert_eq!(parse_number_param(&"Infinity".into(), 7.0), 7.0);
        assert_eq!(parse_number_param(&"1e999".into(), 7.0), 7.0);
    }

    #[test]
    fn number_trims_whitespace() {
        assert_eq!(parse_number_param(&" 42 ".into(), 0.0), 42.0);
        assert_eq!(parse_number_param(&"12.5".into(), 0.0), 12.5);
    }

    // -- parse_integer_param -------------------------------------------------

    #[test]
    fn integer_parses_and_defaults() {
        assert_eq!(parse_integer_param(&"3".into(), 1), 3);
        assert_eq!(parse_integer_param(&"-2".into(), 1), -2);
        assert_eq!(parse_integer_param(&"abc".into(), 1), 1);
        assert_eq!(parse_integer_param(&ParamValue::Absent, 50), 50);
    }

    #[test]
    fn integer_reads_leading_digits() {
        assert_eq!(parse_integer_param(&"2.5".into(), 1), 2);
        assert_eq!(parse_integer_param(&"20abc".into(), 50), 20);
        assert_eq!(parse_integer_param(&"+4".into(), 1), 4);
        assert_eq!(parse_integer_param(&"0x10".into(), 1), 16);
        assert_eq!(parse_integer_param(&".5".into(), 1), 1);
    }

    #[test]
    fn integer_overflow_saturates() {
        assert_eq!(parse_integer_param(&"99999999999999999999".into(), 1), i64::MAX);
        assert_eq!(parse_integer_param(&"-99999999999999999999".into(), 1), -i64::MAX);
    }

    // -- parse_flag_param ----------------------------------------------------

    #[test]
    fn flag_requires_exact_true() {
        assert!(parse_flag_param(&"true".into()));
        assert!(!parse_flag_param(&"TRUE".into()));
        assert!(!parse_flag_param(&"1".into()));
        assert!(!parse_flag_param(&ParamValue::Absent));
        assert!(!parse_flag_param(&vec!["true", "true"].into()));
    }

    // -- parse_text_param ----------------------------------------------------

    #[test]
    fn text_takes_first_value() {
        assert_eq!(parse_text_param(&ParamValue::Absent), "");
        assert_eq!(parse_text_param(&"sword".into()), "sword");
        assert_eq!(parse_text_param(&vec!["axe", "bow"].into()), "axe");
    }

    // -- parse_item_types_param ----------------------------------------------

    #[test]
    fn item_types_absent_is_empty() {
        assert_eq!(parse_item_types_param(&ParamValue::Absent).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn item_types_parses_comma_separated_values() {
        assert_eq!(parse_item_types_param(&"1,2, 3".into()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn item_types_rejects_invalid_segment() {
        assert_matches!(
            parse_item_types_param(&"1,foo,3".into()),
            Err(CoreError::Validation(msg)) if msg == INVALID_ITEM_TYPES
        );
    }

    #[test]
    fn item_types_ignores_blank_segments() {
        assert_eq!(parse_item_types_param(&" , 5 ,, 6 ".into()).unwrap(), vec![5, 6]);
    }

    #[test]
    fn item_types_only_blank_segments_is_empty() {
        assert_eq!(parse_item_types_param(&" , ,".into()).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn item_types_flattens_multiple_values() {
        assert_eq!(parse_item_types_param(&vec!["7", "8"].into()).unwrap(), vec![7, 8]);
    }

    #[test]
    fn item_types_keeps_order_and_duplicates() {
        assert_eq!(parse_item_types_param(&"4,1,4".into()).unwrap(), vec![4, 1, 4]);
    }

    #[test]
    fn item_types_accepts_values_beyond_column_range() {
        assert_eq!(
            parse_item_types_param(&"99999999999,1".into()).unwrap(),
            vec![99_999_999_999, 1]
        );
        assert_eq!(
            parse_item_types_param(&"99999999999999999999999".into()).unwrap(),
            vec![i64::MAX]
        );
    }

    #[test]
    fn item_types_rejects_fractional_values() {
        assert_matches!(
            parse_item_types_param(&"1.5".into()),
            Err(CoreError::Validation(_))
        );
    }
}
