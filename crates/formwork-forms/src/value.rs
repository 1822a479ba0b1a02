//! Parsed field values and raw-value coercions.
//!
//! Raw input arrives as [`serde_json::Value`] from every source (query
//! strings, parsed bodies, plain mappings). Each field kind parses it into a
//! [`Value`]. The coercions here follow loose dynamic-typing rules so that a
//! number bound from a query string (`"42"`) and one bound from a JSON body
//! (`42`) parse identically.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as Raw;

/// The typed data of a bound field.
///
/// `Number(f64::NAN)` is the "not a number" sentinel produced for empty or
/// non-numeric numeric input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Data of string-like fields.
    Text(String),
    /// Data of number fields.
    Number(f64),
    /// Data of boolean fields.
    Bool(bool),
    /// Data of array fields; elements are kept raw.
    List(Vec<Raw>),
    /// Data of a nested form, keyed by field name.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Returns the string data, if this is `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric data, if this is `Number`.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean data, if this is `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the list data, if this is `List`.
    pub fn as_list(&self) -> Option<&[Raw]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested form data, if this is `Object`.
    pub const fn as_object(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` for the NaN sentinel.
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_nan())
    }

    /// Coerces the data to a number.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Text(s) => str_to_number(s),
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::List(items) => to_number(&Raw::Array(items.clone())),
            Self::Object(_) => f64::NAN,
        }
    }

    /// Returns the length used by length validators: characters of text,
    /// elements of a list.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Text(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => f.write_str(&join_list(items)),
            Self::Object(_) => f.write_str("[object Object]"),
        }
    }
}

/// Returns the string form of a raw value.
///
/// Arrays join their elements with `,` (null elements become empty),
/// objects render as `[object Object]`.
///
/// # Examples
///
/// ```
/// use formwork_forms::value::to_display_string;
/// use serde_json::json;
///
/// assert_eq!(to_display_string(&json!("abc")), "abc");
/// assert_eq!(to_display_string(&json!(42)), "42");
/// assert_eq!(to_display_string(&json!(1.5)), "1.5");
/// assert_eq!(to_display_string(&json!(["a", null, 3])), "a,,3");
/// ```
pub fn to_display_string(raw: &Raw) -> String {
    match raw {
        Raw::Null => "null".to_string(),
        Raw::Bool(b) => b.to_string(),
        Raw::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        Raw::String(s) => s.clone(),
        Raw::Array(items) => join_list(items),
        Raw::Object(_) => "[object Object]".to_string(),
    }
}

/// Coerces a raw value to a number.
///
/// Strings are trimmed; an all-whitespace string is `0`, numeric literals
/// (decimal, `0x`/`0o`/`0b` prefixed, `Infinity`) parse, anything else is
/// NaN. Booleans are `0`/`1`, null is `0`, and an array coerces through its
/// string form.
pub fn to_number(raw: &Raw) -> f64 {
    match raw {
        Raw::Null => 0.0,
        Raw::Bool(b) => f64::from(u8::from(*b)),
        Raw::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Raw::String(s) => str_to_number(s),
        Raw::Array(items) => str_to_number(&join_list(items)),
        Raw::Object(_) => f64::NAN,
    }
}

/// Returns the truthiness of a raw value.
///
/// Null, `false`, `0`, NaN and `""` are falsy; every array and object is
/// truthy.
pub fn is_truthy(raw: &Raw) -> bool {
    match raw {
        Raw::Null => false,
        Raw::Bool(b) => *b,
        Raw::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Raw::String(s) => !s.is_empty(),
        Raw::Array(_) | Raw::Object(_) => true,
    }
}

/// Returns `true` for input that counts as "not provided": absent, null or
/// the empty string.
pub fn is_empty_input(raw: Option<&Raw>) -> bool {
    match raw {
        None | Some(Raw::Null) => true,
        Some(Raw::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn join_list(items: &[Raw]) -> String {
    items
        .iter()
        .map(|item| match item {
            Raw::Null => String::new(),
            other => to_display_string(other),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        format!("{n}")
    } else {
        // Exponent form with an explicit sign: 1e+21, 1.5e-7
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn str_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| s.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust also accepts "inf" and "nan", which are not numeric literals here
    let body = s.trim_start_matches(['+', '-']);
    if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_string_scalars() {
        assert_eq!(to_display_string(&json!("x")), "x");
        assert_eq!(to_display_string(&json!(true)), "true");
        assert_eq!(to_display_string(&json!(3)), "3");
        assert_eq!(to_display_string(&json!(3.0)), "3");
        assert_eq!(to_display_string(&json!(-0.25)), "-0.25");
        assert_eq!(to_display_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_number_display_switches_to_exponent_form() {
        assert_eq!(Value::Number(0.000_001).to_string(), "0.000001");
        assert_eq!(Value::Number(1e-7).to_string(), "1e-7");
        assert_eq!(Value::Number(-2.5e-8).to_string(), "-2.5e-8");
        assert_eq!(Value::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
        assert_eq!(Value::Number(-1.5e22).to_string(), "-1.5e+22");
        assert_eq!(Value::Number(123.456).to_string(), "123.456");
    }

    #[test]
    fn test_display_string_nested_arrays() {
        assert_eq!(to_display_string(&json!([1, [2, 3]])), "1,2,3");
        assert_eq!(to_display_string(&json!([])), "");
    }

    #[test]
    fn test_to_number_strings() {
        assert!((to_number(&json!("42")) - 42.0).abs() < f64::EPSILON);
        assert!((to_number(&json!(" 1.5 ")) - 1.5).abs() < f64::EPSILON);
        assert!((to_number(&json!("1e3")) - 1000.0).abs() < f64::EPSILON);
        assert!((to_number(&json!("0x1A")) - 26.0).abs() < f64::EPSILON);
        assert!((to_number(&json!(".5")) - 0.5).abs() < f64::EPSILON);
        assert_eq!(to_number(&json!("   ")), 0.0);
        assert_eq!(to_number(&json!("-Infinity")), f64::NEG_INFINITY);
        assert!(to_number(&json!("abc")).is_nan());
        assert!(to_number(&json!("inf")).is_nan());
        assert!(to_number(&json!("NaN")).is_nan());
        assert!(to_number(&json!("12px")).is_nan());
    }

    #[test]
    fn test_to_number_other_types() {
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(false)), 0.0);
        assert_eq!(to_number(&json!([])), 0.0);
        assert_eq!(to_number(&json!(["7"])), 7.0);
        assert!(to_number(&json!(["1", "2"])).is_nan());
        assert!(to_number(&json!({})).is_nan());
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!("on")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_is_empty_input() {
        assert!(is_empty_input(None));
        assert!(is_empty_input(Some(&json!(null))));
        assert!(is_empty_input(Some(&json!(""))));
        assert!(!is_empty_input(Some(&json!(" "))));
        assert!(!is_empty_input(Some(&json!(0))));
        assert!(!is_empty_input(Some(&json!([]))));
    }

    #[test]
    fn test_value_accessors_and_display() {
        assert_eq!(Value::Text("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Number(2.0).to_string(), "2");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert!(Value::Number(f64::NAN).is_nan());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::List(vec![json!("a"), json!("b")]).to_string(), "a,b");
        assert_eq!(Value::Text("héllo".into()).length(), Some(5));
        assert_eq!(Value::Bool(true).length(), None);
    }

    #[test]
    fn test_value_to_number() {
        assert_eq!(Value::Text("10".into()).to_number(), 10.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert!(Value::Text("ten".into()).to_number().is_nan());
    }

    #[test]
    fn test_value_serializes_untagged() {
        let mut nested = IndexMap::new();
        nested.insert("n".to_string(), Value::Number(f64::NAN));
        nested.insert("t".to_string(), Value::Text("x".into()));
        let json = serde_json::to_value(Value::Object(nested)).unwrap();
        assert_eq!(json, json!({"n": null, "t": "x"}));
    }
}
