//! Nested query-string codec.
//!
//! [`parse`] turns `a=1&b[c]=2&d[]=3&d[]=4` into the JSON object
//! `{"a": "1", "b": {"c": "2"}, "d": ["3", "4"]}`; [`stringify`] is the
//! inverse, writing nested objects with bracket keys and arrays with
//! explicit indices. Forms bind from the resulting
//! [`serde_json::Map`], so GET query strings and normalized POST bodies end
//! up in the same shape.
//!
//! Rules applied by [`parse`]:
//!
//! - `+` decodes to a space, then percent sequences are decoded.
//! - A key repeated without brackets collects its values into an array.
//! - `[]` appends to an array; `[n]` with `n <= 20` addresses an array slot.
//!   Larger indices are treated as object keys.
//! - At most 5 levels of brackets are split; anything deeper is kept as one
//!   literal key segment.
//! - At most 1000 pairs are read.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

/// Maximum bracket depth split into nested objects.
pub const DEPTH_LIMIT: usize = 5;

/// Largest array index honored as an array slot.
pub const ARRAY_LIMIT: usize = 20;

/// Maximum number of `key=value` pairs read from one string.
pub const PARAMETER_LIMIT: usize = 1000;

/// Characters left unescaped by [`stringify`] (RFC 3986 unreserved set).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Parses a query string into a nested JSON object.
///
/// # Examples
///
/// ```
/// use formwork_http::qs;
/// use serde_json::json;
///
/// let parsed = qs::parse("user[name]=Ada&tags[]=a&tags[]=b");
/// assert_eq!(
///     serde_json::Value::Object(parsed),
///     json!({"user": {"name": "Ada"}, "tags": ["a", "b"]})
/// );
/// ```
pub fn parse(query_string: &str) -> Map<String, Value> {
    let mut root = Value::Object(Map::new());
    for (key, value) in parse_pairs(query_string) {
        let segments = split_key(&key);
        insert(&mut root, &segments, value);
    }
    match root {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Parses a query string without nesting.
///
/// Keys are kept verbatim (brackets included); a repeated key collects its
/// values into an array. This is the shape an url-encoded body parser
/// produces before normalization through [`parse`]`(`[`stringify`]`(..))`.
pub fn parse_flat(query_string: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in parse_pairs(query_string) {
        append_value(&mut map, key, value);
    }
    map
}

/// Appends `value` under `key`, turning a repeated key into an array.
pub fn append_value(map: &mut Map<String, Value>, key: String, value: String) {
    match map.get_mut(&key) {
        Some(slot) => merge_leaf(slot, value),
        None => {
            map.insert(key, Value::String(value));
        }
    }
}

/// Decodes a query string into `(key, value)` pairs.
///
/// Empty pairs are skipped and a pair without `=` has an empty value.
pub fn parse_pairs(query_string: &str) -> Vec<(String, String)> {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
    query_string
        .split('&')
        .filter(|pair| !pair.is_empty())
        .take(PARAMETER_LIMIT)
        .map(|pair| {
            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

/// Serializes a JSON object into a query string.
///
/// Nested objects become `parent[child]` keys and arrays become
/// `parent[0]`, `parent[1]`, ... An array under a key that already ends in
/// `[]` (as flat body fields do) repeats that key for each element instead.
/// Keys and values are percent-encoded (brackets included). `null` encodes
/// as an empty value; empty arrays and objects produce nothing.
///
/// # Examples
///
/// ```
/// use formwork_http::qs;
/// use serde_json::json;
///
/// let data = json!({"a": "1", "b": {"c": "x y"}});
/// let encoded = qs::stringify(data.as_object().unwrap());
/// assert_eq!(encoded, "a=1&b%5Bc%5D=x%20y");
/// ```
pub fn stringify(map: &Map<String, Value>) -> String {
    let mut parts = Vec::new();
    for (key, value) in map {
        encode_value(key, value, &mut parts);
    }
    parts.join("&")
}

fn encode_value(prefix: &str, value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                encode_value(&format!("{prefix}[{key}]"), child, parts);
            }
        }
        Value::Array(items) if prefix.ends_with("[]") => {
            for child in items {
                encode_value(prefix, child, parts);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                encode_value(&format!("{prefix}[{index}]"), child, parts);
            }
        }
        Value::Null => parts.push(format!("{}=", percent_encode(prefix))),
        Value::String(s) => parts.push(format!("{}={}", percent_encode(prefix), percent_encode(s))),
        Value::Bool(_) | Value::Number(_) => parts.push(format!(
            "{}={}",
            percent_encode(prefix),
            percent_encode(&value.to_string())
        )),
    }
}

/// Splits `a[b][c]` into `["a", "b", "c"]`, honoring [`DEPTH_LIMIT`].
fn split_key(key: &str) -> Vec<String> {
    let Some(open) = key.find('[').filter(|&pos| pos > 0) else {
        return vec![key.to_string()];
    };

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while segments.len() <= DEPTH_LIMIT {
        let Some(inner) = rest.strip_prefix('[') else {
            break;
        };
        let Some(close) = inner.find(']') else {
            break;
        };
        segments.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }

    if segments.len() == 1 {
        // Unbalanced brackets: keep the key as written.
        return vec![key.to_string()];
    }
    if !rest.is_empty() {
        segments.push(rest.to_string());
    }
    segments
}

fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok().filter(|&index| index <= ARRAY_LIMIT)
}

fn insert(slot: &mut Value, segments: &[String], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        merge_leaf(slot, value);
        return;
    };

    if head.is_empty() || array_index(head).is_some() {
        if let Value::Object(map) = slot {
            let key = if head.is_empty() {
                map.len().to_string()
            } else {
                head.clone()
            };
            insert(map.entry(key).or_insert(Value::Null), rest, value);
            return;
        }

        if !slot.is_array() {
            *slot = Value::Array(match slot.take() {
                Value::Null => Vec::new(),
                previous => vec![previous],
            });
        }
        if let Value::Array(items) = slot {
            match array_index(head).filter(|&index| index < items.len()) {
                Some(index) => insert(&mut items[index], rest, value),
                None => {
                    let mut child = Value::Null;
                    insert(&mut child, rest, value);
                    items.push(child);
                }
            }
        }
        return;
    }

    if !slot.is_object() {
        *slot = Value::Object(match slot.take() {
            Value::Null => Map::new(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            previous => std::iter::once(("0".to_string(), previous)).collect(),
        });
    }
    if let Value::Object(map) = slot {
        insert(map.entry(head.clone()).or_insert(Value::Null), rest, value);
    }
}

fn merge_leaf(slot: &mut Value, value: String) {
    *slot = match slot.take() {
        Value::Null => Value::String(value),
        Value::Array(mut items) => {
            items.push(Value::String(value));
            Value::Array(items)
        }
        previous => Value::Array(vec![previous, Value::String(value)]),
    };
}

/// Decodes a percent-encoded string.
fn percent_decode(input: &str) -> String {
    // Replace + with space (form encoding), then decode percent sequences
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a URL query.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}
