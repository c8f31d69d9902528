//! First-match-wins field probing over loosely shaped JSON payloads.
//!
//! Candidates are JSON pointers (`/author/avatar_thumb/url_list/0`) tried in
//! order; the first one that yields a usable value wins.

use serde_json::Value;

/// Mirrors the truthiness the extraction API's envelope is judged by.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First candidate holding a non-blank string.
pub fn first_str(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|ptr| {
        value
            .pointer(ptr)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// First candidate holding a count, accepting numeric strings as well.
pub fn first_count(value: &Value, candidates: &[&str]) -> Option<u64> {
    candidates
        .iter()
        .find_map(|ptr| value.pointer(ptr).and_then(as_count))
}

/// First candidate holding a string or a number, rendered as text.
pub fn first_text(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|ptr| match value.pointer(ptr)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First candidate holding a non-empty array.
pub fn first_array<'a>(value: &'a Value, candidates: &[&str]) -> Option<&'a Vec<Value>> {
    candidates.iter().find_map(|ptr| {
        value
            .pointer(ptr)
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
    })
}

pub fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// Media entries are either bare URL strings or objects carrying a URL.
pub fn item_url(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => first_str(item, &["/url", "/src", "/download_url", "/url_list/0"]),
        _ => None,
    }
}
