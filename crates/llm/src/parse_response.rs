//! Structured-output parsing (§4.8): providers don't reliably return bare
//! JSON, so this tries raw JSON, a fenced ```json block, then a balanced
//! brace scan, in that order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\}|\[.*?\])\s*```").unwrap());

pub fn parse_json_response(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return Some(v);
    }
    if let Some(captures) = FENCED_JSON.captures(trimmed) {
        if let Ok(v) = serde_json::from_str::<Value>(&captures[1]) {
            return Some(v);
        }
    }
    if let Some(slice) = balanced_brace_scan(trimmed) {
        if let Ok(v) = serde_json::from_str::<Value>(slice) {
            return Some(v);
        }
    }
    None
}

fn balanced_brace_scan(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let open = text.as_bytes()[start] as char;
    let close = if open == '{' { '}' } else { ']' };
    let mut depth = 0i32;
    for (i, ch) in text[start..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + i + ch.len_utf8()]);
            }
        }
    }
    None
}

/// True when a `jobs` array is present and non-empty, the shape
/// [`crate::error::LlmError`] retry-on-empty logic checks for (§4.8).
pub fn jobs_array_is_empty(value: &Value) -> bool {
    value
        .get("jobs")
        .and_then(Value::as_array)
        .map(|a| a.is_empty())
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_json() {
        let v = parse_json_response(r#"{"jobs": [{"title": "Engineer"}]}"#).unwrap();
        assert!(!jobs_array_is_empty(&v));
    }

    #[test]
    fn parses_fenced_markdown_json() {
        let text = "Here is the result:\n```json\n{\"jobs\": []}\n```\nThanks";
        let v = parse_json_response(text).unwrap();
        assert!(jobs_array_is_empty(&v));
    }

    #[test]
    fn parses_balanced_braces_amid_prose() {
        let text = "Sure, the jobs are: {\"jobs\": [{\"title\": \"QA\"}]} — hope that helps";
        let v = parse_json_response(text).unwrap();
        assert!(!jobs_array_is_empty(&v));
    }
}
