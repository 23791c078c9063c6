//! # Token Classifier
//!
//! Decides what the right-hand side of a `key=value` body token means, and
//! turns body values back into plain strings for form, query and multipart
//! encodings.

use serde_json::Value;

/// What a body value literal stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Already a JSON literal or structure, parse as-is
    AlreadyJson(&'a str),
    /// Bare text that becomes a JSON string
    NeedsQuoting(&'a str),
    /// `@path`, with the `@` stripped
    File(&'a str),
    /// Stored verbatim because a non-JSON format was selected
    RawPassthrough(&'a str),
}

/// Classify a value literal.
///
/// `raw_strings` is set when the form format was explicitly selected; values
/// are then kept as plain strings instead of being read as JSON.
pub fn classify(value: &str, raw_strings: bool) -> Classification<'_> {
    if let Some(path) = value.strip_prefix('@') {
        return Classification::File(path);
    }
    if raw_strings {
        return Classification::RawPassthrough(value);
    }
    if value.starts_with(['{', '[', '"']) || is_json_scalar(value) {
        return Classification::AlreadyJson(value);
    }
    if value.chars().any(|c| c.is_alphabetic() || is_punct(c)) {
        Classification::NeedsQuoting(value)
    } else {
        Classification::AlreadyJson(value)
    }
}

impl Classification<'_> {
    /// JSON value for a non-file classification; `None` for `File`.
    pub fn into_value(self) -> Option<Result<Value, serde_json::Error>> {
        match self {
            Classification::AlreadyJson(s) => Some(serde_json::from_str(s)),
            Classification::NeedsQuoting(s) | Classification::RawPassthrough(s) => {
                Some(Ok(Value::String(s.to_string())))
            }
            Classification::File(_) => None,
        }
    }
}

fn is_json_scalar(value: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(value),
        Ok(Value::Null | Value::Bool(_) | Value::Number(_))
    )
}

// ASCII follows the Unicode "P" categories, so `+`, `=` and `$` are not punctuation.
// Outside ASCII any visible non-alphanumeric character counts, symbols included.
fn is_punct(c: char) -> bool {
    if c.is_ascii() {
        matches!(
            c,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '?'
                | '@'
                | '['
                | '\\'
                | ']'
                | '_'
                | '{'
                | '}'
        )
    } else {
        !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control()
    }
}

/// Render a body value the way it travels in a query string, a form body or
/// a multipart field.
///
/// Strings are unquoted, booleans are `true`/`false`, numbers use the
/// shortest representation (exponent form below 1e-4 and from 1e6 up),
/// `null` is `<nil>`, arrays are `[a b]` and objects are `map[k:v]`.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(stringify).collect();
            format!("[{}]", items.join(" "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}:{}", stringify(v)))
                .collect();
            format!("map[{}]", entries.join(" "))
        }
    }
}

fn format_number(f: f64) -> String {
    let sci = format!("{f:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return f.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return f.to_string();
    };
    if (-4..6).contains(&exp) {
        f.to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}
