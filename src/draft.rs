//! # Request Draft
//!
//! The mutable accumulator the argument parser fills in. One draft exists
//! per invocation; it is seeded from [`Defaults`], mutated by the parser and
//! consumed by [`Draft::build`](crate::emitter).

use std::collections::BTreeMap;

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::config::{Defaults, DEFAULT_SCHEME, USER_AGENT};
use crate::error::{ReqError, Result};

/// Body encoding requested by `--format` or `REQ_FORMAT`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Nothing requested; behaves like JSON unless files are attached
    #[default]
    Unset,
    Json,
    Form,
}

impl Format {
    /// Parse a `--format` argument
    pub fn from_flag_value(value: &str) -> Result<Self> {
        match value {
            "json" => Ok(Format::Json),
            "form" => Ok(Format::Form),
            other => Err(ReqError::UnknownFormat(other.to_string())),
        }
    }

    /// Parse `REQ_FORMAT`, where an empty value means unset
    pub fn from_env_value(value: &str) -> Result<Self> {
        if value.is_empty() {
            Ok(Format::Unset)
        } else {
            Self::from_flag_value(value)
        }
    }

    /// Whether body values are kept as raw strings instead of read as JSON
    pub fn keeps_raw_strings(self) -> bool {
        matches!(self, Format::Form)
    }
}

/// Multi-valued header map keyed by canonical header name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, Vec<String>>);

impl Headers {
    /// Replace every value of `name` with `value`
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(canonical_name(name), vec![value.into()]);
    }

    /// First value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&canonical_name(name))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every (name, value) pair, names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }
}

/// Canonical header spelling: `content-type` becomes `Content-Type`
pub fn canonical_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// The request being assembled from arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub scheme: String,
    pub host: String,
    pub method: String,
    pub path: Vec<String>,
    pub headers: Headers,
    /// Body fields, last write wins
    pub body: BTreeMap<String, Value>,
    /// Attachments: field name to file path, last write wins
    pub files: BTreeMap<String, String>,
    pub format: Format,
    /// Write the full request and response instead of only the response body
    pub dump: bool,
}

impl Draft {
    /// Fresh draft seeded from environment defaults
    pub fn new(defaults: &Defaults) -> Self {
        let mut headers = Headers::default();
        headers.set("User-Agent", USER_AGENT);
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: defaults.host.clone(),
            method: String::new(),
            path: split_path(&defaults.path),
            headers,
            body: BTreeMap::new(),
            files: BTreeMap::new(),
            format: defaults.format,
            dump: false,
        }
    }

    /// Replace the path prefix with a slash-separated string
    pub fn set_path(&mut self, path: &str) {
        self.path = split_path(path);
    }

    /// Apply a `Name:Value` header argument
    pub fn add_header(&mut self, raw: &str) -> Result<()> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| ReqError::InvalidHeader(raw.to_string()))?;
        let (name, value) = (name.trim(), value.trim());
        if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err()
        {
            return Err(ReqError::InvalidHeader(raw.to_string()));
        }
        self.headers.set(name, value);
        Ok(())
    }

    /// Apply an `--auth` value as the `Authorization` header
    pub fn set_auth(&mut self, value: &str) -> Result<()> {
        if HeaderValue::from_str(value).is_err() {
            return Err(ReqError::InvalidHeader(format!("Authorization:{value}")));
        }
        self.headers.set("Authorization", value);
        Ok(())
    }
}

/// Split a path prefix into segments after trimming surrounding slashes.
///
/// An empty string yields a single empty segment.
pub fn split_path(path: &str) -> Vec<String> {
    path.trim_matches('/').split('/').map(String::from).collect()
}
