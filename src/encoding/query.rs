//! URL query-string encoding.
//!
//! Keys are emitted in ascending order so the same parameter map always
//! yields the same percent-encoded string, regardless of how the caller
//! assembled it. Array and boolean rendering are configurable, matching the
//! conventions most HTTP APIs expect.

use reqwest::Url;
use serde_json::Value;

use crate::endpoint::Parameters;

/// How array values are keyed in the query string.
#[derive(Debug, Clone, Copy, Default)]
pub enum ArrayEncoding {
    /// `key=a&key=b`. The default.
    #[default]
    NoBrackets,
    /// `key[]=a&key[]=b`.
    Brackets,
    /// `key[0]=a&key[1]=b`, matching jQuery and Node.js.
    IndexInBrackets,
    /// Caller-provided key derivation from `(key, index)`.
    Custom(fn(&str, usize) -> String),
}

impl ArrayEncoding {
    fn encode_key(&self, key: &str, index: usize) -> String {
        match self {
            Self::NoBrackets => key.to_string(),
            Self::Brackets => format!("{key}[]"),
            Self::IndexInBrackets => format!("{key}[{index}]"),
            Self::Custom(encode) => encode(key, index),
        }
    }
}

/// How boolean values are rendered.
#[derive(Debug, Clone, Copy, Default)]
pub enum BoolEncoding {
    /// `true` / `false`. The default.
    #[default]
    Literal,
    /// `1` / `0`.
    Numeric,
}

impl BoolEncoding {
    fn encode(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Literal, true) => "true",
            (Self::Literal, false) => "false",
            (Self::Numeric, true) => "1",
            (Self::Numeric, false) => "0",
        }
    }
}

/// Percent-encoding query encoder with deterministic key order.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlQueryEncoder {
    pub array_encoding: ArrayEncoding,
    pub bool_encoding: BoolEncoding,
}

impl UrlQueryEncoder {
    pub fn new(array_encoding: ArrayEncoding, bool_encoding: BoolEncoding) -> Self {
        Self {
            array_encoding,
            bool_encoding,
        }
    }

    /// Append `parameters` to the URL's query string, keeping whatever query
    /// the URL already carries.
    pub fn apply(&self, url: &mut Url, parameters: &Parameters) {
        if parameters.is_empty() {
            return;
        }
        let appended = self.query_string(parameters);
        let merged = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{appended}"),
            _ => appended,
        };
        url.set_query(Some(&merged));
    }

    /// Render a parameter map as a percent-encoded query string.
    pub fn query_string(&self, parameters: &Parameters) -> String {
        let mut keys: Vec<&String> = parameters.keys().collect();
        keys.sort();

        let mut components: Vec<(String, String)> = Vec::new();
        for key in keys {
            self.components(key, &parameters[key.as_str()], &mut components);
        }
        components
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn components(&self, key: &str, value: &Value, out: &mut Vec<(String, String)>) {
        match value {
            Value::Object(nested) => {
                for (nested_key, nested_value) in nested {
                    self.components(&format!("{key}[{nested_key}]"), nested_value, out);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.components(&self.array_encoding.encode_key(key, index), item, out);
                }
            }
            Value::Bool(value) => {
                out.push((escape(key), escape(self.bool_encoding.encode(*value))));
            }
            Value::Number(value) => out.push((escape(key), escape(&value.to_string()))),
            Value::String(value) => out.push((escape(key), escape(value))),
            Value::Null => out.push((escape(key), String::new())),
        }
    }
}

fn escape(component: &str) -> String {
    urlencoding::encode(component).into_owned()
}
