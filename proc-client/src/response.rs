use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Per-item outcome of a deploy response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub enum Status {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "failed")]
    Failed,
    // Anything else the service might send is a decode error, not a variant.
}

/// One entry of a deploy response. Entries are independent; order is the
/// service's response order and is preserved through rendering.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DeployResult {
    pub status: Status,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DeployResult {
    /// `name` if present and non-empty, else the literal placeholder.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "(undefined)",
        }
    }
}

/// How an untyped `output` value renders as text.
///
/// Numbers, strings and booleans print in their natural textual form;
/// everything else (objects, arrays, null, absent) re-encodes to canonical
/// JSON. The same logical value encoded differently over the wire renders
/// differently, and that is load-bearing.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    Scalar(String),
    Structured(Value),
}

impl Output {
    pub fn classify(value: Option<&Value>) -> Output {
        match value {
            Some(Value::String(s)) => Output::Scalar(s.clone()),
            Some(Value::Number(n)) => Output::Scalar(n.to_string()),
            Some(Value::Bool(b)) => Output::Scalar(b.to_string()),
            Some(other) => Output::Structured(other.clone()),
            None => Output::Structured(Value::Null),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Output::Scalar(text) => text.clone(),
            Output::Structured(value) => value.to_string(),
        }
    }
}

/// Decodes a compile/run response body: one opaque JSON value.
pub fn decode_value(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).context("could not decode response body")
}

/// Decodes a deploy response body: an ordered sequence of results.
pub fn decode_deploy(body: &[u8]) -> Result<Vec<DeployResult>> {
    serde_json::from_slice(body).context("could not decode deploy response body")
}
