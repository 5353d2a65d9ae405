use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const DEFAULT_API_URL: &str = "https://api.proc.dev";

const CONTENT_TYPE: &str = "application/vnd.proc+cbor";

/// Response format requested from the service. Success bodies are JSON
/// either way; the negotiated type governs how error payloads come back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Accept {
    Json,
    Text,
}

impl Accept {
    fn as_str(&self) -> &'static str {
        match self {
            Accept::Json => "application/json",
            Accept::Text => "text/plain",
        }
    }
}

/// Status code and raw body of one service call. Interpreting the status
/// (200 always succeeds, 424 only for deploys) is the caller's decision.
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The one outgoing request per invocation. Fire-and-forget: no retry, no
/// timeout beyond whatever the transport imposes.
pub struct Client {
    base_url: String,
    authorization: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: impl Into<String>, authorization: impl Into<String>) -> Self {
        Client {
            base_url: base_url.into(),
            authorization: authorization.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn call(&self, path: &str, payload: Vec<u8>, accept: Accept) -> Result<ApiResponse> {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .header("Authorization", format!("bearer {}", self.authorization))
            .header("Content-Type", CONTENT_TYPE)
            .header("Accept", accept.as_str())
            .body(payload)
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("could not read response body")?
            .to_vec();
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_header_values() {
        assert_eq!(Accept::Json.as_str(), "application/json");
        assert_eq!(Accept::Text.as_str(), "text/plain");
    }

    #[test]
    fn body_text_is_lossy_utf8() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: b"\"OOF\"".to_vec(),
        };
        assert_eq!(response.body_text(), "\"OOF\"");
    }
}
