use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use toolflow_core::{Tool, ToolError};

const BODY_PREVIEW_LIMIT: usize = 512;

/// Fetches `url` and returns `{ "status": .., "body": .. }`.
///
/// A JSON response body is returned as JSON, anything else as a string.
/// Non-2xx responses fail the invocation.
pub struct HttpGetTool {
    http: reqwest::Client,
    timeout_ms: u64,
}

impl HttpGetTool {
    pub fn new(timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("build http client")?;
        Ok(Self { http, timeout_ms })
    }

    fn request_error(&self, err: reqwest::Error, url: &str) -> ToolError {
        if err.is_timeout() {
            ToolError::Timeout(self.timeout_ms)
        } else {
            ToolError::execution(format!("GET {url} failed: {err}"))
        }
    }
}

#[async_trait]
impl Tool for HttpGetTool {
    fn name(&self) -> &str {
        "http_get"
    }

    fn description(&self) -> &str {
        "Fetch a URL with HTTP GET"
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let url = arguments
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("'url' must be a string".into()))?;

        tracing::debug!(url, "http_get");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| self.request_error(err, url))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| self.request_error(err, url))?;

        if !status.is_success() {
            return Err(ToolError::execution(format!(
                "GET {url} returned HTTP {}: {}",
                status.as_u16(),
                preview_body(&body)
            )));
        }

        let body = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
        Ok(json!({ "status": status.as_u16(), "body": body }))
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}
