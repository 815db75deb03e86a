//! HTTP utilities for Datadog REST API calls

use crate::error::SyncError;
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Query parameters that carry credentials and must never reach the log.
const SECRET_PARAMS: &[&str] = &["api_key", "application_key"];

/// Sanitize response body for logging and error messages.
/// Truncates long responses and drops non-printable characters.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary; a multi-byte character may straddle
        // the cut point.
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Mask credential query parameters before logging a URL.
fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SECRET_PARAMS.contains(&key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect();
    format!("{}?{}", base, masked.join("&"))
}

/// HTTP client wrapper for Datadog API calls.
///
/// No retry, no backoff, no timeout: a transport failure propagates to the
/// caller, an error status becomes [`SyncError::RemoteApi`].
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ddmover/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", redact_url(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::into_json(response).await
    }

    /// Make a POST request with an optional JSON body
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        tracing::debug!("POST {}", redact_url(url));

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context("Failed to send request")?;
        Self::into_json(response).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        tracing::debug!("PUT {}", redact_url(url));

        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            let detail = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, detail);
            return Err(SyncError::RemoteApi {
                status: status.as_u16(),
                detail,
            }
            .into());
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Datadog reports rejection details as an `errors` array in the body, even
/// on some 200 responses. Returns the messages when present and non-empty.
pub fn response_errors(response: &Value) -> Option<Vec<String>> {
    let errors = response.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| match e.as_str() {
                Some(s) => s.to_string(),
                None => e.to_string(),
            })
            .collect(),
    )
}

/// True when the failure is an API rejection rather than a transport fault.
/// The push path reports these per instance and keeps going.
pub fn is_api_rejection(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<SyncError>(), Some(SyncError::RemoteApi { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redact_url_masks_credentials() {
        let url = "https://api.datadoghq.com/api/v1/monitor?api_key=secret&application_key=alsosecret";
        let redacted = redact_url(url);
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("api_key=***"));
        assert!(redacted.contains("application_key=***"));
    }

    #[test]
    fn redact_url_keeps_other_params() {
        let redacted = redact_url("https://host/api/v1/x?page=2&api_key=k");
        assert!(redacted.contains("page=2"));
        assert!(!redacted.contains("api_key=k"));
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
    }

    #[test]
    fn sanitize_truncates_multibyte_bodies_on_char_boundaries() {
        // 100 euro signs = 300 bytes; byte 200 falls inside a character.
        let body = "\u{20ac}".repeat(100);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 300 bytes total"));

        // Mixed ASCII and multi-byte content around the cut point.
        let mixed = format!("{}\u{e9}\u{e9}\u{e9}", "a".repeat(199));
        let sanitized = sanitize_for_log(&mixed);
        assert!(sanitized.contains("truncated"));
    }

    #[test]
    fn response_errors_extracts_messages() {
        let body = json!({"errors": ["The value provided for parameter 'query' is invalid"]});
        let errors = response_errors(&body).expect("errors present");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("invalid"));
    }

    #[test]
    fn response_errors_ignores_clean_bodies() {
        assert!(response_errors(&json!({"id": 1})).is_none());
        assert!(response_errors(&json!({"errors": []})).is_none());
    }
}
