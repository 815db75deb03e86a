//! Datadog API Client
//!
//! Combines a credential set with the HTTP wrapper and builds v1 endpoint
//! URLs. Authentication rides in the `api_key`/`application_key` query
//! parameters, matching the platform's v1 contract.

use super::http::HttpClient;
use crate::config::Credentials;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Client bound to one account (source or destination).
#[derive(Clone)]
pub struct ApiClient {
    credentials: Credentials,
    http: HttpClient,
}

impl ApiClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        // Validate the host up front so a typo fails before the first call.
        Url::parse(&credentials.api_host)
            .with_context(|| format!("Invalid api_host: {}", credentials.api_host))?;
        let http = HttpClient::new()?;
        Ok(Self { credentials, http })
    }

    /// Build a v1 endpoint URL with the credential query parameters attached.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/{}?api_key={}&application_key={}",
            self.credentials.api_host.trim_end_matches('/'),
            path,
            self.credentials.api_key,
            self.credentials.app_key
        )
    }

    /// GET a v1 endpoint
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.http.get(&self.url(path)).await
    }

    /// POST a v1 endpoint with an optional JSON body
    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.http.post(&self.url(path), body).await
    }

    /// PUT a v1 endpoint with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.http.put(&self.url(path), body).await
    }
}
