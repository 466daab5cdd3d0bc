//! Low-level authenticated HTTP executor for the authority API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// User agent for authority requests.
const USER_AGENT_VALUE: &str = concat!("doiman-registry/", env!("CARGO_PKG_VERSION"));

/// Authenticated request executor.
///
/// Performs one HTTP call against the configured base URL with Basic auth,
/// a fixed timeout and the default query parameters merged into every call.
/// Never interprets status codes and never retries; any network or TLS
/// failure surfaces as [`RegistryError::Transport`] and is terminal for
/// that call.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    default_params: Vec<(String, String)>,
}

impl Transport {
    /// Build a transport from client configuration.
    pub fn new(config: &RegistryConfig) -> RegistryResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RegistryError::Transport {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.api_url().trim_end_matches('/').to_string(),
            username: config.repo_id.clone(),
            password: config.password.clone(),
            default_params: Vec::new(),
        })
    }

    /// Add a query parameter sent with every request.
    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.push((key.into(), value.into()));
        self
    }

    /// Full URL for a path relative to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Execute one request.
    ///
    /// `body` strings are transmitted as bytes. The response is returned
    /// whatever its status code; classifying it is the caller's job.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        params: &[(String, String)],
        headers: Option<HeaderMap>,
    ) -> RegistryResult<reqwest::Response> {
        let url = self.url_for(path);
        debug!(method = %method, url = %url, "authority request");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password));

        if !params.is_empty() || !self.default_params.is_empty() {
            let mut merged: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            merged.extend(
                self.default_params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
            request = request.query(&merged);
        }

        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        if let Some(body) = body {
            request = request.body(body.into_bytes());
        }

        request.send().await.map_err(RegistryError::from)
    }
}
