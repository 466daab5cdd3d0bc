//! Registration client: identifier-oriented operations over the transport.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::history::{HistoryEntry, HistorySink};
use crate::identifier::check_doi;
use crate::transport::Transport;
use crate::types::{DoiAttributes, DoiEvent, DoiRequest, DoiResponse, DoiState};

const JSON_API: &str = "application/vnd.api+json";

/// Stateless façade over [`Transport`] providing DOI operations.
///
/// Every mutating operation (POST/PUT/DELETE) appends exactly one
/// [`HistoryEntry`] to the caller-supplied sink, success or failure, before
/// the result is returned. GET operations are not mutating and append
/// nothing.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    transport: Transport,
    prefix: String,
}

impl RegistryClient {
    /// Create a client from configuration.
    pub fn new(config: &RegistryConfig) -> RegistryResult<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            prefix: config.prefix.clone(),
        })
    }

    /// The configured DOI prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Validate a DOI against the configured prefix and normalize it.
    pub fn check(&self, doi: &str) -> RegistryResult<String> {
        check_doi(doi, &self.prefix)
    }

    /// Query the authority for the current state of a DOI.
    ///
    /// Returns `(state, found)`. Never fails: a missing DOI, any non-200
    /// response, a transport failure or an unparseable body all yield
    /// `(Unset, false)`.
    pub async fn query_state(&self, doi: Option<&str>) -> (DoiState, bool) {
        let Some(doi) = doi else {
            return (DoiState::Unset, false);
        };

        let result = self
            .get(&format!("dois/{doi}"), Some(json_api_headers()))
            .await;
        match result {
            Ok((200, body)) => match parse_response(&body) {
                Ok(response) => {
                    let state = response
                        .data
                        .attributes
                        .state
                        .as_deref()
                        .and_then(|s| s.parse::<DoiState>().ok());
                    match state {
                        Some(state) => (state, true),
                        None => (DoiState::Unset, false),
                    }
                }
                Err(_) => (DoiState::Unset, false),
            },
            Ok((status, _)) => {
                debug!(doi, status, "query_state: no usable record");
                (DoiState::Unset, false)
            }
            Err(e) => {
                warn!(doi, error = %e, "query_state: transport failure");
                (DoiState::Unset, false)
            }
        }
    }

    /// Get the URL the DOI resolves to.
    pub async fn fetch_url(&self, doi: &str) -> RegistryResult<String> {
        let doi = self.check(doi)?;
        let (status, body) = self.get(&format!("dois/{doi}"), None).await?;
        if status != 200 {
            return Err(RegistryError::from_status(status, body));
        }
        let response = parse_response(&body)?;
        response
            .data
            .attributes
            .url
            .ok_or_else(|| RegistryError::InvalidResponse {
                message: "response has no data.attributes.url".to_string(),
            })
    }

    /// Get the metadata attributes registered for a DOI.
    pub async fn fetch_metadata(&self, doi: &str) -> RegistryResult<DoiAttributes> {
        let doi = self.check(doi)?;
        let (status, body) = self
            .get(&format!("dois/{doi}"), Some(json_api_headers()))
            .await?;
        if status != 200 {
            return Err(RegistryError::from_status(status, body));
        }
        Ok(parse_response(&body)?.data.attributes)
    }

    /// Get the media relationships registered for a DOI.
    pub async fn fetch_media(&self, doi: &str) -> RegistryResult<serde_json::Value> {
        let doi = self.check(doi)?;
        let (status, body) = self
            .get(&format!("dois/{doi}"), Some(json_api_headers()))
            .await?;
        if status != 200 {
            return Err(RegistryError::from_status(status, body));
        }
        parse_response(&body)?
            .data
            .relationships
            .ok_or_else(|| RegistryError::InvalidResponse {
                message: "response has no data.relationships".to_string(),
            })
    }

    /// Create a draft DOI (no event; implicit draft state).
    ///
    /// When `doi` is omitted the authority assigns one with a random suffix.
    /// Returns the DOI the authority settled on.
    pub async fn create_draft(
        &self,
        metadata: Option<DoiAttributes>,
        doi: Option<&str>,
        sink: &dyn HistorySink,
    ) -> RegistryResult<String> {
        let mut attrs = metadata.unwrap_or_default();
        if attrs.prefix.is_none() {
            attrs.prefix = Some(self.prefix.clone());
        }
        attrs.event = None;
        if let Some(doi) = doi {
            attrs.doi = Some(self.check(doi)?);
        }
        self.post_doi(&attrs, sink).await
    }

    /// Create a findable DOI in one call (event `publish`).
    pub async fn create_public(
        &self,
        metadata: DoiAttributes,
        url: &str,
        doi: Option<&str>,
        sink: &dyn HistorySink,
    ) -> RegistryResult<String> {
        let mut attrs = metadata;
        attrs.prefix = Some(self.prefix.clone());
        attrs.event = Some(DoiEvent::Publish);
        attrs.url = Some(url.to_string());
        if let Some(doi) = doi {
            attrs.doi = Some(self.check(doi)?);
        }
        self.post_doi(&attrs, sink).await
    }

    /// Create a registered (not findable) DOI in one call (event `register`).
    pub async fn create_private(
        &self,
        metadata: DoiAttributes,
        url: &str,
        doi: Option<&str>,
        sink: &dyn HistorySink,
    ) -> RegistryResult<String> {
        let mut attrs = metadata;
        attrs.prefix = Some(self.prefix.clone());
        attrs.event = Some(DoiEvent::Register);
        attrs.url = Some(url.to_string());
        if let Some(doi) = doi {
            attrs.doi = Some(self.check(doi)?);
        }
        self.post_doi(&attrs, sink).await
    }

    /// Update metadata and/or target URL for an existing DOI.
    pub async fn update(
        &self,
        doi: &str,
        metadata: Option<DoiAttributes>,
        url: Option<&str>,
        sink: &dyn HistorySink,
    ) -> RegistryResult<DoiAttributes> {
        let doi = self.check(doi)?;
        let mut attrs = metadata.unwrap_or_default();
        attrs.doi = Some(doi.clone());
        if let Some(url) = url {
            attrs.url = Some(url.to_string());
        }
        self.put_doi(&doi, &attrs, sink).await
    }

    /// Transition a DOI with an explicit event, resubmitting metadata.
    pub async fn change_state(
        &self,
        doi: &str,
        event: DoiEvent,
        metadata: DoiAttributes,
        sink: &dyn HistorySink,
    ) -> RegistryResult<DoiAttributes> {
        let doi = self.check(doi)?;
        let mut attrs = metadata;
        attrs.event = Some(event);
        self.put_doi(&doi, &attrs, sink).await
    }

    /// Hide a findable DOI (event `hide`, target state registered).
    pub async fn hide(&self, doi: &str, sink: &dyn HistorySink) -> RegistryResult<DoiAttributes> {
        let doi = self.check(doi)?;
        let attrs = DoiAttributes {
            doi: Some(doi.clone()),
            event: Some(DoiEvent::Hide),
            ..Default::default()
        };
        self.put_doi(&doi, &attrs, sink).await
    }

    /// Re-publish a hidden DOI (event `publish`).
    pub async fn show(&self, doi: &str, sink: &dyn HistorySink) -> RegistryResult<DoiAttributes> {
        let doi = self.check(doi)?;
        let attrs = DoiAttributes {
            doi: Some(doi.clone()),
            event: Some(DoiEvent::Publish),
            ..Default::default()
        };
        self.put_doi(&doi, &attrs, sink).await
    }

    /// Delete a DOI. Only legal for drafts; the authority enforces this.
    pub async fn delete(&self, doi: &str, sink: &dyn HistorySink) -> RegistryResult<()> {
        let doi = self.check(doi)?;
        let (status, body) = self
            .mutate(Method::DELETE, &format!("dois/{doi}"), None, None, sink)
            .await?;
        if status != 204 {
            return Err(RegistryError::from_status(status, body));
        }
        Ok(())
    }

    /// POST a registration payload; expects 201 and returns `data.id`.
    async fn post_doi(
        &self,
        attrs: &DoiAttributes,
        sink: &dyn HistorySink,
    ) -> RegistryResult<String> {
        let body = serde_json::to_string(&DoiRequest::new(attrs)).map_err(|e| {
            RegistryError::InvalidResponse {
                message: format!("failed to serialize payload: {e}"),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let (status, response_body) = self
            .mutate(Method::POST, "dois", Some(body), Some(headers), sink)
            .await?;
        if status != 201 {
            return Err(RegistryError::from_status(status, response_body));
        }
        parse_response(&response_body)?
            .data
            .id
            .ok_or_else(|| RegistryError::InvalidResponse {
                message: "created response has no data.id".to_string(),
            })
    }

    /// PUT a payload for an existing DOI; expects 200 and returns attributes.
    async fn put_doi(
        &self,
        doi: &str,
        attrs: &DoiAttributes,
        sink: &dyn HistorySink,
    ) -> RegistryResult<DoiAttributes> {
        let body = serde_json::to_string(&DoiRequest::new(attrs)).map_err(|e| {
            RegistryError::InvalidResponse {
                message: format!("failed to serialize payload: {e}"),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));

        let (status, response_body) = self
            .mutate(
                Method::PUT,
                &format!("dois/{doi}"),
                Some(body),
                Some(headers),
                sink,
            )
            .await?;
        if status != 200 {
            return Err(RegistryError::from_status(status, response_body));
        }
        Ok(parse_response(&response_body)?.data.attributes)
    }

    /// Non-mutating GET. Excluded from the audit trail.
    async fn get(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> RegistryResult<(u16, String)> {
        let response = self
            .transport
            .request(Method::GET, path, None, &[], headers)
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(RegistryError::from)?;
        Ok((status, body))
    }

    /// Mutating call wrapper: one history entry, win or lose.
    ///
    /// On a transport failure the entry carries the error and the failure
    /// is re-raised; on a response (any status) the entry carries status
    /// and body. Status classification is left to the caller.
    async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: Option<HeaderMap>,
        sink: &dyn HistorySink,
    ) -> RegistryResult<(u16, String)> {
        let url = self.transport.url_for(path);
        let method_name = method.to_string();

        let result = self
            .transport
            .request(method, path, body.clone(), &[], headers)
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                sink.append(HistoryEntry::failure(
                    &method_name,
                    &url,
                    body.as_deref(),
                    &e.to_string(),
                ));
                return Err(e);
            }
        };

        let status = response.status().as_u16();
        let response_body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let e = RegistryError::from(e);
                sink.append(HistoryEntry::failure(
                    &method_name,
                    &url,
                    body.as_deref(),
                    &e.to_string(),
                ));
                return Err(e);
            }
        };

        sink.append(HistoryEntry::response(
            &method_name,
            &url,
            body.as_deref(),
            status,
            &response_body,
        ));
        Ok((status, response_body))
    }
}

fn json_api_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));
    headers
}

fn parse_response(body: &str) -> RegistryResult<DoiResponse> {
    serde_json::from_str(body).map_err(|e| RegistryError::InvalidResponse {
        message: format!("failed to parse authority response: {e}"),
    })
}
