//! Best-effort citation snippet lookup.
//!
//! The bibliography service sits behind the resolver base URL and only
//! returns data against the production environment. Failures of any kind
//! yield an empty string; a missing snippet must never fail a transition.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use tracing::{debug, warn};

const BIBLIOGRAPHY_MIME: &str = "text/x-bibliography";
const CITATION_STYLE: &str = "apa";
const CITATION_TIMEOUT_SECS: u64 = 15;

/// Fetch an APA-style citation snippet for a DOI.
///
/// GET `{doi_base_url}{doi}` with `Accept: text/x-bibliography` and
/// `style: apa`. Returns `""` on any failure.
pub async fn fetch_citation_snippet(doi_base_url: &str, doi: &str) -> String {
    let url = format!("{}/{}", doi_base_url.trim_end_matches('/'), doi);
    debug!(url = %url, "fetching citation snippet");

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BIBLIOGRAPHY_MIME));
    headers.insert(
        HeaderName::from_static("style"),
        HeaderValue::from_static(CITATION_STYLE),
    );

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(CITATION_TIMEOUT_SECS))
        .default_headers(headers)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "citation snippet: client build failed");
            return String::new();
        }
    };

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %url, error = %e, "citation snippet: request failed");
            return String::new();
        }
    };

    if !response.status().is_success() {
        warn!(url = %url, status = response.status().as_u16(), "citation snippet: non-success");
        return String::new();
    }

    match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!(url = %url, error = %e, "citation snippet: body read failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_snippet_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/10.5438/0012"))
            .and(header("accept", "text/x-bibliography"))
            .and(header("style", "apa"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("Doe, J. (2023). A dataset."),
            )
            .mount(&server)
            .await;

        let snippet = fetch_citation_snippet(&server.uri(), "10.5438/0012").await;
        assert_eq!(snippet, "Doe, J. (2023). A dataset.");
    }

    #[tokio::test]
    async fn failures_yield_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/10.5438/0012"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(fetch_citation_snippet(&server.uri(), "10.5438/0012").await, "");
        // Unreachable service behaves the same.
        assert_eq!(
            fetch_citation_snippet("http://127.0.0.1:1", "10.5438/0012").await,
            ""
        );
    }
}
