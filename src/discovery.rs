//! REST client for the managed search backend.
//!
//! Both routes go through the same client; only the serving config resource and
//! the content search spec differ per call.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Budget for a single backend call, connect included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Retries after the initial attempt, transient failures only.
const MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("search backend request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("search backend returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl DiscoveryError {
    fn is_transient(&self) -> bool {
        match self {
            DiscoveryError::Network(e) => e.is_connect() || e.is_timeout(),
            DiscoveryError::Api { status, .. } => *status >= 500,
        }
    }
}

pub struct DiscoveryClient {
    http: Client,
    base_url: String,
}

impl DiscoveryClient {
    pub fn from_config(config: &Config) -> Result<Self, DiscoveryError> {
        Self::new(config.api_endpoint())
    }

    /// Create a client against a custom base URL.
    /// Useful for testing with a stub backend.
    pub fn new(base_url: String) -> Result<Self, DiscoveryError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Run one search against the given serving config.
    /// Transient failures (connect errors, timeouts, 5xx) are retried with backoff.
    pub async fn search(
        &self,
        serving_config: &str,
        query: &str,
        page_size: i32,
        content_search_spec: Option<ContentSearchSpec>,
    ) -> Result<SearchResponse, DiscoveryError> {
        let url = format!("{}/{}:search", self.base_url, serving_config);
        let body = SearchRequest {
            query,
            page_size,
            content_search_spec,
        };

        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;
        loop {
            match self.search_once(&url, &body).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < MAX_RETRIES && e.is_transient() => {
                    log::warn!("transient backend error, retrying (attempt {}): {e}", attempt + 1);
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn search_once(
        &self,
        url: &str,
        body: &SearchRequest<'_>,
    ) -> Result<SearchResponse, DiscoveryError> {
        let response = self.http.post(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

// =============================================================================
// Wire types (camelCase on the wire)
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    page_size: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_search_spec: Option<ContentSearchSpec>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSearchSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet_spec: Option<SnippetSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_spec: Option<SummarySpec>,
}

impl ContentSearchSpec {
    /// Snippets on, five-result cited summary, adversarial and
    /// non-summary-seeking queries left unsummarized.
    pub fn with_summary() -> Self {
        ContentSearchSpec {
            snippet_spec: Some(SnippetSpec {
                return_snippet: true,
            }),
            summary_spec: Some(SummarySpec {
                summary_result_count: 5,
                include_citations: true,
                ignore_adversarial_query: true,
                ignore_non_summary_seeking_query: true,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnippetSpec {
    return_snippet: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarySpec {
    summary_result_count: i32,
    include_citations: bool,
    ignore_adversarial_query: bool,
    ignore_non_summary_seeking_query: bool,
}

/// Backend search response. Every field the routes read is optional on the wire;
/// a sparse document must never fail deserialization of the whole response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
    pub summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultItem {
    pub document: Document,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    pub derived_struct_data: Option<DerivedStructData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStructData {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub snippets: Vec<SnippetItem>,
}

#[derive(Debug, Deserialize)]
pub struct SnippetItem {
    pub snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub summary_text: String,
}
