//! Client for the Jikan (MyAnimeList) v4 search endpoint.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::anime::{normalize, AnimeLookup};
use crate::error::UpstreamError;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct JikanClient {
    http: reqwest::Client,
    base_url: Url,
}

impl JikanClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// `{base}/anime?q=<query>&sfw=true`
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("anime");
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("q", query)
            .append_pair("sfw", "true");
        url
    }

    /// Search by title and normalize the first hit.
    pub async fn search(&self, query: &str) -> Result<AnimeLookup, UpstreamError> {
        let url = self.search_url(query);
        tracing::debug!(%url, "querying anime API");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;

        Ok(match parsed.data.as_deref().and_then(<[Value]>::first) {
            Some(first) => AnimeLookup::Found(normalize(first)),
            None => AnimeLookup::Empty,
        })
    }
}
