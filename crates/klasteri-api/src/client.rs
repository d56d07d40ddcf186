//! Typed HTTP client for the Klasteri backend.
//!
//! Thin GET+JSON wrappers, one per endpoint. Every request carries a
//! `Cache-Control: no-cache` header so the client never reuses a cached
//! response. Relative image paths are rewritten to absolute URLs against the
//! configured base right after deserialization.

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::model::{Category, Cluster, DailySummary, HomePageData, SearchResult, TonightData};

/// Minimum query length enforced before a search request is issued.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client against `base_url`. A bare host (no scheme) gets
    /// `https://` prepended, matching how the product reads its environment.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = if base_url.starts_with("http") {
            base_url.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", base_url.trim_end_matches('/'))
        };

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/api/news` — the six fixed home-page buckets.
    pub async fn home(&self) -> Result<HomePageData> {
        let url = format!("{}/api/news", self.base_url);
        let mut data: HomePageData = self.get_json(&url).await?;
        data.rewrite_image_urls(&self.base_url);
        Ok(data)
    }

    /// `/api/news/{category}` — one category feed.
    pub async fn category(&self, category: Category) -> Result<Vec<Cluster>> {
        let url = format!("{}/api/news/{}", self.base_url, category.as_key());
        let mut clusters: Vec<Cluster> = self.get_json(&url).await?;
        for cluster in &mut clusters {
            cluster.rewrite_image_urls(&self.base_url);
        }
        Ok(clusters)
    }

    /// `/api/clusters/{id}` — a single cluster; 404 maps to `ClusterNotFound`.
    pub async fn cluster(&self, id: i64) -> Result<Cluster> {
        let url = format!("{}/api/clusters/{}", self.base_url, id);
        debug!("GET {}", url);
        let resp = self.http.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::ClusterNotFound(id));
        }
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }
        let mut cluster: Cluster = resp.json().await?;
        cluster.rewrite_image_urls(&self.base_url);
        Ok(cluster)
    }

    /// `/api/news/tonight` — the focus rail. `exclude_ids` is the set of
    /// cluster ids already shown in the main feed; the server pre-filters
    /// against it so the rail never duplicates the feed.
    pub async fn tonight(&self, exclude_ids: &[i64]) -> Result<TonightData> {
        let mut url = format!("{}/api/news/tonight", self.base_url);
        if !exclude_ids.is_empty() {
            let ids = exclude_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            url = format!("{}?exclude_ids={}", url, ids);
        }
        self.get_json(&url).await
    }

    /// `/api/search?q=..&limit=..`. Queries shorter than two characters are
    /// rejected locally before any request goes out.
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchResult> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Err(ApiError::QueryTooShort);
        }
        let url = format!(
            "{}/api/search?q={}&limit={}",
            self.base_url,
            urlencode(query),
            limit
        );
        let mut result: SearchResult = self.get_json(&url).await?;
        for cluster in &mut result.clusters {
            cluster.rewrite_image_urls(&self.base_url);
        }
        Ok(result)
    }

    /// `/api/summary/today`. A 404 means "no summary today" and is a valid
    /// empty state, not an error.
    pub async fn summary_today(&self) -> Result<Option<DailySummary>> {
        let url = format!("{}/api/summary/today", self.base_url);
        debug!("GET {}", url);
        let resp = self.http.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }
        Ok(Some(resp.json().await?))
    }

    /// Stream URL for the summary narration, handed to the audio backend.
    pub fn summary_audio_url(&self, summary_id: i64) -> String {
        format!("{}/api/summary/today/audio?id={}", self.base_url, summary_id)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.json().await?)
    }
}

/// Percent-encode a query term. Only the characters that matter inside a
/// query value are escaped.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*byte as char)
            }
            b' ' => out.push_str("%20"),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https_scheme() {
        let client = ApiClient::new("clusta.example.com").unwrap();
        assert_eq!(client.base_url(), "https://clusta.example.com");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn short_query_is_rejected_locally() {
        let client = ApiClient::new("https://example.invalid").unwrap();
        let err = client.search(" a ", 20).await.unwrap_err();
        assert!(matches!(err, ApiError::QueryTooShort));
    }

    #[test]
    fn audio_url_carries_summary_id() {
        let client = ApiClient::new("https://example.com").unwrap();
        assert_eq!(
            client.summary_audio_url(42),
            "https://example.com/api/summary/today/audio?id=42"
        );
    }

    #[test]
    fn urlencode_escapes_non_ascii() {
        assert_eq!(urlencode("zgjedhjet në tetovë"), "zgjedhjet%20n%C3%AB%20tetov%C3%AB");
    }
}
