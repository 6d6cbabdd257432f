pub mod params;
pub mod types;

use std::time::Duration;

use thiserror::Error;

pub use params::SearchParams;
pub use types::{Breakthrough, DailySummary, Paper, SearchPage, TopicCount};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

/// Everything that can go wrong with a single page request. The engine
/// treats all variants identically (one failed attempt, no retry); the
/// split exists for logging only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            proxy: None,
        }
    }
}

fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client, ClientError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            "paperfeed/",
            env!("CARGO_PKG_VERSION")
        )),
    );

    let timeout = Duration::from_secs(options.timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout);

    if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let configured = reqwest::Proxy::all(proxy).map_err(|e| ClientError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(configured);
    }

    builder
        .build()
        .map_err(|e| ClientError::HttpClientBuild { source: e })
}

/// Thin wrapper around the listing service. Each call is exactly one
/// request; there is no retry, no shared state, no cancellation.
#[derive(Clone, Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if reqwest::Url::parse(trimmed).is_err() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        let http = build_http_client(&options)?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of results at the given offset.
    pub async fn search(
        &self,
        params: &SearchParams,
        offset: u32,
        limit: u32,
    ) -> Result<SearchPage, FetchError> {
        let url = format!("{}/search", self.base_url);
        let query = params.for_page(offset, limit);
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| FetchError::Decode { url, source: e })
    }

    /// Fetch the daily summary. Independent of the feed engine, requested
    /// at most once per invocation.
    pub async fn daily_summary(&self) -> Result<DailySummary, FetchError> {
        let url = format!("{}/daily-summary", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<DailySummary>()
            .await
            .map_err(|e| FetchError::Decode { url, source: e })
    }
}
