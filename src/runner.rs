use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::client::{ClientError, ClientOptions, FetchError, SearchClient};
use crate::engine::{FeedEngine, FeedSnapshot, QueryState, SortMode, Trigger};
use crate::utils;

#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub query: String,
    pub sources: Vec<String>,
    pub sort: SortMode,
    pub category: String,
    pub month: Option<String>,
    pub top_tier: bool,
    pub ccf_level: Option<String>,
    pub pages: u32,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            query: String::new(),
            sources: vec!["arxiv".to_string(), "openalex".to_string()],
            sort: SortMode::default(),
            category: String::new(),
            month: None,
            top_tier: false,
            ccf_level: None,
            pages: 1,
            timeout_seconds: 10,
            proxy: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("base URL is empty")]
    EmptyBaseUrl,

    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("invalid month '{value}', expected YYYY-MM")]
    InvalidMonth { value: String },

    #[error("invalid ccf level '{value}', expected A, B, or C")]
    InvalidCcfLevel { value: String },

    #[error("invalid pages {value}, expected positive integer")]
    InvalidPages { value: u32 },

    #[error("failed to build search client: {source}")]
    Client {
        #[source]
        source: ClientError,
    },

    #[error("initial fetch failed: {source}")]
    InitialFetch {
        #[source]
        source: FetchError,
    },
}

/// Outcome of a one-shot feed run: the final derived view plus how many
/// pages were actually requested (appends stop early at end-of-results
/// or on a failed page).
#[derive(Clone, Debug)]
pub struct FeedResult {
    pub snapshot: FeedSnapshot,
    pub pages_requested: u32,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(mut options: Options) -> Result<Self, RunnerError> {
        let base_url = options.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RunnerError::EmptyBaseUrl);
        }
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(RunnerError::InvalidBaseUrl { url: base_url });
        }
        options.base_url = base_url;

        if let Some(month) = options.month.as_deref() {
            if !utils::is_valid_month(month) {
                return Err(RunnerError::InvalidMonth {
                    value: month.to_string(),
                });
            }
        }
        if let Some(level) = options.ccf_level.as_deref() {
            let canonical = level.trim().to_uppercase();
            if !matches!(canonical.as_str(), "A" | "B" | "C") {
                return Err(RunnerError::InvalidCcfLevel {
                    value: level.to_string(),
                });
            }
            options.ccf_level = Some(canonical);
        }
        if options.pages == 0 {
            return Err(RunnerError::InvalidPages {
                value: options.pages,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Perform the initial load plus up to `pages - 1` proximity-style
    /// appends. An append failure keeps the results accumulated so far;
    /// an initial failure is fatal for the run.
    pub async fn run(&self) -> Result<FeedResult, RunnerError> {
        let started_at = Instant::now();

        let client = SearchClient::new(
            &self.options.base_url,
            ClientOptions {
                timeout_seconds: self.options.timeout_seconds,
                proxy: self.options.proxy.clone(),
            },
        )
        .map_err(|e| RunnerError::Client { source: e })?;

        let mut engine = FeedEngine::new(QueryState {
            query: self.options.query.clone(),
            sources: self.options.sources.clone(),
            sort: self.options.sort,
            category: self.options.category.clone(),
            month: self.options.month.clone(),
            top_tier: self.options.top_tier,
            ccf_level: self.options.ccf_level.clone(),
        });

        let mut pages_requested = 0u32;

        if let Some(plan) = engine.apply(Trigger::Refresh) {
            pages_requested += 1;
            match client.search(&plan.params, plan.offset, plan.limit).await {
                Ok(page) => engine.finish(plan.kind, Ok(page)),
                Err(e) => return Err(RunnerError::InitialFetch { source: e }),
            }
        }

        for _ in 1..self.options.pages {
            let plan = match engine.apply(Trigger::ScrollNearEnd) {
                Some(plan) => plan,
                None => break,
            };
            pages_requested += 1;
            match client.search(&plan.params, plan.offset, plan.limit).await {
                Ok(page) => engine.finish(plan.kind, Ok(page)),
                Err(e) => {
                    engine.finish(plan.kind, Err(e));
                    break;
                }
            }
        }

        Ok(FeedResult {
            snapshot: engine.snapshot(),
            pages_requested,
            elapsed: started_at.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_base_url_and_ccf_level() {
        let runner = Runner::new(Options {
            base_url: " http://localhost:8000/ ".to_string(),
            ccf_level: Some("a".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(runner.options().base_url, "http://localhost:8000");
        assert_eq!(runner.options().ccf_level.as_deref(), Some("A"));
    }

    #[test]
    fn new_rejects_invalid_options() {
        assert!(matches!(
            Runner::new(Options {
                base_url: "  ".to_string(),
                ..Default::default()
            }),
            Err(RunnerError::EmptyBaseUrl)
        ));
        assert!(matches!(
            Runner::new(Options {
                base_url: "nope".to_string(),
                ..Default::default()
            }),
            Err(RunnerError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Runner::new(Options {
                month: Some("2024-13".to_string()),
                ..Default::default()
            }),
            Err(RunnerError::InvalidMonth { .. })
        ));
        assert!(matches!(
            Runner::new(Options {
                ccf_level: Some("D".to_string()),
                ..Default::default()
            }),
            Err(RunnerError::InvalidCcfLevel { .. })
        ));
        assert!(matches!(
            Runner::new(Options {
                pages: 0,
                ..Default::default()
            }),
            Err(RunnerError::InvalidPages { .. })
        ));
    }
}
