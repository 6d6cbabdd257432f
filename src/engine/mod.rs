pub mod view;

use crate::client::{FetchError, Paper, SearchPage, SearchParams};

/// Page size for every request. Offset bookkeeping tracks pages
/// requested, not items received, so the limit never varies per page.
pub const PAGE_LIMIT: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    PublishedDesc,
    PublishedAsc,
    TitleAsc,
}

impl SortMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "published_desc" => Some(Self::PublishedDesc),
            "published_asc" => Some(Self::PublishedAsc),
            "title_asc" => Some(Self::TitleAsc),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            Self::PublishedDesc => "published_desc",
            Self::PublishedAsc => "published_asc",
            Self::TitleAsc => "title_asc",
        }
    }
}

/// The user-editable search controls. `category` never reaches the
/// network layer; it only drives view derivation.
#[derive(Clone, Debug, Default)]
pub struct QueryState {
    pub query: String,
    pub sources: Vec<String>,
    pub sort: SortMode,
    pub category: String,
    pub month: Option<String>,
    pub top_tier: bool,
    pub ccf_level: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    LoadingInitial,
    LoadingMore,
}

/// Events that may start a fetch. Category edits are deliberately absent:
/// they bypass the load path entirely (see [`FeedEngine::set_category`]).
#[derive(Clone, Debug)]
pub enum Trigger {
    SubmitQuery(String),
    Refresh,
    SetSort(SortMode),
    SetMonth(Option<String>),
    SetTopTier(bool),
    SetCcfLevel(Option<String>),
    SetSources(Vec<String>),
    ScrollNearEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    More,
}

/// One planned page request. The engine hands this to the caller, which
/// performs the round trip and reports back via [`FeedEngine::finish`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPlan {
    pub kind: FetchKind,
    pub params: SearchParams,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    LoadingInitial,
    LoadingMore,
    Failed(String),
}

/// Read-only view handed to the rendering layer after every
/// recomputation. Collaborators must not feed mutations back except by
/// raising new triggers.
#[derive(Clone, Debug)]
pub struct FeedSnapshot {
    pub status: FeedStatus,
    pub papers: Vec<Paper>,
    pub categories: Vec<String>,
    pub source_counts: Vec<(String, usize)>,
    pub translation: String,
    pub end_of_results: bool,
}

/// The result-set synchronization engine: owns the authoritative result
/// collection, the pagination offset, and the single-flight gate.
///
/// All mutation happens inside discrete calls (`apply`, `finish`,
/// `set_category`); nothing is read-modify-written across an await point.
/// A trigger arriving while a fetch is in flight updates the query
/// controls but never starts a second fetch; it is dropped, not queued.
#[derive(Clone, Debug)]
pub struct FeedEngine {
    state: QueryState,
    papers: Vec<Paper>,
    offset: u32,
    load: LoadState,
    end_of_results: bool,
    translation: String,
    error: Option<String>,
}

impl FeedEngine {
    pub fn new(state: QueryState) -> Self {
        Self {
            state,
            papers: Vec::new(),
            offset: 0,
            load: LoadState::Idle,
            end_of_results: false,
            translation: String::new(),
            error: None,
        }
    }

    pub fn query_state(&self) -> &QueryState {
        &self.state
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn end_of_results(&self) -> bool {
        self.end_of_results
    }

    /// Category edits recompute the view over already-accumulated data;
    /// they never touch the load state machine.
    pub fn set_category(&mut self, category: &str) {
        self.state.category = category.trim().to_string();
    }

    /// Arbitrate one trigger. Returns the page request to perform, or
    /// `None` when the trigger is dropped (fetch already in flight, or a
    /// proximity event with nothing to extend).
    pub fn apply(&mut self, trigger: Trigger) -> Option<FetchPlan> {
        match trigger {
            Trigger::ScrollNearEnd => {
                if self.load != LoadState::Idle {
                    return None;
                }
                if self.papers.is_empty() || self.end_of_results {
                    return None;
                }
                let plan = FetchPlan {
                    kind: FetchKind::More,
                    params: SearchParams::from_query_state(&self.state),
                    offset: self.offset,
                    limit: PAGE_LIMIT,
                };
                // offset tracks pages requested: advance at issue time
                self.offset += PAGE_LIMIT;
                self.load = LoadState::LoadingMore;
                Some(plan)
            }
            other => {
                self.apply_query_change(other);
                if self.load != LoadState::Idle {
                    return None;
                }
                self.offset = 0;
                self.error = None;
                self.load = LoadState::LoadingInitial;
                Some(FetchPlan {
                    kind: FetchKind::Initial,
                    params: SearchParams::from_query_state(&self.state),
                    offset: 0,
                    limit: PAGE_LIMIT,
                })
            }
        }
    }

    fn apply_query_change(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::SubmitQuery(query) => self.state.query = query,
            Trigger::Refresh => {}
            Trigger::SetSort(sort) => self.state.sort = sort,
            Trigger::SetMonth(month) => {
                self.state.month = month.filter(|m| !m.trim().is_empty())
            }
            Trigger::SetTopTier(top_tier) => self.state.top_tier = top_tier,
            Trigger::SetCcfLevel(level) => {
                self.state.ccf_level = level.filter(|l| !l.trim().is_empty())
            }
            Trigger::SetSources(sources) => self.state.sources = sources,
            Trigger::ScrollNearEnd => {}
        }
    }

    /// Reconcile a fetch outcome with the current state. A completion
    /// whose kind does not match the in-flight state is a programming
    /// error: asserted in development, ignored in release.
    pub fn finish(&mut self, kind: FetchKind, outcome: Result<SearchPage, FetchError>) {
        match (kind, self.load) {
            (FetchKind::Initial, LoadState::LoadingInitial) => {
                match outcome {
                    Ok(page) => self.reset(page),
                    Err(error) => {
                        self.papers.clear();
                        self.offset = 0;
                        self.translation.clear();
                        self.error = Some(error.to_string());
                    }
                }
                self.load = LoadState::Idle;
            }
            (FetchKind::More, LoadState::LoadingMore) => {
                match outcome {
                    Ok(page) => self.append(page),
                    Err(_) => {
                        // re-arm the same page for the next proximity event
                        self.offset = self.offset.saturating_sub(PAGE_LIMIT);
                    }
                }
                self.load = LoadState::Idle;
            }
            _ => {
                debug_assert!(false, "fetch completion does not match load state");
            }
        }
    }

    /// Replace the collection with the first page. Always clears the
    /// end-of-results latch: an empty first page just renders the empty
    /// state, and the proximity trigger stays quiet on an empty
    /// collection anyway.
    fn reset(&mut self, page: SearchPage) {
        self.papers = page.items;
        self.offset = PAGE_LIMIT;
        self.end_of_results = false;
        self.translation = page.translation;
        self.error = None;
    }

    /// Concatenate a follow-up page. An empty page latches end-of-results
    /// and leaves everything else untouched; the offset already advanced
    /// when the request was issued.
    fn append(&mut self, page: SearchPage) {
        if page.items.is_empty() {
            self.end_of_results = true;
            return;
        }
        self.papers.extend(page.items);
    }

    /// Recompute the displayed view. While the initial load is in flight
    /// the collection is logically cleared for display, so the snapshot
    /// is empty rather than stale.
    pub fn snapshot(&self) -> FeedSnapshot {
        let collection: &[Paper] = if self.load == LoadState::LoadingInitial {
            &[]
        } else {
            &self.papers
        };

        let papers = view::derive_view(collection, &self.state.category, self.state.sort);
        let categories = view::category_options(collection);
        let source_counts = view::source_counts(&papers);

        let status = match self.load {
            LoadState::LoadingInitial => FeedStatus::LoadingInitial,
            LoadState::LoadingMore => FeedStatus::LoadingMore,
            LoadState::Idle => match self.error.as_ref() {
                Some(error) => FeedStatus::Failed(error.clone()),
                None => FeedStatus::Idle,
            },
        };

        FeedSnapshot {
            status,
            papers,
            categories,
            source_counts,
            translation: self.translation.clone(),
            end_of_results: self.end_of_results,
        }
    }
}
