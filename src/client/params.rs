use crate::engine::{QueryState, SortMode};

/// Canonical search parameters derived from a [`QueryState`] snapshot.
///
/// Offset and limit are appended by the caller when a page is actually
/// requested; they are not part of the canonical set. The category filter
/// never reaches the wire, it is applied over already-accumulated results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn from_query_state(state: &QueryState) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();

        let query = state.query.trim();
        if !query.is_empty() {
            pairs.push(("query".to_string(), query.to_string()));
        }

        for source in state.sources.iter() {
            let source = source.trim();
            if !source.is_empty() {
                pairs.push(("sources".to_string(), source.to_string()));
            }
        }

        if state.sort != SortMode::default() {
            pairs.push(("sort".to_string(), state.sort.as_param().to_string()));
        }

        if let Some(month) = state.month.as_deref().map(str::trim) {
            if !month.is_empty() {
                pairs.push(("month".to_string(), month.to_string()));
            }
        }

        if state.top_tier {
            pairs.push(("top_tier".to_string(), "true".to_string()));
        }

        if let Some(level) = state.ccf_level.as_deref().map(str::trim) {
            if !level.is_empty() {
                pairs.push(("ccf_level".to_string(), level.to_string()));
            }
        }

        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The full parameter list for one page request.
    pub fn for_page(&self, offset: u32, limit: u32) -> Vec<(String, String)> {
        let mut out = self.pairs.clone();
        out.push(("offset".to_string(), offset.to_string()));
        out.push(("limit".to_string(), limit.to_string()));
        out
    }
}
