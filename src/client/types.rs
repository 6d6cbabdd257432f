use serde::{Deserialize, Serialize};

/// One paper record as returned by the listing service. Records are
/// immutable once received; every field tolerates absence.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Paper {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub citations: i64,
    #[serde(default)]
    pub ccf_class: String,
}

impl Paper {
    /// The service encodes "no CCF ranking" as an empty string or the
    /// literal "None".
    pub fn ccf_label(&self) -> Option<&str> {
        let trimmed = self.ccf_class.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// One page of search results. A response without an `items` field is an
/// empty page, not a decode error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<Paper>,
    #[serde(default)]
    pub translation: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TopicCount {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub count: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Breakthrough {
    #[serde(flatten)]
    pub paper: Paper,
    #[serde(default)]
    pub one_liner: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DailySummary {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total_papers: i64,
    #[serde(default)]
    pub major_trends: Vec<String>,
    #[serde(default)]
    pub top_topics: Vec<TopicCount>,
    #[serde(default)]
    pub breakthroughs: Vec<Breakthrough>,
}
