pub mod report;

use serde::Serialize;

use crate::client::Paper;
use crate::utils;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct PaperRecord {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub published: String,
    pub source: String,
    pub categories: Vec<String>,
    pub ccf: String,
    pub url: String,
}

pub fn build_records(papers: &[Paper]) -> Vec<PaperRecord> {
    papers
        .iter()
        .map(|paper| PaperRecord {
            title: paper.title.clone(),
            authors: utils::format_authors(&paper.authors),
            venue: paper.venue.clone(),
            published: utils::format_date(&paper.published_at),
            source: if paper.source.trim().is_empty() {
                "unknown".to_string()
            } else {
                paper.source.clone()
            },
            categories: paper.categories.clone(),
            ccf: paper.ccf_label().unwrap_or_default().to_string(),
            url: paper.url.clone(),
        })
        .collect()
}

pub fn render_text(records: &[PaperRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!(
            "{}  {:<10} {} - {}\n",
            r.published, r.source, r.title, r.authors
        ));
        if !r.url.is_empty() {
            out.push_str(&format!("            {}\n", r.url));
        }
    }
    out.into_bytes()
}

pub fn render_json(records: &[PaperRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<PaperRecord> {
        build_records(&[Paper {
            title: "Sparse Attention".to_string(),
            authors: vec!["Ada".to_string()],
            published_at: "2024-05-01T00:00:00Z".to_string(),
            source: "arxiv".to_string(),
            url: "https://arxiv.org/abs/1".to_string(),
            ccf_class: "None".to_string(),
            ..Default::default()
        }])
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::parse("TXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yaml"), None);
        assert_eq!(
            infer_format_from_path("./feed.json"),
            Some(OutputFormat::Json)
        );
        assert_eq!(infer_format_from_path("./feed.dat"), None);
    }

    #[test]
    fn records_format_authors_dates_and_ccf() {
        let records = records();
        assert_eq!(records[0].published, "2024-05-01");
        assert_eq!(records[0].authors, "Ada");
        assert_eq!(records[0].ccf, "");
        assert_eq!(records[0].source, "arxiv");
    }

    #[test]
    fn text_rendering_is_one_block_per_record() {
        let rendered = String::from_utf8(render_text(&records())).unwrap();
        assert!(rendered.contains("Sparse Attention"));
        assert!(rendered.contains("https://arxiv.org/abs/1"));
    }

    #[test]
    fn json_rendering_round_trips() {
        let rendered = render_json(&records());
        let parsed: serde_json::Value = serde_json::from_slice(&rendered).unwrap();
        assert_eq!(parsed[0]["title"], "Sparse Attention");
    }
}
