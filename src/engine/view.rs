use std::cmp::Ordering;

use itertools::Itertools;

use crate::client::Paper;
use crate::engine::SortMode;
use crate::utils;

/// Pure view derivation: filter by category, then stable-sort. The
/// inputs are never mutated and no state is kept between calls.
pub fn derive_view(papers: &[Paper], category: &str, sort: SortMode) -> Vec<Paper> {
    let needle = category.trim().to_lowercase();
    let mut out: Vec<Paper> = papers
        .iter()
        .filter(|paper| {
            if needle.is_empty() {
                return true;
            }
            paper
                .categories
                .iter()
                .any(|c| c.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    match sort {
        SortMode::PublishedDesc => out.sort_by(|a, b| compare_published(b, a)),
        SortMode::PublishedAsc => out.sort_by(compare_published),
        SortMode::TitleAsc => out.sort_by(|a, b| a.title.cmp(&b.title)),
    }

    out
}

/// Unparseable timestamps fall back to comparing the raw value; records
/// are never dropped from the sort.
fn compare_published(a: &Paper, b: &Paper) -> Ordering {
    match (
        utils::parse_publish_date(&a.published_at),
        utils::parse_publish_date(&b.published_at),
    ) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => a.published_at.cmp(&b.published_at),
    }
}

/// Category options span the entire accumulated collection, not just the
/// currently filtered view.
pub fn category_options(papers: &[Paper]) -> Vec<String> {
    papers
        .iter()
        .flat_map(|paper| paper.categories.iter())
        .map(|category| category.trim())
        .filter(|category| !category.is_empty())
        .map(|category| category.to_string())
        .unique()
        .sorted()
        .collect()
}

/// Displayed items grouped by source, in first-appearance order.
pub fn source_counts(papers: &[Paper]) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = Vec::new();
    for paper in papers.iter() {
        let source = if paper.source.trim().is_empty() {
            "unknown"
        } else {
            paper.source.trim()
        };
        match out.iter_mut().find(|(name, _)| name == source) {
            Some((_, count)) => *count += 1,
            None => out.push((source.to_string(), 1)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, published_at: &str, categories: &[&str]) -> Paper {
        Paper {
            title: title.to_string(),
            published_at: published_at.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            source: "arxiv".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn category_filter_matches_substring_case_insensitively() {
        let papers = vec![
            paper("P1", "2024-05-01", &["cs.LG", "cs.AI"]),
            paper("P2", "2024-05-02", &["math.ST"]),
        ];
        let view = derive_view(&papers, "cs.lg", SortMode::PublishedDesc);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "P1");

        let all = derive_view(&papers, "", SortMode::PublishedDesc);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn default_sort_is_published_descending() {
        let papers = vec![
            paper("Old", "2023-01-15", &[]),
            paper("New", "2024-05-01", &[]),
        ];
        let view = derive_view(&papers, "", SortMode::PublishedDesc);
        assert_eq!(view[0].title, "New");
        assert_eq!(view[1].title, "Old");
    }

    #[test]
    fn title_sort_ignores_publish_dates() {
        let papers = vec![
            paper("Zeta", "2024-05-01", &[]),
            paper("Alpha", "2020-01-01", &[]),
        ];
        let view = derive_view(&papers, "", SortMode::TitleAsc);
        assert_eq!(view[0].title, "Alpha");
        assert_eq!(view[1].title, "Zeta");
    }

    #[test]
    fn unparseable_dates_sort_by_raw_value_and_survive() {
        let papers = vec![
            paper("B", "not-a-date-b", &[]),
            paper("A", "not-a-date-a", &[]),
        ];
        let view = derive_view(&papers, "", SortMode::PublishedAsc);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].title, "A");
    }

    #[test]
    fn derivation_is_pure() {
        let papers = vec![
            paper("P1", "2024-05-01", &["cs.LG"]),
            paper("P2", "2024-04-01", &["cs.CV"]),
        ];
        let first = derive_view(&papers, "cs", SortMode::PublishedDesc);
        let second = derive_view(&papers, "cs", SortMode::PublishedDesc);
        let titles = |view: &[Paper]| view.iter().map(|p| p.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&first), titles(&second));
    }

    #[test]
    fn category_options_span_the_whole_collection() {
        let papers = vec![
            paper("P1", "2024-05-01", &["cs.LG"]),
            paper("P2", "2024-05-02", &["cs.CV", "cs.LG"]),
        ];
        // options ignore the active filter entirely
        assert_eq!(
            category_options(&papers),
            vec!["cs.CV".to_string(), "cs.LG".to_string()]
        );
    }

    #[test]
    fn source_counts_group_in_first_appearance_order() {
        let mut papers = vec![
            paper("P1", "2024-05-01", &[]),
            paper("P2", "2024-05-02", &[]),
        ];
        papers[1].source = "openalex".to_string();
        papers.push(paper("P3", "2024-05-03", &[]));
        papers.push(Paper::default());

        let counts = source_counts(&papers);
        assert_eq!(
            counts,
            vec![
                ("arxiv".to_string(), 2),
                ("openalex".to_string(), 1),
                ("unknown".to_string(), 1),
            ]
        );
    }
}
