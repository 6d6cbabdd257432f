use colored::Colorize;

use crate::client::DailySummary;
use crate::engine::{FeedSnapshot, FeedStatus};
use crate::utils;

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<12}: {}", label, value);
}

/// The one-line source distribution under the result count, e.g.
/// `[translated: Large Language Model] arxiv: 8 · openalex: 4`.
pub fn stats_line(snapshot: &FeedSnapshot) -> String {
    let counts = snapshot
        .source_counts
        .iter()
        .map(|(source, count)| format!("{}: {}", source, count))
        .collect::<Vec<_>>()
        .join(" · ");

    let mut out = String::new();
    if !snapshot.translation.is_empty() {
        out.push_str(&format!("[translated: {}] ", snapshot.translation));
    }
    if counts.is_empty() {
        out.push_str("no matching results");
    } else {
        out.push_str(&counts);
    }
    out
}

pub fn print_feed(snapshot: &FeedSnapshot) {
    println!();
    match &snapshot.status {
        FeedStatus::Failed(error) => {
            println!("{} {}", "load failed:".red().bold(), error);
            println!("{}", "adjust the search or try again".dimmed());
            return;
        }
        FeedStatus::LoadingInitial => {
            println!("{}", "loading…".dimmed());
            return;
        }
        FeedStatus::LoadingMore | FeedStatus::Idle => {}
    }

    format_kv_line("papers", &format!("{} shown", snapshot.papers.len()));
    format_kv_line("sources", &stats_line(snapshot));
    if !snapshot.categories.is_empty() {
        format_kv_line("categories", &snapshot.categories.join(", "));
    }
    if snapshot.end_of_results {
        format_kv_line("more", "end of results");
    }

    if snapshot.papers.is_empty() {
        println!();
        println!("{}", "no papers match the current search".dimmed());
        return;
    }

    for (idx, paper) in snapshot.papers.iter().enumerate() {
        println!();
        let heading = format!("{:>3}. {}", idx + 1, paper.title);
        match paper.ccf_label() {
            Some(level) => println!("{} {}", heading.bold(), format!("[CCF {}]", level).yellow()),
            None => println!("{}", heading.bold()),
        }
        let venue = if paper.venue.trim().is_empty() {
            "unknown venue"
        } else {
            paper.venue.trim()
        };
        println!(
            "     {}",
            format!(
                "{} · {} · {} · {}",
                utils::format_date(&paper.published_at),
                paper.source,
                venue,
                utils::format_authors(&paper.authors)
            )
            .dimmed()
        );
        if !paper.categories.is_empty() {
            println!("     {}", paper.categories.join(" ").cyan());
        }
        if !paper.abstract_text.trim().is_empty() {
            println!("     {}", utils::truncate_chars(paper.abstract_text.trim(), 240));
        }
        if !paper.url.is_empty() {
            println!("     {}", paper.url.underline());
        }
    }
}

pub fn print_summary(summary: &DailySummary) {
    println!();
    println!(
        "{} {}",
        "frontier digest".bold(),
        format!("{} · {} new papers", summary.date, summary.total_papers).dimmed()
    );

    println!();
    println!("{}", "major trends".bold());
    if summary.major_trends.is_empty() {
        println!("  {}", "no significant trends today".dimmed());
    }
    for trend in summary.major_trends.iter() {
        println!("  - {}", trend);
    }

    println!();
    println!("{}", "top topics".bold());
    if summary.top_topics.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for topic in summary.top_topics.iter() {
        println!("  {} ({})", topic.topic, topic.count);
    }

    println!();
    println!("{}", "highlighted breakthroughs".bold());
    if summary.breakthroughs.is_empty() {
        println!("  {}", "no highlighted papers today".dimmed());
    }
    for item in summary.breakthroughs.iter() {
        println!("  {}", item.paper.title.bold());
        if !item.one_liner.trim().is_empty() {
            println!("    \"{}\"", item.one_liner.trim());
        }
        let mut meta = format!(
            "{} · {}",
            utils::format_authors(&item.paper.authors),
            if item.paper.venue.trim().is_empty() {
                "arXiv"
            } else {
                item.paper.venue.trim()
            }
        );
        if let Some(level) = item.paper.ccf_label() {
            meta.push_str(&format!(" · CCF {}", level));
        }
        println!("    {}", meta.dimmed());
        if !item.paper.url.is_empty() {
            println!("    {}", item.paper.url.underline());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FeedStatus;

    #[test]
    fn stats_line_joins_sources_and_prefixes_translation() {
        let snapshot = FeedSnapshot {
            status: FeedStatus::Idle,
            papers: Vec::new(),
            categories: Vec::new(),
            source_counts: vec![("arxiv".to_string(), 8), ("openalex".to_string(), 4)],
            translation: "Large Language Model".to_string(),
            end_of_results: false,
        };
        assert_eq!(
            stats_line(&snapshot),
            "[translated: Large Language Model] arxiv: 8 · openalex: 4"
        );
    }

    #[test]
    fn stats_line_handles_empty_view() {
        let snapshot = FeedSnapshot {
            status: FeedStatus::Idle,
            papers: Vec::new(),
            categories: Vec::new(),
            source_counts: Vec::new(),
            translation: String::new(),
            end_of_results: false,
        };
        assert_eq!(stats_line(&snapshot), "no matching results");
    }
}
