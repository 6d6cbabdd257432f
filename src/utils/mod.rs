use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// Publish timestamps arrive in whatever shape the upstream source emitted:
/// RFC 3339, a bare datetime, or just a date.
pub fn parse_publish_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&parsed));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&parsed.and_hms_opt(0, 0, 0)?));
    }
    None
}

pub fn format_date(value: &str) -> String {
    if value.trim().is_empty() {
        return "unknown date".to_string();
    }
    match parse_publish_date(value) {
        Some(parsed) => parsed.format("%Y-%m-%d").to_string(),
        None => value.trim().to_string(),
    }
}

pub fn format_authors(authors: &[String]) -> String {
    let named: Vec<&str> = authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if named.is_empty() {
        return "unknown authors".to_string();
    }
    if named.len() <= 3 {
        return named.join(", ");
    }
    format!("{} et al.", named[..3].join(", "))
}

pub fn is_valid_month(value: &str) -> bool {
    let re = match Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$") {
        Ok(re) => re,
        Err(_) => return false,
    };
    re.is_match(value.trim())
}

pub fn parse_sources_csv(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in value.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let item = item.to_lowercase();
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
