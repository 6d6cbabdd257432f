use crate::cli::args::CliArgs;
use crate::engine::SortMode;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(url) = args.url.as_deref() {
        if reqwest::Url::parse(url.trim().trim_end_matches('/')).is_err() {
            return Err(format!("invalid --url '{url}'"));
        }
    }
    if let Some(raw) = args.sort.as_deref() {
        if SortMode::parse(raw).is_none() {
            return Err(format!(
                "invalid --sort '{raw}', expected published_desc, published_asc, or title_asc"
            ));
        }
    }
    if let Some(raw) = args.month.as_deref() {
        if !crate::utils::is_valid_month(raw) {
            return Err(format!("invalid --month '{raw}', expected YYYY-MM"));
        }
    }
    if let Some(raw) = args.ccf_level.as_deref() {
        let level = raw.trim().to_uppercase();
        if !matches!(level.as_str(), "A" | "B" | "C") {
            return Err(format!("invalid --ccf '{raw}', expected A, B, or C"));
        }
    }
    if let Some(pages) = args.pages {
        if pages == 0 {
            return Err("invalid --pages, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text or json"
            ));
        }
    }
    Ok(())
}
