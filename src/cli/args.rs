use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "paperfeed",
    version,
    about = "research-paper discovery feed client",
    long_about = "Paperfeed is a terminal client for a research-paper listing service: it searches, paginates, and re-derives a filtered/sorted feed client-side.\n\nExamples:\n  paperfeed -q \"graph neural networks\"\n  paperfeed -q transformers --source arxiv --month 2024-05 --pages 3\n  paperfeed --interactive\n  paperfeed --summary\n\nTip: Use --config to persist feed settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "url",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Input",
        help = "Base URL of the listing service (defaults to http://localhost:8000)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.paperfeed/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'q',
        long = "query",
        value_name = "TEXT",
        help_heading = "Query",
        help = "Free-text search query."
    )]
    pub query: Option<String>,

    #[arg(
        short = 's',
        long = "source",
        visible_alias = "sources",
        value_name = "NAME",
        action = ArgAction::Append,
        help_heading = "Query",
        help = "Paper source to search (repeatable, e.g. arxiv, openalex)."
    )]
    pub source: Vec<String>,

    #[arg(
        long = "sort",
        value_name = "MODE",
        help_heading = "Query",
        help = "Sort mode: published_desc (default), published_asc, title_asc."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'm',
        long = "month",
        value_name = "YYYY-MM",
        help_heading = "Query",
        help = "Restrict results to one month."
    )]
    pub month: Option<String>,

    #[arg(
        long = "cat",
        visible_alias = "category",
        value_name = "FILTER",
        help_heading = "Query",
        help = "Client-side category filter (substring match, never sent to the server)."
    )]
    pub category: Option<String>,

    #[arg(
        short = 'T',
        long = "tt",
        visible_alias = "top-tier",
        help_heading = "Query",
        help = "Only papers from top-tier venues."
    )]
    pub top_tier: bool,

    #[arg(
        long = "ccf",
        visible_alias = "ccf-level",
        value_name = "LEVEL",
        help_heading = "Query",
        help = "CCF ranking filter (A, B, or C)."
    )]
    pub ccf_level: Option<String>,

    #[arg(
        short = 'p',
        long = "pages",
        value_name = "N",
        help_heading = "Fetch",
        help = "Pages of 50 results to fetch in one-shot mode."
    )]
    pub pages: Option<u32>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Fetch",
        help = "HTTP request timeout."
    )]
    pub timeout: Option<usize>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        help_heading = "Fetch",
        help = "HTTP proxy for all requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the displayed feed to a file."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text or json (inferred from the file extension when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'i',
        long = "interactive",
        help_heading = "Mode",
        help = "Interactive feed session (query, filter, and load more from a prompt)."
    )]
    pub interactive: bool,

    #[arg(
        long = "summary",
        visible_alias = "daily-summary",
        help_heading = "Mode",
        help = "Fetch and print the daily frontier summary instead of searching."
    )]
    pub summary: bool,
}
