use std::io::Write;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::ProgressBar;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::client::{ClientOptions, SearchClient};
use crate::config::{self, ConfigFile};
use crate::engine::{FeedEngine, FetchKind, QueryState, SortMode, Trigger};
use crate::output;
use crate::runner::{Options, Runner};
use crate::utils;

fn print_banner() {
    const BANNER: &str = r#"
                                   ____             __
     ____  ____ _____  ___  _____/ __/__  ___  ____/ /
    / __ \/ __ `/ __ \/ _ \/ ___/ /_/ _ \/ _ \/ __  /
   / /_/ / /_/ / /_/ /  __/ /  / __/  __/  __/ /_/ /
  / .___/\__,_/ .___/\___/_/  /_/  \___/\___/\__,_/
 /_/         /_/
        v0.1.0 - research-paper discovery feed
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    base_url: String,
    query: String,
    sources: Vec<String>,
    sort: SortMode,
    category: String,
    month: Option<String>,
    top_tier: bool,
    ccf_level: Option<String>,
    pages: u32,
    timeout: usize,
    proxy: Option<String>,
    output: Option<String>,
    output_format: Option<String>,
    no_color: bool,
    interactive: bool,
    summary: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .url
        .or(cfg.base_url)
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let query = args.query.or(cfg.query).unwrap_or_default();

    let sources = if args.source.is_empty() {
        cfg.sources
            .unwrap_or_else(|| vec!["arxiv".to_string(), "openalex".to_string()])
    } else {
        args.source
    };
    let sources = utils::parse_sources_csv(&sources.join(","));

    let sort = match args.sort.or(cfg.sort) {
        Some(raw) => {
            SortMode::parse(&raw).ok_or_else(|| format!("invalid sort mode '{raw}'"))?
        }
        None => SortMode::default(),
    };

    let month = args.month.or(cfg.month).filter(|m| !m.trim().is_empty());
    if let Some(m) = month.as_deref() {
        if !utils::is_valid_month(m) {
            return Err(format!("invalid month '{m}', expected YYYY-MM"));
        }
    }

    let ccf_level = args
        .ccf_level
        .or(cfg.ccf_level)
        .map(|l| l.trim().to_uppercase())
        .filter(|l| !l.is_empty());
    if let Some(l) = ccf_level.as_deref() {
        if !matches!(l, "A" | "B" | "C") {
            return Err(format!("invalid ccf level '{l}', expected A, B, or C"));
        }
    }

    let top_tier = args.top_tier || cfg.top_tier.unwrap_or(false);
    let category = args.category.or(cfg.category).unwrap_or_default();

    let pages = args.pages.or(cfg.pages).unwrap_or(1);
    if pages == 0 {
        return Err("invalid pages, expected positive integer".to_string());
    }

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);

    Ok(RunConfig {
        base_url,
        query,
        sources,
        sort,
        category,
        month,
        top_tier,
        ccf_level,
        pages,
        timeout,
        proxy,
        output,
        output_format,
        no_color,
        interactive: args.interactive,
        summary: args.summary,
    })
}

fn fetch_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Arbitrate one trigger and, when the engine planned a page request,
/// perform the round trip and feed the outcome back. A failed append is
/// logged but leaves the accumulated results untouched.
async fn drive_trigger(engine: &mut FeedEngine, client: &SearchClient, trigger: Trigger) {
    let plan = match engine.apply(trigger) {
        Some(plan) => plan,
        None => return,
    };
    let pb = fetch_spinner(match plan.kind {
        FetchKind::Initial => "loading results",
        FetchKind::More => "loading more",
    });
    let outcome = client.search(&plan.params, plan.offset, plan.limit).await;
    pb.finish_and_clear();
    if plan.kind == FetchKind::More {
        if let Err(e) = outcome.as_ref() {
            println!("{}", format!(":: load more failed : {e}").dimmed());
        }
    }
    engine.finish(plan.kind, outcome);
}

fn print_session_help() {
    println!();
    println!("commands:");
    println!("  query <text>      search for something new");
    println!("  refresh           re-run the current search from the first page");
    println!("  more              load the next page of results");
    println!("  sort <mode>       published_desc | published_asc | title_asc");
    println!("  month <YYYY-MM>   restrict to one month (empty clears)");
    println!("  ccf <A|B|C>       CCF ranking filter (empty clears)");
    println!("  toptier           toggle the top-tier venue filter");
    println!("  source <csv>      replace the selected sources");
    println!("  cat <filter>      client-side category filter (empty clears)");
    println!("  show              re-print the current view");
    println!("  summary           today's frontier digest");
    println!("  help, quit");
}

async fn interactive_session(run: &RunConfig) -> Result<(), String> {
    let client = SearchClient::new(
        &run.base_url,
        ClientOptions {
            timeout_seconds: run.timeout,
            proxy: run.proxy.clone(),
        },
    )
    .map_err(|e| e.to_string())?;

    let mut engine = FeedEngine::new(QueryState {
        query: run.query.clone(),
        sources: run.sources.clone(),
        sort: run.sort,
        category: run.category.clone(),
        month: run.month.clone(),
        top_tier: run.top_tier,
        ccf_level: run.ccf_level.clone(),
    });

    drive_trigger(&mut engine, &client, Trigger::Refresh).await;
    output::report::print_feed(&engine.snapshot());
    print_session_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!();
        print!("paperfeed> ");
        std::io::stdout()
            .flush()
            .map_err(|e| format!("failed to flush stdout: {e}"))?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read input: {e}")),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" | "?" => {
                print_session_help();
                continue;
            }
            "show" => {}
            "summary" => {
                let pb = fetch_spinner("loading daily summary");
                let fetched = client.daily_summary().await;
                pb.finish_and_clear();
                match fetched {
                    Ok(summary) => output::report::print_summary(&summary),
                    Err(e) => println!("{} {}", "summary fetch failed:".red(), e),
                }
                continue;
            }
            "query" => {
                drive_trigger(&mut engine, &client, Trigger::SubmitQuery(rest.to_string()))
                    .await;
            }
            "refresh" => {
                drive_trigger(&mut engine, &client, Trigger::Refresh).await;
            }
            "more" => {
                if engine.end_of_results() {
                    println!("{}", "end of results".dimmed());
                    continue;
                }
                // the engine drops the trigger when there is nothing to extend
                drive_trigger(&mut engine, &client, Trigger::ScrollNearEnd).await;
            }
            "sort" => match SortMode::parse(rest) {
                Some(mode) => {
                    drive_trigger(&mut engine, &client, Trigger::SetSort(mode)).await;
                }
                None => {
                    println!(
                        "invalid sort '{rest}', expected published_desc, published_asc, or title_asc"
                    );
                    continue;
                }
            },
            "month" => {
                if !rest.is_empty() && !utils::is_valid_month(rest) {
                    println!("invalid month '{rest}', expected YYYY-MM");
                    continue;
                }
                let month = if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                };
                drive_trigger(&mut engine, &client, Trigger::SetMonth(month)).await;
            }
            "ccf" => {
                let level = rest.to_uppercase();
                if !level.is_empty() && !matches!(level.as_str(), "A" | "B" | "C") {
                    println!("invalid ccf level '{rest}', expected A, B, or C");
                    continue;
                }
                let level = if level.is_empty() { None } else { Some(level) };
                drive_trigger(&mut engine, &client, Trigger::SetCcfLevel(level)).await;
            }
            "toptier" => {
                let enabled = !engine.query_state().top_tier;
                drive_trigger(&mut engine, &client, Trigger::SetTopTier(enabled)).await;
            }
            "source" | "sources" => {
                let sources = utils::parse_sources_csv(rest);
                drive_trigger(&mut engine, &client, Trigger::SetSources(sources)).await;
            }
            "cat" | "category" => {
                // client-only: recompute the view, no fetch
                engine.set_category(rest);
            }
            _ => {
                println!("unknown command '{command}', type 'help'");
                continue;
            }
        }

        output::report::print_feed(&engine.snapshot());
    }

    Ok(())
}

async fn write_output_file(run: &RunConfig, records: &[output::PaperRecord]) -> Result<(), String> {
    let outfile_path = match run.output.as_ref() {
        Some(path) => path,
        None => return Ok(()),
    };
    let output_format = run
        .output_format
        .as_deref()
        .and_then(output::OutputFormat::parse)
        .or_else(|| output::infer_format_from_path(outfile_path))
        .unwrap_or(output::OutputFormat::Text);

    let rendered = match output_format {
        output::OutputFormat::Text => output::render_text(records),
        output::OutputFormat::Json => output::render_json(records),
    };

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(outfile_path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())?;
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.summary {
        let client = SearchClient::new(
            &run.base_url,
            ClientOptions {
                timeout_seconds: run.timeout,
                proxy: run.proxy.clone(),
            },
        )
        .map_err(|e| e.to_string())?;
        let pb = fetch_spinner("loading daily summary");
        let fetched = client.daily_summary().await;
        pb.finish_and_clear();
        let summary = fetched.map_err(|e| format!("daily summary fetch failed: {e}"))?;
        output::report::print_summary(&summary);
        return Ok(());
    }

    format_kv_line("target", &run.base_url);
    if !run.query.trim().is_empty() {
        format_kv_line("query", run.query.trim());
    }
    format_kv_line("sources", &run.sources.join(", "));
    format_kv_line("sort", run.sort.as_param());
    if let Some(month) = run.month.as_deref() {
        format_kv_line("month", month);
    }
    if let Some(level) = run.ccf_level.as_deref() {
        format_kv_line("ccf", level);
    }
    if run.top_tier {
        format_kv_line("top-tier", "true");
    }

    if run.interactive {
        return interactive_session(&run).await;
    }

    format_kv_line("pages", &run.pages.to_string());

    let runner = Runner::new(Options {
        base_url: run.base_url.clone(),
        query: run.query.clone(),
        sources: run.sources.clone(),
        sort: run.sort,
        category: run.category.clone(),
        month: run.month.clone(),
        top_tier: run.top_tier,
        ccf_level: run.ccf_level.clone(),
        pages: run.pages,
        timeout_seconds: run.timeout,
        proxy: run.proxy.clone(),
    })
    .map_err(|e| e.to_string())?;

    let pb = fetch_spinner("fetching feed");
    let result = runner.run().await;
    pb.finish_and_clear();
    let result = result.map_err(|e| e.to_string())?;

    output::report::print_feed(&result.snapshot);

    let records = output::build_records(&result.snapshot.papers);
    write_output_file(&run, &records).await?;

    println!();
    println!(
        ":: Completed :: {} pages in {}ms ::",
        result.pages_requested,
        result.elapsed.as_millis()
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
