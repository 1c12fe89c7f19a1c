//! hb-search: search HostelBazaar listing catalogs from the command line.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hostelbazaar_search::config::find_config_file_in;
use hostelbazaar_search::observer::TracingObserver;
use hostelbazaar_search::{
    CatalogItem, FuzzyMatcher, MatcherConfig, SearchErrorCode, SearchEvent, SearchObserver,
};
use hostelbazaar_telemetry::{MetricsObserver, TelemetryConfig, Timer};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

mod output;

use output::{format_count, format_duration, Status};

/// Typo-tolerant search over HostelBazaar listings
#[derive(Parser)]
#[command(name = "hb-search")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Matcher config file (defaults to .hostelbazaar.toml and friends)
    #[arg(short, long, global = true, env = "HOSTELBAZAAR_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Do not record search metrics
    #[arg(long, global = true)]
    no_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a JSON catalog of listings
    Search {
        /// Path to a JSON array of listings
        catalog: PathBuf,

        /// Query as typed, e.g. "used laptop under 500"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Show at most this many results
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print matching listings as JSON
        #[arg(long)]
        json: bool,

        /// Include field scores for ranked results
        #[arg(long)]
        scores: bool,
    },

    /// Show how a query is interpreted
    Explain {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Correct words with the configured dictionary
    Correct {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Inspect matcher configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Validate a config file (defaults to the discovered one)
    Check {
        path: Option<PathBuf>,
    },
}

/// Forwards events to `tracing` and the metrics registry.
struct CliObserver {
    tracing: TracingObserver,
    metrics: Option<MetricsObserver>,
}

impl SearchObserver for CliObserver {
    fn on_event(&self, event: &SearchEvent<'_>) {
        self.tracing.on_event(event);
        if let Some(metrics) = &self.metrics {
            metrics.on_event(event);
        }
    }
}

/// A ranked hit as printed by `search --json --scores`
#[derive(Serialize)]
struct ScoredHit<'a> {
    index: usize,
    item: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<hostelbazaar_search::FieldScores>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig {
        json: cli.log_json,
        metrics_enabled: !cli.no_metrics,
        ..TelemetryConfig::default()
    }
    .with_verbosity(cli.verbose);
    let metrics = telemetry.metrics_enabled;

    if let Err(e) = hostelbazaar_telemetry::init_with_config(telemetry) {
        Status::error(&format!("{e:#}"));
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Search { catalog, query, limit, json, scores } => {
            let matcher = build_matcher(cli.config.as_deref(), metrics);
            matcher.and_then(|m| run_search(&m, &catalog, &query.join(" "), limit, json, scores))
        }
        Commands::Explain { query, json } => build_matcher(cli.config.as_deref(), metrics)
            .and_then(|m| run_explain(&m, &query.join(" "), json)),
        Commands::Correct { words } => {
            build_matcher(cli.config.as_deref(), metrics).and_then(|m| run_correct(&m, &words))
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(cli.config.as_deref()),
            ConfigAction::Check { path } => {
                return run_config_check(path.as_deref().or(cli.config.as_deref()));
            }
        },
    };

    if metrics && cli.verbose > 0 {
        tracing::debug!(metrics = %hostelbazaar_telemetry::metrics().export_json(), "Session metrics");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn build_matcher(config_path: Option<&Path>, metrics: bool) -> anyhow::Result<FuzzyMatcher> {
    let config = MatcherConfig::load(config_path).context("Failed to load matcher config")?;
    let observer = CliObserver {
        tracing: TracingObserver,
        metrics: metrics.then(MetricsObserver::global),
    };
    Ok(FuzzyMatcher::new(config)?.with_observer(Arc::new(observer)))
}

fn load_catalog(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Catalog {} is not valid JSON", path.display()))?;

    match value {
        Value::Array(items) => Ok(items),
        _ => bail!("Catalog {} must be a JSON array of listings", path.display()),
    }
}

fn run_search(
    matcher: &FuzzyMatcher,
    catalog: &Path,
    query: &str,
    limit: Option<usize>,
    json: bool,
    show_scores: bool,
) -> anyhow::Result<()> {
    hostelbazaar_telemetry::timed_span!("cli.search_command", catalog = %catalog.display());
    let raw = load_catalog(catalog)?;
    let items: Vec<CatalogItem> = raw.iter().map(CatalogItem::from_value).collect();

    let timer = Timer::start("cli.search_ms");
    let mut hits = matcher.rank(&items, query);
    let elapsed = timer.stop();
    tracing::info!(query, total = items.len(), matched = hits.len(), "Search finished");

    hits.truncate(limit.unwrap_or(usize::MAX));

    if json {
        if show_scores {
            let scored: Vec<ScoredHit<'_>> = hits
                .iter()
                .map(|hit| ScoredHit {
                    index: hit.index,
                    item: &raw[hit.index],
                    scores: hit.scores,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&scored)?);
        } else {
            let matched: Vec<&Value> = hits.iter().map(|hit| &raw[hit.index]).collect();
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }
        return Ok(());
    }

    Status::header(&format!("Results for \"{}\"", query.trim()));
    if hits.is_empty() {
        Status::info("No listings matched");
    }
    for (rank, hit) in hits.iter().enumerate() {
        let scores = if show_scores { hit.scores.as_ref() } else { None };
        output::print_hit(rank + 1, hit.item, scores);
    }
    println!();
    Status::success(&format!(
        "{} of {} in {}",
        format_count(hits.len(), "listing", "listings"),
        items.len(),
        format_duration(elapsed)
    ));

    Ok(())
}

fn run_explain(matcher: &FuzzyMatcher, query: &str, json: bool) -> anyhow::Result<()> {
    let intent = matcher.interpret(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&intent)?);
    } else {
        output::print_intent(&intent);
    }
    Ok(())
}

fn run_correct(matcher: &FuzzyMatcher, words: &[String]) -> anyhow::Result<()> {
    for word in words {
        println!("{}", output::describe_correction(&matcher.correct(word)));
    }
    Ok(())
}

fn run_config_show(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = MatcherConfig::load(config_path).context("Failed to load matcher config")?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Exit 0 when valid, 2 when the file is unreadable or invalid.
fn run_config_check(path: Option<&Path>) -> ExitCode {
    let resolved = path
        .map(Path::to_path_buf)
        .or_else(|| find_config_file_in(Path::new(".")));
    let label = resolved
        .as_deref()
        .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string());

    match MatcherConfig::load(resolved.as_deref()).and_then(FuzzyMatcher::new) {
        Ok(_) => {
            Status::success(&format!("Config OK ({label})"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.code();
            tracing::debug!(code = code as u32, "Config check failed");
            Status::error(&format!("Invalid config [{}]: {e}", code as u32));
            if code == SearchErrorCode::ConfigRead {
                Status::info("Check the path and file permissions");
            }
            ExitCode::from(2)
        }
    }
}
