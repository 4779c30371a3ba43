use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use apifetch_engine::{DisplayOptions, DisplayOutcome, Fetcher, FieldFilter, RenderedListing};
use apifetch_registry::{ApiRegistry, FetchConfig, JSONPLACEHOLDER};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const RECORD_SEPARATOR: &str = "------------------------";

/// Fetch and display records from public JSON APIs.
#[derive(Debug, Parser)]
#[command(name = "apifetch", version, about)]
struct Cli {
    /// API profile to fetch (see --list)
    #[arg(default_value = JSONPLACEHOLDER)]
    profile: String,

    /// Maximum number of records to display
    #[arg(long)]
    limit: Option<usize>,

    /// Also show a filtered listing: path=value, path^=prefix, path*=text or path~=regex
    #[arg(long, value_name = "EXPR")]
    filter: Option<FieldFilter>,

    /// Request timeout in seconds (overrides config and APIFETCH_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Send the request to this URL instead of the profile's endpoint
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// List the available API profiles and exit
    #[arg(long)]
    list: bool,
}

const FETCH_FAILED: u8 = 1;
const USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    exit_code(run(cli, &mut io::stdout().lock()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Errors that escape `run` are selection or usage problems; fetch failures
/// are already mapped to their own code.
fn exit_code(result: Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("✗ Error: {error:#}");
            ExitCode::from(USAGE_ERROR)
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    if cli.list {
        for profile in ApiRegistry::builtin().profiles() {
            writeln!(out, "{:<16} {}", profile.name, profile.title)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = FetchConfig::load();
    if let Some(seconds) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    debug!(profile = %cli.profile, timeout_ms = config.timeout.as_millis() as u64, "resolved fetch config");

    let mut fetcher = Fetcher::for_profile(&cli.profile, config).context("cannot select API profile")?;
    if let Some(base_url) = cli.base_url {
        let profile = fetcher.profile().with_base_url(base_url);
        fetcher = Fetcher::new(profile, fetcher.config().clone());
    }

    writeln!(out, "Fetching data from {}...", fetcher.profile().title)?;
    writeln!(out, "URL: {}\n", fetcher.profile().base_url)?;
    match fetcher.fetch() {
        Ok(count) => writeln!(out, "✓ Successfully fetched {count} records.\n")?,
        Err(error) => {
            debug!(kind = %error.kind(), "fetch failed");
            eprintln!("✗ Error: {error}");
            return Ok(ExitCode::from(FETCH_FAILED));
        }
    }

    let total = fetcher.count();
    let all = fetcher.display(&DisplayOptions {
        limit: cli.limit,
        filter: None,
    });
    write_outcome(out, &all, total)?;

    if let Some(filter) = cli.filter {
        writeln!(out, "\nRecords where {filter}:\n")?;
        let filtered = fetcher.display(&DisplayOptions {
            limit: cli.limit,
            filter: Some(Box::new(filter)),
        });
        write_outcome(out, &filtered, total)?;
    }

    writeln!(out, "\nTotal records processed: {total}")?;
    Ok(ExitCode::SUCCESS)
}

/// `total` is the fetched record count; an empty fetch reads as no data.
fn write_outcome(out: &mut impl Write, outcome: &DisplayOutcome, total: usize) -> io::Result<()> {
    match outcome {
        DisplayOutcome::Listing(listing) if total > 0 => write_listing(out, listing),
        DisplayOutcome::NoData | DisplayOutcome::Listing(_) => {
            writeln!(out, "No data available. Please fetch data first.")
        }
    }
}

/// Blocks and skip warnings in source order.
fn write_listing(out: &mut impl Write, listing: &RenderedListing) -> io::Result<()> {
    let mut entries: Vec<(usize, String)> = listing
        .blocks
        .iter()
        .map(|block| (block.position, block.to_string()))
        .chain(
            listing
                .skipped
                .iter()
                .map(|skipped| (skipped.position, format!("⚠ Warning: {skipped}"))),
        )
        .collect();
    entries.sort_by_key(|(position, _)| *position);

    for (_, text) in entries {
        writeln!(out, "{text}")?;
        writeln!(out, "{RECORD_SEPARATOR}")?;
    }

    if listing.is_empty() {
        writeln!(out, "No records matched the filter criteria.")?;
    }
    Ok(())
}
