//! CLI entry point: run one discovery pass and print the results.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldscout_common::{Config, DiscoveryCriteria, SourceId, Sport};
use fieldscout_discovery::{DiscoveryEngine, DiscoveryRequest};

/// Run a single athlete discovery pass across the configured sources.
#[derive(Parser, Debug)]
#[command(name = "fieldscout-discovery")]
struct Args {
    /// Sport to search for (basketball, football, ...).
    #[arg(long)]
    sport: Option<String>,

    /// Two-letter state filter, e.g. TX.
    #[arg(long)]
    state: Option<String>,

    /// Graduation year filter, e.g. 2026.
    #[arg(long)]
    year: Option<u16>,

    /// Position filter, e.g. PG.
    #[arg(long)]
    position: Option<String>,

    /// Drop profiles scoring below this.
    #[arg(long)]
    min_score: Option<u8>,

    /// Cap on returned profiles.
    #[arg(long, default_value_t = 100)]
    max_results: usize,

    /// Comma-separated sources; empty means the scraping defaults.
    #[arg(long, value_delimiter = ',')]
    sources: Vec<String>,

    /// Skip the structured APIs.
    #[arg(long)]
    no_apis: bool,

    /// Region tag passed through to the sources.
    #[arg(long, default_value = "US")]
    region: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("fieldscout_discovery=info".parse()?)
                .add_directive("fieldscout_common=info".parse()?)
                .add_directive("webfetch=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    config.log_redacted();

    let mut sources = Vec::new();
    for raw in &args.sources {
        match SourceId::parse(raw) {
            Some(id) => sources.push(id),
            None => bail!("unknown source: '{raw}'"),
        }
    }

    let criteria = DiscoveryCriteria::builder()
        .sport(args.sport.as_deref().map(Sport::from_str_loose))
        .state(args.state.clone())
        .graduation_year(args.year)
        .position(args.position.clone())
        .min_quality_score(args.min_score)
        .max_results(args.max_results)
        .build();

    let request = DiscoveryRequest {
        sources,
        criteria,
        region: args.region.clone(),
        use_apis: !args.no_apis,
        api_keys: HashMap::new(),
    };

    let engine = DiscoveryEngine::new(&config);
    let report = engine
        .discover(&request)
        .await
        .context("discovery run failed")?;

    println!("{}", report.stats);
    if !report.errors.is_empty() {
        println!("Errors:");
        for error in &report.errors {
            println!("  {error}");
        }
    }
    println!("Top profiles:");
    for profile in report.profiles.iter().take(10) {
        let sources = profile
            .sources
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("+");
        println!(
            "  [{:>3}] {} | {} | {}",
            profile.quality_score, profile.name, profile.school, sources
        );
    }

    Ok(())
}
