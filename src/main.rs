//! SIR Scenarios - Entry Point
//!
//! `simulate` runs every scenario in a TOML scenario file and writes the
//! concatenated daily records as CSV. `fetch` downloads an observational
//! dataset for comparison.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use sir_scenarios::core::config::ScenarioFile;
use sir_scenarios::core::error::Result;
use sir_scenarios::data::io::write_csv;
use sir_scenarios::data::paths::ProjectPaths;
use sir_scenarios::epidemic::{compare_to_baseline, SimulationOutput};
use sir_scenarios::remote::{FetchOptions, MetricClient, MetricQuery};

/// Deterministic SIR trajectories for baseline vs intervention comparison
#[derive(Parser, Debug)]
#[command(name = "sir-scenarios")]
#[command(about = "Generate and compare synthetic SIR epidemic scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every scenario in a scenario file
    Simulate {
        /// Path to the TOML scenario file
        #[arg(long)]
        config: PathBuf,

        /// CSV destination (overrides the file's `output`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Download a comparison dataset
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Full metric URL; takes precedence over the hierarchy flags
    #[arg(long)]
    url: Option<String>,

    #[arg(long, default_value = "infectious_disease")]
    theme: String,

    #[arg(long, default_value = "respiratory")]
    sub_theme: String,

    #[arg(long, default_value = "COVID-19")]
    topic: String,

    #[arg(long, default_value = "Nation")]
    geography_type: String,

    #[arg(long, default_value = "England")]
    geography: String,

    #[arg(long, default_value = "COVID-19_cases_casesByDay")]
    metric: String,

    /// Server-side filter as key=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    #[arg(long)]
    page_size: Option<u32>,

    /// CSV destination (defaults to data/raw/<metric>.csv)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sir_scenarios=info")),
        )
        .init();

    let cli = Cli::parse();
    let paths = ProjectPaths::default();

    match cli.command {
        Command::Simulate { config, output } => run_simulate(&paths, config, output),
        Command::Fetch(args) => run_fetch(&paths, args),
    }
}

fn run_simulate(paths: &ProjectPaths, config: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let file = ScenarioFile::load(&config)?;
    let destination = output
        .or_else(|| file.output.clone())
        .unwrap_or_else(|| paths.processed_data_dir().join("sir_scenarios.csv"));

    let set = file.into_scenario_set()?;
    let outputs = set.run_each()?;

    for run in &outputs {
        tracing::info!("{}", run.summary());
    }
    report_against_baseline(&outputs)?;

    let records: Vec<_> = outputs
        .into_iter()
        .flat_map(SimulationOutput::into_records)
        .collect();
    write_csv(&records, &destination)?;

    println!("{} records written to {}", records.len(), destination.display());
    Ok(())
}

/// Log how far each scenario moves the epidemic peak relative to the first one
fn report_against_baseline(outputs: &[SimulationOutput]) -> Result<()> {
    let Some((baseline, others)) = outputs.split_first() else {
        return Ok(());
    };

    for other in others {
        let deltas = compare_to_baseline(baseline, other)?;
        if let Some(largest) = deltas
            .iter()
            .min_by(|a, b| a.infected_delta.total_cmp(&b.infected_delta))
        {
            tracing::info!(
                scenario = %other.scenario,
                baseline = %baseline.scenario,
                day = largest.day,
                infected_delta = largest.infected_delta,
                "Largest reduction in infected"
            );
        }
    }
    Ok(())
}

fn run_fetch(paths: &ProjectPaths, args: FetchArgs) -> Result<()> {
    let rt = Runtime::new()?;
    let client = MetricClient::from_env()?;

    let mut options = FetchOptions::default();
    for (key, value) in args.filters {
        options = options.with_filter(key, value);
    }
    options.page_size = args.page_size;

    let default_name = format!("{}.csv", args.metric);
    let frame = match args.url {
        Some(url) => rt.block_on(client.fetch_metric_by_url(&url, &options))?,
        None => {
            let query = MetricQuery {
                theme: args.theme,
                sub_theme: args.sub_theme,
                topic: args.topic,
                geography_type: args.geography_type,
                geography: args.geography,
                metric: args.metric,
            };
            rt.block_on(client.fetch_metric(&query, &options))?
        }
    };

    if frame.is_empty() {
        tracing::warn!("Remote dataset returned no rows");
    }

    let destination = args
        .output
        .unwrap_or_else(|| paths.raw_data_dir().join(default_name));
    frame.write_csv(&destination)?;

    println!("{} rows written to {}", frame.len(), destination.display());
    Ok(())
}
