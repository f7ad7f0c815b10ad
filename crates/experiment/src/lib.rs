//! # `bystander-experiment` Library Crate
//!
//! Offline evaluation of guidance pipeline versions. Each version is run over a
//! battery of Thai emergency scenarios and the prompts, replies, token usage and
//! postprocessed outputs are written to a file-based tracking store.

pub mod registry;
pub mod runner;
pub mod scenarios;
pub mod tracking;

use anyhow::{bail, Result};
use bystander::providers::factory::{create_provider, ProviderKind};
use clap::{Parser, Subcommand};
use registry::VersionRegistry;
use runner::{ExperimentRunner, RunSummary};
use std::path::PathBuf;
use tracking::FileTrackingStore;
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run experiment versions over the scenario battery
    Run(RunArgs),
    /// List the available versions and any recorded runs
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Versions to run (e.g. "V1_Baseline,V4_Section_Parser"). Defaults to all.
    #[arg(long, value_delimiter = ',')]
    pub versions: Vec<String>,
    /// Directory of the tracking store.
    #[arg(long, default_value = "mlruns")]
    pub tracking_dir: PathBuf,
    /// A JSON array of scenario strings. Defaults to the built-in battery.
    #[arg(long)]
    pub scenarios: Option<PathBuf>,
    /// The Anthropic API key.
    #[arg(long, env = "CLAUDE_KEY", hide_env_values = true)]
    pub claude_key: Option<String>,
    /// Overrides the Anthropic Messages API URL.
    #[arg(long, env = "CLAUDE_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Also list the runs recorded in this tracking store.
    #[arg(long)]
    pub tracking_dir: Option<PathBuf>,
}

// --- Public Entrypoint ---

/// The main entry point for the `bystander-experiment` library.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let summaries = handle_run(args).await?;
            for s in &summaries {
                println!(
                    "{}: run {} ({} scenarios, {} errors, tokens in/out {}/{})",
                    s.version_key,
                    s.run_id,
                    s.scenario_count,
                    s.error_count,
                    s.total_input_tokens,
                    s.total_output_tokens
                );
            }
            Ok(())
        }
        Commands::List(args) => handle_list(args),
    }
}

// --- Command Handlers ---

/// Handles `bystander-experiment run`.
///
/// Refuses to start without a Claude key: a run made entirely of provider
/// errors has nothing to evaluate.
pub async fn handle_run(args: RunArgs) -> Result<Vec<RunSummary>> {
    info!("Starting 'run' command with versions {:?}", args.versions);

    let Some(claude_key) = args.claude_key.filter(|k| !k.trim().is_empty()) else {
        bail!("CLAUDE_KEY environment variable not found. Exiting without running experiments.");
    };

    let registry = VersionRegistry::builtin();
    let versions = registry.select(&args.versions)?;
    let scenarios = scenarios::load_scenarios(args.scenarios.as_deref())?;

    let provider = create_provider(ProviderKind::Claude, args.api_url, Some(claude_key))?;
    let runner = ExperimentRunner::new(provider, FileTrackingStore::new(&args.tracking_dir));

    let mut summaries = Vec::with_capacity(versions.len());
    for version in versions {
        summaries.push(runner.run_version(version, &scenarios).await?);
    }

    info!(
        "All experiments complete. Results are in '{}'.",
        args.tracking_dir.display()
    );
    Ok(summaries)
}

/// Handles `bystander-experiment list`.
fn handle_list(args: ListArgs) -> Result<()> {
    let registry = VersionRegistry::builtin();
    println!("Versions:");
    for version in registry.iter() {
        println!(
            "  {:<20} {} -> {} ({})",
            version.key,
            version.preprocessor.name(),
            version.postprocessor.name(),
            version.prompt_file
        );
    }

    if let Some(dir) = args.tracking_dir {
        let runs = FileTrackingStore::new(&dir).list_runs()?;
        println!("Runs in '{}':", dir.display());
        for meta in runs {
            println!(
                "  {} {:<45} {:?} {}",
                meta.run_id,
                meta.run_name,
                meta.status,
                meta.tags.get("version_key").map(String::as_str).unwrap_or("-")
            );
        }
    }
    Ok(())
}
