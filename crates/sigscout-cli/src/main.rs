//! sigscout command line interface.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sigscout_core::{load_app_config, load_sources, AppConfig};

mod artifacts;
mod wiring;


#[derive(Debug, Parser)]
#[command(name = "sigscout")]
#[command(about = "Topic signal scouting: market content, internal docs, product metrics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one scouting pass and write report artifacts.
    Run {
        /// Topic to scout for.
        #[arg(long)]
        topic: String,
        /// Optional focus term to sharpen relevance.
        #[arg(long)]
        focus: Option<String>,
        /// Directory for report artifacts.
        #[arg(long, default_value = "./reports")]
        out: PathBuf,
    },
    /// Validate and print the sources configuration.
    Sources,
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Run { topic, focus, out } => run(&config, &topic, focus.as_deref(), &out).await,
        Commands::Sources => show_sources(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(
    config: &AppConfig,
    topic: &str,
    focus: Option<&str>,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let sources = load_sources(&config.sources_path)?;
    let orchestrator = wiring::build_orchestrator(config, &sources)?;

    let report = orchestrator.run(topic, focus).await?;
    artifacts::write_artifacts(&report, out_dir)?;

    println!("run {} complete", report.run_id);
    println!(
        "  {} of 3 collectors succeeded, {} signals in {} ms",
        report.successful_collector_count, report.total_signal_count, report.execution_time_ms
    );
    for result in report.results() {
        match (&result.error, &result.note) {
            (Some(error), _) => println!("  {}: failed ({error})", result.collector),
            (None, Some(note)) => {
                println!("  {}: {} signals ({note})", result.collector, result.signals.len());
            }
            (None, None) => {
                println!("  {}: {} signals", result.collector, result.signals.len());
            }
        }
    }
    println!("artifacts written to {}", out_dir.display());
    Ok(())
}

fn show_sources(config: &AppConfig) -> anyhow::Result<()> {
    let sources = load_sources(&config.sources_path)?;

    println!("sources from {}", config.sources_path.display());
    println!("feeds ({}):", sources.feeds.len());
    for feed in &sources.feeds {
        println!("  {} -> {}", feed.name, feed.url);
    }
    println!("scan directories ({}):", sources.scan.directories.len());
    for dir in &sources.scan.directories {
        println!("  {}", dir.display());
    }
    println!(
        "  extensions: {} (max {} bytes per file)",
        sources.scan.extensions.join(", "),
        sources.scan.max_file_bytes
    );
    println!("metric endpoints ({}):", sources.metric_endpoints.len());
    for endpoint in &sources.metric_endpoints {
        println!("  {} -> {}", endpoint.name, endpoint.url);
    }
    Ok(())
}
