use anyhow::{Context, Result};
use clap::Parser;
use roster_merge::config::{DEFAULT_ROOMS_PATH, DEFAULT_STUDENTS_PATH};
use roster_merge::{Pipeline, PipelineConfig};
use std::path::PathBuf;

/// Attach students to their rooms and write the result as JSON or XML
#[derive(Debug, Parser)]
#[command(name = "roster-merge", version, about)]
struct Cli {
    /// Path to the .json file with rooms data
    #[arg(short, long, env = "ROSTER_ROOMS", default_value = DEFAULT_ROOMS_PATH)]
    rooms: PathBuf,

    /// Path to the .json file with students data
    #[arg(short, long, env = "ROSTER_STUDENTS", default_value = DEFAULT_STUDENTS_PATH)]
    students: PathBuf,

    /// Output format: json or xml
    #[arg(short, long)]
    format: String,

    /// Directory for students_rooms_data.<format>
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the document to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("roster-merge error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = PipelineConfig::new(&cli.rooms, &cli.students, &cli.format)
        .context("invalid configuration")?
        .with_output_dir(&cli.output_dir);

    let mut pipeline = Pipeline::new(config);

    if cli.stdout {
        let (document, _) = pipeline.render().context("pipeline failed")?;
        println!("{document}");
        return Ok(());
    }

    let report = pipeline.run().context("pipeline failed")?;
    if !cli.quiet {
        let destination = report
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!(
            "✓ {} rooms, {} students ({} unmatched) → {}",
            report.rooms, report.students, report.unmatched, destination
        );
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ROSTER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
