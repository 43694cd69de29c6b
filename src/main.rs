//! stockcut - CLI tool to estimate material for slat ceilings, baseboards and trim.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stockcut_rs::{
    estimate_project, generate_report, parse_project_file, validate_project, EngineConfig,
    EstimateError,
};

/// Estimate stock lengths, cut plans and accessories for a project file.
#[derive(Parser, Debug)]
#[command(name = "stockcut")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input project JSON file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output report file path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full estimate as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Validate only, don't estimate
    #[arg(long)]
    validate: bool,

    /// Baseboard bar length in meters
    #[arg(long)]
    bar_length: Option<f64>,

    /// Slat stock lengths in meters, comma separated
    #[arg(long, value_delimiter = ',')]
    slat_lengths: Option<Vec<f64>>,

    /// Offcut usability threshold in meters
    #[arg(long)]
    threshold: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of the project's settings.
    fn engine_config(&self, base: Option<EngineConfig>) -> EngineConfig {
        let mut config = base.unwrap_or_default();
        if let Some(bar_length) = self.bar_length {
            config.bar_length = bar_length;
        }
        if let Some(lengths) = &self.slat_lengths {
            config.slat_lengths = lengths.clone();
        }
        if let Some(threshold) = self.threshold {
            config.offcut_threshold = threshold;
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Processing: {}", args.input.display());

    let project = parse_project_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    info!(
        "Parsed {} room(s), {} extra requirement(s)",
        project.rooms.len(),
        project.extra_requirements.len()
    );

    let validation = validate_project(&project)?;

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    // Invalid rooms are excluded from the estimate, not fatal
    for err in &validation.errors {
        error!("{}", err);
    }

    if args.validate {
        if !validation.passed {
            anyhow::bail!("Validation failed");
        }
        info!("Validation passed");
        return Ok(());
    }

    let config = args.engine_config(project.config.clone());
    let estimate = estimate_project(&project, &config).context("Estimation failed")?;

    for unmet in estimate.bill.unmet() {
        error!(
            "{}: {}",
            unmet.origin,
            EstimateError::NoSolutionFound {
                required: unmet.length
            }
        );
    }

    let output = if args.json {
        serde_json::to_string_pretty(&estimate)?
    } else {
        generate_report(&estimate)
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generated: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
