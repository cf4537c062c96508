//! Lap Compare CLI Application
//!
//! This is the command-line interface for the lap comparison library.
//! It uses lap-compare-core and adds:
//! - CSV session export loading
//! - TOML configuration files
//! - Parallel comparison of several rivals against one primary driver
//! - Text/JSON reports and a per-team fastest lap ranking

use anyhow::{Context, Result};
use clap::Parser;
use lap_compare_core::{
    fastest_per_team, ComparisonConfig, LapComparison, LapSelector, TelemetryProvider,
};
use rayon::prelude::*;
use std::path::PathBuf;

mod config;
mod report;
mod session;

use config::{AppConfig, OutputFormat};
use report::ComparisonSummary;
use session::CsvSession;

/// Lap Compare - Compare single-lap telemetry of two drivers on a shared distance axis
#[derive(Parser, Debug)]
#[command(name = "lap-compare-cli")]
#[command(about = "Compare lap telemetry (delta, sectors, heading) from a session export", long_about = None)]
#[command(version)]
struct Args {
    /// Session export directory (laps.csv, car_data/, pos_data/)
    #[arg(short, long, value_name = "DIR")]
    session: Option<PathBuf>,

    /// Primary driver (provides the distance grid and sector marks)
    #[arg(short, long, value_name = "DRIVER")]
    primary: Option<String>,

    /// Rival driver(s) to compare against the primary (can be repeated)
    #[arg(short, long, value_name = "DRIVER")]
    rival: Vec<String>,

    /// Lap to compare: "fastest" or a lap number
    #[arg(short, long, value_name = "LAP")]
    lap: Option<LapSelector>,

    /// Skip heading derivation (no position data needed)
    #[arg(long)]
    no_heading: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print the fastest lap of every team instead of comparing drivers
    #[arg(long)]
    teams: bool,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Settings after merging the config file with command-line flags
#[derive(Debug)]
struct RunSettings {
    session_dir: PathBuf,
    primary: Option<String>,
    rivals: Vec<String>,
    comparison: ComparisonConfig,
    format: OutputFormat,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Lap Compare CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using core library v{}", lap_compare_core::VERSION);

    let file_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            Some(config::load_config(path)?)
        }
        None => None,
    };

    let Some(settings) = resolve_settings(&args, file_config) else {
        println!("Lap Compare - No session specified");
        println!("\nQuick Start:");
        println!("  lap-compare-cli --session exports/spain_q --primary NOR --rival HAM");
        println!("  lap-compare-cli --session exports/spain_q --teams");
        println!("\nWith a configuration file:");
        println!("  lap-compare-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    let session = CsvSession::open(&settings.session_dir)
        .with_context(|| format!("Failed to open session {:?}", settings.session_dir))?;

    if args.teams {
        team_ranking_mode(&session)
    } else {
        compare_mode(&session, &settings)
    }
}

/// Merge the optional config file with command-line flags (flags win)
fn resolve_settings(args: &Args, file_config: Option<AppConfig>) -> Option<RunSettings> {
    let (mut settings, from_file) = match file_config {
        Some(cfg) => (
            RunSettings {
                session_dir: cfg.session.dir,
                primary: Some(cfg.drivers.primary),
                rivals: cfg.drivers.rivals,
                comparison: cfg.comparison,
                format: cfg.output.format,
            },
            true,
        ),
        None => (
            RunSettings {
                session_dir: args.session.clone()?,
                primary: None,
                rivals: Vec::new(),
                comparison: ComparisonConfig::default(),
                format: OutputFormat::default(),
            },
            false,
        ),
    };

    if from_file {
        if let Some(dir) = &args.session {
            settings.session_dir = dir.clone();
        }
    }
    if let Some(primary) = &args.primary {
        settings.primary = Some(primary.clone());
    }
    if !args.rival.is_empty() {
        settings.rivals = args.rival.clone();
    }
    if let Some(lap) = args.lap {
        settings.comparison.lap = lap;
    }
    if args.no_heading {
        settings.comparison.compute_heading = false;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }

    Some(settings)
}

/// Compare every rival against the primary driver and print the report
fn compare_mode(session: &CsvSession, settings: &RunSettings) -> Result<()> {
    let primary_driver = settings
        .primary
        .as_deref()
        .context("No primary driver given (use --primary or [drivers] in the config)")?;
    if settings.rivals.is_empty() {
        anyhow::bail!("No rival driver given (use --rival or [drivers].rivals in the config)");
    }
    config::validate_drivers(primary_driver, &settings.rivals)?;

    let lap = settings.comparison.lap;
    let primary = session
        .lap_data(primary_driver, lap)
        .with_context(|| format!("Failed to load {} ({})", primary_driver, lap))?;

    let comparison = LapComparison::new(settings.comparison.clone());

    // Each pair is independent; run them in parallel
    let summaries = settings
        .rivals
        .par_iter()
        .map(|rival| -> Result<ComparisonSummary> {
            let rival_lap = session
                .lap_data(rival, lap)
                .with_context(|| format!("Failed to load {} ({})", rival, lap))?;
            let output = comparison
                .compare(&primary, &rival_lap)
                .with_context(|| format!("Comparison {} vs {} failed", primary_driver, rival))?;
            Ok(ComparisonSummary::new(&primary, &rival_lap, &output))
        })
        .collect::<Result<Vec<_>>>()?;

    match settings.format {
        OutputFormat::Txt => print!("{}", report::render_text(&summaries)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
    }

    Ok(())
}

/// Print the fastest lap of each team
fn team_ranking_mode(session: &CsvSession) -> Result<()> {
    let laps = session.laps()?;
    let ranking = fastest_per_team(&laps);
    log::debug!("Ranked {} teams from {} laps", ranking.len(), laps.len());

    if ranking.is_empty() {
        println!("No timed laps in session");
    } else {
        print!("{}", report::render_team_ranking(&ranking));
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
