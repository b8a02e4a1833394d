//! ScanBuddy CLI - practise the stay-still challenge in a terminal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scanbuddy_core::{ScanType, TrackerConfig, TrackerSnapshot};
use scanbuddy_stillness::presentation;
use scanbuddy_stillness::{
    ChallengeSession, IntervalClock, JsonLinesMotionSource, MotionAvailability, MotionSource,
    ScriptedMotionSource, SessionOutcome,
};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BAR_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "scanbuddy")]
#[command(about = "Get ready for a scan by practising staying still", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the stay-still challenge
    Practice {
        /// Scan type (mri, ct, xray, ultrasound)
        #[arg(long, default_value = "mri")]
        scan: String,
        /// JSON config file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seconds of continuous stillness required
        #[arg(long)]
        goal: Option<f64>,
        /// Movement threshold, in sample units
        #[arg(long)]
        threshold: Option<f64>,
        /// Seconds between ticks
        #[arg(long)]
        tick: Option<f64>,
        /// Magnitude of a device at rest (9.81 raw, 1.0 in g)
        #[arg(long)]
        rest: Option<f64>,
        /// Sample source: stdin, none, or script:<file>
        #[arg(long, default_value = "stdin")]
        source: String,
        /// Print snapshots as JSON lines instead of a progress bar
        #[arg(long)]
        json: bool,
    },
    /// List scan types and their challenge hints
    Scans,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Practice {
            scan,
            config,
            goal,
            threshold,
            tick,
            rest,
            source,
            json,
        } => {
            let mut tracker_config = match config {
                Some(path) => TrackerConfig::from_json_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => TrackerConfig::default(),
            };
            if let Some(goal) = goal {
                tracker_config.goal_seconds = goal;
            }
            if let Some(threshold) = threshold {
                tracker_config.movement_threshold = threshold;
            }
            if let Some(tick) = tick {
                tracker_config.tick_interval_seconds = tick;
            }
            if let Some(rest) = rest {
                tracker_config.rest_magnitude = rest;
            }
            tracker_config.validate().context("Invalid challenge settings")?;

            let scan = ScanType::parse_or_default(&scan);
            let source = open_source(&source)?;
            practice(scan, tracker_config, source, json).await?;
        }
        Commands::Scans => {
            println!("Scan types ({})", ScanType::ALL.len());
            for scan in ScanType::ALL {
                println!("  {:<10} | {}", scan.label(), scan.challenge_hint());
            }
        }
    }

    Ok(())
}

fn open_source(spec: &str) -> Result<MotionAvailability<Box<dyn MotionSource>>> {
    let source: Box<dyn MotionSource> = match spec {
        "none" => return Ok(MotionAvailability::Unavailable),
        "stdin" => Box::new(JsonLinesMotionSource::new(BufReader::new(tokio::io::stdin()))),
        other => {
            let Some(path) = other.strip_prefix("script:") else {
                anyhow::bail!("Unknown source '{}': expected stdin, none, or script:<file>", other);
            };
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read sample script {}", path))?;
            let script = ScriptedMotionSource::from_json(&content)
                .with_context(|| format!("Failed to parse sample script {}", path))?;
            info!("Loaded {} scripted samples", script.remaining());
            Box::new(script)
        }
    };
    Ok(MotionAvailability::Available(source))
}

async fn practice(
    scan: ScanType,
    config: TrackerConfig,
    source: MotionAvailability<Box<dyn MotionSource>>,
    json: bool,
) -> Result<()> {
    let clock = IntervalClock::new(config.tick_interval());
    let session = ChallengeSession::new(config, source, clock)?;
    let mut updates = session.subscribe();

    if !json {
        println!("{}", presentation::header(scan));
        if let Some(notice) = presentation::sensor_notice(&updates.borrow()) {
            println!("{}", notice);
        }
    }

    let mut handle = session.spawn();

    let printer = tokio::spawn(async move {
        let mut last_drawn = None;
        while updates.changed().await.is_ok() {
            let snapshot = *updates.borrow_and_update();
            // Redraw once per tick or status change.
            let key = (snapshot.ticks, snapshot.is_currently_still);
            if last_drawn == Some(key) {
                continue;
            }
            last_drawn = Some(key);
            render(&snapshot, json);
        }
    });

    let report = tokio::select! {
        report = handle.wait() => report?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping challenge");
            handle.stop();
            handle.wait().await?
        }
    };
    printer.await?;

    match report.outcome {
        SessionOutcome::Completed => {
            if !json {
                println!("{}", presentation::FINISHED);
            }
            info!(session = %report.session_id, "Challenge complete");
        }
        SessionOutcome::Cancelled => {
            if !json {
                println!(
                    "Challenge stopped. {}",
                    presentation::counter_line(&report.final_snapshot)
                );
            }
        }
    }

    Ok(())
}

fn render(snapshot: &TrackerSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to encode snapshot: {}", e),
        }
    } else {
        println!("{}", presentation::frame(snapshot, BAR_WIDTH));
    }
}
