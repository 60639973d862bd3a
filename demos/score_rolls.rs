//! Scores a roll sequence from the command line and prints the frame report as JSON.
//!
//! Run with: `cargo run --example score_rolls -- 10 7 3 9 0`
//!
//! A negative roll must follow `--`, e.g. `cargo run --example score_rolls -- -- 3 -1`.
//!
//! Any internal invariant violation found while scoring is printed to stderr as
//! JSON after the report.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::disallowed_macros
)]

use clap::Parser;
use std::sync::Arc;
use tenpin::telemetry::CollectingObserver;
use tenpin::{ScoreGenerator, ScoringConfig};

#[derive(Parser)]
struct Opt {
    /// Pins knocked down by each roll, in order
    rolls: Vec<i32>,
    /// Frames per game
    #[arg(short, long, default_value_t = tenpin::MAX_FRAMES)]
    frames: u8,
    /// Pins per rack
    #[arg(short, long, default_value_t = tenpin::MAX_PINS)]
    pins: u8,
    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
    /// Log frame bookkeeping at trace level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    let level = if opt.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let config = ScoringConfig {
        max_pins: opt.pins,
        max_frames: opt.frames,
    };
    let violations = Arc::new(CollectingObserver::new());
    let generator = ScoreGenerator::with_config(config)?.with_violation_observer(violations.clone());

    let report = match generator.generate(&opt.rolls) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("rejected: {err}");
            return Err(err.into());
        },
    };

    let json = if opt.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    for violation in violations.violations() {
        eprintln!("violation: {}", serde_json::to_string(&violation)?);
    }

    match report.final_score() {
        Some(score) => eprintln!("final score: {score}"),
        None => eprintln!(
            "game in progress: {} after {} frames",
            report.running_total(),
            report.len()
        ),
    }
    Ok(())
}
