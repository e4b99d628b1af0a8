//! # Tractor Safety Supervisor
//!
//! Onboard safety supervisor and motion/actuator governor for an
//! autonomous field tractor. Loads the TOML configuration, builds the
//! [`Supervisor`], and runs the control loop against a simulated vehicle:
//! the battery drains slowly, ground speed follows the drive setpoints of
//! the previous cycle, and the aggregated telemetry record is emitted once
//! per second.
//!
//! The real vehicle replaces the simulation feed with the sensor and
//! command transports; the per-cycle contract of [`Supervisor::cycle`] is
//! identical either way.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use tractor_common::config::load_config;
use tractor_common::telemetry::TelemetryFrame;
use tractor_supervisor::supervisor::Supervisor;

/// Battery drain in the simulated vehicle [%/s].
const SIM_BATTERY_DRAIN_PCT_PER_S: f64 = 0.1;

/// Tractor Safety Supervisor — onboard motion and actuator governor
#[derive(Parser, Debug)]
#[command(name = "tractor_supervisor")]
#[command(version)]
#[command(about = "Safety supervisor and motion governor for an autonomous field tractor")]
struct Args {
    /// Path to the supervisor configuration TOML.
    #[arg(default_value = "config/tractor.toml")]
    config: PathBuf,

    /// Control loop rate [Hz].
    #[arg(long, default_value_t = 10)]
    rate_hz: u32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Tractor Supervisor v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Tractor Supervisor shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    info!(
        "Config OK: max_speed={} km/h, check_interval={} s, load_duration={} s",
        config.safety.max_speed_kph, config.safety.check_interval_s, config.loader.load_duration_s,
    );

    let mut supervisor = Supervisor::new(config)?;

    // Ctrl-C doubles as the emergency stop in simulation: the first signal
    // trips the estop latch, the second stops the loop.
    let running = Arc::new(AtomicBool::new(true));
    let estop = supervisor.estop_handle();
    let r = running.clone();
    ctrlc::set_handler(move || {
        if estop.is_set() || !r.load(Ordering::SeqCst) {
            r.store(false, Ordering::SeqCst);
        } else {
            info!("Received signal, tripping emergency stop (repeat to exit)");
            estop.trip();
        }
    })?;

    let cycle_period = Duration::from_secs_f64(1.0 / f64::from(args.rate_hz.max(1)));
    info!("Entering control loop at {} Hz", args.rate_hz.max(1));

    let mut battery_pct = 100.0_f64;
    let mut speed_kph = 0.0_f64;
    let mut last_report: Option<Instant> = None;

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();

        battery_pct = (battery_pct
            - SIM_BATTERY_DRAIN_PCT_PER_S * cycle_period.as_secs_f64())
        .max(0.0);
        let frame = TelemetryFrame::full(battery_pct, 25.0, speed_kph, false);

        let output = supervisor.cycle(frame, None, now);
        speed_kph = output.speed_estimate_kph;

        let due =
            last_report.map_or(true, |t| now.duration_since(t) >= Duration::from_secs(1));
        if due {
            last_report = Some(now);
            match serde_json::to_string(&output.record) {
                Ok(json) => info!(record = %json, "telemetry"),
                Err(e) => error!("telemetry serialization failed: {e}"),
            }
        }

        std::thread::sleep(cycle_period);
    }

    let stats = supervisor.stats();
    info!(
        cycles = stats.cycles,
        estop_trips = stats.estop_trips,
        commands_rejected = stats.commands_rejected,
        "control loop stopped"
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
