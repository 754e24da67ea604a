//! ---
//! sdv_section: "01-core-functionality"
//! sdv_subsection: "binary"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Binary entrypoint for the SDV-Edge simulator."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use rand::Rng;
use tracing::{debug, error, info};

use sdv_edge_client::IngestClient;
use sdv_edge_common::config::{LoggingConfig, RunSettings, SimulatorConfig, VehicleProfile};
use sdv_edge_common::logging::{init_tracing, LogFormat};
use sdv_edge_common::version::VersionInfo;
use sdv_edge_sim::{AlertEvaluator, TelemetryEngine};

mod run;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "SDV-Edge vehicle telemetry simulator",
    long_about = None
)]
struct Cli {
    /// Mission identifier to run the vehicle under
    #[arg(long, required_unless_present = "version")]
    mission: Option<String>,

    /// Collector base URL; falls back to API_BASE_URL when omitted
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:5001")]
    server: String,

    /// Vehicle identifier (auto-generated when omitted)
    #[arg(long)]
    vehicle_id: Option<String>,

    /// Simulation duration in minutes
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Interval between telemetry ticks in seconds
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// Starting latitude of the patrol centre (default 40.7128)
    #[arg(long)]
    lat: Option<f64>,

    /// Starting longitude of the patrol centre (default -74.0060)
    #[arg(long)]
    lon: Option<f64>,

    /// Path to a TOML vehicle profile
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Pretty)]
    log_format: CliLogFormat,

    /// Print extended version information and exit
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::StructuredJson,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", VersionInfo::current().extended());
        return Ok(());
    }

    let config = build_config(&cli)?;
    init_tracing("sdv-edged", &config.logging);

    info!(
        version = %VersionInfo::current().cli_string(),
        vehicle = %config.profile.vehicle_id,
        mission = %config.run.mission_id,
        duration_minutes = config.run.duration.as_secs() / 60,
        interval_secs = config.run.tick_interval.as_secs_f64(),
        "starting vehicle simulation"
    );

    let client = IngestClient::new(&config.run.server_url)
        .with_context(|| format!("invalid collector url {}", config.run.server_url))?;

    let seed = config.run.seed.unwrap_or_else(rand::random);
    debug!(seed, "simulation seed resolved");
    let engine = TelemetryEngine::new(config.profile.clone(), seed);
    let evaluator = AlertEvaluator::new(&config.profile.vehicle_id, seed.wrapping_add(1));

    // A failed run is logged rather than re-raised: the simulator's job is
    // to exercise the collector, not to gate anything on its own exit code.
    match run::simulate(&config, &client, engine, evaluator).await {
        Ok(stats) => {
            info!(
                ticks = stats.ticks,
                samples_sent = stats.samples_sent,
                samples_dropped = stats.samples_dropped,
                alerts_sent = stats.alerts_sent,
                alerts_dropped = stats.alerts_dropped,
                "simulation complete"
            );
        }
        Err(err) => {
            error!(error = %err, "simulation error");
        }
    }

    Ok(())
}

/// Assemble the effective configuration: CLI arguments override the profile
/// file, which overrides the fleet baseline.
fn build_config(cli: &Cli) -> Result<SimulatorConfig> {
    let mut profile = match VehicleProfile::load(cli.profile.as_deref())? {
        Some(loaded) => {
            debug!(source = %loaded.source.display(), "vehicle profile loaded");
            loaded.profile
        }
        None => VehicleProfile::default(),
    };

    if let Some(id) = &cli.vehicle_id {
        profile.vehicle_id = id.clone();
    }
    if profile.vehicle_id.trim().is_empty() {
        profile.vehicle_id = format!("vehicle_{}", rand::thread_rng().gen_range(1000..=9999));
    }
    if let Some(lat) = cli.lat {
        profile.start_latitude = lat;
    }
    if let Some(lon) = cli.lon {
        profile.start_longitude = lon;
    }
    if profile.name.trim().is_empty() {
        profile.name = format!("Patrol Vehicle {}", profile.vehicle_id);
    }

    // Covers NaN, negative, and out-of-range values; a zero interval is
    // rejected by the run-settings validation below.
    let tick_interval = Duration::try_from_secs_f64(cli.interval).map_err(|_| {
        anyhow!(
            "tick interval must be a positive number of seconds, got {}",
            cli.interval
        )
    })?;

    let run = RunSettings {
        mission_id: cli.mission.clone().context("--mission is required")?,
        server_url: cli.server.clone(),
        duration: Duration::from_secs(cli.duration.saturating_mul(60)),
        tick_interval,
        seed: cli.seed,
    };

    let config = SimulatorConfig {
        profile,
        run,
        logging: LoggingConfig {
            format: cli.log_format.into(),
        },
    };
    config.validate()?;
    Ok(config)
}
