//! ---
//! sdv_section: "01-core-functionality"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Shared primitives and utilities for the edge simulator."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_start_latitude() -> f64 {
    40.7128
}

fn default_start_longitude() -> f64 {
    -74.0060
}

fn default_patrol_radius_deg() -> f64 {
    0.01
}

fn default_max_speed_kmh() -> f64 {
    80.0
}

fn default_cruise_speed_kmh() -> f64 {
    50.0
}

fn default_base_temperature_c() -> f64 {
    25.0
}

fn default_temperature_variance_c() -> f64 {
    5.0
}

fn default_server_url() -> String {
    "http://localhost:5001".to_owned()
}

fn default_duration() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_tick_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Fully assembled configuration for one simulator run.
///
/// Built by the binary from CLI arguments, environment variables, and an
/// optional on-disk vehicle profile; library crates only ever see the
/// assembled value.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub profile: VehicleProfile,
    pub run: RunSettings,
    pub logging: LoggingConfig,
}

impl SimulatorConfig {
    /// Validate structural invariants across all sections.
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        self.run.validate()?;
        Ok(())
    }
}

/// Static description of the simulated vehicle and its patrol envelope.
///
/// All fields are optional in the on-disk TOML form; anything omitted falls
/// back to the fleet baseline so a profile file only needs to state what it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    #[serde(default)]
    pub vehicle_id: String,
    #[serde(default)]
    pub name: String,
    /// Patrol centre latitude in decimal degrees.
    #[serde(default = "default_start_latitude")]
    pub start_latitude: f64,
    /// Patrol centre longitude in decimal degrees.
    #[serde(default = "default_start_longitude")]
    pub start_longitude: f64,
    /// Soft patrol boundary radius, expressed in coordinate degrees.
    #[serde(default = "default_patrol_radius_deg")]
    pub patrol_radius_deg: f64,
    #[serde(default = "default_max_speed_kmh")]
    pub max_speed_kmh: f64,
    #[serde(default = "default_cruise_speed_kmh")]
    pub cruise_speed_kmh: f64,
    #[serde(default = "default_base_temperature_c")]
    pub base_temperature_c: f64,
    /// Engine temperature stays within base ± variance.
    #[serde(default = "default_temperature_variance_c")]
    pub temperature_variance_c: f64,
}

/// Metadata describing where a [`VehicleProfile`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    pub profile: VehicleProfile,
    pub source: PathBuf,
}

impl VehicleProfile {
    pub const ENV_PROFILE_PATH: &str = "SDV_EDGE_PROFILE";

    /// Load a profile from an explicit path, or from the `SDV_EDGE_PROFILE`
    /// override when no path was given. Returns `None` when neither is set,
    /// in which case callers run on the fleet baseline.
    ///
    /// Loaded profiles are not validated here: identifiers may still be
    /// overlaid from the CLI before [`SimulatorConfig::validate`] runs.
    pub fn load(explicit: Option<&Path>) -> Result<Option<LoadedProfile>> {
        if let Some(path) = explicit {
            let profile = Self::from_path(path)?;
            return Ok(Some(LoadedProfile {
                profile,
                source: path.to_path_buf(),
            }));
        }

        if let Ok(env_path) = std::env::var(Self::ENV_PROFILE_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let profile = Self::from_path(&path)?;
                return Ok(Some(LoadedProfile {
                    profile,
                    source: path,
                }));
            }
        }

        Ok(None)
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(profile_path = %path.display(), "loading vehicle profile");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read profile file {}", path.display()))?;
        toml::from_str::<VehicleProfile>(&contents)
            .with_context(|| format!("failed to parse profile file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.vehicle_id.trim().is_empty() {
            return Err(anyhow!("profile is missing a vehicle id"));
        }
        if !(-90.0..=90.0).contains(&self.start_latitude) {
            return Err(anyhow!(
                "start latitude {} is outside [-90, 90]",
                self.start_latitude
            ));
        }
        if !(-180.0..=180.0).contains(&self.start_longitude) {
            return Err(anyhow!(
                "start longitude {} is outside [-180, 180]",
                self.start_longitude
            ));
        }
        if self.patrol_radius_deg <= 0.0 {
            return Err(anyhow!(
                "patrol radius must be positive, got {}",
                self.patrol_radius_deg
            ));
        }
        if self.max_speed_kmh < 0.0 {
            return Err(anyhow!(
                "maximum speed must not be negative, got {}",
                self.max_speed_kmh
            ));
        }
        if self.cruise_speed_kmh < 0.0 || self.cruise_speed_kmh > self.max_speed_kmh {
            return Err(anyhow!(
                "cruise speed {} must lie between 0 and the maximum speed {}",
                self.cruise_speed_kmh,
                self.max_speed_kmh
            ));
        }
        if self.temperature_variance_c < 0.0 {
            return Err(anyhow!(
                "temperature variance must not be negative, got {}",
                self.temperature_variance_c
            ));
        }
        Ok(())
    }
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            vehicle_id: String::new(),
            name: String::new(),
            start_latitude: default_start_latitude(),
            start_longitude: default_start_longitude(),
            patrol_radius_deg: default_patrol_radius_deg(),
            max_speed_kmh: default_max_speed_kmh(),
            cruise_speed_kmh: default_cruise_speed_kmh(),
            base_temperature_c: default_base_temperature_c(),
            temperature_variance_c: default_temperature_variance_c(),
        }
    }
}

/// Per-run parameters taken from the CLI.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Mission identifier the operator launched the run under.
    pub mission_id: String,
    /// Base URL of the fleet collector.
    pub server_url: String,
    /// Total wall-clock duration of the run.
    pub duration: Duration,
    /// Pause between telemetry ticks.
    pub tick_interval: Duration,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl RunSettings {
    /// Longest supported run. The shutdown deadline and tick schedule are
    /// computed by adding durations to the current instant, which must not
    /// overflow the timer range.
    pub const MAX_DURATION: Duration = Duration::from_secs(3650 * 24 * 60 * 60);

    pub fn validate(&self) -> Result<()> {
        if self.mission_id.trim().is_empty() {
            return Err(anyhow!("mission identifier must not be empty"));
        }
        if self.tick_interval.is_zero() {
            return Err(anyhow!("tick interval must be positive"));
        }
        if self.tick_interval > Self::MAX_DURATION {
            return Err(anyhow!(
                "tick interval {} seconds is beyond the supported range",
                self.tick_interval.as_secs_f64()
            ));
        }
        if self.duration > Self::MAX_DURATION {
            return Err(anyhow!(
                "run duration {} minutes exceeds the supported maximum of {} minutes",
                self.duration.as_secs() / 60,
                Self::MAX_DURATION.as_secs() / 60
            ));
        }
        Ok(())
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mission_id: String::new(),
            server_url: default_server_url(),
            duration: default_duration(),
            tick_interval: default_tick_interval(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}
