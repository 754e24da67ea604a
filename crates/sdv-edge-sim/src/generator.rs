//! ---
//! sdv_section: "02-vehicle-simulation"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Patrol-pattern motion model and telemetry synthesis."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use chrono::Utc;
use rand::prelude::*;
use sdv_edge_common::config::VehicleProfile;

use crate::frames::{AuxiliaryReadings, EngineStatus, TelemetrySample};

/// One tick advances the vehicle by 0.1 simulated seconds of travel,
/// regardless of how the driver paces its wall-clock interval.
const TICK_SECONDS: f64 = 0.1;
/// Flat-earth degree conversion; fine at patrol-radius scale.
const KM_PER_DEGREE: f64 = 111.0;

/// Kinematic and environmental state for one vehicle. Single writer (the
/// owning engine), mutated in place every tick, discarded with the run.
#[derive(Debug, Clone)]
struct SimulationState {
    latitude: f64,
    longitude: f64,
    speed: f64,
    heading: f64,
    temperature: f64,
}

/// Walks a vehicle around its patrol area and synthesises telemetry.
///
/// Generic over the randomness source so tests can substitute a
/// deterministic one; production runs use a seeded [`StdRng`].
#[derive(Debug)]
pub struct TelemetryEngine<R = StdRng> {
    profile: VehicleProfile,
    state: SimulationState,
    rng: R,
}

impl TelemetryEngine<StdRng> {
    /// Build an engine with a seeded RNG for reproducible runs.
    pub fn new(profile: VehicleProfile, seed: u64) -> Self {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TelemetryEngine<R> {
    /// Build an engine over an explicit randomness source.
    ///
    /// The vehicle starts parked at the patrol centre with a random
    /// initial heading and its engine at base temperature.
    pub fn with_rng(profile: VehicleProfile, mut rng: R) -> Self {
        let state = SimulationState {
            latitude: profile.start_latitude,
            longitude: profile.start_longitude,
            speed: 0.0,
            heading: rng.gen_range(0.0..360.0),
            temperature: profile.base_temperature_c,
        };
        Self {
            profile,
            state,
            rng,
        }
    }

    /// Advance the simulation one tick and emit the resulting sample.
    ///
    /// Position moves under the previous tick's speed; speed and
    /// temperature then drift for the next tick. Altitude, fuel, and
    /// battery are memoryless instantaneous readings.
    pub fn next_sample(&mut self) -> TelemetrySample {
        self.update_position();
        self.update_speed();
        self.update_temperature();

        TelemetrySample {
            timestamp: Utc::now(),
            latitude: self.state.latitude,
            longitude: self.state.longitude,
            speed: self.state.speed,
            temperature: self.state.temperature,
            altitude: self.rng.gen_range(100.0..200.0),
            heading: self.state.heading,
            additional_data: AuxiliaryReadings {
                engine_status: EngineStatus::Running,
                fuel_level: self.rng.gen_range(0.3..1.0),
                battery_level: self.rng.gen_range(0.7..1.0),
            },
        }
    }

    fn update_position(&mut self) {
        let jitter = self.rng.gen_range(-10.0..10.0);
        self.state.heading = (self.state.heading + jitter).rem_euclid(360.0);

        let distance_km = self.state.speed / 3600.0 * TICK_SECONDS;
        let distance_deg = distance_km / KM_PER_DEGREE;
        self.state.latitude += distance_deg * self.state.heading.to_radians().cos();
        self.state.longitude += distance_deg * self.state.heading.to_radians().sin();

        // Soft patrol boundary: once outside the radius, snap the heading
        // back towards the centre but leave the position untouched. The
        // vehicle may overshoot until the next tick carries it back.
        let off_lat = self.state.latitude - self.profile.start_latitude;
        let off_lon = self.state.longitude - self.profile.start_longitude;
        let from_centre = (off_lat * off_lat + off_lon * off_lon).sqrt();
        if from_centre > self.profile.patrol_radius_deg {
            let bearing = (-off_lon).atan2(-off_lat).to_degrees();
            self.state.heading = bearing.rem_euclid(360.0);
        }
    }

    fn update_speed(&mut self) {
        if self.rng.gen_bool(0.1) {
            // Occasional significant shift: accelerate or brake hard.
            if self.rng.gen_bool(0.5) {
                let boost = self.rng.gen_range(5.0..15.0);
                self.state.speed = (self.state.speed + boost).min(self.profile.max_speed_kmh);
            } else {
                let cut = self.rng.gen_range(5.0..15.0);
                self.state.speed = (self.state.speed - cut).max(0.0);
            }
        } else {
            self.state.speed += self.rng.gen_range(-2.0..2.0);
            self.state.speed = self.state.speed.clamp(0.0, self.profile.max_speed_kmh);
        }
    }

    fn update_temperature(&mut self) {
        self.state.temperature += self.rng.gen_range(-0.5..0.5);
        self.state.temperature = self.state.temperature.clamp(
            self.profile.base_temperature_c - self.profile.temperature_variance_c,
            self.profile.base_temperature_c + self.profile.temperature_variance_c,
        );
    }
}
