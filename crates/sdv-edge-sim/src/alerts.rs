//! ---
//! sdv_section: "02-vehicle-simulation"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Threshold and probability driven alert synthesis."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use rand::prelude::*;

use crate::frames::{AlertContext, AlertKind, AlertRecord, AlertSeverity, TelemetrySample};

const OVERSPEED_LIMIT_KMH: f64 = 80.0;
const TEMPERATURE_LIMIT_C: f64 = 35.0;
const FUEL_FLOOR: f64 = 0.2;
const BATTERY_FLOOR: f64 = 0.3;
/// Unconditional trigger chance, drawn only when no threshold fired.
const RANDOM_ALERT_CHANCE: f64 = 0.05;

/// The catalog an alert's kind and severity are drawn from. The pick is
/// uniform and independent of which trigger condition fired: an overspeed
/// tick may well report a battery alert.
const ALERT_CATALOG: [(AlertKind, AlertSeverity); 6] = [
    (AlertKind::Overspeed, AlertSeverity::Medium),
    (AlertKind::TemperatureHigh, AlertSeverity::High),
    (AlertKind::FuelLow, AlertSeverity::Medium),
    (AlertKind::BatteryLow, AlertSeverity::Low),
    (AlertKind::EngineFault, AlertSeverity::Critical),
    (AlertKind::GeofenceBreach, AlertSeverity::High),
];

/// Decides per sample whether an alert fires and synthesises the record.
///
/// Stateless aside from the owning vehicle's identifier and the injected
/// randomness source.
#[derive(Debug)]
pub struct AlertEvaluator<R = StdRng> {
    vehicle_id: String,
    rng: R,
}

impl AlertEvaluator<StdRng> {
    /// Build an evaluator with a seeded RNG for reproducible runs.
    pub fn new(vehicle_id: &str, seed: u64) -> Self {
        Self::with_rng(vehicle_id, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AlertEvaluator<R> {
    /// Build an evaluator over an explicit randomness source.
    pub fn with_rng(vehicle_id: &str, rng: R) -> Self {
        Self {
            vehicle_id: vehicle_id.to_owned(),
            rng,
        }
    }

    /// Trigger predicate: any exceeded threshold fires immediately; an
    /// unconditional random chance is drawn only after every threshold
    /// passed, so nominal traffic still produces occasional alerts.
    pub fn should_alert(&mut self, sample: &TelemetrySample) -> bool {
        if sample.speed > OVERSPEED_LIMIT_KMH
            || sample.temperature > TEMPERATURE_LIMIT_C
            || sample.additional_data.fuel_level < FUEL_FLOOR
            || sample.additional_data.battery_level < BATTERY_FLOOR
        {
            return true;
        }
        self.rng.gen::<f64>() < RANDOM_ALERT_CHANCE
    }

    /// Build the alert record for a triggering sample. The full sample and
    /// its coordinates are embedded for audit context.
    pub fn build_alert(&mut self, sample: &TelemetrySample) -> AlertRecord {
        let (kind, severity) = ALERT_CATALOG[self.rng.gen_range(0..ALERT_CATALOG.len())];
        AlertRecord {
            vehicle_id: self.vehicle_id.clone(),
            kind,
            message: alert_message(kind, sample),
            severity,
            additional_data: AlertContext {
                telemetry_snapshot: sample.clone(),
                location: sample.location(),
            },
        }
    }
}

fn alert_message(kind: AlertKind, sample: &TelemetrySample) -> String {
    match kind {
        AlertKind::Overspeed => format!("Vehicle speed {:.1} km/h exceeds limit", sample.speed),
        AlertKind::TemperatureHigh => {
            format!("Engine temperature {:.1}°C is high", sample.temperature)
        }
        AlertKind::FuelLow => format!(
            "Fuel level {:.1}% is low",
            sample.additional_data.fuel_level * 100.0
        ),
        AlertKind::BatteryLow => format!(
            "Battery level {:.1}% is low",
            sample.additional_data.battery_level * 100.0
        ),
        AlertKind::EngineFault => "Engine fault detected".to_owned(),
        AlertKind::GeofenceBreach => "Vehicle has left designated patrol area".to_owned(),
    }
}
