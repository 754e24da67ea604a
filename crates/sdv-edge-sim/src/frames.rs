//! ---
//! sdv_section: "02-vehicle-simulation"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Wire-level telemetry and alert record types."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One synthetic telemetry reading, produced fresh on every tick.
///
/// Field names follow the collector's camelCase JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h.
    pub speed: f64,
    /// Engine temperature, °C.
    pub temperature: f64,
    /// Metres; resampled independently each tick, not tied to motion state.
    pub altitude: f64,
    /// Compass degrees in [0, 360).
    pub heading: f64,
    pub additional_data: AuxiliaryReadings,
}

impl TelemetrySample {
    /// Coordinates of this sample as a standalone point.
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Instantaneous auxiliary readings nested under `additionalData`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliaryReadings {
    pub engine_status: EngineStatus,
    /// Fraction of a full tank, [0, 1].
    pub fuel_level: f64,
    /// Fraction of full charge, [0, 1].
    pub battery_level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Running,
    Stopped,
}

/// Alert raised against a single telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub severity: AlertSeverity,
    pub additional_data: AlertContext,
}

/// Audit context carried with every alert: the full triggering sample plus
/// its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertContext {
    pub telemetry_snapshot: TelemetrySample,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// The fixed catalog of alert kinds understood by the collector.
///
/// Serialized by variant name (`"Overspeed"`, `"TemperatureHigh"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    Overspeed,
    TemperatureHigh,
    FuelLow,
    BatteryLow,
    EngineFault,
    GeofenceBreach,
}

/// Alert importance, encoded on the wire as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AlertSeverity {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl From<AlertSeverity> for u8 {
    fn from(severity: AlertSeverity) -> Self {
        severity as u8
    }
}

impl TryFrom<u8> for AlertSeverity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AlertSeverity::Low),
            1 => Ok(AlertSeverity::Medium),
            2 => Ok(AlertSeverity::High),
            3 => Ok(AlertSeverity::Critical),
            other => Err(format!("unknown alert severity ordinal: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample() -> TelemetrySample {
        TelemetrySample {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            latitude: 40.7128,
            longitude: -74.0060,
            speed: 52.5,
            temperature: 24.0,
            altitude: 150.0,
            heading: 90.0,
            additional_data: AuxiliaryReadings {
                engine_status: EngineStatus::Running,
                fuel_level: 0.8,
                battery_level: 0.9,
            },
        }
    }

    #[test]
    fn sample_serializes_with_collector_field_names() {
        let value = serde_json::to_value(sample()).expect("sample serializes");
        assert_eq!(value["latitude"], json!(40.7128));
        assert_eq!(value["additionalData"]["engineStatus"], json!("running"));
        assert_eq!(value["additionalData"]["fuelLevel"], json!(0.8));
        assert!(value.get("additional_data").is_none());
    }

    #[test]
    fn severity_encodes_as_ordinal() {
        assert_eq!(
            serde_json::to_value(AlertSeverity::Critical).expect("severity serializes"),
            json!(3)
        );
        let decoded: AlertSeverity =
            serde_json::from_value(json!(2)).expect("ordinal deserializes");
        assert_eq!(decoded, AlertSeverity::High);
        assert!(serde_json::from_value::<AlertSeverity>(json!(4)).is_err());
    }

    #[test]
    fn severity_ordering_follows_ordinals() {
        assert!(AlertSeverity::Low < AlertSeverity::Medium);
        assert!(AlertSeverity::High < AlertSeverity::Critical);
    }

    #[test]
    fn alert_record_uses_type_key_and_variant_names() {
        let alert = AlertRecord {
            vehicle_id: "vehicle_1234".to_owned(),
            kind: AlertKind::TemperatureHigh,
            message: "Engine temperature 36.2°C is high".to_owned(),
            severity: AlertSeverity::High,
            additional_data: AlertContext {
                telemetry_snapshot: sample(),
                location: sample().location(),
            },
        };
        let value = serde_json::to_value(&alert).expect("alert serializes");
        assert_eq!(value["vehicleId"], json!("vehicle_1234"));
        assert_eq!(value["type"], json!("TemperatureHigh"));
        assert_eq!(value["severity"], json!(2));
        assert_eq!(
            value["additionalData"]["location"]["longitude"],
            json!(-74.0060)
        );
        assert_eq!(
            value["additionalData"]["telemetrySnapshot"]["speed"],
            json!(52.5)
        );
    }
}
