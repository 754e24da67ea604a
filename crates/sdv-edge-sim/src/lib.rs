//! ---
//! sdv_section: "02-vehicle-simulation"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Vehicle simulation module exports and shared types."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
//! Motion and alert synthesis for the SDV-Edge simulator.
//!
//! Two generative components live here: [`TelemetryEngine`] walks a vehicle
//! around its patrol area and emits one [`TelemetrySample`] per tick, and
//! [`AlertEvaluator`] decides per sample whether an [`AlertRecord`] fires.
//! Both take their randomness as an injected source so runs are reproducible
//! under a fixed seed.

pub mod alerts;
pub mod frames;
pub mod generator;

pub use alerts::AlertEvaluator;
pub use frames::{
    AlertContext, AlertKind, AlertRecord, AlertSeverity, AuxiliaryReadings, EngineStatus, GeoPoint,
    TelemetrySample,
};
pub use generator::TelemetryEngine;
