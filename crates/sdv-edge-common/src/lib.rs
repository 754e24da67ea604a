//! ---
//! sdv_section: "01-core-functionality"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Shared primitives and utilities for the edge simulator."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
//! Core shared primitives for the SDV-Edge simulator workspace.
//! This crate exposes configuration loading, logging, and version
//! metadata utilities consumed across the workspace.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{LoadedProfile, LoggingConfig, RunSettings, SimulatorConfig, VehicleProfile};
pub use logging::{init_tracing, LogFormat};
pub use version::VersionInfo;
