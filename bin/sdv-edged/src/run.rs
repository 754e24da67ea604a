//! ---
//! sdv_section: "01-core-functionality"
//! sdv_subsection: "binary"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Tick loop driving telemetry generation and upload."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use anyhow::{Context, Result};
use rand::Rng;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use sdv_edge_client::IngestClient;
use sdv_edge_common::config::SimulatorConfig;
use sdv_edge_sim::{AlertEvaluator, TelemetryEngine, TelemetrySample};

/// Samples are buffered and uploaded in batches of this size; whatever is
/// left over goes out in one final batch when the run ends.
pub const TELEMETRY_BATCH_SIZE: usize = 10;

/// Counters accumulated over one simulation run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub ticks: u64,
    pub samples_sent: u64,
    pub samples_dropped: u64,
    pub alerts_sent: u64,
    pub alerts_dropped: u64,
}

/// Drive the simulation until the configured duration elapses or ctrl-c
/// arrives. Collector failures are logged and the affected payloads dropped;
/// the loop itself never stops because of them.
pub async fn simulate<G: Rng, E: Rng>(
    config: &SimulatorConfig,
    client: &IngestClient,
    mut engine: TelemetryEngine<G>,
    mut evaluator: AlertEvaluator<E>,
) -> Result<RunStats> {
    let vehicle_id = config.profile.vehicle_id.clone();

    match client.fetch_mission(&vehicle_id).await {
        Ok(Some(mission)) => {
            info!(
                mission_id = %mission.mission_id,
                name = %mission.name,
                status = ?mission.status,
                "collector reports an assigned mission"
            );
        }
        Ok(None) => debug!("collector reports no mission for this vehicle"),
        Err(err) => warn!(error = %err, "mission lookup failed; continuing without it"),
    }

    let mut stats = RunStats::default();
    let mut buffer: Vec<TelemetrySample> = Vec::with_capacity(TELEMETRY_BATCH_SIZE);

    let mut ticker = tokio::time::interval(config.run.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let deadline = tokio::time::sleep_until(Instant::now() + config.run.duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            res = &mut shutdown => {
                res.context("failed to listen for ctrl-c")?;
                info!("interrupt received; stopping simulation");
                break;
            }
            () = &mut deadline => {
                debug!("simulation window elapsed");
                break;
            }
            _ = ticker.tick() => {
                let sample = engine.next_sample();
                stats.ticks += 1;
                buffer.push(sample.clone());
                if buffer.len() >= TELEMETRY_BATCH_SIZE {
                    flush_telemetry(client, &vehicle_id, &mut buffer, &mut stats).await;
                }
                if evaluator.should_alert(&sample) {
                    let alert = evaluator.build_alert(&sample);
                    match client.post_alert(&alert).await {
                        Ok(()) => {
                            stats.alerts_sent += 1;
                            info!(kind = ?alert.kind, message = %alert.message, "alert sent");
                        }
                        Err(err) => {
                            stats.alerts_dropped += 1;
                            error!(error = %err, kind = ?alert.kind, "alert dropped");
                        }
                    }
                }
            }
        }
    }

    flush_telemetry(client, &vehicle_id, &mut buffer, &mut stats).await;
    Ok(stats)
}

async fn flush_telemetry(
    client: &IngestClient,
    vehicle_id: &str,
    buffer: &mut Vec<TelemetrySample>,
    stats: &mut RunStats,
) {
    if buffer.is_empty() {
        return;
    }
    match client.post_telemetry(vehicle_id, buffer).await {
        Ok(()) => {
            stats.samples_sent += buffer.len() as u64;
            debug!(batch = buffer.len(), "sent telemetry batch");
        }
        Err(err) => {
            stats.samples_dropped += buffer.len() as u64;
            error!(error = %err, batch = buffer.len(), "telemetry batch dropped");
        }
    }
    buffer.clear();
}
