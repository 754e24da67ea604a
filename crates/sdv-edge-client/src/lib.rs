//! ---
//! sdv_section: "05-networking-external-interfaces"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "HTTP ingest client for the fleet collector."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
//! Thin HTTP client for the collector's ingest API.
//!
//! Every call is a single best-effort attempt: the driver decides what a
//! failure means (for the simulator, logging and moving on). There is no
//! retry or backoff here.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use sdv_edge_sim::{AlertRecord, TelemetrySample};

/// Per-request timeout towards the collector.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the ingest client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured base URL could not be parsed.
    #[error("invalid collector base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The request failed at the transport level, or the client could not
    /// be constructed.
    #[error("collector request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The collector answered with a non-success status.
    #[error("collector returned {status} from the {endpoint} endpoint")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
    },
}

/// Mission assignment as returned by the collector.
///
/// Only the fields the simulator reads are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub mission_id: String,
    pub name: String,
    #[serde(default)]
    pub vehicle_ids: Vec<String>,
    #[serde(default)]
    pub status: MissionStatus,
}

/// Mission lifecycle states, ordinal-encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum MissionStatus {
    #[default]
    Pending = 0,
    Active = 1,
    Completed = 2,
    Cancelled = 3,
}

impl TryFrom<u8> for MissionStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MissionStatus::Pending),
            1 => Ok(MissionStatus::Active),
            2 => Ok(MissionStatus::Completed),
            3 => Ok(MissionStatus::Cancelled),
            other => Err(format!("unknown mission status ordinal: {}", other)),
        }
    }
}

/// HTTP client for the collector's telemetry, alert, and mission endpoints.
#[derive(Debug, Clone)]
pub struct IngestClient {
    base: String,
    http: reqwest::Client,
}

impl IngestClient {
    /// Build a client for the collector at `base_url`.
    ///
    /// The URL is validated up front so a typo fails the run at startup
    /// instead of on the first send.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)?;
        let base = parsed.as_str().trim_end_matches('/').to_owned();
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base, http })
    }

    /// The normalised base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// POST one batch of samples to the vehicle-keyed telemetry endpoint.
    /// The batch travels as a single JSON array and is accepted or rejected
    /// as one unit.
    pub async fn post_telemetry(
        &self,
        vehicle_id: &str,
        batch: &[TelemetrySample],
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/telemetry/{}", self.base, vehicle_id);
        let response = self.http.post(&url).json(&batch).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "telemetry",
                status: response.status(),
            });
        }
        debug!(vehicle = vehicle_id, batch = batch.len(), "telemetry batch accepted");
        Ok(())
    }

    /// POST a single alert record.
    pub async fn post_alert(&self, alert: &AlertRecord) -> Result<(), ClientError> {
        let url = format!("{}/api/alerts", self.base);
        let response = self.http.post(&url).json(alert).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "alerts",
                status: response.status(),
            });
        }
        Ok(())
    }

    /// Fetch the first mission assigned to the vehicle, if any.
    pub async fn fetch_mission(&self, vehicle_id: &str) -> Result<Option<Mission>, ClientError> {
        let url = format!("{}/api/missions/vehicle/{}", self.base, vehicle_id);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "missions",
                status: response.status(),
            });
        }
        let missions: Vec<Mission> = response.json().await?;
        Ok(missions.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use sdv_edge_sim::{AuxiliaryReadings, EngineStatus};

    use super::*;

    /// In-process stand-in for the collector that records what it ingests.
    #[derive(Default)]
    struct Captured {
        telemetry: Mutex<Vec<(String, Value)>>,
        alerts: Mutex<Vec<Value>>,
    }

    async fn ingest_telemetry(
        Path(vehicle_id): Path<String>,
        State(captured): State<Arc<Captured>>,
        Json(batch): Json<Value>,
    ) -> StatusCode {
        captured
            .telemetry
            .lock()
            .expect("telemetry lock")
            .push((vehicle_id, batch));
        StatusCode::OK
    }

    async fn ingest_alert(
        State(captured): State<Arc<Captured>>,
        Json(alert): Json<Value>,
    ) -> StatusCode {
        captured.alerts.lock().expect("alert lock").push(alert);
        StatusCode::CREATED
    }

    async fn list_missions(Path(vehicle_id): Path<String>) -> Json<Value> {
        Json(json!([
            {
                "missionId": "mission-alpha",
                "name": "Border sweep",
                "startTime": "2024-05-01T00:00:00",
                "endTime": "2024-05-02T00:00:00",
                "vehicleIds": [vehicle_id],
                "status": 1
            },
            {
                "missionId": "mission-beta",
                "name": "Night patrol",
                "vehicleIds": [],
                "status": 0
            }
        ]))
    }

    async fn spawn_collector(captured: Arc<Captured>) -> SocketAddr {
        let router = Router::new()
            .route("/api/telemetry/:vehicle_id", post(ingest_telemetry))
            .route("/api/alerts", post(ingest_alert))
            .route("/api/missions/vehicle/:vehicle_id", get(list_missions))
            .with_state(captured);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind collector double");
        let addr = listener.local_addr().expect("collector addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("collector double serves");
        });
        addr
    }

    fn sample(speed: f64) -> TelemetrySample {
        TelemetrySample {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            latitude: 40.7128,
            longitude: -74.0060,
            speed,
            temperature: 25.0,
            altitude: 150.0,
            heading: 90.0,
            additional_data: AuxiliaryReadings {
                engine_status: EngineStatus::Running,
                fuel_level: 0.8,
                battery_level: 0.9,
            },
        }
    }

    #[tokio::test]
    async fn telemetry_batch_posts_as_one_json_array() {
        let captured = Arc::new(Captured::default());
        let addr = spawn_collector(captured.clone()).await;
        let client = IngestClient::new(&format!("http://{}", addr)).expect("client builds");

        let batch = vec![sample(40.0), sample(50.0), sample(60.0)];
        client
            .post_telemetry("vehicle_1234", &batch)
            .await
            .expect("batch accepted");

        let recorded = captured.telemetry.lock().expect("telemetry lock");
        assert_eq!(recorded.len(), 1);
        let (vehicle, body) = &recorded[0];
        assert_eq!(vehicle, "vehicle_1234");
        let samples = body.as_array().expect("batch is a json array");
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1]["speed"], json!(50.0));
        assert_eq!(samples[0]["additionalData"]["engineStatus"], json!("running"));
    }

    #[tokio::test]
    async fn alerts_post_individually() {
        let captured = Arc::new(Captured::default());
        let addr = spawn_collector(captured.clone()).await;
        let client = IngestClient::new(&format!("http://{}", addr)).expect("client builds");

        let mut evaluator = sdv_edge_sim::AlertEvaluator::new("vehicle_9", 7);
        let alert = evaluator.build_alert(&sample(95.0));
        client.post_alert(&alert).await.expect("alert accepted");

        let recorded = captured.alerts.lock().expect("alert lock");
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0]["vehicleId"], json!("vehicle_9"));
        assert!(recorded[0]["severity"].is_u64());
        assert_eq!(
            recorded[0]["additionalData"]["telemetrySnapshot"]["speed"],
            json!(95.0)
        );
    }

    #[tokio::test]
    async fn fetch_mission_returns_the_first_assignment() {
        let captured = Arc::new(Captured::default());
        let addr = spawn_collector(captured).await;
        let client = IngestClient::new(&format!("http://{}", addr)).expect("client builds");

        let mission = client
            .fetch_mission("vehicle_42")
            .await
            .expect("mission fetch succeeds")
            .expect("a mission is assigned");
        assert_eq!(mission.mission_id, "mission-alpha");
        assert_eq!(mission.name, "Border sweep");
        assert_eq!(mission.status, MissionStatus::Active);
        assert_eq!(mission.vehicle_ids, vec!["vehicle_42".to_owned()]);
    }

    #[tokio::test]
    async fn collector_errors_surface_as_unexpected_status() {
        let router = Router::new().route(
            "/api/telemetry/:vehicle_id",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind failing double");
        let addr = listener.local_addr().expect("double addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("double serves");
        });

        let client = IngestClient::new(&format!("http://{}", addr)).expect("client builds");
        let err = client
            .post_telemetry("vehicle_1", &[sample(10.0)])
            .await
            .expect_err("5xx must surface");
        match err {
            ClientError::UnexpectedStatus { endpoint, status } => {
                assert_eq!(endpoint, "telemetry");
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[test]
    fn base_url_is_validated_and_normalised() {
        assert!(matches!(
            IngestClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        let client = IngestClient::new("http://localhost:5001/").expect("valid url");
        assert_eq!(client.base_url(), "http://localhost:5001");
    }
}
