//! HTTP client for the external schedule solver.
//!
//! The solver receives the assembled [`ScheduleRequest`] as JSON and answers
//! with a timetable whose structure is opaque to this crate. Calls are made
//! once, with no retry; a run of outages makes [`SolverBreaker`] refuse calls
//! until a cooldown has passed.

mod breaker;
mod error;

pub use breaker::SolverBreaker;
pub use error::{SolverError, SOLVER_FAILURE_MESSAGE};

use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info, warn};
use url::Url;

use crate::config::SolverConfig;
use crate::scheduler::types::ScheduleRequest;

pub struct SolverClient {
    client: Client,
    url: Url,
    breaker: SolverBreaker,
}

impl SolverClient {
    pub fn new(config: &SolverConfig) -> Result<Self, SolverError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: Url::parse(&config.url)?,
            breaker: SolverBreaker::new(config.failure_threshold, config.cooldown()),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Forwards `request` to the solver and returns its JSON answer verbatim.
    pub async fn generate(&self, request: &ScheduleRequest) -> Result<Value, SolverError> {
        let correlation_id = generate_correlation_id();

        if let Err(e) = self.breaker.check() {
            warn!(
                correlation_id = %correlation_id,
                failures = self.breaker.consecutive_failures(),
                "Solver suspended, rejecting request: {}", e
            );
            return Err(e);
        }

        info!(
            correlation_id = %correlation_id,
            url = %self.url,
            rooms = request.rooms.len(),
            subjects = request.subjects.len(),
            "Forwarding schedule request to solver"
        );

        let started = Instant::now();
        let result = self.send(request).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        self.breaker.record(&result);

        match &result {
            Ok(_) => {
                info!(correlation_id = %correlation_id, duration_ms, "Solver returned a schedule");
            }
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    duration_ms,
                    outage = e.is_outage(),
                    error = %e,
                    "Solver call failed"
                );
            }
        }

        result
    }

    async fn send(&self, request: &ScheduleRequest) -> Result<Value, SolverError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolverError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SolverError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

/// Generates a short id for correlating log lines of one solver call.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
