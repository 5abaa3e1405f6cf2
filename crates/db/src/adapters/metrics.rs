use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use msp_core::health::ResourceKind;
use msp_core::types::Timestamp;
use msp_monitor::{MetricsError, MetricsSource, Reading, ReadingSink, ServiceState};
use sqlx::PgPool;

use crate::models::reading::{ClientReading, CreateReading};
use crate::repositories::{ClientRepo, ReadingRepo};

/// Metrics capability answering from the latest stored `client_readings`.
///
/// Readings older than `max_age` count as missing. Also the sink that agent
/// pushes are written to.
#[derive(Clone)]
pub struct LocalMetricsSource {
    pool: PgPool,
    max_age: Duration,
}

impl LocalMetricsSource {
    pub fn new(pool: PgPool, max_age: Duration) -> Self {
        Self { pool, max_age }
    }

    /// Turn an empty or stale lookup into the matching error.
    async fn fresh(
        &self,
        client_id: &str,
        reading: Option<ClientReading>,
        what: &str,
    ) -> Result<ClientReading, MetricsError> {
        let Some(reading) = reading else {
            let known = ClientRepo::exists(&self.pool, client_id)
                .await
                .map_err(unreachable)?;
            return Err(if known {
                MetricsError::NoReading(format!("no {what} reading recorded for '{client_id}'"))
            } else {
                MetricsError::UnknownTarget(client_id.to_string())
            });
        };

        let age = Utc::now().signed_duration_since(reading.recorded_at);
        let stale = age.to_std().is_ok_and(|age| age > self.max_age);
        if stale {
            tracing::debug!(
                client_id = %client_id,
                reading = what,
                recorded_at = %reading.recorded_at,
                "Ignoring stale reading",
            );
            return Err(MetricsError::NoReading(format!(
                "latest {what} reading for '{client_id}' is older than {}s",
                self.max_age.as_secs()
            )));
        }
        Ok(reading)
    }
}

fn unreachable(err: sqlx::Error) -> MetricsError {
    MetricsError::Unreachable(err.to_string())
}

#[async_trait]
impl MetricsSource for LocalMetricsSource {
    async fn read_utilization(
        &self,
        client_id: &str,
        kind: ResourceKind,
    ) -> Result<f64, MetricsError> {
        let reading = ReadingRepo::latest_utilization(&self.pool, client_id, kind.as_str())
            .await
            .map_err(unreachable)?;
        let reading = self.fresh(client_id, reading, kind.as_str()).await?;
        reading
            .value
            .ok_or_else(|| MetricsError::NoReading(format!("{kind} reading has no value")))
    }

    async fn read_service_state(
        &self,
        client_id: &str,
        service_name: &str,
    ) -> Result<ServiceState, MetricsError> {
        let reading = ReadingRepo::latest_service_state(&self.pool, client_id, service_name)
            .await
            .map_err(unreachable)?;
        let reading = self.fresh(client_id, reading, service_name).await?;
        match reading.is_up {
            Some(true) => Ok(ServiceState::Up),
            Some(false) => Ok(ServiceState::Down),
            None => Err(MetricsError::NoReading(format!(
                "service '{service_name}' reading has no state"
            ))),
        }
    }
}

#[async_trait]
impl ReadingSink for LocalMetricsSource {
    async fn record(
        &self,
        client_id: &str,
        reading: &Reading,
        recorded_at: Timestamp,
    ) -> Result<(), MetricsError> {
        let input = match reading {
            Reading::Utilization { resource, percent } => {
                CreateReading::utilization(resource.as_str(), *percent, recorded_at)
            }
            Reading::Service { name, state } => {
                CreateReading::service(name, *state == ServiceState::Up, recorded_at)
            }
        };
        ReadingRepo::insert(&self.pool, client_id, &input)
            .await
            .map_err(unreachable)?;
        Ok(())
    }
}
