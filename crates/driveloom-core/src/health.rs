//! Health reporting for the external services this workspace depends on
//! (drive provider, OCR, embedder, generator, reranker, database pool).

use std::collections::HashMap;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operational status of a service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// Service is operating normally.
    #[default]
    Healthy,
    /// Service is functional but degraded (elevated latency, partial outage).
    Degraded,
    /// Service is not operational.
    Unhealthy,
}

/// A point-in-time health report for one external or internal service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current status.
    pub status: ServiceStatus,
    /// Round-trip time of the check itself, if measured.
    pub response: Option<Duration>,
    /// Human-readable detail, present for degraded/unhealthy reports.
    pub message: Option<String>,
    /// When the check was performed.
    pub checked_at: Timestamp,
    /// Additional free-form metrics (pool utilization, queue depth, ...).
    pub metrics: HashMap<String, Value>,
}

impl ServiceHealth {
    /// Creates a healthy report timestamped now.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            response: None,
            message: None,
            checked_at: Timestamp::now(),
            metrics: HashMap::new(),
        }
    }

    /// Creates a degraded report with an explanatory message.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Degraded,
            message: Some(message.into()),
            ..Self::healthy()
        }
    }

    /// Creates an unhealthy report with an explanatory message.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            ..Self::healthy()
        }
    }

    /// Attaches the measured response time.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    /// Attaches a metric.
    pub fn with_metric(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    /// Returns whether the service can currently be used for request traffic.
    pub fn is_usable(&self) -> bool {
        !matches!(self.status, ServiceStatus::Unhealthy)
    }
}
