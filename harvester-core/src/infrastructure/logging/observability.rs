// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Observability Service
//!
//! Tracks run-level operation metrics (harvests/saves/submits in flight,
//! error rate, a derived health score) and raises threshold-based alerts.
//! Retargeted from the teacher's throughput-tracking shape onto this
//! service's own unit of work: one harvest/save/submit run per operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct ObservabilityService {
    inner: Arc<RwLock<PerformanceTracker>>,
    alert_thresholds: AlertThresholds,
}

#[derive(Debug, Clone)]
pub struct PerformanceTracker {
    pub active_operations: u32,
    pub total_operations: u64,
    pub failed_operations: u64,
    pub error_rate_percent: f64,
    pub last_update: Instant,
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self {
            active_operations: 0,
            total_operations: 0,
            failed_operations: 0,
            error_rate_percent: 0.0,
            last_update: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub max_error_rate_percent: f64,
    pub max_operation_duration_seconds: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_error_rate_percent: 20.0,
            max_operation_duration_seconds: 3600.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub active_operations: u32,
    pub error_rate_percent: f64,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl ObservabilityService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PerformanceTracker::default())),
            alert_thresholds: AlertThresholds::default(),
        }
    }

    pub fn with_thresholds(alert_thresholds: AlertThresholds) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PerformanceTracker::default())),
            alert_thresholds,
        }
    }

    pub async fn start_operation(&self, operation_name: &str) -> OperationTracker {
        let mut tracker = self.inner.write().await;
        tracker.active_operations += 1;
        tracker.total_operations += 1;
        tracker.last_update = Instant::now();

        debug!(operation = operation_name, active = tracker.active_operations, "operation started");

        OperationTracker {
            operation_name: operation_name.to_string(),
            start_time: Instant::now(),
            service: self.clone(),
        }
    }

    async fn complete_operation(&self, operation_name: &str, duration: Duration, success: bool) {
        let mut tracker = self.inner.write().await;
        tracker.active_operations = tracker.active_operations.saturating_sub(1);
        if !success {
            tracker.failed_operations += 1;
        }
        let total = tracker.total_operations as f64;
        tracker.error_rate_percent = if total > 0.0 {
            (tracker.failed_operations as f64 / total) * 100.0
        } else {
            0.0
        };
        tracker.last_update = Instant::now();

        info!(
            operation = operation_name,
            duration_secs = duration.as_secs_f64(),
            success,
            "operation completed"
        );

        if duration.as_secs_f64() > self.alert_thresholds.max_operation_duration_seconds {
            warn!(operation = operation_name, duration_secs = duration.as_secs_f64(), "operation exceeded duration threshold");
        }
    }

    pub async fn health(&self) -> SystemHealth {
        let tracker = self.inner.read().await;
        let mut alerts = Vec::new();
        if tracker.error_rate_percent > self.alert_thresholds.max_error_rate_percent {
            alerts.push(Alert {
                severity: AlertSeverity::Critical,
                message: format!("error rate {:.1}% exceeds threshold", tracker.error_rate_percent),
            });
        }

        let status = if tracker.error_rate_percent == 0.0 {
            HealthStatus::Healthy
        } else if tracker.error_rate_percent <= self.alert_thresholds.max_error_rate_percent {
            HealthStatus::Degraded
        } else {
            HealthStatus::Critical
        };

        SystemHealth {
            status,
            active_operations: tracker.active_operations,
            error_rate_percent: tracker.error_rate_percent,
            alerts,
        }
    }
}

impl Default for ObservabilityService {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII-style guard returned by [`ObservabilityService::start_operation`].
/// Call [`Self::finish`] explicitly; there is no `Drop` impl because the
/// success/failure outcome isn't known until the caller has it.
pub struct OperationTracker {
    operation_name: String,
    start_time: Instant,
    service: ObservabilityService,
}

impl OperationTracker {
    pub async fn finish(self, success: bool) {
        let duration = self.start_time.elapsed();
        self.service.complete_operation(&self.operation_name, duration, success).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_operation_decrements_active_count() {
        let service = ObservabilityService::new();
        let tracker = service.start_operation("harvest").await;
        assert_eq!(service.health().await.active_operations, 1);
        tracker.finish(true).await;
        assert_eq!(service.health().await.active_operations, 0);
    }

    #[tokio::test]
    async fn failures_raise_the_error_rate_and_trip_critical_status() {
        let service = ObservabilityService::with_thresholds(AlertThresholds {
            max_error_rate_percent: 10.0,
            max_operation_duration_seconds: 3600.0,
        });
        service.start_operation("harvest").await.finish(false).await;

        let health = service.health().await;
        assert_eq!(health.status, HealthStatus::Critical);
        assert_eq!(health.alerts.len(), 1);
    }

    #[tokio::test]
    async fn no_operations_is_healthy() {
        let service = ObservabilityService::new();
        assert_eq!(service.health().await.status, HealthStatus::Healthy);
    }
}
