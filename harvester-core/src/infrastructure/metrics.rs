// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics
//!
//! A small `prometheus`-backed registry (§10.4): gauges for per-pipeline
//! status/health (as integer codes) and cache sizes, counters for harvests
//! started/finished/aborted. A pure observer of Event Bus traffic, never a
//! mutator of harvest state — it subscribes the same way the Time Keeper
//! does (§4.8).

use harvester_domain::value_objects::{PipelineHealth, PipelineStatus};
use harvester_domain::{EventKind, HarvestError};
use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use super::event_bus::{Event, EventBus};

pub struct HarvesterMetrics {
    registry: Registry,
    harvests_total: IntCounterVec,
    pipeline_status: GaugeVec,
    pipeline_health: GaugeVec,
    cache_size: GaugeVec,
}

impl HarvesterMetrics {
    pub fn new() -> Result<Self, HarvestError> {
        let registry = Registry::new();

        let harvests_total = IntCounterVec::new(
            Opts::new("harvester_harvests_total", "Harvests by terminal outcome"),
            &["outcome"],
        )
        .map_err(|err| HarvestError::internal(err.to_string()))?;

        let pipeline_status = GaugeVec::new(
            Opts::new("harvester_pipeline_status", "Current pipeline status as an integer code"),
            &["pipeline"],
        )
        .map_err(|err| HarvestError::internal(err.to_string()))?;

        let pipeline_health = GaugeVec::new(
            Opts::new("harvester_pipeline_health", "Current pipeline health as an integer code"),
            &["pipeline"],
        )
        .map_err(|err| HarvestError::internal(err.to_string()))?;

        let cache_size = GaugeVec::new(
            Opts::new("harvester_cache_entries", "Cache entry counts by face and partition"),
            &["pipeline", "face", "partition"],
        )
        .map_err(|err| HarvestError::internal(err.to_string()))?;

        registry
            .register(Box::new(harvests_total.clone()))
            .map_err(|err| HarvestError::internal(err.to_string()))?;
        registry
            .register(Box::new(pipeline_status.clone()))
            .map_err(|err| HarvestError::internal(err.to_string()))?;
        registry
            .register(Box::new(pipeline_health.clone()))
            .map_err(|err| HarvestError::internal(err.to_string()))?;
        registry
            .register(Box::new(cache_size.clone()))
            .map_err(|err| HarvestError::internal(err.to_string()))?;

        Ok(Self {
            registry,
            harvests_total,
            pipeline_status,
            pipeline_health,
            cache_size,
        })
    }

    /// Subscribes the harvest-level counters to `bus`. Per-pipeline gauges
    /// are updated directly by the registry/pipeline as their status/health
    /// change, via [`Self::set_pipeline_status`]/[`Self::set_pipeline_health`].
    pub fn subscribe(self: std::sync::Arc<Self>, bus: &EventBus) {
        let finished = self.clone();
        bus.add_listener(EventKind::HarvestFinished, move |event| {
            let metrics = finished.clone();
            async move {
                if let Event::HarvestFinished(domain_event) = event {
                    let outcome = if domain_event.payload.success { "success" } else { "failure" };
                    metrics.harvests_total.with_label_values(&[outcome]).inc();
                }
            }
        });

        let aborting = self.clone();
        bus.add_listener(EventKind::AbortingFinished, move |_event| {
            let metrics = aborting.clone();
            async move {
                metrics.harvests_total.with_label_values(&["aborted"]).inc();
            }
        });
    }

    pub fn set_pipeline_status(&self, pipeline: &str, status: PipelineStatus) {
        self.pipeline_status.with_label_values(&[pipeline]).set(status_code(status) as f64);
    }

    pub fn set_pipeline_health(&self, pipeline: &str, health: PipelineHealth) {
        self.pipeline_health.with_label_values(&[pipeline]).set(health_code(health) as f64);
    }

    pub fn set_cache_size(&self, pipeline: &str, face: &str, partition: &str, entries: i64) {
        self.cache_size.with_label_values(&[pipeline, face, partition]).set(entries as f64);
    }

    /// Renders the registry in Prometheus text exposition format for a
    /// `/metrics` scrape endpoint (bound by the excluded REST transport).
    pub fn render(&self) -> Result<String, HarvestError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|err| HarvestError::internal(err.to_string()))?;
        String::from_utf8(buffer).map_err(|err| HarvestError::internal(err.to_string()))
    }
}

fn status_code(status: PipelineStatus) -> i32 {
    match status {
        PipelineStatus::Idle => 0,
        PipelineStatus::Busy => 1,
        PipelineStatus::Queued => 2,
        PipelineStatus::Done => 3,
        PipelineStatus::Harvesting => 4,
        PipelineStatus::Aborting => 5,
    }
}

fn health_code(health: PipelineHealth) -> i32 {
    match health {
        PipelineHealth::Ok => 0,
        PipelineHealth::SubmissionFailed => 1,
        PipelineHealth::HarvestFailed => 2,
        PipelineHealth::Fubar => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_gauges_render_in_exposition_format() {
        let metrics = HarvesterMetrics::new().unwrap();
        metrics.set_pipeline_status("open-library", PipelineStatus::Harvesting);
        metrics.set_pipeline_health("open-library", PipelineHealth::Ok);
        metrics.set_cache_size("open-library", "versions", "stable", 42);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("harvester_pipeline_status"));
        assert!(rendered.contains("harvester_cache_entries"));
    }

    #[tokio::test]
    async fn harvest_finished_increments_the_matching_outcome_counter() {
        use harvester_domain::events::HarvestFinished;
        use harvester_domain::DomainEvent;
        use std::sync::Arc;
        use std::time::Duration;

        let bus = EventBus::new();
        let metrics = Arc::new(HarvesterMetrics::new().unwrap());
        metrics.clone().subscribe(&bus);

        bus.send_event(Event::HarvestFinished(DomainEvent::new(HarvestFinished {
            success: true,
            hash: "abc".to_string(),
        })));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("outcome=\"success\"} 1"));
    }
}
