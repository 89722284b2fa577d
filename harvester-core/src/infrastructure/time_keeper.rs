// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Harvest Time Keeper
//!
//! Three [`ProcessTimeMeasure`] instances (harvest, save, submit), each
//! subscribed to its own start/finished events plus the common
//! `AbortingStarted` event, persisted together to one JSON cache file on
//! every transition (§4.8).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use harvester_domain::entities::ProcessTimeMeasure;
use harvester_domain::HarvestError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::disk;
use super::event_bus::{Event, EventBus};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ProcessKind {
    Harvest,
    Save,
    Submit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedMeasures {
    harvest: ProcessTimeMeasure,
    save: ProcessTimeMeasure,
    submit: ProcessTimeMeasure,
}

impl PersistedMeasures {
    fn sanitize_after_load(&mut self) {
        self.harvest.sanitize_after_load();
        self.save.sanitize_after_load();
        self.submit.sanitize_after_load();
    }

    fn get(&self, kind: ProcessKind) -> &ProcessTimeMeasure {
        match kind {
            ProcessKind::Harvest => &self.harvest,
            ProcessKind::Save => &self.save,
            ProcessKind::Submit => &self.submit,
        }
    }

    fn get_mut(&mut self, kind: ProcessKind) -> &mut ProcessTimeMeasure {
        match kind {
            ProcessKind::Harvest => &mut self.harvest,
            ProcessKind::Save => &mut self.save,
            ProcessKind::Submit => &mut self.submit,
        }
    }
}

struct Inner {
    path: PathBuf,
    measures: Mutex<PersistedMeasures>,
}

/// Cheaply cloneable; clones share the same persisted state and cache file.
#[derive(Clone)]
pub struct TimeKeeper {
    inner: Arc<Inner>,
}

impl TimeKeeper {
    /// Loads `<cache_dir>/time_keeper.json` if present, rewriting any
    /// `started` measure to `not-started` (a process that was mid-flight
    /// when the service last exited did not survive it).
    pub async fn load(cache_dir: impl Into<PathBuf>) -> Result<Self, HarvestError> {
        let path = cache_dir.into().join("time_keeper.json");
        let mut measures = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<PersistedMeasures>(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => PersistedMeasures::default(),
            Err(err) => return Err(err.into()),
        };
        measures.sanitize_after_load();

        let keeper = Self {
            inner: Arc::new(Inner {
                path,
                measures: Mutex::new(measures),
            }),
        };
        keeper.persist().await?;
        Ok(keeper)
    }

    /// Subscribes this keeper's handlers to `bus`. Call once per process
    /// lifetime; the Main Context owns the single instance (§3).
    pub fn subscribe(self, bus: &EventBus) -> Self {
        use harvester_domain::EventKind;

        let started = self.clone();
        bus.add_listener(EventKind::HarvestStarted, move |_event| {
            let keeper = started.clone();
            async move {
                let _ = keeper.start(ProcessKind::Harvest).await;
            }
        });
        let finished = self.clone();
        bus.add_listener(EventKind::HarvestFinished, move |event| {
            let keeper = finished.clone();
            async move {
                if let Event::HarvestFinished(domain_event) = event {
                    let _ = keeper.finish(ProcessKind::Harvest, domain_event.payload.success).await;
                }
            }
        });

        let save_started = self.clone();
        bus.add_listener(EventKind::SaveStarted, move |_event| {
            let keeper = save_started.clone();
            async move {
                let _ = keeper.start(ProcessKind::Save).await;
            }
        });
        let save_finished = self.clone();
        bus.add_listener(EventKind::SaveFinished, move |event| {
            let keeper = save_finished.clone();
            async move {
                if let Event::SaveFinished(domain_event) = event {
                    let _ = keeper.finish(ProcessKind::Save, domain_event.payload.success).await;
                }
            }
        });

        let submit_started = self.clone();
        bus.add_listener(EventKind::SubmissionStarted, move |_event| {
            let keeper = submit_started.clone();
            async move {
                let _ = keeper.start(ProcessKind::Submit).await;
            }
        });
        let submit_finished = self.clone();
        bus.add_listener(EventKind::SubmissionFinished, move |event| {
            let keeper = submit_finished.clone();
            async move {
                if let Event::SubmissionFinished(domain_event) = event {
                    let _ = keeper.finish(ProcessKind::Submit, domain_event.payload.success).await;
                }
            }
        });

        let aborting = self.clone();
        bus.add_listener(EventKind::AbortingStarted, move |_event| {
            let keeper = aborting.clone();
            async move {
                let _ = keeper.abort_all().await;
            }
        });

        self
    }

    pub async fn start(&self, kind: ProcessKind) -> Result<(), HarvestError> {
        let now = Utc::now();
        {
            let mut measures = self.inner.measures.lock();
            measures.get_mut(kind).start(now);
        }
        self.persist().await
    }

    pub async fn finish(&self, kind: ProcessKind, success: bool) -> Result<(), HarvestError> {
        let now = Utc::now();
        {
            let mut measures = self.inner.measures.lock();
            measures.get_mut(kind).finish(success, now);
        }
        self.persist().await
    }

    async fn abort_all(&self) -> Result<(), HarvestError> {
        let now = Utc::now();
        {
            let mut measures = self.inner.measures.lock();
            measures.harvest.abort(now);
            measures.save.abort(now);
            measures.submit.abort(now);
        }
        self.persist().await
    }

    pub fn measure(&self, kind: ProcessKind) -> ProcessTimeMeasure {
        self.inner.measures.lock().get(kind).clone()
    }

    /// True iff the harvest measure ended in `failed` or `aborted`.
    pub fn is_harvest_incomplete(&self) -> bool {
        self.inner.measures.lock().harvest.is_incomplete()
    }

    async fn persist(&self) -> Result<(), HarvestError> {
        let snapshot = self.inner.measures.lock().clone();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let staging = self.inner.path.with_extension("json.new");
        if let Some(parent) = staging.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&staging, &bytes).await?;
        disk::replace(&self.inner.path, &staging).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn start_then_finish_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let keeper = TimeKeeper::load(dir.path()).await.unwrap();
        keeper.start(ProcessKind::Harvest).await.unwrap();
        keeper.finish(ProcessKind::Harvest, true).await.unwrap();

        let reloaded = TimeKeeper::load(dir.path()).await.unwrap();
        assert!(!reloaded.is_harvest_incomplete());
    }

    #[tokio::test]
    async fn reload_sanitizes_a_started_measure_left_mid_flight() {
        let dir = tempdir().unwrap();
        let keeper = TimeKeeper::load(dir.path()).await.unwrap();
        keeper.start(ProcessKind::Harvest).await.unwrap();

        let reloaded = TimeKeeper::load(dir.path()).await.unwrap();
        use harvester_domain::entities::ProcessTimeStatus;
        assert_eq!(reloaded.measure(ProcessKind::Harvest).status(), ProcessTimeStatus::NotStarted);
    }

    #[tokio::test]
    async fn failed_harvest_is_incomplete() {
        let dir = tempdir().unwrap();
        let keeper = TimeKeeper::load(dir.path()).await.unwrap();
        keeper.start(ProcessKind::Harvest).await.unwrap();
        keeper.finish(ProcessKind::Harvest, false).await.unwrap();
        assert!(keeper.is_harvest_incomplete());
    }

    #[tokio::test]
    async fn aborting_started_aborts_all_three_measures() {
        let dir = tempdir().unwrap();
        let keeper = TimeKeeper::load(dir.path()).await.unwrap();
        keeper.start(ProcessKind::Harvest).await.unwrap();
        keeper.start(ProcessKind::Save).await.unwrap();
        keeper.abort_all().await.unwrap();

        use harvester_domain::entities::ProcessTimeStatus;
        assert_eq!(keeper.measure(ProcessKind::Harvest).status(), ProcessTimeStatus::Aborted);
        assert_eq!(keeper.measure(ProcessKind::Save).status(), ProcessTimeStatus::Aborted);
    }
}
