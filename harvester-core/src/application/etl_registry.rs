// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ETL Registry
//!
//! Owns the set of registered pipelines and drives them, optionally in
//! parallel (§4.7). `process_pipelines` fans a closure across every
//! pipeline; when `concurrent`, results are written into a pre-sized slot
//! array indexed by position rather than appended from concurrently-running
//! tasks, closing the registration-order race the original fan-out had if it
//! pushed into a shared `Vec` from parallel workers (Open Question, §SPEC
//! decision recorded in DESIGN.md).

use std::sync::Arc;

use futures::future::join_all;
use harvester_domain::value_objects::{PipelineHealth, PipelineName, PipelineStatus};
use harvester_domain::HarvestError;
use parking_lot::Mutex;

use super::etl_pipeline::PipelineHandle;
use crate::infrastructure::event_bus::{Event, EventBus};

pub struct EtlRegistry {
    pipelines: Mutex<Vec<Arc<dyn PipelineHandle>>>,
    concurrent: bool,
}

impl EtlRegistry {
    pub fn new(concurrent: bool) -> Self {
        Self {
            pipelines: Mutex::new(Vec::new()),
            concurrent,
        }
    }

    /// Adds `pipeline` once; a duplicate name is logged and ignored.
    pub fn register(&self, pipeline: Arc<dyn PipelineHandle>) {
        let mut pipelines = self.pipelines.lock();
        if pipelines.iter().any(|existing| existing.name() == pipeline.name()) {
            tracing::warn!(pipeline = %pipeline.name(), "duplicate pipeline registration ignored");
            return;
        }
        pipelines.push(pipeline);
    }

    fn snapshot(&self) -> Vec<Arc<dyn PipelineHandle>> {
        self.pipelines.lock().clone()
    }

    /// Applies `f` to every registered pipeline. If `concurrent`, pipelines
    /// run in parallel and results land at their registration index in a
    /// pre-sized array — never appended from a worker task — so no race
    /// between finishing order and reported order is possible. Individual
    /// failures are logged but never abort the fan-out.
    pub async fn process_pipelines<F, Fut>(&self, f: F) -> Vec<Result<(), HarvestError>>
    where
        F: Fn(Arc<dyn PipelineHandle>) -> Fut + Send + Sync,
        Fut: std::future::Future<Output = Result<(), HarvestError>> + Send,
    {
        let pipelines = self.snapshot();

        if self.concurrent {
            let futures = pipelines.iter().cloned().map(|pipeline| {
                let name = pipeline.name().clone();
                let fut = f(pipeline);
                async move {
                    let result = fut.await;
                    if let Err(err) = &result {
                        tracing::warn!(pipeline = %name, error = %err, "pipeline task failed");
                    }
                    result
                }
            });
            join_all(futures).await
        } else {
            let mut results = Vec::with_capacity(pipelines.len());
            for pipeline in pipelines {
                let name = pipeline.name().clone();
                let result = f(pipeline).await;
                if let Err(err) = &result {
                    tracing::warn!(pipeline = %name, error = %err, "pipeline task failed");
                }
                results.push(result);
            }
            results
        }
    }

    /// Runs `prepareHarvest` on every pipeline, returning how many passed
    /// their precondition check.
    pub async fn prepare_all(&self, force_harvest: bool) -> usize {
        let results = self.process_pipelines(move |pipeline| async move { pipeline.prepare_harvest(force_harvest).await }).await;
        results.iter().filter(|r| r.is_ok()).count()
    }

    /// Runs `harvest` on every pipeline currently in `harvesting` status.
    pub async fn harvest_all(&self, bus: EventBus) -> Vec<Result<(), HarvestError>> {
        self.process_pipelines(move |pipeline| {
            let bus = bus.clone();
            async move {
                if pipeline.status() == PipelineStatus::Harvesting {
                    pipeline.harvest(bus).await
                } else {
                    Ok(())
                }
            }
        })
        .await
    }

    pub async fn abort_all(&self) {
        let pipelines = self.snapshot();
        let futures = pipelines.iter().cloned().map(|pipeline| async move { pipeline.abort_harvest().await });
        join_all(futures).await;
    }

    /// Runs the full harvest sequence of §4.7 against every registered
    /// pipeline: `prepareHarvest` on all of them, bail out with a
    /// precondition failure if none are runnable, emit `HarvestStarted` only
    /// if at least one pipeline ended up `harvesting`, run `harvest` on
    /// those, then emit `HarvestFinished` with the aggregate outcome.
    pub async fn run_harvest(&self, bus: EventBus, force_harvest: bool) -> Result<(), HarvestError> {
        use harvester_domain::events::{HarvestFinished, HarvestStarted};
        use harvester_domain::DomainEvent;

        let hash = self.hash();
        let ready = self.prepare_all(force_harvest).await;
        if ready == 0 {
            bus.send_event(Event::HarvestFinished(DomainEvent::new(HarvestFinished { success: false, hash: hash.clone() })));
            return Err(HarvestError::precondition("No harvester could be started."));
        }

        let any_harvesting = self.snapshot().iter().any(|p| p.status() == PipelineStatus::Harvesting);
        if any_harvesting {
            bus.send_event(Event::HarvestStarted(DomainEvent::new(HarvestStarted {
                hash: hash.clone(),
                max_number_of_documents: self.max_number_of_documents(),
            })));
        }

        let results = self.harvest_all(bus.clone()).await;
        let success = results.iter().all(Result::is_ok);
        bus.send_event(Event::HarvestFinished(DomainEvent::new(HarvestFinished { success, hash })));

        if success {
            Ok(())
        } else {
            Err(HarvestError::fatal("one or more pipelines failed during harvest"))
        }
    }

    /// Sum of every pipeline's `max_document_count`, or `-1` if any pipeline
    /// reports unknown (`-1`).
    pub fn max_number_of_documents(&self) -> i64 {
        let pipelines = self.snapshot();
        let mut total: i64 = 0;
        for pipeline in &pipelines {
            let count = pipeline.max_document_count();
            if count < 0 {
                return -1;
            }
            total += count;
        }
        total
    }

    /// Hash of the concatenation of every pipeline's hash, in registration
    /// order (a stable order, resolving the Open Question on `initHash`
    /// ordering — see DESIGN.md).
    pub fn hash(&self) -> String {
        use harvester_domain::value_objects::ContentHash;
        let pipelines = self.snapshot();
        let concatenated: String = pipelines.iter().map(|p| p.hash()).collect();
        ContentHash::of_bytes(concatenated.as_bytes()).into_inner()
    }

    pub fn status(&self) -> Option<PipelineStatus> {
        let pipelines = self.snapshot();
        PipelineStatus::worst_of(pipelines.iter().map(|p| p.status()))
    }

    pub fn health(&self) -> Option<PipelineHealth> {
        let pipelines = self.snapshot();
        PipelineHealth::worst_of(pipelines.iter().map(|p| p.health()))
    }

    pub fn pipeline_names(&self) -> Vec<PipelineName> {
        self.snapshot().iter().map(|p| p.name().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pipelines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use harvester_domain::value_objects::ModuleName;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPipeline {
        name: PipelineName,
        status: Mutex<PipelineStatus>,
        health: Mutex<PipelineHealth>,
        hash: String,
        max_docs: i64,
        harvest_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PipelineHandle for StubPipeline {
        fn name(&self) -> &PipelineName {
            &self.name
        }

        async fn init(&self, _module_name: &ModuleName) -> Result<(), HarvestError> {
            Ok(())
        }

        async fn prepare_harvest(&self, _force_harvest: bool) -> Result<(), HarvestError> {
            *self.status.lock() = PipelineStatus::Harvesting;
            Ok(())
        }

        async fn harvest(&self, _bus: EventBus) -> Result<(), HarvestError> {
            self.harvest_calls.fetch_add(1, Ordering::SeqCst);
            *self.status.lock() = PipelineStatus::Done;
            Ok(())
        }

        async fn abort_harvest(&self) {}

        fn status(&self) -> PipelineStatus {
            *self.status.lock()
        }

        fn health(&self) -> PipelineHealth {
            *self.health.lock()
        }

        fn hash(&self) -> String {
            self.hash.clone()
        }

        fn max_document_count(&self) -> i64 {
            self.max_docs
        }
    }

    fn stub(name: &str, max_docs: i64) -> (Arc<StubPipeline>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Arc::new(StubPipeline {
            name: PipelineName::new(name).unwrap(),
            status: Mutex::new(PipelineStatus::Idle),
            health: Mutex::new(PipelineHealth::Ok),
            hash: format!("hash-{name}"),
            max_docs,
            harvest_calls: calls.clone(),
        });
        (pipeline, calls)
    }

    #[tokio::test]
    async fn duplicate_registration_is_ignored() {
        let registry = EtlRegistry::new(false);
        let (pipeline, _) = stub("a", 1);
        registry.register(pipeline.clone());
        registry.register(pipeline);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn prepare_all_counts_successful_preconditions() {
        let registry = EtlRegistry::new(true);
        let (a, _) = stub("a", 1);
        let (b, _) = stub("b", 2);
        registry.register(a);
        registry.register(b);

        let ready = registry.prepare_all(false).await;
        assert_eq!(ready, 2);
    }

    #[tokio::test]
    async fn harvest_all_only_drives_pipelines_in_harvesting_status() {
        let registry = EtlRegistry::new(true);
        let (a, calls_a) = stub("a", 1);
        let (b, calls_b) = stub("b", 1);
        registry.register(a.clone());
        registry.register(b.clone());

        a.prepare_harvest(false).await.unwrap();
        registry.harvest_all(EventBus::new()).await;

        assert_eq!(calls_a.load(Ordering::SeqCst), 1);
        assert_eq!(calls_b.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn max_number_of_documents_is_unknown_if_any_pipeline_is_unknown() {
        let registry = EtlRegistry::new(false);
        let (a, _) = stub("a", 5);
        let (b, _) = stub("b", -1);
        registry.register(a);
        registry.register(b);
        assert_eq!(registry.max_number_of_documents(), -1);
    }

    #[tokio::test]
    async fn aggregate_status_is_worst_of_all_pipelines() {
        let registry = EtlRegistry::new(false);
        let (a, _) = stub("a", 1);
        let (b, _) = stub("b", 1);
        registry.register(a.clone());
        registry.register(b);
        a.prepare_harvest(false).await.unwrap();

        assert_eq!(registry.status(), Some(PipelineStatus::Harvesting));
    }
}
