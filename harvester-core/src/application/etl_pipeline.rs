// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ETL Pipeline
//!
//! One pipeline per data source (§4.6): an extractor, transformer, and
//! loader, late-bound via factory closures so `update()` can rebuild the
//! extractor on every harvest without the registry knowing its concrete
//! types. `EtlPipeline<T, O>` is the concrete, generic implementation;
//! [`PipelineHandle`] is the type-erased interface the registry holds.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use harvester_bootstrap::shutdown::{CancellationToken, ShutdownCoordinator};
use harvester_domain::value_objects::{ContentHash, HarvestRange, ModuleName, PipelineHealth, PipelineName, PipelineStatus, SourceFingerprint};
use harvester_domain::{Document, Extractor, HarvestError, Loader, Transformer};
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::infrastructure::cache::HarvesterCache;
use crate::infrastructure::event_bus::{Event, EventBus};

/// Type-erased interface the registry drives, independent of a pipeline's
/// concrete extractor/transformer/loader types.
#[async_trait]
pub trait PipelineHandle: Send + Sync {
    fn name(&self) -> &PipelineName;
    async fn init(&self, module_name: &ModuleName) -> Result<(), HarvestError>;
    async fn prepare_harvest(&self, force_harvest: bool) -> Result<(), HarvestError>;
    async fn harvest(&self, bus: EventBus) -> Result<(), HarvestError>;
    async fn abort_harvest(&self);
    fn status(&self) -> PipelineStatus;
    fn health(&self) -> PipelineHealth;
    fn hash(&self) -> String;
    fn max_document_count(&self) -> i64;
}

type ExtractorFactory<T> = Arc<dyn Fn() -> Box<dyn Extractor<T>> + Send + Sync>;
type TransformerFactory<I, O> = Arc<dyn Fn() -> Box<dyn Transformer<I, O>> + Send + Sync>;
type LoaderFactory<O> = Arc<dyn Fn() -> Box<dyn Loader<O>> + Send + Sync>;

pub struct EtlPipeline<T, O>
where
    T: Send + 'static,
    O: Send + 'static,
{
    name: PipelineName,
    range: HarvestRange,
    extractor_factory: ExtractorFactory<T>,
    transformer_factory: TransformerFactory<T, O>,
    loader_factory: LoaderFactory<O>,
    cache: HarvesterCache,
    extractor: AsyncMutex<Option<Box<dyn Extractor<T>>>>,
    status: Mutex<PipelineStatus>,
    health: Mutex<PipelineHealth>,
    hash: Mutex<String>,
    max_document_count: AtomicI64,
    abort: Mutex<ShutdownCoordinator>,
}

impl<T, O> EtlPipeline<T, O>
where
    T: Send + 'static,
    O: Send + Sync + 'static,
{
    pub fn new(
        name: PipelineName,
        range: HarvestRange,
        cache_root: impl Into<std::path::PathBuf>,
        extractor_factory: ExtractorFactory<T>,
        transformer_factory: TransformerFactory<T, O>,
        loader_factory: LoaderFactory<O>,
    ) -> Self {
        Self {
            name,
            range,
            extractor_factory,
            transformer_factory,
            loader_factory,
            cache: HarvesterCache::new(cache_root),
            extractor: AsyncMutex::new(None),
            status: Mutex::new(PipelineStatus::Idle),
            health: Mutex::new(PipelineHealth::Ok),
            hash: Mutex::new(String::new()),
            max_document_count: AtomicI64::new(-1),
            abort: Mutex::new(ShutdownCoordinator::new(Duration::from_secs(5))),
        }
    }

    fn set_status(&self, status: PipelineStatus) {
        *self.status.lock() = status;
    }

    fn worsen_health(&self, proposed: PipelineHealth) {
        let mut health = self.health.lock();
        *health = health.worsen_to(proposed);
    }

    fn abort_token(&self) -> CancellationToken {
        self.abort.lock().token()
    }

    /// Rebuilds the extractor and recomputes `hash`/`max_document_count`.
    /// Extractor construction failure is a precondition failure (§4.6).
    async fn update(&self) -> Result<(), HarvestError> {
        let mut extractor = (self.extractor_factory)();
        extractor
            .init()
            .await
            .map_err(|err| HarvestError::precondition(format!("{} extractor init failed: {err}", self.name)))?;

        let version = extractor.unique_version_string();
        let fingerprint = SourceFingerprint::new(version.unwrap_or_default());
        let composite = fingerprint.composite_with_range(&self.range);
        *self.hash.lock() = composite.as_str().to_string();
        self.max_document_count.store(extractor.size(), Ordering::SeqCst);

        *self.extractor.lock().await = Some(extractor);
        Ok(())
    }
}

#[async_trait]
impl<T, O> PipelineHandle for EtlPipeline<T, O>
where
    T: Send + 'static,
    O: Send + Sync + 'static,
{
    fn name(&self) -> &PipelineName {
        &self.name
    }

    async fn init(&self, _module_name: &ModuleName) -> Result<(), HarvestError> {
        Ok(())
    }

    async fn prepare_harvest(&self, force_harvest: bool) -> Result<(), HarvestError> {
        self.set_status(PipelineStatus::Busy);

        self.update().await?;

        let fingerprint = SourceFingerprint::new(self.hash.lock().clone());
        self.cache.init(&fingerprint, &self.range).await?;

        if !force_harvest && !self.cache.is_outdated().await? {
            self.set_status(PipelineStatus::Done);
            self.worsen_health(PipelineHealth::Ok);
            return Err(HarvestError::precondition(format!("{}: skipped-no-changes", self.name)));
        }

        *self.abort.lock() = ShutdownCoordinator::new(Duration::from_secs(5));
        self.set_status(PipelineStatus::Harvesting);
        Ok(())
    }

    async fn harvest(&self, bus: EventBus) -> Result<(), HarvestError> {
        use harvester_domain::EventKind;

        let token = self.abort_token();
        let listener_token = token.clone();
        let listener_id = bus.add_listener(EventKind::StartAborting, move |event| {
            let token = listener_token.clone();
            async move {
                if matches!(event, Event::StartAborting(_)) {
                    token.cancel();
                }
            }
        });

        let result = self.harvest_internal(&bus, &token).await;
        bus.remove_listener(EventKind::StartAborting, listener_id);

        match &result {
            Ok(()) if token.is_cancelled() => {
                self.worsen_health(PipelineHealth::HarvestFailed);
            }
            Ok(()) => {
                self.worsen_health(PipelineHealth::Ok);
            }
            Err(_) => {
                self.worsen_health(PipelineHealth::HarvestFailed);
            }
        }
        self.set_status(PipelineStatus::Done);
        result
    }

    async fn abort_harvest(&self) {
        self.abort_token().cancel();
    }

    fn status(&self) -> PipelineStatus {
        *self.status.lock()
    }

    fn health(&self) -> PipelineHealth {
        *self.health.lock()
    }

    fn hash(&self) -> String {
        self.hash.lock().clone()
    }

    fn max_document_count(&self) -> i64 {
        self.max_document_count.load(Ordering::SeqCst)
    }
}

impl<T, O> EtlPipeline<T, O>
where
    T: Send + 'static,
    O: Send + Sync + 'static,
{
    async fn harvest_internal(&self, bus: &EventBus, token: &CancellationToken) -> Result<(), HarvestError> {
        use harvester_domain::events::DocumentsHarvested;
        use harvester_domain::DomainEvent;

        let mut transformer = (self.transformer_factory)();
        transformer.init(self.name.as_str()).await?;
        let mut loader = (self.loader_factory)();
        loader.init(self.name.as_str()).await?;

        let mut extractor_guard = self.extractor.lock().await;
        let extractor = extractor_guard
            .as_mut()
            .ok_or_else(|| HarvestError::internal("harvest called before prepare_harvest"))?;

        let mut stream = extractor.extract();
        let mut next_item = stream.next().await;

        let harvest_succeeded;
        let mut harvest_aborted = false;

        loop {
            if token.is_cancelled() {
                harvest_aborted = true;
                harvest_succeeded = false;
                break;
            }
            if self.status() != PipelineStatus::Harvesting {
                harvest_aborted = true;
                harvest_succeeded = false;
                break;
            }

            let Some(item) = next_item.take() else {
                harvest_succeeded = true;
                break;
            };
            let item = item?;

            let transformed = transformer.transform(item).await?;
            next_item = stream.next().await;
            let is_last = next_item.is_none();

            if let Some(output) = transformed {
                loader.load(output, is_last).await?;
                bus.send_event(Event::DocumentsHarvested(DomainEvent::new(DocumentsHarvested { count: 1 })));
            }
        }

        self.cache.apply_changes(harvest_succeeded, harvest_aborted).await?;
        if harvest_aborted {
            return Err(HarvestError::cancelled(format!("{} aborted", self.name)));
        }
        Ok(())
    }

    /// Stages one already-transformed document into this pipeline's cache.
    /// Exposed for loaders that write through the pipeline rather than a
    /// bespoke downstream sink.
    pub async fn cache_document(&self, document: &Document, forced: bool) -> Result<(), HarvestError> {
        self.cache.cache_document(document, forced).await
    }

    pub fn content_hash_of(&self, bytes: &[u8]) -> ContentHash {
        ContentHash::of_bytes(bytes)
    }
}
