// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Main Context
//!
//! Owns the per-service singletons for one process lifetime: the Event Bus,
//! Configuration, ETL Registry, Time Keeper, and the State Machine/Control
//! Facade built on top of them (§3, §9). The Scheduler and structured-log
//! sink are external collaborators (§9's design notes) so this context only
//! holds what it constructs.
//!
//! Construction order is Event Bus → Configuration → Time Keeper → ETL
//! Registry → State Machine → Metrics → Control Facade. `shutdown` logs
//! relinquishment in the reverse of that order; there is no real resource
//! to close (the event bus's dispatch task exits on its own once every
//! `EventBus` clone is dropped), but the explicit, ordered log line matters
//! for anyone tailing startup/shutdown behavior in production.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use harvester_domain::value_objects::ModuleName;
use harvester_domain::HarvestError;

use super::control_facade::ControlFacade;
use super::etl_registry::EtlRegistry;
use super::state_machine::StateMachine;
use crate::infrastructure::config::{self, HarvesterConfig};
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::metrics::HarvesterMetrics;
use crate::infrastructure::time_keeper::TimeKeeper;

pub struct MainContext {
    pub module_name: ModuleName,
    pub module_dir: PathBuf,
    pub bus: EventBus,
    pub config: Arc<HarvesterConfig>,
    pub time_keeper: TimeKeeper,
    pub registry: Arc<EtlRegistry>,
    pub state_machine: Arc<StateMachine>,
    pub metrics: Arc<HarvesterMetrics>,
    pub control_facade: ControlFacade,
}

impl MainContext {
    /// Builds every singleton and wires their event-bus subscriptions. Does
    /// not register any pipeline; callers add pipelines to `registry` after
    /// construction, then flip the state machine out of `initialization` by
    /// publishing `ServiceInitialized`.
    pub async fn build(module_dir: impl AsRef<Path>, data_provider_name: &str, config_path: Option<&Path>) -> Result<Self, HarvestError> {
        let module_dir = module_dir.as_ref().to_path_buf();
        let module_name = ModuleName::from_data_provider_name(data_provider_name);

        let bus = EventBus::new();

        let config = config::load(config_path)?;
        config.snapshot_to(&module_dir).await?;

        let time_keeper = TimeKeeper::load(module_dir.join("cache")).await?.subscribe(&bus);

        let registry = Arc::new(EtlRegistry::new(config.concurrent));

        let state_machine = StateMachine::new(bus.clone());

        let metrics = Arc::new(HarvesterMetrics::new()?);
        metrics.clone().subscribe(&bus);

        let control_facade = ControlFacade::new(state_machine.clone(), registry.clone(), time_keeper.clone(), bus.clone());

        tracing::info!(module = %module_name, "main context constructed");

        Ok(Self {
            module_name,
            module_dir,
            bus,
            config,
            time_keeper,
            registry,
            state_machine,
            metrics,
            control_facade,
        })
    }

    /// Reloads configuration from disk/env, publishing `ConfigurationChanged`
    /// for every parameter that differs from the in-memory snapshot.
    pub async fn reload_config(&mut self, config_path: Option<&Path>) -> Result<(), HarvestError> {
        let fresh = config::reload(&self.config, config_path, &self.bus)?;
        fresh.snapshot_to(&self.module_dir).await?;
        self.config = fresh;
        Ok(())
    }

    /// Publishes `ServiceInitialized` once the caller has finished wiring
    /// pipelines. `success=false` parks the state machine in `error`, from
    /// which only `reset` is accepted.
    pub fn finish_initialization(&self, success: bool) {
        self.bus.send_event(crate::infrastructure::event_bus::Event::ServiceInitialized(
            harvester_domain::DomainEvent::new(harvester_domain::events::ServiceInitialized { success }),
        ));
    }

    /// Relinquishes the singletons in the reverse of their construction
    /// order. Deterministic teardown order matters more than the teardown
    /// doing real work today (§9).
    pub fn shutdown(self) {
        tracing::info!("main context shutting down");
        tracing::debug!("relinquishing control facade");
        drop(self.control_facade);
        tracing::debug!("relinquishing metrics");
        drop(self.metrics);
        tracing::debug!("relinquishing state machine");
        drop(self.state_machine);
        tracing::debug!("relinquishing etl registry");
        drop(self.registry);
        tracing::debug!("relinquishing time keeper");
        drop(self.time_keeper);
        tracing::debug!("relinquishing configuration");
        drop(self.config);
        tracing::debug!("relinquishing event bus");
        drop(self.bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_constructs_every_singleton_in_idle_free_initialization_state() {
        let dir = tempfile::tempdir().unwrap();
        let context = MainContext::build(dir.path(), "Open Library", None).await.unwrap();

        assert_eq!(context.module_name.as_str(), "OpenLibraryHarvesterService");
        assert_eq!(context.state_machine.current(), harvester_domain::value_objects::GlobalStateKind::Initialization);
        assert!(context.registry.is_empty());
    }

    #[tokio::test]
    async fn finish_initialization_success_moves_state_machine_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let context = MainContext::build(dir.path(), "Open Library", None).await.unwrap();

        context.finish_initialization(true);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(context.state_machine.current(), harvester_domain::value_objects::GlobalStateKind::Idle);
    }
}
