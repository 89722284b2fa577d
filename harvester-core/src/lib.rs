// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Harvester Core
//!
//! The harvest execution engine: the ETL pipeline and registry, the
//! document caches, the global state machine, the event bus, and the
//! process-wide singletons that wire all of it together for one run of the
//! metadata harvesting service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Application Layer               │
//! │  Main Context, State Machine, Control Facade  │
//! │        ETL Pipeline, ETL Registry             │
//! └─────────────────────┬─────────────────────────┘
//! ┌─────────────────────┴─────────────────────────┐
//! │             Infrastructure Layer               │
//! │  Event Bus, Document Caches, Disk Utilities,   │
//! │  Configuration, Metrics, Logging, Time Keeper   │
//! └─────────────────────┬─────────────────────────┘
//! ┌─────────────────────┴─────────────────────────┐
//! │              harvester-domain                  │
//! │   Entities, value objects, events, ports        │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The extractor/transformer/loader behind any given pipeline is supplied by
//! the caller at registration time (§1's Non-goals exclude concrete
//! collaborators from this crate); `harvester_domain::{Extractor,
//! Transformer, Loader}` are the ports they implement.

pub mod application;
pub mod infrastructure;

pub use application::control_facade::{ControlFacade, FacadeResponse, FacadeStatus};
pub use application::etl_pipeline::{EtlPipeline, PipelineHandle};
pub use application::etl_registry::EtlRegistry;
pub use application::main_context::MainContext;
pub use application::state_machine::{OperationOutcome, StateMachine};
pub use infrastructure::cache::{FaceCache, HarvesterCache};
pub use infrastructure::config::{self as config, HarvesterConfig};
pub use infrastructure::event_bus::{Event, EventBus, Request, Response};
pub use infrastructure::metrics::HarvesterMetrics;
pub use infrastructure::time_keeper::{ProcessKind, TimeKeeper};
