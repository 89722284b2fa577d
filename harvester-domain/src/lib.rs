// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Harvester Domain
//!
//! Pure, reusable business logic for the metadata harvesting service,
//! following Domain-Driven Design: entities and value objects with no
//! dependency on any storage technology, transport, or runtime, plus the
//! infrastructure ports (`Extractor`, `Transformer`, `Loader`) the excluded
//! provider-specific collaborators implement.
//!
//! ## Layout
//!
//! - [`value_objects`] — immutable identifiers and small domain types
//!   (`DocumentId`, `ContentHash`, `SourceFingerprint`, `HarvestRange`,
//!   `PipelineStatus`, `PipelineHealth`, `GlobalStateKind`, ...).
//! - [`entities`] — `Document` and `ProcessTimeMeasure`, which carry
//!   lifecycle beyond pure equality.
//! - [`events`] — the `DomainEvent<T>` envelope and the concrete payloads
//!   exchanged over the Event Bus.
//! - [`repositories`] — the `Extractor`/`Transformer`/`Loader` ports.
//! - [`services`] — CPU-bound domain services (content hashing).
//! - [`error`] — `HarvestError`, the one error type domain and application
//!   code returns.
//!
//! Everything that touches disk, a clock wall, an HTTP client, or a runtime
//! lives in `harvester-core` instead.

pub mod entities;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{Document, ProcessTimeMeasure, ProcessTimeStatus};
pub use error::{HarvestError, HarvestErrorKind};
pub use events::{DomainEvent, EventKind, RequestKind};
pub use repositories::{Extractor, Loader, Transformer};
pub use value_objects::{
    ContentHash, DocumentId, GlobalStateKind, HarvestId, HarvestRange, ModuleName, PipelineHealth, PipelineName,
    PipelineStatus, RangeEnd, SourceFingerprint,
};
