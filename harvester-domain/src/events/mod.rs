// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain events: the generic envelope ([`DomainEvent`]) plus the concrete
//! payloads exchanged over the Event Bus (§4.1).

mod generic_event;
mod harvest_events;

pub use generic_event::{DomainEvent, EventCategory, EventPayload};
pub use harvest_events::{
    AbortingFinished, AbortingStarted, ConfigurationChanged, DocumentsHarvested, EventKind, HarvestFinished,
    HarvestStarted, RequestKind, SaveFinished, SaveStarted, ServiceInitialized, StartAbortingEvent,
    StateTransitioned, SubmissionFinished, SubmissionStarted,
};
