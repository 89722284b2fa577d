// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Event payloads carried on the Event Bus (§4.1) and the kinds used to key
//! its subscription tables.
//!
//! Each payload implements [`EventPayload`] so the bus can log/route by
//! category without a subscriber having to downcast anything.

use serde::{Deserialize, Serialize};

use super::generic_event::{EventCategory, EventPayload};
use crate::value_objects::GlobalStateKind;

/// The tag a subscriber registers against with `addListener`/`removeListener`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    HarvestStarted,
    HarvestFinished,
    DocumentsHarvested,
    StartAborting,
    AbortingStarted,
    AbortingFinished,
    SaveStarted,
    SaveFinished,
    SubmissionStarted,
    SubmissionFinished,
    ServiceInitialized,
    ConfigurationChanged,
    StateTransitioned,
}

/// The tag a single responder registers against with
/// `addSynchronousListener`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    IsOutdated,
}

macro_rules! payload {
    ($name:ident { $($field:ident: $ty:ty),* $(,)? }, $category:expr) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: $ty),*
        }

        impl EventPayload for $name {
            fn event_name(&self) -> &'static str {
                stringify!($name)
            }

            fn event_category(&self) -> EventCategory {
                $category
            }
        }
    };
}

payload!(HarvestStarted { hash: String, max_number_of_documents: i64 }, EventCategory::Processing);
payload!(HarvestFinished { success: bool, hash: String }, EventCategory::Processing);
payload!(DocumentsHarvested { count: u64 }, EventCategory::Processing);
payload!(StartAbortingEvent {}, EventCategory::Processing);
payload!(AbortingStarted {}, EventCategory::Processing);
payload!(AbortingFinished {}, EventCategory::Processing);
payload!(SaveStarted {}, EventCategory::Processing);
payload!(SaveFinished { success: bool }, EventCategory::Processing);
payload!(SubmissionStarted {}, EventCategory::Processing);
payload!(SubmissionFinished { success: bool }, EventCategory::Processing);
payload!(ServiceInitialized { success: bool }, EventCategory::System);
payload!(ConfigurationChanged { key: String }, EventCategory::System);

/// Emitted internally by the state machine whenever it completes a
/// transition; convenient for logging/metrics subscribers that only care
/// about the resulting state, not which event caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransitioned {
    pub from: GlobalStateKind,
    pub to: GlobalStateKind,
}

impl EventPayload for StateTransitioned {
    fn event_name(&self) -> &'static str {
        "StateTransitioned"
    }

    fn event_category(&self) -> EventCategory {
        EventCategory::System
    }
}
