// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Tag for the global state machine's current state. The state *behavior*
//! (which operations are accepted) lives in `harvester-core`'s state-machine
//! implementation; this value object is the domain-visible name of that
//! state, used in events, REST responses, and the persisted snapshot.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalStateKind {
    Initialization,
    Idle,
    Harvesting,
    Saving,
    Submitting,
    Aborting,
    Error,
}

impl Display for GlobalStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlobalStateKind::Initialization => "initialization",
            GlobalStateKind::Idle => "idle",
            GlobalStateKind::Harvesting => "harvesting",
            GlobalStateKind::Saving => "saving",
            GlobalStateKind::Submitting => "submitting",
            GlobalStateKind::Aborting => "aborting",
            GlobalStateKind::Error => "error",
        };
        write!(f, "{name}")
    }
}
