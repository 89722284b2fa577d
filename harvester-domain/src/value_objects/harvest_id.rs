// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Identifier for a single harvest run, used to correlate events emitted over
//! its lifetime (`HarvestStarted` ... `HarvestFinished`).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::generic_id::{GenericId, IdCategory};

#[derive(Serialize, Deserialize)]
pub struct HarvestId(GenericId<HarvestMarker>);

#[derive(Serialize, Deserialize)]
struct HarvestMarker;

impl IdCategory for HarvestMarker {
    fn category_name() -> &'static str {
        "harvest"
    }
}

impl HarvestId {
    pub fn new() -> Self {
        Self(GenericId::new())
    }
}

impl Default for HarvestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HarvestId {
    fn clone(&self) -> Self {
        *self
    }
}
impl Copy for HarvestId {}
impl PartialEq for HarvestId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for HarvestId {}
impl std::hash::Hash for HarvestId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
impl fmt::Debug for HarvestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HarvestId({})", self.0)
    }
}
impl Display for HarvestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
