// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Per-pipeline health. Monotonically worsens within a run; a successful
//! completion resets it to `Ok`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineHealth {
    Ok,
    SubmissionFailed,
    HarvestFailed,
    Fubar,
}

impl PipelineHealth {
    fn rank(self) -> u8 {
        match self {
            PipelineHealth::Ok => 0,
            PipelineHealth::SubmissionFailed => 1,
            PipelineHealth::HarvestFailed => 2,
            PipelineHealth::Fubar => 3,
        }
    }

    /// Worst-of across a set of per-pipeline health values, per §4.7:
    /// `fubar > harvest-failed > submission-failed > ok`.
    pub fn worst_of(healths: impl IntoIterator<Item = PipelineHealth>) -> Option<PipelineHealth> {
        healths.into_iter().max_by_key(|h| h.rank())
    }

    /// Health never improves except through an explicit reset to `Ok` on a
    /// successful completion; this clamps a proposed transition so a pipeline
    /// already at `Fubar` cannot be silently downgraded to `HarvestFailed`.
    pub fn worsen_to(self, proposed: PipelineHealth) -> PipelineHealth {
        if proposed.rank() > self.rank() {
            proposed
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fubar_outranks_everything() {
        assert_eq!(
            PipelineHealth::worst_of([PipelineHealth::Ok, PipelineHealth::Fubar, PipelineHealth::HarvestFailed]),
            Some(PipelineHealth::Fubar)
        );
    }

    #[test]
    fn health_only_worsens() {
        let current = PipelineHealth::Fubar;
        assert_eq!(current.worsen_to(PipelineHealth::Ok), PipelineHealth::Fubar);
    }
}
