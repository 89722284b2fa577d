// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Per-pipeline status, driven by the pipeline itself and observed by the
//! registry for aggregation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStatus {
    Idle,
    Queued,
    Busy,
    Harvesting,
    Aborting,
    Done,
}

impl PipelineStatus {
    /// Ordering used by the registry's `worst-of` aggregation: the greater
    /// value wins.
    fn rank(self) -> u8 {
        match self {
            PipelineStatus::Idle => 0,
            PipelineStatus::Busy => 1,
            PipelineStatus::Queued => 2,
            PipelineStatus::Done => 3,
            PipelineStatus::Harvesting => 4,
            PipelineStatus::Aborting => 5,
        }
    }

    /// Worst-of across a set of per-pipeline statuses, per §4.7:
    /// `aborting > harvesting > queued > busy > idle` (with `done` folded in
    /// between `queued` and `harvesting` since a registry with some pipelines
    /// done and none running reports no activity worse than `queued`).
    pub fn worst_of(statuses: impl IntoIterator<Item = PipelineStatus>) -> Option<PipelineStatus> {
        statuses.into_iter().max_by_key(|s| s.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborting_beats_everything() {
        let worst = PipelineStatus::worst_of([PipelineStatus::Idle, PipelineStatus::Aborting, PipelineStatus::Done]);
        assert_eq!(worst, Some(PipelineStatus::Aborting));
    }

    #[test]
    fn empty_set_has_no_worst() {
        assert_eq!(PipelineStatus::worst_of([]), None);
    }
}
