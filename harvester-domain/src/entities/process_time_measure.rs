// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! One process-time measure: a tiny state machine tracking when a harvest,
//! save, or submit process started and ended. Three instances of this live
//! in the Time Keeper (§4.8), persisted together as one JSON file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::datetime_serde;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessTimeStatus {
    NotStarted,
    Started,
    Finished,
    Failed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessTimeMeasure {
    status: ProcessTimeStatus,
    #[serde(with = "datetime_serde::option", default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(with = "datetime_serde::option", default)]
    ended_at: Option<DateTime<Utc>>,
}

impl ProcessTimeMeasure {
    pub fn not_started() -> Self {
        Self {
            status: ProcessTimeStatus::NotStarted,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn status(&self) -> ProcessTimeStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Begins the process, regardless of the previous status, per §4.8: "if
    /// status ∈ {not-started, finished, failed, aborted}, transition to
    /// started". A measure already `started` is left untouched (there is at
    /// most one in-flight process of a given kind, enforced upstream by the
    /// global state machine).
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.status != ProcessTimeStatus::Started {
            self.status = ProcessTimeStatus::Started;
            self.started_at = Some(now);
            self.ended_at = None;
        }
    }

    pub fn finish(&mut self, success: bool, now: DateTime<Utc>) {
        self.status = if success {
            ProcessTimeStatus::Finished
        } else {
            ProcessTimeStatus::Failed
        };
        self.ended_at = Some(now);
    }

    pub fn abort(&mut self, now: DateTime<Utc>) {
        self.status = ProcessTimeStatus::Aborted;
        self.ended_at = Some(now);
    }

    /// A process that was `started` at the moment the service went down is
    /// not recoverable; rewrite it to `not-started` on load (§3 invariant).
    pub fn sanitize_after_load(&mut self) {
        if self.status == ProcessTimeStatus::Started {
            self.status = ProcessTimeStatus::NotStarted;
            self.started_at = None;
            self.ended_at = None;
        }
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self.status, ProcessTimeStatus::Failed | ProcessTimeStatus::Aborted)
    }
}

impl Default for ProcessTimeMeasure {
    fn default() -> Self {
        Self::not_started()
    }
}
