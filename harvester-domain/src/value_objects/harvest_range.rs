// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Harvest range `[start, end)` for an iterator-style pipeline's extractor.
//!
//! The original source represents "until the end" as `endIndex ==
//! Integer.MAX_VALUE`. Per the open question in the design notes, this
//! implementation replaces that sentinel with an explicit [`RangeEnd::Unbounded`]
//! variant so "unbounded" cannot be confused with a pipeline that happens to
//! have `u64::MAX` documents.

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RangeEnd {
    Bounded(u64),
    Unbounded,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HarvestRange {
    start: u64,
    end: RangeEnd,
}

impl HarvestRange {
    pub fn bounded(start: u64, end: u64) -> Result<Self, HarvestError> {
        if end < start {
            return Err(HarvestError::InvalidConfiguration(format!(
                "harvest range end ({end}) precedes start ({start})"
            )));
        }
        Ok(Self {
            start,
            end: RangeEnd::Bounded(end),
        })
    }

    pub fn unbounded_from(start: u64) -> Self {
        Self {
            start,
            end: RangeEnd::Unbounded,
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> RangeEnd {
        self.end
    }

    pub fn contains(&self, index: u64) -> bool {
        index >= self.start
            && match self.end {
                RangeEnd::Bounded(end) => index < end,
                RangeEnd::Unbounded => true,
            }
    }
}

impl Default for HarvestRange {
    fn default() -> Self {
        Self::unbounded_from(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        assert!(HarvestRange::bounded(10, 5).is_err());
    }

    #[test]
    fn bounded_range_excludes_end() {
        let range = HarvestRange::bounded(0, 3).unwrap();
        assert!(range.contains(0));
        assert!(range.contains(2));
        assert!(!range.contains(3));
    }

    #[test]
    fn unbounded_range_has_no_ceiling() {
        let range = HarvestRange::unbounded_from(0);
        assert!(range.contains(u64::MAX));
    }
}
