// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A fingerprint produced by an extractor, used to decide whether a pipeline
//! is outdated relative to its last stable harvest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};

use super::harvest_range::HarvestRange;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFingerprint(String);

impl SourceFingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Composite fingerprint combining the extractor's fingerprint with the
    /// harvest range: a range change invalidates any prior cached output,
    /// per the Harvester Cache's `init` operation.
    pub fn composite_with_range(&self, range: &HarvestRange) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hasher.update(range.start().to_be_bytes());
        match range.end() {
            super::harvest_range::RangeEnd::Bounded(end) => {
                hasher.update(1u8.to_be_bytes());
                hasher.update(end.to_be_bytes());
            }
            super::harvest_range::RangeEnd::Unbounded => {
                hasher.update(0u8.to_be_bytes());
            }
        }
        Self(hex::encode(hasher.finalize()))
    }
}

impl Display for SourceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::harvest_range::HarvestRange;

    #[test]
    fn range_change_changes_composite_fingerprint() {
        let fp = SourceFingerprint::new("v1");
        let a = fp.composite_with_range(&HarvestRange::bounded(0, 10).unwrap());
        let b = fp.composite_with_range(&HarvestRange::bounded(0, 20).unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn same_range_is_deterministic() {
        let fp = SourceFingerprint::new("v1");
        let range = HarvestRange::bounded(0, 10).unwrap();
        assert_eq!(fp.composite_with_range(&range), fp.composite_with_range(&range));
    }
}
