// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Generic, marker-typed entity identifier shared by every ULID-backed id in
//! this domain (time-ordered: a harvest run's id sorts by when it started).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use ulid::Ulid;

use crate::error::HarvestError;

/// A category of entity identified by a [`GenericId`]; implemented by a
/// private marker type per entity kind so ids of different kinds cannot be
/// confused at compile time.
pub trait IdCategory {
    fn category_name() -> &'static str;
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericId<M> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<fn() -> M>,
}

// Manual impls: `M` never appears by value, so none of these should require
// `M: Trait` the way `#[derive]` would conservatively demand.
impl<M> Clone for GenericId<M> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<M> Copy for GenericId<M> {}
impl<M> PartialEq for GenericId<M> {
    fn eq(&self, other: &Self) -> bool {
        self.ulid == other.ulid
    }
}
impl<M> Eq for GenericId<M> {}
impl<M> PartialOrd for GenericId<M> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<M> Ord for GenericId<M> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ulid.cmp(&other.ulid)
    }
}
impl<M> std::hash::Hash for GenericId<M> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ulid.hash(state);
    }
}
impl<M> fmt::Debug for GenericId<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GenericId").field(&self.ulid).finish()
    }
}

impl<M: IdCategory> GenericId<M> {
    pub fn new() -> Self {
        Self {
            ulid: Ulid::new(),
            _marker: PhantomData,
        }
    }

    pub fn parse(value: &str) -> Result<Self, HarvestError> {
        let ulid = Ulid::from_string(value).map_err(|e| {
            HarvestError::InvalidConfiguration(format!("invalid {} id {value}: {e}", M::category_name()))
        })?;
        Ok(Self {
            ulid,
            _marker: PhantomData,
        })
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<M: IdCategory> Default for GenericId<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Display for GenericId<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestMarker;
    impl IdCategory for TestMarker {
        fn category_name() -> &'static str {
            "test"
        }
    }

    #[test]
    fn round_trips_through_string() {
        let id: GenericId<TestMarker> = GenericId::new();
        let parsed = GenericId::<TestMarker>::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_string() {
        assert!(GenericId::<TestMarker>::parse("not-a-ulid").is_err());
    }
}
