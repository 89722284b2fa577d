// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Loader port (§6): persists a transformed element into the pipeline's
//! Harvester Cache (and, for submission pipelines, a downstream search
//! index — excluded from this crate's scope).

use async_trait::async_trait;

use crate::error::HarvestError;

#[async_trait]
pub trait Loader<O>: Send + Sync
where
    O: Send + 'static,
{
    async fn init(&mut self, pipeline_name: &str) -> Result<(), HarvestError>;

    /// Loads one element. Must tolerate duplicate keys (idempotent upsert):
    /// an extractor restart after a partial failure may re-offer an already
    /// loaded element. `is_last` is true iff the pipeline's extractor has no
    /// further elements, signaling the loader to flush any buffering.
    async fn load(&mut self, element: O, is_last: bool) -> Result<(), HarvestError>;
}
