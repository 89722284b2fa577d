// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Transformer port (§6): maps an extracted item onto a normalized document,
//! or drops it (`Ok(None)`, not counted as harvested).

use async_trait::async_trait;

use crate::error::HarvestError;

#[async_trait]
pub trait Transformer<I, O>: Send + Sync
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Called once before any `transform` call, with the owning pipeline's
    /// name for logging/metrics context.
    async fn init(&mut self, pipeline_name: &str) -> Result<(), HarvestError>;

    /// Transforms a single extracted item. `Ok(None)` skips the item without
    /// counting it as harvested.
    async fn transform(&mut self, input: I) -> Result<Option<O>, HarvestError>;
}
