// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Extractor port: an infrastructure collaborator excluded from this crate's
//! scope (§1), consumed here only through its interface (§6).
//!
//! This is an I/O-bound port, so — unlike this domain's CPU-bound services —
//! it is modeled as an `async_trait`.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::HarvestError;

/// Produces a single-pass, lazy, finite sequence of source items for one
/// pipeline. The pipeline never restarts an extractor's stream.
#[async_trait]
pub trait Extractor<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Prepares the extractor (e.g. opens a connection, primes an HTTP
    /// cache). Failure here is a precondition failure (§7).
    async fn init(&mut self) -> Result<(), HarvestError>;

    /// The lazy, single-pass sequence of extracted items.
    fn extract(&mut self) -> BoxStream<'_, Result<T, HarvestError>>;

    /// A fingerprint of the current source state (e.g. a hash of the data
    /// provider's version/manifest). `None` if the extractor cannot report
    /// one; the pipeline then always treats itself as outdated.
    fn unique_version_string(&self) -> Option<String>;

    /// Total number of items the extractor expects to produce, or `-1` if
    /// unknown ahead of time.
    fn size(&self) -> i64;
}
