// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain hashing service.
//!
//! CPU-bound and synchronous, following this domain's convention that
//! compute-only services stay sync while I/O-bound collaborators (§4.6's
//! extractor/transformer/loader ports) are the ones modeled as async traits.

use crate::entities::Document;
use crate::error::HarvestError;
use crate::value_objects::{ContentHash, DocumentId};

/// Computes document identity: the stable `DocumentId` derived from a
/// source id, and the content-dependent `ContentHash` derived from a
/// document's canonical serialization.
pub trait HashingService: Send + Sync {
    fn document_id(&self, source_id: &str) -> DocumentId;
    fn content_hash(&self, document: &Document) -> Result<ContentHash, HarvestError>;
    fn hash_str(&self, value: &str) -> String;
}

#[derive(Debug, Default)]
pub struct Sha256HashingService;

impl HashingService for Sha256HashingService {
    fn document_id(&self, source_id: &str) -> DocumentId {
        DocumentId::from_source_id(source_id)
    }

    fn content_hash(&self, document: &Document) -> Result<ContentHash, HarvestError> {
        document.content_hash()
    }

    fn hash_str(&self, value: &str) -> String {
        ContentHash::of_bytes(value.as_bytes()).into_inner()
    }
}
