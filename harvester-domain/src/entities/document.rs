// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A harvested document: an opaque payload carrying a stable, externally
//! assigned source identifier. Content identity (its [`ContentHash`]) is
//! derived from its canonical serialization, never stored on the struct
//! itself, so two structurally equal documents always hash equal.

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::value_objects::{ContentHash, DocumentId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    source_id: String,
    body: serde_json::Value,
}

impl Document {
    pub fn new(source_id: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            source_id: source_id.into(),
            body,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    pub fn document_id(&self) -> DocumentId {
        DocumentId::from_source_id(&self.source_id)
    }

    /// Canonical serialization used for both the Changes face payload and
    /// the Versions face content hash. `serde_json` serializes object keys
    /// in field-declaration order for a given value shape, which is stable
    /// enough for this single-process cache (no cross-language canonical
    /// form is required).
    pub fn canonical_serialize(&self) -> Result<Vec<u8>, HarvestError> {
        Ok(serde_json::to_vec(&self.body)?)
    }

    pub fn content_hash(&self) -> Result<ContentHash, HarvestError> {
        Ok(ContentHash::of_bytes(&self.canonical_serialize()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_content_produces_equal_hash() {
        let a = Document::new("src-1", json!({"title": "a"}));
        let b = Document::new("src-2", json!({"title": "a"}));
        assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());
        assert_ne!(a.document_id(), b.document_id());
    }

    #[test]
    fn differing_content_produces_differing_hash() {
        let a = Document::new("src-1", json!({"title": "a"}));
        let b = Document::new("src-1", json!({"title": "b"}));
        assert_eq!(a.document_id(), b.document_id());
        assert_ne!(a.content_hash().unwrap(), b.content_hash().unwrap());
    }
}
