// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Document identifier: a hex string derived from a document's externally
//! assigned source id, used as the key space shared by the versions and
//! changes cache faces.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};

use crate::error::HarvestError;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derives a document id from an externally assigned source identifier.
    /// Two documents with the same source id always produce the same
    /// `DocumentId` (the many-to-one relation described in the data model).
    pub fn from_source_id(source_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source_id.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First two hex characters, the fan-out directory for the two-level
    /// cache layout (`<root>/<first-2-chars>/<rest-of-id>`).
    pub fn fan_out_prefix(&self) -> &str {
        &self.0[..2]
    }

    /// Remainder of the id after the fan-out prefix.
    pub fn fan_out_rest(&self) -> &str {
        &self.0[2..]
    }

    pub fn parse(value: impl Into<String>) -> Result<Self, HarvestError> {
        let value = value.into();
        if value.len() < 3 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HarvestError::InvalidConfiguration(format!(
                "invalid document id: {value}"
            )));
        }
        Ok(Self(value))
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_source_id_yields_same_document_id() {
        assert_eq!(DocumentId::from_source_id("abc"), DocumentId::from_source_id("abc"));
    }

    #[test]
    fn different_source_ids_yield_different_document_ids() {
        assert_ne!(DocumentId::from_source_id("abc"), DocumentId::from_source_id("xyz"));
    }

    #[test]
    fn fan_out_splits_at_two_characters() {
        let id = DocumentId::from_source_id("abc");
        assert_eq!(id.fan_out_prefix().len(), 2);
        assert_eq!(format!("{}{}", id.fan_out_prefix(), id.fan_out_rest()), id.as_str());
    }
}
