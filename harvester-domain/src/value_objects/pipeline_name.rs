// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Explicit, human-assigned pipeline name.
//!
//! The original source derives a pipeline's registry name from its class
//! name via reflection. Per the design notes this is incidental and is
//! replaced here by an explicit name supplied at registration.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::error::HarvestError;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineName(String);

impl PipelineName {
    pub fn new(value: impl Into<String>) -> Result<Self, HarvestError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(HarvestError::InvalidConfiguration("pipeline name must not be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PipelineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
