// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The service's module name, derived from the data-provider name at
//! startup: whitespace stripped, `HarvesterService` appended. Used as the
//! root directory name for all persisted state (§6).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn from_data_provider_name(data_provider_name: &str) -> Self {
        let stripped: String = data_provider_name.chars().filter(|c| !c.is_whitespace()).collect();
        Self(format!("{stripped}HarvesterService"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_appends_suffix() {
        let name = ModuleName::from_data_provider_name("Open Library");
        assert_eq!(name.as_str(), "OpenLibraryHarvesterService");
    }
}
