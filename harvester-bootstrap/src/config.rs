// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration
//!
//! The handful of settings the bootstrap layer itself needs before the
//! composition root can build the layered, `HARVESTER_*`-overridable
//! application configuration that `harvester-core` owns. This is
//! intentionally thin: it only carries what `main` needs to find and parse
//! that richer configuration.

use std::path::PathBuf;

/// Bootstrap-level settings derived from the validated CLI.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Path to the layered TOML configuration file, if the operator
    /// overrode the default search path.
    pub config_path: Option<PathBuf>,

    /// Module name override, used to name the service's own log spans and,
    /// when a single-pipeline invocation omits it, as a default pipeline
    /// name.
    pub module_name: Option<String>,

    /// Whether to install the `tracing` subscriber at debug level.
    pub verbose: bool,
}

impl BootstrapSettings {
    pub fn from_validated_cli(cli: &crate::cli::ValidatedCli) -> Self {
        Self {
            config_path: cli.config.clone(),
            module_name: cli.module_name.clone(),
            verbose: cli.verbose,
        }
    }
}
