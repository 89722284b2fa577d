// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! CLI structure and clap parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Harvester Service command-line interface
#[derive(Debug, Parser)]
#[command(name = "harvester", about = "Metadata harvesting service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to a layered TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the module name used to name the running pipeline
    #[arg(long, global = true)]
    pub module_name: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the service: bring up the Event Bus, Time Keeper, and every
    /// configured pipeline's ETL Pipeline, then serve the Control Facade
    /// until a shutdown signal arrives.
    Serve,

    /// Trigger a one-shot harvest of a single pipeline.
    Harvest {
        /// Registered pipeline name
        pipeline: String,

        /// Force a fresh harvest even if the source fingerprint is unchanged
        #[arg(long)]
        force: bool,
    },

    /// Request cooperative abort of a running pipeline.
    Abort {
        /// Registered pipeline name
        pipeline: String,
    },

    /// Print the current status/health of one pipeline, or every pipeline.
    Status {
        /// Registered pipeline name; omit to report every pipeline
        pipeline: Option<String>,
    },
}

/// Parse CLI arguments from `std::env::args`.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
