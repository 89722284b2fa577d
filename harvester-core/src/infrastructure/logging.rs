// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging
//!
//! `tracing` is the sole logging facade once the subscriber below is
//! installed (§10.1); before that point, `harvester-bootstrap::logger`'s
//! `BootstrapLogger` carries startup diagnostics. Every component logs
//! through `tracing::{info,warn,error,debug,trace}` with structured fields
//! rather than string interpolation.

pub mod observability;

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `tracing` subscriber. `verbose` raises the default
/// filter from `info` to `debug` for this crate's own targets; `RUST_LOG`
/// always takes precedence when set.
pub fn init_subscriber(verbose: bool) {
    let default_directive = if verbose { "harvester=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt().with_env_filter(filter).with_target(true).init();
}
