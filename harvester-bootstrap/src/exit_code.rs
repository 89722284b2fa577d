// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Process Exit Codes
//!
//! Maps a `HarvestError`'s kind (§7) onto a process exit code, following the
//! BSD `sysexits.h` convention the rest of the pipeline tooling uses.

use harvester_domain::{HarvestError, HarvestErrorKind};

/// Process exit code, `#[repr(i32)]` so `std::process::exit` accepts it
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// A precondition failed (§7): bad input, config, or missing pipeline.
    Usage = 64,
    /// A transient or disk error that a retry might clear.
    Temporary = 75,
    /// Cancelled via shutdown signal — not a failure.
    Cancelled = 130,
    /// Anything else: internal or fatal error.
    Software = 70,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Maps a `HarvestError` to the exit code the process should terminate with.
pub fn map_error_to_exit_code(error: &HarvestError) -> ExitCode {
    match error.kind() {
        HarvestErrorKind::Precondition => ExitCode::Usage,
        HarvestErrorKind::TransientSource | HarvestErrorKind::Disk => ExitCode::Temporary,
        HarvestErrorKind::Cancelled => ExitCode::Cancelled,
        HarvestErrorKind::LoaderFailure | HarvestErrorKind::Fatal | HarvestErrorKind::Internal => ExitCode::Software,
    }
}

/// Converts a `Result` into the exit code the `main` function should return.
pub fn result_to_exit_code(result: Result<(), HarvestError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(err) => map_error_to_exit_code(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_maps_to_usage() {
        let err = HarvestError::precondition("bad config");
        assert_eq!(map_error_to_exit_code(&err), ExitCode::Usage);
    }

    #[test]
    fn transient_source_maps_to_temporary() {
        let err = HarvestError::transient_source("timeout");
        assert_eq!(map_error_to_exit_code(&err), ExitCode::Temporary);
    }

    #[test]
    fn ok_result_maps_to_success() {
        assert_eq!(result_to_exit_code(Ok(())), ExitCode::Success);
    }
}
