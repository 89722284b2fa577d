// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Security validation layer: rejects dangerous argument patterns before any
//! value reaches application code, and canonicalizes paths that must exist.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while validating CLI arguments.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("argument '{arg}' is invalid: {reason}")]
    InvalidValue { arg: String, reason: String },

    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("failed to canonicalize path {path}: {source}")]
    CanonicalizeFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("argument contains a disallowed character or pattern: {0}")]
    DangerousPattern(String),
}

/// Stateless argument validator used by `cli::validate_cli`.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validates a plain string argument (pipeline name, module name, ...):
    /// rejects shell metacharacters and path traversal sequences, but does
    /// not touch the filesystem.
    pub fn validate_argument(value: &str) -> Result<(), ParseError> {
        const DISALLOWED: &[char] = &[';', '|', '&', '$', '`', '\n', '\0'];
        if value.is_empty() {
            return Err(ParseError::InvalidValue {
                arg: value.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if value.contains("..") || value.chars().any(|c| DISALLOWED.contains(&c)) {
            return Err(ParseError::DangerousPattern(value.to_string()));
        }
        Ok(())
    }

    /// Validates a path that is expected to already exist, canonicalizing it.
    pub fn validate_path(value: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(value)?;
        let path = PathBuf::from(value);
        if !path.exists() {
            return Err(ParseError::PathNotFound(path));
        }
        path.canonicalize()
            .map_err(|source| ParseError::CanonicalizeFailed { path, source })
    }
}
