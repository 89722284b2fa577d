// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! Hierarchical, categorized error type for the harvest domain, following the
//! error kinds enumerated by the control facade's response table: a
//! precondition failure keeps a pipeline out of a harvest without failing the
//! registry, a transient-source or loader failure ends the harvest but leaves
//! the stable cache untouched, cancellation and fatal/init failures each drive
//! a distinct state-machine transition.

use thiserror::Error;

/// The broad class a [`HarvestError`] belongs to, used by the control facade
/// to select a response without re-deriving recoverability per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestErrorKind {
    Precondition,
    TransientSource,
    LoaderFailure,
    Cancelled,
    Fatal,
    Disk,
    Internal,
}

/// Domain-specific errors for the harvest execution engine.
#[derive(Error, Debug, Clone)]
pub enum HarvestError {
    /// A pipeline cannot run this harvest: disabled, not outdated, or its
    /// configured range is invalid. Recovered locally by the registry.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The extractor (or its underlying HTTP collaborator) failed.
    #[error("transient source error: {0}")]
    TransientSource(String),

    /// The loader failed to persist a transformed document downstream.
    #[error("loader failure: {0}")]
    LoaderFailure(String),

    /// The operation observed its cancellation flag and unwound cooperatively.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Service-level construction failure; only `reset` is accepted afterward.
    #[error("fatal initialization error: {0}")]
    Fatal(String),

    /// Cache promotion / atomic replace / directory integration failure.
    #[error("disk error: {0}")]
    Disk(String),

    /// Malformed configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A state-machine operation was rejected because the current state does
    /// not permit it ("busy" in the spec's response table).
    #[error("busy: operation not permitted in state {0}")]
    Busy(String),

    /// Serialization/deserialization failure for a persisted document or
    /// cache file.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Anything else, including unexpected invariant violations.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl HarvestError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn transient_source(msg: impl Into<String>) -> Self {
        Self::TransientSource(msg.into())
    }

    pub fn loader_failure(msg: impl Into<String>) -> Self {
        Self::LoaderFailure(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }

    pub fn disk(msg: impl Into<String>) -> Self {
        Self::Disk(msg.into())
    }

    pub fn busy(state: impl Into<String>) -> Self {
        Self::Busy(state.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// The kind the control facade uses to pick an HTTP-adjacent response.
    pub fn kind(&self) -> HarvestErrorKind {
        match self {
            HarvestError::Precondition(_) => HarvestErrorKind::Precondition,
            HarvestError::TransientSource(_) => HarvestErrorKind::TransientSource,
            HarvestError::LoaderFailure(_) => HarvestErrorKind::LoaderFailure,
            HarvestError::Cancelled(_) => HarvestErrorKind::Cancelled,
            HarvestError::Fatal(_) => HarvestErrorKind::Fatal,
            HarvestError::Disk(_) => HarvestErrorKind::Disk,
            HarvestError::InvalidConfiguration(_) => HarvestErrorKind::Internal,
            HarvestError::Busy(_) => HarvestErrorKind::Internal,
            HarvestError::SerializationError(_) => HarvestErrorKind::Disk,
            HarvestError::InternalError(_) => HarvestErrorKind::Internal,
        }
    }

    /// Transient failures a caller may reasonably retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HarvestError::TransientSource(_) | HarvestError::Disk(_))
    }

    /// Precondition failures are an expected, non-exceptional outcome: the
    /// pipeline is marked `done`/`ok`, not `harvest-failed`.
    pub fn is_precondition(&self) -> bool {
        matches!(self, HarvestError::Precondition(_))
    }
}

impl From<std::io::Error> for HarvestError {
    fn from(err: std::io::Error) -> Self {
        HarvestError::Disk(err.to_string())
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        HarvestError::SerializationError(err.to_string())
    }
}
