// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Pure domain services: CPU-bound, synchronous, stateless operations over
//! entities and value objects.

pub mod datetime_serde;
mod hashing_service;

pub use hashing_service::{HashingService, Sha256HashingService};
