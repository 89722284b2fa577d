// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # OS Signal Handling
//!
//! Bridges platform shutdown signals (SIGINT/SIGTERM on Unix, Ctrl-C on
//! Windows) to the [`crate::shutdown::CancellationToken`] the rest of the
//! service cooperatively observes.

use crate::shutdown::CancellationToken;

/// Spawns a task that waits for a shutdown signal and then cancels `token`.
///
/// Returns immediately; the signal wait happens on a background task so the
/// caller can `select!` on `token.cancelled()` alongside its own work.
pub fn install_shutdown_handler(token: CancellationToken) {
    tokio::spawn(wait_and_cancel(token));
}

#[cfg(unix)]
async fn wait_and_cancel(token: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(_) => return,
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
    token.cancel();
}

#[cfg(windows)]
async fn wait_and_cancel(token: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::ShutdownCoordinator;
    use std::time::Duration;

    #[tokio::test]
    async fn cancel_is_observable_after_manual_trigger() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
        let token = coordinator.token();
        install_shutdown_handler(token.clone());
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
