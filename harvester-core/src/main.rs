// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Composition root: parses the CLI, wires the Main Context, and dispatches
//! to the Control Facade. Concrete extractors/transformers/loaders are
//! excluded collaborators (§1) — this binary boots the core with whatever
//! pipelines a deployment registers through its own composition step, which
//! isn't part of this crate; `serve` here brings the engine up with none
//! registered and waits for a shutdown signal.

use std::path::PathBuf;
use std::time::Duration;

use harvester_bootstrap::cli::ValidatedCommand;
use harvester_bootstrap::shutdown::ShutdownCoordinator;
use harvester_bootstrap::{bootstrap_cli, result_to_exit_code};
use harvester_core::application::control_facade::FacadeStatus;
use harvester_core::application::main_context::MainContext;
use harvester_domain::HarvestError;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let validated = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("CLI error: {err}");
            return std::process::ExitCode::from(64);
        }
    };

    harvester_core::infrastructure::logging::init_subscriber(validated.verbose);

    let result = run(validated.command, validated.config.clone(), validated.module_name.clone()).await;

    if let Err(err) = &result {
        tracing::error!(error = %err, "harvester exited with an error");
    }
    std::process::ExitCode::from(result_to_exit_code(result).code() as u8)
}

async fn run(command: ValidatedCommand, config_path: Option<PathBuf>, module_name: Option<String>) -> Result<(), HarvestError> {
    let data_provider_name = module_name.unwrap_or_else(|| "Harvester".to_string());
    let module_dir = PathBuf::from(".").join("data");

    let context = MainContext::build(&module_dir, &data_provider_name, config_path.as_deref()).await?;
    context.finish_initialization(true);
    tokio::time::sleep(Duration::from_millis(10)).await;

    match command {
        ValidatedCommand::Serve => {
            let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
            harvester_bootstrap::signals::install_shutdown_handler(coordinator.token());
            tracing::info!(module = %context.module_name, "harvester service serving");
            coordinator.token().cancelled().await;
            tracing::info!("shutdown signal received");
            context.shutdown();
            Ok(())
        }
        ValidatedCommand::Harvest { pipeline, force } => {
            tracing::info!(pipeline = %pipeline, force, "requesting harvest");
            let response = context.control_facade.start_harvest(force);
            println!("{}", response.body);
            if response.status != FacadeStatus::Accepted {
                return Err(HarvestError::busy(response.body));
            }
            Ok(())
        }
        ValidatedCommand::Abort { pipeline } => {
            tracing::info!(pipeline = %pipeline, "requesting abort");
            let response = context.control_facade.abort();
            println!("{}", response.body);
            if response.status != FacadeStatus::Accepted {
                return Err(HarvestError::precondition(response.body));
            }
            Ok(())
        }
        ValidatedCommand::Status { pipeline } => {
            if let Some(pipeline) = pipeline {
                tracing::info!(pipeline = %pipeline, "reporting single-pipeline status");
            }
            let overview = context.control_facade.overview();
            println!("{}", overview.body);
            Ok(())
        }
    }
}
