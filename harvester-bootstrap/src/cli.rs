// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse()                 │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validator::validate()           │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedConfig                 │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// Validated CLI configuration
///
/// This structure holds all CLI arguments after security validation.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub module_name: Option<String>,
}

/// Validated command variants
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Serve,
    Harvest { pipeline: String, force: bool },
    Abort { pipeline: String },
    Status { pipeline: Option<String> },
}

/// Parse and validate CLI arguments
///
/// Combines parsing (clap) and security validation (`SecureArgParser`) into
/// one step, returning a `ValidatedCli` ready to hand to the composition
/// root.
///
/// # Errors
///
/// Returns `ParseError` if any validation fails
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

/// Validate parsed CLI arguments
fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = if let Some(ref path) = cli.config {
        Some(SecureArgParser::validate_path(&path.to_string_lossy())?)
    } else {
        None
    };

    if let Some(ref name) = cli.module_name {
        SecureArgParser::validate_argument(name)?;
    }

    let command = match cli.command {
        Commands::Serve => ValidatedCommand::Serve,
        Commands::Harvest { pipeline, force } => {
            SecureArgParser::validate_argument(&pipeline)?;
            ValidatedCommand::Harvest { pipeline, force }
        }
        Commands::Abort { pipeline } => {
            SecureArgParser::validate_argument(&pipeline)?;
            ValidatedCommand::Abort { pipeline }
        }
        Commands::Status { pipeline } => {
            if let Some(ref p) = pipeline {
                SecureArgParser::validate_argument(p)?;
            }
            ValidatedCommand::Status { pipeline }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
        module_name: cli.module_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(command: Commands) -> Cli {
        Cli {
            command,
            verbose: false,
            config: None,
            module_name: None,
        }
    }

    #[test]
    fn validates_harvest_command() {
        let cli = cli_with(Commands::Harvest {
            pipeline: "open-library".to_string(),
            force: true,
        });
        let validated = validate_cli(cli).expect("should validate");
        match validated.command {
            ValidatedCommand::Harvest { pipeline, force } => {
                assert_eq!(pipeline, "open-library");
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_dangerous_pipeline_name() {
        let cli = cli_with(Commands::Abort {
            pipeline: "../etc".to_string(),
        });
        assert!(validate_cli(cli).is_err());
    }

    #[test]
    fn status_without_pipeline_reports_all() {
        let cli = cli_with(Commands::Status { pipeline: None });
        let validated = validate_cli(cli).expect("should validate");
        assert!(matches!(validated.command, ValidatedCommand::Status { pipeline: None }));
    }
}
