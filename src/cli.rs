//! Command-line interface parsing for the hospital discharge dashboard
//!
//! This module handles parsing of CLI arguments using clap: the section the
//! dashboard opens on, the one-shot `--summary` and `--check` modes, and the
//! dotenv/log-level overrides applied before configuration is read.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::section::Section;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified section name is not recognized
    #[error("Invalid section: '{0}'. Valid sections: overview, diagnoses, sex, severity, stay")]
    InvalidSection(String),

    /// `--summary` and `--check` are separate one-shot modes
    #[error("--summary and --check cannot be used together")]
    ConflictingModes,
}

/// Hospital discharge dashboard - diagnoses, severity and length of stay
#[derive(Parser, Debug)]
#[command(name = "hospdash")]
#[command(about = "Terminal dashboard for hospital discharge statistics")]
#[command(version)]
pub struct Cli {
    /// Open the dashboard on a specific section
    ///
    /// Valid sections: overview, diagnoses, sex, severity, stay
    #[arg(long, value_name = "SECTION")]
    pub section: Option<String>,

    /// Load every dataset, print a text summary and exit
    #[arg(long)]
    pub summary: bool,

    /// Check that the data API is reachable and exit
    #[arg(long)]
    pub check: bool,

    /// Read environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Override LOG_LEVEL (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// What the binary does after configuration is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Dashboard,
    Summary,
    Check,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub mode: RunMode,
    /// Section to open on
    pub initial_section: Section,
    pub env_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Parses a section string argument into a Section.
///
/// # Arguments
/// * `s` - The section string from CLI
///
/// # Returns
/// * `Ok(Section)` if the string matches a valid section
/// * `Err(CliError::InvalidSection)` if the string doesn't match
pub fn parse_section_arg(s: &str) -> Result<Section, CliError> {
    Section::from_str(s).ok_or_else(|| CliError::InvalidSection(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid section was specified or modes conflict
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mode = match (cli.summary, cli.check) {
            (true, true) => return Err(CliError::ConflictingModes),
            (true, false) => RunMode::Summary,
            (false, true) => RunMode::Check,
            (false, false) => RunMode::Dashboard,
        };

        let initial_section = match &cli.section {
            Some(name) => parse_section_arg(name)?,
            None => Section::default(),
        };

        Ok(StartupConfig {
            mode,
            initial_section,
            env_file: cli.env_file.clone(),
            log_level: cli.log_level.clone(),
        })
    }
}
