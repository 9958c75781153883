//! Hospital discharge dashboard library
//!
//! This module exposes the data pipeline (paginated API client, normalization,
//! TTL cache, catalog), the statistics behind every section, and the CLI and
//! configuration layers for use by the binary and the integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod report;
pub mod section;
pub mod stats;
