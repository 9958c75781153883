//! Cache module for keeping normalized datasets in memory
//!
//! This module provides a keyed cache with a single time-to-live. Freshness is
//! evaluated on every read; there is no background expiry and nothing is written
//! to disk, so a restart always starts cold.

mod ttl;

pub use ttl::TtlCache;
