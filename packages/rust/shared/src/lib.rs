//! Shared types, error model, and configuration for travelkb.
//!
//! This crate is the foundation depended on by all other travelkb crates.
//! It provides:
//! - [`TravelKbError`] — the unified error type
//! - Domain types ([`Coordinate`], [`DestinationRecord`], the activity vocabulary)
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, CrawlPoliciesConfig, DefaultsConfig, EndpointsConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, TravelKbError};
pub use types::{Coordinate, DEFAULT_VOCABULARY, DestinationRecord, default_vocabulary};
