//! Configuration module for hn-crawl
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so the crawler also runs
//! without one.
//!
//! # Example
//!
//! ```no_run
//! use hn_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hn-crawl.toml")).unwrap();
//! println!("Items are fetched from: {}", config.api.item_endpoint);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, HttpConfig, OutputConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, DEFAULT_CONFIG_HASH,
};
