//! Configuration and profile management for auroractl
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! Profiles bundle the AWS settings (region, named AWS profile, endpoint
//! override) with the polling and instance defaults used by workflows.
//!
//! # Features
//!
//! - Multiple named profiles with a default
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

pub mod config;
pub mod error;
pub mod polling;

// Re-export main types for convenience
pub use config::{Config, InstanceDefaults, Profile, ResolvedProfile};
pub use error::{ConfigError, Result};
pub use polling::PollSettings;
