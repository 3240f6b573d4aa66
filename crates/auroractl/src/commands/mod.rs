//! Command implementations for auroractl

pub mod profile;
pub mod workflow;
