//! Configuration and profile management for photonctl
//!
//! - Multiple named profiles, one per control-plane endpoint
//! - Environment variable expansion in config files
//! - Platform-specific config file locations
//! - Per-profile wait settings

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod wait;

pub use config::{Config, Profile};
pub use error::{ConfigError, Result};
pub use wait::WaitConfig;
