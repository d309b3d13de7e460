//! # photonctl-core
//!
//! Shared engine for the `photonctl` CLI: the control-plane client, the
//! long-running-operation trackers, cluster workflows and profile
//! configuration.
//!
//! ## Layout
//!
//! - [`api`] - [`ControlPlane`] trait, its HTTP implementation and wire types
//! - [`wait`] - task poller, readiness waiter and progress reporter
//! - [`cluster`] - input validation and create/resize/delete workflows
//! - [`config`] - TOML profiles
//! - [`error`] - [`CoreError`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use photonctl_core::{PhotonClient, WaitPolicy, NoopRenderer, wait_for_cluster};
//!
//! let client = PhotonClient::builder().base_url("https://photon:9000").build()?;
//! let cluster = wait_for_cluster(
//!     &client,
//!     "cluster-1",
//!     &WaitPolicy::default(),
//!     Arc::new(NoopRenderer),
//! )
//! .await?;
//! ```

pub mod api;
pub mod cluster;
pub mod config;
pub mod error;
pub mod wait;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ClientBuilder, ControlPlane, PhotonClient};
pub use config::{Config, ConfigError, Profile, WaitConfig};
pub use error::{CoreError, Result};
pub use wait::{
    NoopRenderer, ProgressRenderer, TaskCallback, TaskEvent, WaitPolicy, WaitSession, poll_task,
    wait_for_cluster, wait_until_ready,
};
