//! Command implementations

pub mod cluster;
pub mod profile;
pub mod task;

use photonctl_core::PhotonClient;

use crate::cli::OutputFormat;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

/// Global settings every command handler needs
pub struct CommandContext<'a> {
    pub conn_mgr: &'a ConnectionManager,
    pub profile: Option<&'a str>,
    pub output: OutputFormat,
    /// Spinners are drawn only when true
    pub interactive: bool,
}

impl CommandContext<'_> {
    pub fn client(&self) -> CliResult<PhotonClient> {
        self.conn_mgr.create_client(self.profile)
    }

    /// Plain text or table output
    pub fn is_human(&self) -> bool {
        !self.output.is_structured()
    }
}
