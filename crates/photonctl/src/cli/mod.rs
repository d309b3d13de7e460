//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod cluster;

pub use cluster::*;

/// Cluster management CLI for a Photon control plane
#[derive(Parser, Debug)]
#[command(name = "photonctl")]
#[command(version, about = "Cluster management CLI for a Photon control plane")]
#[command(long_about = "
Cluster management CLI for a Photon control plane

EXAMPLES:
    # Set up a profile
    photonctl profile set lab --endpoint https://photon.example.com:9000 --tenant dev --project web

    # Create a Kubernetes cluster and wait until it is ready
    photonctl cluster create --name k8s-dev --type kubernetes \\
        --dns 10.0.0.2 --gateway 10.0.0.1 --netmask 255.255.255.0 \\
        --master-ip 10.0.0.20 --container-network 10.2.0.0/16 --etcd1 10.0.0.21 \\
        --wait-for-ready

    # Follow a task
    photonctl task wait <task-id>

For more help on a specific command, run:
    photonctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "PHOTONCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "PHOTONCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Never draw spinners
    #[arg(long, short = 'n', global = true)]
    pub non_interactive: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, short = 'l', global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text for people
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

impl OutputFormat {
    /// JSON and YAML are meant for scripts; nothing else goes to stdout
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::Yaml)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster operations
    #[command(subcommand, visible_alias = "clusters")]
    Cluster(ClusterCommands),

    /// Task operations
    #[command(subcommand, visible_alias = "tasks")]
    Task(TaskCommands),

    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    #[command(after_help = "EXAMPLES:
    # Create a profile
    photonctl profile set lab --endpoint https://photon.example.com:9000

    # Make it the default
    photonctl profile default lab

    # Show where the config file lives
    photonctl profile path
")]
    Profile(ProfileCommands),

    /// Show version information
    #[command(visible_alias = "ver")]
    Version,
}

/// Task commands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Show a task
    Show {
        /// Task ID
        id: String,
    },

    /// Wait for a task to reach a terminal state
    Wait {
        /// Task ID
        id: String,

        /// Maximum time to wait in seconds
        #[arg(long)]
        wait_timeout: Option<u64>,

        /// Polling interval in seconds
        #[arg(long)]
        wait_interval: Option<u64>,
    },
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show a profile
    Show {
        /// Profile name to show
        name: String,
    },

    /// Create or update a profile
    Set(ProfileSetArgs),

    /// Remove a profile
    #[command(visible_alias = "rm")]
    Remove {
        /// Profile name to remove
        name: String,
    },

    /// Set the default profile
    Default {
        /// Profile name to use by default
        name: String,
    },

    /// Show the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct ProfileSetArgs {
    /// Profile name
    pub name: String,

    /// Control-plane URL, e.g. https://photon.example.com:9000
    #[arg(long)]
    pub endpoint: String,

    /// Bearer token
    #[arg(long)]
    pub token: Option<String>,

    /// Default tenant
    #[arg(long)]
    pub tenant: Option<String>,

    /// Default project
    #[arg(long)]
    pub project: Option<String>,

    /// Default wait timeout in seconds
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Default polling interval in seconds
    #[arg(long)]
    pub wait_interval: Option<u64>,

    /// Consecutive failed status requests tolerated while waiting
    #[arg(long)]
    pub retry_budget: Option<u32>,
}
