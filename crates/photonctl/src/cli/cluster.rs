//! Cluster command definitions

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// Create a cluster
    #[command(after_help = "EXAMPLES:
    # Swarm cluster with three workers
    photonctl cluster create --name swarm-dev --type swarm --worker-count 3 \\
        --dns 10.0.0.2 --gateway 10.0.0.1 --netmask 255.255.255.0 --etcd1 10.0.0.21

    # Mesos cluster, wait until it is ready
    photonctl cluster create --name mesos-dev --type mesos \\
        --dns 10.0.0.2 --gateway 10.0.0.1 --netmask 255.255.255.0 \\
        --zookeeper1 10.0.0.31 --zookeeper2 10.0.0.32 --wait-for-ready
")]
    Create(Box<CreateClusterArgs>),

    /// Show a cluster and its master VMs
    Show {
        /// Cluster ID
        id: String,
    },

    /// List clusters in a project
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        target: ProjectArgs,

        /// Only ID, name and state
        #[arg(long, short)]
        summary: bool,
    },

    /// List the VMs of a cluster
    ListVms {
        /// Cluster ID
        id: String,
    },

    /// Change the number of workers
    Resize {
        /// Cluster ID
        id: String,

        /// New worker count
        #[arg(allow_hyphen_values = true)]
        worker_count: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a cluster
    #[command(visible_alias = "rm")]
    Delete {
        /// Cluster ID
        id: String,
    },
}

/// Tenant and project to operate in; defaults come from the profile
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Tenant name
    #[arg(long)]
    pub tenant: Option<String>,

    /// Project name
    #[arg(long)]
    pub project: Option<String>,
}

/// Arguments for operations that can wait for the cluster to converge
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Wait until the cluster is READY
    #[arg(long)]
    pub wait_for_ready: bool,

    /// Maximum time to wait in seconds
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Polling interval in seconds
    #[arg(long)]
    pub wait_interval: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CreateClusterArgs {
    /// Cluster name
    #[arg(long)]
    pub name: Option<String>,

    /// Cluster type: KUBERNETES, MESOS or SWARM
    #[arg(long = "type")]
    pub cluster_type: Option<String>,

    /// VM flavor
    #[arg(long)]
    pub vm_flavor: Option<String>,

    /// Disk flavor
    #[arg(long)]
    pub disk_flavor: Option<String>,

    /// VM network ID
    #[arg(long)]
    pub network_id: Option<String>,

    /// Number of workers (default 1)
    #[arg(long)]
    pub worker_count: Option<u32>,

    /// Workers added per expansion batch
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// DNS server address
    #[arg(long)]
    pub dns: Option<String>,

    /// Gateway address
    #[arg(long)]
    pub gateway: Option<String>,

    /// Netmask
    #[arg(long)]
    pub netmask: Option<String>,

    /// Kubernetes master address
    #[arg(long)]
    pub master_ip: Option<String>,

    /// Kubernetes container network, e.g. 10.2.0.0/16
    #[arg(long)]
    pub container_network: Option<String>,

    /// First etcd address (Kubernetes, Swarm)
    #[arg(long)]
    pub etcd1: Option<String>,

    /// Second etcd address
    #[arg(long)]
    pub etcd2: Option<String>,

    /// Third etcd address, used only with --etcd2
    #[arg(long)]
    pub etcd3: Option<String>,

    /// First ZooKeeper address (Mesos)
    #[arg(long)]
    pub zookeeper1: Option<String>,

    /// Second ZooKeeper address
    #[arg(long)]
    pub zookeeper2: Option<String>,

    /// Third ZooKeeper address, used only with --zookeeper2
    #[arg(long)]
    pub zookeeper3: Option<String>,

    /// File holding the SSH public key for the cluster VMs
    #[arg(long)]
    pub ssh_key: Option<PathBuf>,

    #[command(flatten)]
    pub target: ProjectArgs,

    #[command(flatten)]
    pub wait: WaitArgs,
}
