//! Cluster operations built on the control-plane API

pub mod params;
pub mod workflows;

pub use params::{CreateClusterParams, read_ssh_key, validate_cluster_id, validate_resize};
pub use workflows::{
    create_cluster, create_cluster_and_wait, created_cluster_id, delete_cluster, master_vms,
    resize_cluster, resize_cluster_and_wait, resolve_project,
};
