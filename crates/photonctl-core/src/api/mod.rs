//! Remote resource client
//!
//! [`ControlPlane`] is the seam between the polling logic and the management
//! API. [`PhotonClient`] implements it over HTTP; tests implement it with
//! scripted responses.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::{ClientBuilder, PhotonClient};
pub use error::ApiError;
pub use types::{
    Cluster, ClusterCreateSpec, ClusterResizeOperation, ClusterState, ClusterType, EntityRef,
    Outcome, Project, Readiness, Task, TaskState, Tenant, Vm,
};

/// Result type for API requests
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the CLI needs from the control plane
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn get_task(&self, task_id: &str) -> ApiResult<Task>;

    async fn get_cluster(&self, cluster_id: &str) -> ApiResult<Cluster>;

    async fn list_clusters(&self, project_id: &str) -> ApiResult<Vec<Cluster>>;

    async fn list_cluster_vms(&self, cluster_id: &str) -> ApiResult<Vec<Vm>>;

    /// Submit a cluster creation; returns the task tracking it
    async fn create_cluster(&self, project_id: &str, spec: &ClusterCreateSpec) -> ApiResult<Task>;

    async fn resize_cluster(
        &self,
        cluster_id: &str,
        operation: &ClusterResizeOperation,
    ) -> ApiResult<Task>;

    async fn delete_cluster(&self, cluster_id: &str) -> ApiResult<Task>;

    /// Look up a tenant by name
    async fn find_tenant(&self, name: &str) -> ApiResult<Option<Tenant>>;

    /// Look up a project by name within a tenant
    async fn find_project(&self, tenant_id: &str, name: &str) -> ApiResult<Option<Project>>;
}
