//! Cluster workflows
//!
//! Each mutating workflow submits one request and follows the returned task
//! to completion. The `_and_wait` variants then wait for the cluster itself to
//! converge.

use std::sync::Arc;
use tracing::info;

use crate::api::{
    Cluster, ClusterCreateSpec, ClusterResizeOperation, ControlPlane, Project, Task, Vm,
};
use crate::error::{CoreError, Result};
use crate::wait::{ProgressRenderer, TaskCallback, WaitPolicy, poll_task, wait_for_cluster};

/// Look up a project by tenant and project name
pub async fn resolve_project<A>(
    api: &A,
    tenant: Option<&str>,
    project: Option<&str>,
) -> Result<Project>
where
    A: ControlPlane + ?Sized,
{
    let (tenant, project) = match (tenant, project) {
        (Some(t), Some(p)) if !t.trim().is_empty() && !p.trim().is_empty() => (t, p),
        _ => {
            return Err(CoreError::Validation(
                "A tenant and project are required; pass --tenant and --project or set them in the profile"
                    .to_string(),
            ));
        }
    };

    let tenant = api
        .find_tenant(tenant)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Tenant '{}' not found", tenant)))?;

    api.find_project(&tenant.id, project)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Project '{}' not found in tenant '{}'",
                project, tenant.name
            ))
        })
}

/// Submit a create request and wait for its task
pub async fn create_cluster<A>(
    api: &A,
    project_id: &str,
    spec: &ClusterCreateSpec,
    policy: &WaitPolicy,
    on_progress: Option<TaskCallback>,
) -> Result<Task>
where
    A: ControlPlane + ?Sized,
{
    info!("Creating {} cluster {}", spec.cluster_type, spec.name);
    let task = api.create_cluster(project_id, spec).await?;
    poll_task(api, &task.id, policy, on_progress).await
}

/// Create a cluster, then wait until it is READY
pub async fn create_cluster_and_wait<A>(
    api: &A,
    project_id: &str,
    spec: &ClusterCreateSpec,
    policy: &WaitPolicy,
    on_progress: Option<TaskCallback>,
    renderer: Arc<dyn ProgressRenderer>,
) -> Result<Cluster>
where
    A: ControlPlane + ?Sized,
{
    let task = create_cluster(api, project_id, spec, policy, on_progress).await?;
    let cluster_id = created_cluster_id(&task)?;
    wait_for_cluster(api, &cluster_id, policy, renderer).await
}

/// Submit a resize request and wait for its task
pub async fn resize_cluster<A>(
    api: &A,
    cluster_id: &str,
    operation: &ClusterResizeOperation,
    policy: &WaitPolicy,
    on_progress: Option<TaskCallback>,
) -> Result<Task>
where
    A: ControlPlane + ?Sized,
{
    info!(
        "Resizing cluster {} to {} workers",
        cluster_id, operation.new_worker_count
    );
    let task = api.resize_cluster(cluster_id, operation).await?;
    poll_task(api, &task.id, policy, on_progress).await
}

/// Resize a cluster, then wait until it is READY again
pub async fn resize_cluster_and_wait<A>(
    api: &A,
    cluster_id: &str,
    operation: &ClusterResizeOperation,
    policy: &WaitPolicy,
    on_progress: Option<TaskCallback>,
    renderer: Arc<dyn ProgressRenderer>,
) -> Result<Cluster>
where
    A: ControlPlane + ?Sized,
{
    resize_cluster(api, cluster_id, operation, policy, on_progress).await?;
    wait_for_cluster(api, cluster_id, policy, renderer).await
}

/// Submit a delete request and wait for its task
pub async fn delete_cluster<A>(
    api: &A,
    cluster_id: &str,
    policy: &WaitPolicy,
    on_progress: Option<TaskCallback>,
) -> Result<Task>
where
    A: ControlPlane + ?Sized,
{
    info!("Deleting cluster {}", cluster_id);
    let task = api.delete_cluster(cluster_id).await?;
    poll_task(api, &task.id, policy, on_progress).await
}

/// The id of the cluster a completed create task produced
pub fn created_cluster_id(task: &Task) -> Result<String> {
    task.entity_id()
        .map(str::to_string)
        .ok_or_else(|| CoreError::TaskFailed {
            task_id: task.id.clone(),
            state: task.state.to_string(),
            message: Some("no cluster id in completed task".to_string()),
        })
}

/// Master VMs are tagged `<cluster>:<role>:<index>` with a role other than worker
pub fn master_vms(vms: &[Vm]) -> Vec<&Vm> {
    vms.iter()
        .filter(|vm| {
            vm.tags
                .iter()
                .any(|tag| tag.matches(':').count() == 2 && !tag.to_lowercase().contains("worker"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClusterState, ClusterType, TaskState};
    use crate::testing::{Reply, ScriptedPlane, task, vm};
    use crate::wait::NoopRenderer;
    use crate::wait::reporter::testing::RecordingRenderer;
    use std::collections::BTreeMap;

    fn spec() -> ClusterCreateSpec {
        ClusterCreateSpec {
            name: "k8s-dev".to_string(),
            cluster_type: ClusterType::Kubernetes,
            vm_flavor: None,
            disk_flavor: None,
            network_id: None,
            worker_count: 2,
            batch_size: None,
            extended_properties: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_resolve_project() {
        let api = ScriptedPlane::new();

        let project = resolve_project(&api, Some("dev"), Some("web")).await.unwrap();
        assert_eq!(project.id, "project-1");

        let err = resolve_project(&api, Some("ops"), Some("web"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Tenant 'ops' not found"));

        let err = resolve_project(&api, Some("dev"), Some("db"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Project 'db' not found"));

        let err = resolve_project(&api, None, Some("web")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_and_wait_follows_task_then_cluster() {
        let api = ScriptedPlane::new()
            .with_task_replies([Reply::State("QUEUED"), Reply::State("COMPLETED")])
            .with_cluster_replies([Reply::State("CREATING"), Reply::State("READY")]);
        let renderer = Arc::new(RecordingRenderer::default());

        let cluster = create_cluster_and_wait(
            &api,
            "project-1",
            &spec(),
            &WaitPolicy::default(),
            None,
            renderer.clone(),
        )
        .await
        .unwrap();

        assert_eq!(api.submitted(), vec!["create project-1 k8s-dev"]);
        assert_eq!(cluster.id, "cluster-1");
        assert_eq!(cluster.state, ClusterState::Ready);
        assert_eq!(api.task_fetches(), 2);
        assert_eq!(api.cluster_fetches(), 2);
        assert!(renderer.finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_task_skips_readiness_wait() {
        let api = ScriptedPlane::new().with_task_replies([Reply::State("ERROR")]);

        let err = create_cluster_and_wait(
            &api,
            "project-1",
            &spec(),
            &WaitPolicy::default(),
            None,
            Arc::new(NoopRenderer),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CoreError::TaskFailed { .. }));
        assert_eq!(api.cluster_fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_and_wait() {
        let api = ScriptedPlane::new()
            .with_task_replies([Reply::State("COMPLETED")])
            .with_cluster_replies([Reply::State("RESIZING"), Reply::State("ready")]);

        let cluster = resize_cluster_and_wait(
            &api,
            "cluster-3",
            &ClusterResizeOperation {
                new_worker_count: 5,
            },
            &WaitPolicy::default(),
            None,
            Arc::new(NoopRenderer),
        )
        .await
        .unwrap();

        assert_eq!(api.submitted(), vec!["resize cluster-3 5"]);
        assert_eq!(cluster.id, "cluster-3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_polls_task_only() {
        let api = ScriptedPlane::new()
            .with_task_replies([Reply::State("STARTED"), Reply::State("COMPLETED")]);

        let task = delete_cluster(&api, "cluster-2", &WaitPolicy::default(), None)
            .await
            .unwrap();

        assert_eq!(task.state, TaskState::Completed);
        assert_eq!(api.submitted(), vec!["delete cluster-2"]);
        assert_eq!(api.cluster_fetches(), 0);
    }

    #[test]
    fn test_created_cluster_id_requires_entity() {
        let mut completed = task("task-1", "COMPLETED", "cluster-9");
        assert_eq!(created_cluster_id(&completed).unwrap(), "cluster-9");

        completed.entity = None;
        assert!(created_cluster_id(&completed).is_err());
    }

    #[test]
    fn test_master_vms() {
        let vms = vec![
            vm("1", &["cluster-1:master:0"]),
            vm("2", &["cluster-1:worker:0"]),
            vm("3", &["cluster-1:etcd:0", "team:web"]),
            vm("4", &["cluster-1"]),
            vm("5", &[]),
            vm("6", &["cluster-1:Worker:1"]),
        ];

        let masters: Vec<&str> = master_vms(&vms).iter().map(|vm| vm.id.as_str()).collect();
        assert_eq!(masters, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_master_vms_from_listing() {
        let api = ScriptedPlane::new().with_vms(vec![
            vm("a", &["cluster-1:master:0"]),
            vm("b", &["cluster-1:worker:3"]),
        ]);

        let vms = api.list_cluster_vms("cluster-1").await.unwrap();
        let masters = master_vms(&vms);
        assert_eq!(masters.len(), 1);
        assert_eq!(masters[0].name, "vm-a");
    }
}
