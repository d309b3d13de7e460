//! Scripted in-memory control plane for unit tests

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{
    ApiError, ApiResult, Cluster, ClusterCreateSpec, ClusterResizeOperation, ClusterState,
    ControlPlane, EntityRef, Project, Task, TaskState, Tenant, Vm,
};

/// One scripted answer to a status fetch
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    State(&'static str),
    Transient,
    NotFound,
}

/// Replays scripted replies; the last reply repeats forever
#[derive(Default)]
pub(crate) struct ScriptedPlane {
    task_replies: Mutex<VecDeque<Reply>>,
    cluster_replies: Mutex<VecDeque<Reply>>,
    task_fetches: AtomicUsize,
    cluster_fetches: AtomicUsize,
    submitted: Mutex<Vec<String>>,
    vms: Vec<Vm>,
}

impl ScriptedPlane {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_task_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.task_replies.lock().unwrap().extend(replies);
        self
    }

    pub(crate) fn with_cluster_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.cluster_replies.lock().unwrap().extend(replies);
        self
    }

    pub(crate) fn with_vms(mut self, vms: Vec<Vm>) -> Self {
        self.vms = vms;
        self
    }

    pub(crate) fn task_fetches(&self) -> usize {
        self.task_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn cluster_fetches(&self) -> usize {
        self.cluster_fetches.load(Ordering::SeqCst)
    }

    /// Mutating calls received, in order
    pub(crate) fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.submitted.lock().unwrap().push(call);
    }
}

fn next(queue: &Mutex<VecDeque<Reply>>) -> Reply {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front().unwrap()
    } else {
        queue.front().cloned().unwrap_or(Reply::NotFound)
    }
}

pub(crate) fn transient() -> ApiError {
    ApiError::Http {
        status: 503,
        code: None,
        message: "service unavailable".to_string(),
    }
}

pub(crate) fn task(id: &str, state: &str, entity_id: &str) -> Task {
    Task {
        id: id.to_string(),
        state: TaskState::from(state),
        operation: None,
        entity: Some(EntityRef {
            id: entity_id.to_string(),
            kind: "cluster".to_string(),
        }),
        steps: Vec::new(),
        queued_time: None,
        end_time: None,
    }
}

pub(crate) fn cluster(id: &str, state: &str) -> Cluster {
    Cluster {
        id: id.to_string(),
        name: "k8s-dev".to_string(),
        cluster_type: "KUBERNETES".to_string(),
        state: ClusterState::from(state),
        worker_count: 2,
        extended_properties: BTreeMap::new(),
    }
}

pub(crate) fn vm(id: &str, tags: &[&str]) -> Vm {
    Vm {
        id: id.to_string(),
        name: format!("vm-{}", id),
        state: "STARTED".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[async_trait]
impl ControlPlane for ScriptedPlane {
    async fn get_task(&self, task_id: &str) -> ApiResult<Task> {
        self.task_fetches.fetch_add(1, Ordering::SeqCst);
        match next(&self.task_replies) {
            Reply::State(state) => Ok(task(task_id, state, "cluster-1")),
            Reply::Transient => Err(transient()),
            Reply::NotFound => Err(ApiError::NotFound {
                message: format!("task {}", task_id),
            }),
        }
    }

    async fn get_cluster(&self, cluster_id: &str) -> ApiResult<Cluster> {
        self.cluster_fetches.fetch_add(1, Ordering::SeqCst);
        match next(&self.cluster_replies) {
            Reply::State(state) => Ok(cluster(cluster_id, state)),
            Reply::Transient => Err(transient()),
            Reply::NotFound => Err(ApiError::NotFound {
                message: format!("cluster {}", cluster_id),
            }),
        }
    }

    async fn list_clusters(&self, _project_id: &str) -> ApiResult<Vec<Cluster>> {
        Ok(vec![cluster("cluster-1", "READY")])
    }

    async fn list_cluster_vms(&self, _cluster_id: &str) -> ApiResult<Vec<Vm>> {
        Ok(self.vms.clone())
    }

    async fn create_cluster(&self, project_id: &str, spec: &ClusterCreateSpec) -> ApiResult<Task> {
        self.record(format!("create {} {}", project_id, spec.name));
        Ok(task("task-create", "QUEUED", "cluster-1"))
    }

    async fn resize_cluster(
        &self,
        cluster_id: &str,
        operation: &ClusterResizeOperation,
    ) -> ApiResult<Task> {
        self.record(format!(
            "resize {} {}",
            cluster_id, operation.new_worker_count
        ));
        Ok(task("task-resize", "QUEUED", cluster_id))
    }

    async fn delete_cluster(&self, cluster_id: &str) -> ApiResult<Task> {
        self.record(format!("delete {}", cluster_id));
        Ok(task("task-delete", "QUEUED", cluster_id))
    }

    async fn find_tenant(&self, name: &str) -> ApiResult<Option<Tenant>> {
        Ok((name == "dev").then(|| Tenant {
            id: "tenant-1".to_string(),
            name: name.to_string(),
        }))
    }

    async fn find_project(&self, tenant_id: &str, name: &str) -> ApiResult<Option<Project>> {
        Ok((tenant_id == "tenant-1" && name == "web").then(|| Project {
            id: "project-1".to_string(),
            name: name.to_string(),
        }))
    }
}

/// Asserts the paused test clock advanced by `expected`, within timer resolution
pub(crate) fn assert_elapsed(start: tokio::time::Instant, expected: std::time::Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + std::time::Duration::from_millis(20),
        "expected {:?} to have elapsed, got {:?}",
        expected,
        elapsed
    );
}
