//! Wire types for the control-plane API
//!
//! Remote state strings are parsed case-insensitively into enums, and each
//! enum maps onto an explicit outcome so polling code never compares raw
//! strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What a single task observation means for the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not terminal yet, poll again
    Pending,
    /// Terminal success
    Succeeded,
    /// Terminal failure reported by the remote side
    Failed,
}

/// What a single resource observation means for the readiness waiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Still converging (creating, resizing, ...)
    Converging,
    /// Fully converged
    Ready,
    /// Entered an error state
    Failed,
}

/// State of a remote task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Queued,
    Started,
    InProgress,
    Completed,
    /// ERROR or any error/failure variant, with the raw state kept for messages
    Error(String),
    /// Any other non-terminal state the server reports
    Other(String),
}

impl TaskState {
    pub fn outcome(&self) -> Outcome {
        match self {
            TaskState::Completed => Outcome::Succeeded,
            TaskState::Error(_) => Outcome::Failed,
            TaskState::Queued
            | TaskState::Started
            | TaskState::InProgress
            | TaskState::Other(_) => Outcome::Pending,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Queued => "QUEUED",
            TaskState::Started => "STARTED",
            TaskState::InProgress => "IN_PROGRESS",
            TaskState::Completed => "COMPLETED",
            TaskState::Error(raw) | TaskState::Other(raw) => raw,
        }
    }
}

impl From<String> for TaskState {
    fn from(raw: String) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.as_str() {
            "QUEUED" => TaskState::Queued,
            "STARTED" => TaskState::Started,
            "IN_PROGRESS" | "INPROGRESS" | "RUNNING" => TaskState::InProgress,
            "COMPLETED" => TaskState::Completed,
            s if s.contains("ERROR") || s.contains("FAIL") => TaskState::Error(raw),
            _ => TaskState::Other(raw),
        }
    }
}

impl From<&str> for TaskState {
    fn from(raw: &str) -> Self {
        TaskState::from(raw.to_string())
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClusterState {
    Creating,
    Resizing,
    Ready,
    Error,
    PendingDelete,
    Other(String),
}

impl ClusterState {
    pub fn readiness(&self) -> Readiness {
        match self {
            ClusterState::Ready => Readiness::Ready,
            ClusterState::Error => Readiness::Failed,
            _ => Readiness::Converging,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClusterState::Creating => "CREATING",
            ClusterState::Resizing => "RESIZING",
            ClusterState::Ready => "READY",
            ClusterState::Error => "ERROR",
            ClusterState::PendingDelete => "PENDING_DELETE",
            ClusterState::Other(raw) => raw,
        }
    }
}

impl From<String> for ClusterState {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CREATING" => ClusterState::Creating,
            "RESIZING" => ClusterState::Resizing,
            "READY" => ClusterState::Ready,
            "ERROR" => ClusterState::Error,
            "PENDING_DELETE" => ClusterState::PendingDelete,
            _ => ClusterState::Other(raw),
        }
    }
}

impl From<&str> for ClusterState {
    fn from(raw: &str) -> Self {
        ClusterState::from(raw.to_string())
    }
}

impl From<ClusterState> for String {
    fn from(state: ClusterState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported cluster types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClusterType {
    Kubernetes,
    Mesos,
    Swarm,
}

impl FromStr for ClusterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KUBERNETES" => Ok(ClusterType::Kubernetes),
            "MESOS" => Ok(ClusterType::Mesos),
            "SWARM" => Ok(ClusterType::Swarm),
            other => Err(format!("Unsupported cluster type: {}", other)),
        }
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterType::Kubernetes => write!(f, "KUBERNETES"),
            ClusterType::Mesos => write!(f, "MESOS"),
            ClusterType::Swarm => write!(f, "SWARM"),
        }
    }
}

/// Reference to the entity a task operates on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    #[serde(default)]
    pub kind: String,
}

/// Error detail as reported by the API, either in a task step or an error body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

/// A submitted asynchronous operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TaskStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl Task {
    /// Id of the entity the task operates on, if the server reported one
    pub fn entity_id(&self) -> Option<&str> {
        self.entity.as_ref().map(|e| e.id.as_str())
    }

    /// Error messages collected from the task's steps
    pub fn failure_message(&self) -> Option<String> {
        let messages: Vec<String> = self
            .steps
            .iter()
            .flat_map(|step| step.errors.iter())
            .filter_map(|e| match (&e.code, &e.message) {
                (Some(code), Some(msg)) => Some(format!("{}: {}", code, msg)),
                (None, Some(msg)) => Some(msg.clone()),
                (Some(code), None) => Some(code.clone()),
                (None, None) => None,
            })
            .collect();

        if messages.is_empty() {
            None
        } else {
            Some(messages.join("; "))
        }
    }
}

/// A remotely owned cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub state: ClusterState,
    #[serde(default)]
    pub worker_count: u32,
    #[serde(default)]
    pub extended_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Envelope used by every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Request body for `POST /projects/{id}/clusters`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCreateSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: ClusterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_flavor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_flavor: Option<String>,
    #[serde(rename = "vmNetworkId", default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    pub worker_count: u32,
    #[serde(
        rename = "workerBatchExpansionSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub batch_size: Option<u32>,
    pub extended_properties: BTreeMap<String, String>,
}

/// Request body for `POST /clusters/{id}/resize`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResizeOperation {
    pub new_worker_count: u32,
}
