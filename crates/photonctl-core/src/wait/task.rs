//! Task polling
//!
//! Mutating API operations return a [`Task`] which must be polled until it
//! is COMPLETED or reports an error. Callers may pass a callback to drive a
//! spinner from the events emitted along the way.

use std::time::Duration;
use tracing::{debug, info};

use super::{Step, WaitPolicy, poll_until};
use crate::api::{ControlPlane, Outcome, Task, TaskState};
use crate::error::{CoreError, Result};

/// Progress events emitted while polling a task
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// Polling has started
    Started { task_id: String },
    /// A status fetch returned a non-terminal state
    Polling {
        task_id: String,
        state: TaskState,
        elapsed: Duration,
    },
    /// Task completed successfully
    Completed {
        task_id: String,
        entity_id: Option<String>,
    },
    /// Task failed, timed out, or could not be fetched
    Failed { task_id: String, error: String },
}

/// Callback type for task progress updates
pub type TaskCallback = Box<dyn Fn(TaskEvent) + Send + Sync>;

/// Poll a task until it reaches a terminal state
///
/// # Arguments
///
/// * `api` - The control-plane client
/// * `task_id` - The task returned by a mutating call
/// * `policy` - Timeout, poll interval and transient-error budget
/// * `on_progress` - Optional callback for progress updates
///
/// # Returns
///
/// The COMPLETED task, or an error if the task failed, timed out, or could
/// not be fetched more than `policy.retry_budget` times in a row.
///
/// # Example
///
/// ```rust,ignore
/// use photonctl_core::wait::{poll_task, TaskEvent, WaitPolicy};
///
/// let task = client.delete_cluster("cluster-1").await?;
/// let completed = poll_task(
///     &client,
///     &task.id,
///     &WaitPolicy::default(),
///     Some(Box::new(|event| {
///         if let TaskEvent::Polling { state, elapsed, .. } = event {
///             println!("{} ({}s)", state, elapsed.as_secs());
///         }
///     })),
/// )
/// .await?;
/// ```
pub async fn poll_task<A>(
    api: &A,
    task_id: &str,
    policy: &WaitPolicy,
    on_progress: Option<TaskCallback>,
) -> Result<Task>
where
    A: ControlPlane + ?Sized,
{
    emit(
        &on_progress,
        TaskEvent::Started {
            task_id: task_id.to_string(),
        },
    );

    let what = format!("task {}", task_id);
    let result = poll_until(
        &what,
        policy,
        || api.get_task(task_id),
        |task: Task, elapsed| {
            debug!("Task {} is {} after {:?}", task_id, task.state, elapsed);
            match task.state.outcome() {
                Outcome::Succeeded => Step::Done(task),
                Outcome::Failed => Step::Fail(CoreError::TaskFailed {
                    task_id: task_id.to_string(),
                    state: task.state.to_string(),
                    message: task.failure_message(),
                }),
                Outcome::Pending => {
                    emit(
                        &on_progress,
                        TaskEvent::Polling {
                            task_id: task_id.to_string(),
                            state: task.state,
                            elapsed,
                        },
                    );
                    Step::Continue
                }
            }
        },
    )
    .await;

    match &result {
        Ok(task) => {
            info!("Task {} completed", task_id);
            emit(
                &on_progress,
                TaskEvent::Completed {
                    task_id: task_id.to_string(),
                    entity_id: task.entity_id().map(str::to_string),
                },
            );
        }
        Err(e) => {
            info!("Task {} did not complete: {}", task_id, e);
            emit(
                &on_progress,
                TaskEvent::Failed {
                    task_id: task_id.to_string(),
                    error: e.to_string(),
                },
            );
        }
    }

    result
}

/// Helper to emit progress events
fn emit(callback: &Option<TaskCallback>, event: TaskEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
