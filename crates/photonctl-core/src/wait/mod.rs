//! Tracking of long-running operations
//!
//! Mutating API calls return a [`Task`](crate::api::Task). [`poll_task`]
//! follows that task to a terminal state; [`wait_for_cluster`] then follows
//! the affected cluster until it is READY, while a [`WaitSession`] renders
//! elapsed time in the background.
//!
//! Both pollers share one loop: fetch, classify, sleep. Transient fetch
//! failures are absorbed by a [`RetryBudget`]; the wall-clock limit comes from
//! the [`WaitPolicy`].

pub mod policy;
pub mod ready;
pub mod reporter;
pub mod task;

pub use policy::{RetryBudget, WaitPolicy};
pub use ready::{Converging, wait_for_cluster, wait_until_ready};
pub use reporter::{NoopRenderer, ProgressRenderer, WaitSession};
pub use task::{TaskCallback, TaskEvent, poll_task};

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::api::ApiResult;
use crate::error::{CoreError, Result};

/// What to do after a successful fetch
pub(crate) enum Step<T> {
    Done(T),
    Fail(CoreError),
    Continue,
}

/// Fetch and classify until a terminal step, the retry budget runs out, or
/// the policy's timeout elapses.
pub(crate) async fn poll_until<T, F, Fut, C>(
    what: &str,
    policy: &WaitPolicy,
    mut fetch: F,
    mut classify: C,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
    C: FnMut(T, Duration) -> Step<T>,
{
    let start = Instant::now();
    let mut budget = RetryBudget::new(policy.retry_budget);

    while start.elapsed() < policy.timeout {
        match fetch().await {
            Ok(value) => {
                budget.reset();
                match classify(value, start.elapsed()) {
                    Step::Done(value) => return Ok(value),
                    Step::Fail(err) => return Err(err),
                    Step::Continue => {}
                }
            }
            Err(err) => budget.record_failure(what, err)?,
        }

        let remaining = policy.timeout.saturating_sub(start.elapsed());
        tokio::time::sleep(policy.interval.min(remaining)).await;
    }

    Err(CoreError::WaitTimeout {
        what: what.to_string(),
        timeout: policy.timeout,
    })
}
