//! Waiting for a resource to converge
//!
//! After its task completes a cluster keeps expanding in the background. The
//! waiter polls it until READY or ERROR while a [`WaitSession`] renders
//! elapsed time. The session is stopped, and its reporter joined, before the
//! waiter returns, whatever the outcome.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ProgressRenderer, Step, WaitPolicy, WaitSession, poll_until};
use crate::api::{ApiResult, Cluster, ControlPlane, Readiness};
use crate::error::{CoreError, Result};

/// A remotely owned resource whose state can be observed
pub trait Converging {
    fn readiness(&self) -> Readiness;

    /// State as reported by the server, for messages
    fn state_label(&self) -> String;
}

impl Converging for Cluster {
    fn readiness(&self) -> Readiness {
        self.state.readiness()
    }

    fn state_label(&self) -> String {
        self.state.to_string()
    }
}

/// Poll `fetch` until the resource is READY
///
/// `kind` and `id` only name the resource in logs and errors.
pub async fn wait_until_ready<R, F, Fut>(
    kind: &str,
    id: &str,
    fetch: F,
    policy: &WaitPolicy,
    renderer: Arc<dyn ProgressRenderer>,
) -> Result<R>
where
    R: Converging,
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<R>>,
{
    let session = WaitSession::start(renderer, policy.progress_tick);
    let what = format!("{} {} to become READY", kind.to_lowercase(), id);

    let result = poll_until(&what, policy, fetch, |resource: R, elapsed| {
        match resource.readiness() {
            Readiness::Ready => {
                info!("{} {} is ready after {:?}", kind, id, elapsed);
                Step::Done(resource)
            }
            Readiness::Failed => Step::Fail(CoreError::ResourceFailed {
                kind: kind.to_string(),
                id: id.to_string(),
                state: resource.state_label(),
            }),
            Readiness::Converging => {
                debug!(
                    "{} {} is {} after {:?}",
                    kind,
                    id,
                    resource.state_label(),
                    elapsed
                );
                Step::Continue
            }
        }
    })
    .await;

    session.stop().await;
    result
}

/// Wait for a cluster to enter the READY state
pub async fn wait_for_cluster<A>(
    api: &A,
    cluster_id: &str,
    policy: &WaitPolicy,
    renderer: Arc<dyn ProgressRenderer>,
) -> Result<Cluster>
where
    A: ControlPlane + ?Sized,
{
    wait_until_ready(
        "Cluster",
        cluster_id,
        || api.get_cluster(cluster_id),
        policy,
        renderer,
    )
    .await
}
