//! Background progress reporting for readiness waits
//!
//! A [`WaitSession`] owns one reporter task and the signal that stops it. The
//! signal lives in the session, not in process-wide state, so two waits never
//! stop each other's reporter.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{trace, warn};

const MIN_TICK: Duration = Duration::from_millis(10);

/// Draws elapsed-time feedback. Knows nothing about how the wait ends.
pub trait ProgressRenderer: Send + Sync + 'static {
    /// Called once per tick while the wait is running
    fn render(&self, elapsed: Duration);

    /// Called once, after the last `render`
    fn finish(&self) {}
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl ProgressRenderer for NoopRenderer {
    fn render(&self, _elapsed: Duration) {}
}

/// One running wait and its background reporter
pub struct WaitSession {
    started: Instant,
    stop: watch::Sender<bool>,
    reporter: JoinHandle<()>,
}

impl WaitSession {
    /// Spawn the reporter; it renders every `tick` until [`stop`](Self::stop).
    pub fn start(renderer: Arc<dyn ProgressRenderer>, tick: Duration) -> Self {
        let started = Instant::now();
        let (stop, mut stopped) = watch::channel(false);
        let tick = tick.max(MIN_TICK);

        let reporter = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    // The flag is only ever set to true; Err means the session
                    // was dropped without stop()
                    _ = stopped.changed() => break,
                    _ = ticker.tick() => renderer.render(started.elapsed()),
                }
            }

            renderer.finish();
            trace!("Progress reporter stopped");
        });

        Self {
            started,
            stop,
            reporter,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Signal the reporter and wait until it has exited
    pub async fn stop(self) {
        self.stop.send_replace(true);
        if let Err(e) = self.reporter.await {
            warn!("Progress reporter ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ProgressRenderer;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts renders and remembers whether `finish` ran
    #[derive(Debug, Default)]
    pub(crate) struct RecordingRenderer {
        renders: AtomicUsize,
        finished: AtomicBool,
        rendered_after_finish: AtomicBool,
    }

    impl RecordingRenderer {
        pub(crate) fn renders(&self) -> usize {
            self.renders.load(Ordering::SeqCst)
        }

        pub(crate) fn finished(&self) -> bool {
            self.finished.load(Ordering::SeqCst)
        }

        pub(crate) fn rendered_after_finish(&self) -> bool {
            self.rendered_after_finish.load(Ordering::SeqCst)
        }
    }

    impl ProgressRenderer for RecordingRenderer {
        fn render(&self, _elapsed: Duration) {
            if self.finished() {
                self.rendered_after_finish.store(true, Ordering::SeqCst);
            }
            self.renders.fetch_add(1, Ordering::SeqCst);
        }

        fn finish(&self) {
            self.finished.store(true, Ordering::SeqCst);
        }
    }
}
