//! Terminal feedback for long-running operations
//!
//! Spinners draw to stderr so stdout stays clean for `-o json|yaml`. They are
//! hidden entirely when output is structured or `--non-interactive` is set.

use indicatif::{ProgressBar, ProgressStyle};
use photonctl_core::{ProgressRenderer, TaskCallback, TaskEvent};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} [{prefix}]";

fn spinner(message: String, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_prefix(format_elapsed(Duration::ZERO));
    pb.set_message(message);
    pb
}

/// `mm:ss`, or `h:mm:ss` past the hour
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// Readiness-wait renderer backed by an indicatif spinner
pub struct SpinnerRenderer {
    pb: ProgressBar,
}

impl SpinnerRenderer {
    pub fn new(message: impl Into<String>, visible: bool) -> Self {
        Self {
            pb: spinner(message.into(), visible),
        }
    }
}

impl ProgressRenderer for SpinnerRenderer {
    fn render(&self, elapsed: Duration) {
        self.pb.set_prefix(format_elapsed(elapsed));
        self.pb.tick();
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Spinner plus a callback that keeps it in step with task events
pub fn task_spinner(message: impl Into<String>, visible: bool) -> (ProgressBar, TaskCallback) {
    let pb = spinner(message.into(), visible);
    if visible {
        pb.enable_steady_tick(Duration::from_millis(100));
    }

    let pb_clone = pb.clone();
    let callback: TaskCallback = Box::new(move |event: TaskEvent| match event {
        TaskEvent::Started { task_id } => {
            pb_clone.set_message(format!("Task {} started", task_id));
        }
        TaskEvent::Polling {
            task_id,
            state,
            elapsed,
        } => {
            pb_clone.set_prefix(format_elapsed(elapsed));
            pb_clone.set_message(format!("Task {}: {}", task_id, state));
        }
        TaskEvent::Completed { .. } | TaskEvent::Failed { .. } => {
            pb_clone.finish_and_clear();
        }
    });

    (pb, callback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "01:15");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn test_hidden_renderer_is_inert() {
        let renderer = SpinnerRenderer::new("Waiting", false);
        renderer.render(Duration::from_secs(3));
        renderer.finish();
        assert!(renderer.pb.is_finished());
    }

    #[test]
    fn test_task_callback_finishes_spinner() {
        let (pb, callback) = task_spinner("Deleting cluster", false);
        callback(TaskEvent::Started {
            task_id: "task-1".to_string(),
        });
        callback(TaskEvent::Completed {
            task_id: "task-1".to_string(),
            entity_id: None,
        });
        assert!(pb.is_finished());
    }
}
