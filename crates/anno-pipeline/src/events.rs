//! Job lifecycle event fan-out.
//!
//! Listeners are invoked in registration order after a job reaches a
//! terminal state. A listener failure is logged and never interrupts the
//! remaining listeners or the caller.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, error};

use anno_models::VideoJob;

/// Observer for terminal job transitions. Both hooks default to no-ops so
/// listeners implement only the events they care about.
#[async_trait]
pub trait JobListener: Send + Sync {
    /// Stable name used in logs and metrics labels.
    fn name(&self) -> &'static str;

    async fn on_completed(&self, _job: &VideoJob) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_failed(&self, _job: &VideoJob) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct JobEventBus {
    listeners: Vec<Arc<dyn JobListener>>,
}

impl JobEventBus {
    pub fn new(listeners: Vec<Arc<dyn JobListener>>) -> Self {
        Self { listeners }
    }

    pub async fn notify_completed(&self, job: &VideoJob) {
        for listener in &self.listeners {
            debug!(job_id = job.id, listener = listener.name(), "dispatching completion event");
            if let Err(e) = listener.on_completed(job).await {
                counter!("job_listener_failures_total", "listener" => listener.name())
                    .increment(1);
                error!(
                    job_id = job.id,
                    listener = listener.name(),
                    "completion listener failed: {e:#}"
                );
            }
        }
    }

    pub async fn notify_failed(&self, job: &VideoJob) {
        for listener in &self.listeners {
            if let Err(e) = listener.on_failed(job).await {
                counter!("job_listener_failures_total", "listener" => listener.name())
                    .increment(1);
                error!(
                    job_id = job.id,
                    listener = listener.name(),
                    "failure listener failed: {e:#}"
                );
            }
        }
    }
}
