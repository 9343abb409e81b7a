//! Background reconciliation of in-flight jobs.
//!
//! Every tick the poller loads the non-terminal jobs in FIFO order and asks
//! the async provider for each PROCESSING job's result. One misbehaving job
//! never blocks the rest of the scan.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, gauge};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use anno_models::JobStatus;
use anno_provider::ProviderRegistry;

use crate::error::{PipelineError, PipelineResult};
use crate::service::JobService;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Scan cadence.
    pub interval: Duration,
    /// Jobs older than this are failed instead of polled. `None` disables
    /// the cutoff.
    pub max_age: Option<Duration>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_age: Some(DEFAULT_MAX_AGE),
        }
    }
}

impl PollerConfig {
    /// Read `POLL_INTERVAL_SECS` and `JOB_MAX_AGE_SECS` from the environment.
    /// A max age of `0` disables the cutoff.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let interval = std::env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.interval);
        let max_age = match std::env::var("JOB_MAX_AGE_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.max_age,
        };
        Self { interval, max_age }
    }
}

pub struct JobPoller {
    service: Arc<JobService>,
    registry: Arc<ProviderRegistry>,
    config: PollerConfig,
}

impl JobPoller {
    pub fn new(
        service: Arc<JobService>,
        registry: Arc<ProviderRegistry>,
        config: PollerConfig,
    ) -> Self {
        Self {
            service,
            registry,
            config,
        }
    }

    /// Spawn the periodic scan loop.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.config.max_age.map(|d| d.as_secs()),
            "job poller started"
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so startup work
            // (migrations, warmup) finishes before the first scan.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    /// One full scan. Exposed for tests.
    pub async fn run_once(&self) {
        let jobs = match self.service.pending_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => {
                error!("failed to load pending jobs: {e}");
                return;
            }
        };

        gauge!("jobs_pending").set(jobs.len() as f64);
        if jobs.is_empty() {
            return;
        }
        debug!(count = jobs.len(), "scanning pending jobs");

        for job in jobs {
            let job_id = job.id;
            if let Err(e) = self.check_job(job).await {
                counter!("poller_check_failures_total").increment(1);
                error!(job_id, "error while checking job: {e}");
            }
        }
    }

    async fn check_job(&self, job: anno_models::VideoJob) -> PipelineResult<()> {
        if let Some(max_age) = self.config.max_age {
            let age = (Utc::now() - job.created_at)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                warn!(job_id = job.id, age_secs = age.as_secs(), "job exceeded maximum age");
                self.service
                    .fail_job(job.id, "Job exceeded maximum processing age")
                    .await?;
                return Ok(());
            }
        }

        // QUEUED jobs have not been dispatched yet; leave them to the
        // creation path or the age cutoff.
        if job.status != JobStatus::Processing {
            return Ok(());
        }

        let Some(creation_id) = job.creation_id.as_deref() else {
            self.service
                .fail_job(job.id, "Missing creation identifier")
                .await?;
            return Ok(());
        };

        let provider = self.registry.async_provider();
        match provider.fetch_result(creation_id).await {
            Ok(Some(video_url)) => {
                info!(job_id = job.id, "video ready, completing job");
                match self.service.complete_job(job.id, &video_url).await {
                    Ok(_) => {}
                    Err(PipelineError::DataIntegrity(reason)) => {
                        // Left non-terminal; the next scan retries once the
                        // inconsistency is repaired.
                        error!(job_id = job.id, "cannot materialize completion: {reason}");
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(None) => {
                debug!(job_id = job.id, "still processing");
            }
            Err(e) => {
                warn!(job_id = job.id, "provider poll failed: {e}");
                self.service
                    .fail_job(job.id, &format!("Status check failed: {e}"))
                    .await?;
            }
        }
        Ok(())
    }
}
