//! Job orchestration: creation, dispatch, and terminal transitions.
//!
//! All state changes go through the guarded repository transitions, so a job
//! that reached COMPLETED or FAILED is never modified again and listeners are
//! notified exactly once, by whoever wins the transition.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use anno_db::{asset_repo, draft_repo, job_repo, post_repo, profile_repo, Database};
use anno_models::{Asset, GenerationRequest, PostDraft, UserPost, VideoJob};
use anno_provider::ProviderRegistry;

use crate::error::{PipelineError, PipelineResult};
use crate::events::JobEventBus;

/// Draft rows start out awaiting review.
const DRAFT_STATUS_PENDING: &str = "pending";
/// Post rows for finished videos are immediately visible.
const POST_STATUS_PUBLISHED: &str = "published";

pub struct JobService {
    db: Database,
    registry: Arc<ProviderRegistry>,
    events: Arc<JobEventBus>,
}

impl JobService {
    pub fn new(db: Database, registry: Arc<ProviderRegistry>, events: Arc<JobEventBus>) -> Self {
        Self { db, registry, events }
    }

    /// Create a job and dispatch it to the async provider.
    ///
    /// The job is persisted as QUEUED before dispatch, so a crash between the
    /// two steps leaves a row the poller can still reconcile. Dispatch failure
    /// marks the job FAILED; either way the caller gets the job back rather
    /// than an error, matching the accepted-for-processing contract.
    pub async fn create_job(
        &self,
        owner_id: i64,
        request: &GenerationRequest,
    ) -> PipelineResult<VideoJob> {
        request
            .validate()
            .map_err(|field| PipelineError::Validation(format!("{field} must not be blank")))?;

        if profile_repo::find_by_id(&self.db, owner_id)?.is_none() {
            return Err(PipelineError::NotFound(format!("profile {owner_id}")));
        }

        let mut job = VideoJob::new(owner_id, request);
        job.id = job_repo::insert(&self.db, &job)?;
        counter!("jobs_created_total").increment(1);
        info!(job_id = job.id, owner_id, "video generation job created");

        let provider = self.registry.async_provider();
        match provider
            .request_creation(&request.prompt, request.style.as_deref())
            .await
        {
            Ok(creation_id) => {
                job_repo::mark_processing(&self.db, job.id, &creation_id)?;
                info!(job_id = job.id, %creation_id, "job dispatched to provider");
            }
            Err(e) => {
                warn!(job_id = job.id, "dispatch failed: {e}");
                self.fail_job(job.id, &format!("Dispatch failed: {e}")).await?;
            }
        }

        self.get_job(job.id).await
    }

    /// Materialize the finished video into domain records and complete the job.
    ///
    /// Idempotent: a job already in a terminal state is returned unchanged.
    pub async fn complete_job(&self, job_id: i64, video_url: &str) -> PipelineResult<VideoJob> {
        let job = self.get_job(job_id).await?;
        if job.is_terminal() {
            return Ok(job);
        }

        let profile = profile_repo::find_by_id(&self.db, job.owner_id)?.ok_or_else(|| {
            PipelineError::DataIntegrity(format!(
                "job {job_id} references missing profile {}",
                job.owner_id
            ))
        })?;
        if !profile.has_auth_identity() {
            return Err(PipelineError::DataIntegrity(format!(
                "profile {} has no auth identity",
                profile.id
            )));
        }

        let asset_id = asset_repo::insert(
            &self.db,
            &Asset::new(profile.id, "video", "generated.mp4", video_url),
        )?;
        let draft_id = draft_repo::insert(
            &self.db,
            &PostDraft::new(
                &job.title,
                &job.description,
                asset_id,
                &job.targets,
                DRAFT_STATUS_PENDING,
            ),
        )?;
        post_repo::insert(
            &self.db,
            &UserPost::new(
                profile.id,
                &job.title,
                &job.description,
                Some(video_url.to_string()),
                POST_STATUS_PUBLISHED,
                job.target_platforms(),
            ),
        )?;

        let transitioned =
            job_repo::mark_completed(&self.db, job_id, video_url, asset_id, draft_id)?;
        let job = self.get_job(job_id).await?;

        if transitioned {
            counter!("jobs_completed_total").increment(1);
            info!(job_id, asset_id, draft_id, "job completed");
            self.events.notify_completed(&job).await;
        } else {
            warn!(job_id, "completion lost the transition race, skipping notification");
        }
        Ok(job)
    }

    /// Move a job to FAILED with a reason. Idempotent on terminal jobs.
    pub async fn fail_job(&self, job_id: i64, reason: &str) -> PipelineResult<VideoJob> {
        let transitioned = job_repo::mark_failed(&self.db, job_id, reason)?;
        let job = self.get_job(job_id).await?;

        if transitioned {
            counter!("jobs_failed_total").increment(1);
            warn!(job_id, reason, "job failed");
            self.events.notify_failed(&job).await;
        }
        Ok(job)
    }

    pub async fn get_job(&self, job_id: i64) -> PipelineResult<VideoJob> {
        job_repo::find_by_id(&self.db, job_id)?
            .ok_or_else(|| PipelineError::NotFound(format!("job {job_id}")))
    }

    /// Non-terminal jobs in FIFO order.
    pub async fn pending_jobs(&self) -> PipelineResult<Vec<VideoJob>> {
        Ok(job_repo::pending(&self.db)?)
    }

    /// All jobs for an owner, newest first.
    pub async fn jobs_by_owner(&self, owner_id: i64) -> PipelineResult<Vec<VideoJob>> {
        Ok(job_repo::find_by_owner(&self.db, owner_id)?)
    }
}
